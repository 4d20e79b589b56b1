/// Render depth of a grid entity, stored in `Position.z`.
///
/// Layers are drawn back-to-front: Ground first, Actor last.
/// Depth never takes part in collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum DepthLayer {
    #[default]
    Ground = 0,
    Decal = 1,
    Block = 2,
    Actor = 3,
}

impl DepthLayer {
    /// Total number of depth layers.
    pub const COUNT: usize = 4;

    /// Returns None if the value is out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ground),
            1 => Some(Self::Decal),
            2 => Some(Self::Block),
            3 => Some(Self::Actor),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Value written into `Position.z`.
    pub fn z(self) -> f32 {
        self as u8 as f32
    }
}
