use glam::{IVec2, Vec2, Vec3};

use crate::core::collision::round_cell;

/// Where the entity actually is, in grid units.
///
/// `x`/`y` hold fractional values while the entity travels between cells;
/// `z` is the render depth and never takes part in collision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Position resting exactly on `cell` at depth `z`.
    pub fn at_cell(cell: IVec2, z: f32) -> Self {
        Self(cell.as_vec2().extend(z))
    }

    pub fn xy(&self) -> Vec2 {
        self.0.truncate()
    }

    /// Nearest grid cell (halves round up).
    pub fn cell(&self) -> IVec2 {
        round_cell(self.xy())
    }

    /// Whether the entity sits exactly on `cell`.
    pub fn is_at(&self, cell: IVec2) -> bool {
        self.xy() == cell.as_vec2()
    }
}

/// The resolved cell an entity is travelling to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Destination(pub IVec2);

/// Derived speed in grid units per second. Read by animation and the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec3);

impl Velocity {
    pub const ZERO: Velocity = Velocity(Vec3::ZERO);

    pub fn xy(&self) -> Vec2 {
        self.0.truncate()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rounds_half_up() {
        assert_eq!(Position::new(2.5, 3.49, 0.0).cell(), IVec2::new(3, 3));
        assert_eq!(Position::new(-0.5, -1.6, 0.0).cell(), IVec2::new(0, -2));
    }

    #[test]
    fn at_cell_keeps_depth() {
        let pos = Position::at_cell(IVec2::new(4, 1), 3.0);
        assert_eq!(pos.0, Vec3::new(4.0, 1.0, 3.0));
        assert!(pos.is_at(IVec2::new(4, 1)));
        assert!(!Position::new(4.2, 1.0, 0.0).is_at(IVec2::new(4, 1)));
    }
}
