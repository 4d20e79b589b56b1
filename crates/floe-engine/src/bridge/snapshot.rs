use bytemuck::{Pod, Zeroable};

use crate::core::world::World;

/// Per-entity frame data handed to renderers.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EntityFrame {
    /// Slot index of the entity.
    pub id: f32,
    /// Position in grid units.
    pub x: f32,
    pub y: f32,
    /// Render depth.
    pub z: f32,
    /// Resolved destination cell (equals x/y at rest).
    pub dest_x: f32,
    pub dest_y: f32,
    /// Speed along the direction of travel, for walk/idle animation.
    pub speed: f32,
    /// Bitwise OR of the `FLAG_*` constants.
    pub flags: f32,
}

impl EntityFrame {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const FLAG_COLLIDABLE: u32 = 1 << 0;
    pub const FLAG_PUSHABLE: u32 = 1 << 1;
    pub const FLAG_ICY: u32 = 1 << 2;
    pub const FLAG_GOAL: u32 = 1 << 3;
    pub const FLAG_SATISFIED: u32 = 1 << 4;
    pub const FLAG_HIGHLIGHTED: u32 = 1 << 5;
    pub const FLAG_CONTROLLED: u32 = 1 << 6;
    pub const FLAG_BLOCK: u32 = 1 << 7;

    pub fn flag_bits(&self) -> u32 {
        self.flags as u32
    }

    pub fn has(&self, flag: u32) -> bool {
        self.flag_bits() & flag != 0
    }
}

/// Frame buffer of entity snapshots, rebuilt after each frame.
pub struct FrameBuffer {
    pub frames: Vec<EntityFrame>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(256),
        }
    }

    /// Snapshot every entity with a Position, in slot order.
    pub fn rebuild(&mut self, world: &World) {
        self.frames.clear();
        for (id, position) in world.positions.iter() {
            let dest = world.cell_of(id).unwrap_or_else(|| position.cell());
            let speed = world.velocities.get(id).map(|v| v.xy().length()).unwrap_or(0.0);

            let mut flags = 0;
            let marks = [
                (world.collidables.contains(id), EntityFrame::FLAG_COLLIDABLE),
                (world.pushables.contains(id), EntityFrame::FLAG_PUSHABLE),
                (world.icy.contains(id), EntityFrame::FLAG_ICY),
                (world.goals.contains(id), EntityFrame::FLAG_GOAL),
                (world.satisfied.contains(id), EntityFrame::FLAG_SATISFIED),
                (world.highlighted.contains(id), EntityFrame::FLAG_HIGHLIGHTED),
                (world.inputs.contains(id), EntityFrame::FLAG_CONTROLLED),
                (world.blocks.contains(id), EntityFrame::FLAG_BLOCK),
            ];
            for (set, flag) in marks {
                if set {
                    flags |= flag;
                }
            }

            self.frames.push(EntityFrame {
                id: id.index as f32,
                x: position.0.x,
                y: position.0.y,
                z: position.0.z,
                dest_x: dest.x as f32,
                dest_y: dest.y as f32,
                speed,
                flags: flags as f32,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Raw bytes of the frame data.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.frames)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
