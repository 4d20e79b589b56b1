use glam::IVec2;

/// Generational handle for an entity in the [`World`](crate::core::world::World).
///
/// `index` addresses the dense component tables; `generation` is bumped every
/// time the slot is recycled, so stale handles never alias a new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

impl EntityId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Directional input flags.
/// 4-bit bitmask: up=1, down=2, left=4, right=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Direction(pub u8);

impl Direction {
    pub const NONE: Direction = Direction(0);
    pub const UP: Direction = Direction(1 << 0); // 0001
    pub const DOWN: Direction = Direction(1 << 1); // 0010
    pub const LEFT: Direction = Direction(1 << 2); // 0100
    pub const RIGHT: Direction = Direction(1 << 3); // 1000

    /// Priority order used when several bits are set at once.
    pub const ORDER: [Direction; 4] = [Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT];

    pub fn bits(self) -> u8 {
        self.0 & 0x0F
    }

    pub fn is_empty(self) -> bool {
        self.bits() == 0
    }

    pub fn contains(self, other: Direction) -> bool {
        other.bits() != 0 && (self.bits() & other.bits()) == other.bits()
    }

    pub fn union(self, other: Direction) -> Direction {
        Direction((self.0 | other.0) & 0x0F)
    }

    pub fn without(self, other: Direction) -> Direction {
        Direction(self.0 & !other.0 & 0x0F)
    }

    /// Bits set in `self` that were not set in `previous`.
    pub fn pressed_since(self, previous: Direction) -> Direction {
        Direction(self.0 & !previous.0 & 0x0F)
    }

    /// Grid step for a single direction flag (y grows downward).
    pub fn step(self) -> IVec2 {
        match self {
            Self::UP => IVec2::new(0, -1),
            Self::DOWN => IVec2::new(0, 1),
            Self::LEFT => IVec2::new(-1, 0),
            Self::RIGHT => IVec2::new(1, 0),
            _ => IVec2::ZERO,
        }
    }

    /// Single-axis step for a mask: the first set flag in [`Direction::ORDER`].
    pub fn primary_step(self) -> IVec2 {
        Self::ORDER
            .iter()
            .find(|dir| self.contains(**dir))
            .map(|dir| dir.step())
            .unwrap_or(IVec2::ZERO)
    }
}

impl std::ops::BitOr for Direction {
    type Output = Direction;

    fn bitor(self, rhs: Direction) -> Direction {
        self.union(rhs)
    }
}

/// Events emitted during a simulation tick.
/// Hosts drain these for sound, animation and UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// The proposed cell was void; the entity stays on its anchor.
    MoveRejected { entity: EntityId, cell: IVec2 },
    /// A carried block could not advance this tick.
    PushBlocked { entity: EntityId },
    /// A slide hit the iteration limit and stopped in place.
    SlideCapped { entity: EntityId, cell: IVec2 },
    /// A block came to rest on a goal and is now placed.
    GoalReached { entity: EntityId, cell: IVec2 },
    /// The last carried block was placed.
    Solved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_since_ignores_held_bits() {
        let now = Direction::UP | Direction::RIGHT;
        let before = Direction::RIGHT;
        assert_eq!(now.pressed_since(before), Direction::UP);
        assert!(now.pressed_since(now).is_empty());
    }

    #[test]
    fn primary_step_follows_priority() {
        assert_eq!((Direction::LEFT | Direction::DOWN).primary_step(), IVec2::new(0, 1));
        assert_eq!((Direction::RIGHT | Direction::LEFT).primary_step(), IVec2::new(-1, 0));
        assert_eq!(Direction::NONE.primary_step(), IVec2::ZERO);
    }

    #[test]
    fn high_bits_are_masked() {
        let dir = Direction(0xF8);
        assert_eq!(dir.bits(), 0x08);
        assert!(dir.contains(Direction::RIGHT));
    }
}
