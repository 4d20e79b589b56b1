use glam::IVec2;

use crate::api::types::EntityId;

/// The entity's unit-square footprint blocks other entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collidable;

/// A block that movers can shove or grab. Removed once it is placed on a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block;

/// How a push started, which decides when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grip {
    /// Started by pressing into the block; released after the tick resolves.
    Shove,
    /// Started by the grab key; released when the key goes up.
    Hold,
}

/// Carried by `pusher` at a rigid cell offset.
///
/// `offset` is captured when the push starts; the resolver keeps
/// `destination(self) == destination(pusher) + offset` and re-captures it when
/// a blocked move breaks that relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pushable {
    pub offset: IVec2,
    pub pusher: EntityId,
    pub grip: Grip,
}

/// Slippery tile: movers landing here keep sliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Icy;

/// Tile that blocks must reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalMarker;

/// A former block that came to rest on a goal. Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Satisfied;

/// Block sitting next to the controlled entity (visual feedback only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlighted;
