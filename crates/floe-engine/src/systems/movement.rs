//! Discrete grid resolver.
//!
//! Turns each mover's directional input into a conflict-free Destination for
//! the mover and every pushable it carries. Obstacles are always measured at
//! their current cell (Destination if set, else rounded Position), so an
//! entity resolved earlier in the tick blocks at its new cell and no longer
//! blocks at its old one.
//!
//! Every rejected proposal falls back to the entity's anchor: the cell it
//! held when the tick started.

use std::cmp::Reverse;

use glam::{IVec2, Vec3};
use log::{debug, warn};

use crate::api::config::SimConfig;
use crate::api::types::{EntityId, SimEvent};
use crate::components::grid::GridMap;
use crate::components::motion::{Destination, Velocity};
use crate::core::collision::{clamp_against, overlaps, round_cell};
use crate::core::world::World;

/// Tunables for one resolver pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveParams {
    /// Overlap width for unit boxes.
    pub detection_width: f32,
    /// Bound on slide steps and collision re-resolution passes.
    pub slide_limit: u32,
}

impl ResolveParams {
    pub fn from_config(config: &SimConfig, map: &GridMap) -> Self {
        Self {
            detection_width: config.detection_width,
            slide_limit: config.slide_limit_for(map),
        }
    }
}

/// Resolve every mover (entity with Input, Position and Velocity) once,
/// in ascending entity order.
pub fn resolve_movement(world: &mut World, params: ResolveParams, events: &mut Vec<SimEvent>) {
    let movers: Vec<EntityId> = world
        .inputs
        .iter()
        .map(|(id, _)| id)
        .filter(|id| world.positions.contains(*id) && world.velocities.contains(*id))
        .collect();

    for mover in movers {
        resolve_mover(world, mover, params, events);
    }
}

fn resolve_mover(world: &mut World, mover: EntityId, params: ResolveParams, events: &mut Vec<SimEvent>) {
    let (Some(anchor), Some(position), Some(input)) = (
        world.cell_of(mover),
        world.positions.get(mover).copied(),
        world.inputs.get(mover).copied(),
    ) else {
        return;
    };

    let carried = world.carried_by(mover);
    let pushing = !carried.is_empty();
    let step = input.intent(pushing);
    set_velocity(world, mover, step);

    if step == IVec2::ZERO {
        if !pushing {
            world.destinations.insert(mover, Destination(anchor));
        }
        return;
    }

    // A fresh press while carrying always means one whole cell from the
    // anchor; free walking steps from the live position so a held key keeps
    // the mover one cell ahead rather than racing off.
    let proposal = if pushing {
        anchor + step
    } else {
        round_cell(position.xy() + step.as_vec2())
    };

    if !world.map.is_walkable(proposal) {
        debug!("{mover:?}: move to {proposal} rejected, cell is void");
        world.destinations.insert(mover, Destination(anchor));
        set_velocity(world, mover, IVec2::ZERO);
        events.push(SimEvent::MoveRejected { entity: mover, cell: proposal });
        return;
    }

    // Mover and carried pushables, front of the push first, so a chain
    // vacates cells before the entity behind asks for them.
    let mut group: Vec<(EntityId, IVec2, IVec2)> = Vec::with_capacity(carried.len() + 1);
    group.push((mover, anchor, IVec2::ZERO));
    for pid in &carried {
        let (Some(pushable), Some(cell)) = (world.pushables.get(*pid).copied(), world.cell_of(*pid)) else {
            continue;
        };
        group.push((*pid, cell, pushable.offset));
    }
    group.sort_by_key(|(_, _, offset)| Reverse(offset.dot(step)));

    for &(id, cell, offset) in &group {
        let resolved = resolve_entity(world, id, cell, proposal + offset, step, params, events);
        world.destinations.insert(id, Destination(resolved));
        if id != mover {
            if resolved == cell {
                debug!("{mover:?}: push of {id:?} blocked at {cell}");
                events.push(SimEvent::PushBlocked { entity: id });
                set_velocity(world, id, IVec2::ZERO);
            } else {
                set_velocity(world, id, step);
            }
        }
    }

    separate_overlaps(world, mover, &group);

    // Re-capture offsets so a block left behind stays put on the next press.
    let Some(mover_cell) = world.cell_of(mover) else {
        return;
    };
    for pid in carried {
        let Some(cell) = world.cell_of(pid) else {
            continue;
        };
        if let Some(pushable) = world.pushables.get_mut(pid) {
            pushable.offset = cell - mover_cell;
        }
    }
}

/// Collision, ice slide and boundary for one entity travelling along `step`.
fn resolve_entity(
    world: &World,
    id: EntityId,
    anchor: IVec2,
    target: IVec2,
    step: IVec2,
    params: ResolveParams,
    events: &mut Vec<SimEvent>,
) -> IVec2 {
    let mut dest = resolve_collisions(world, id, anchor, target, step, params);

    let mut slides = 0;
    while dest != anchor && world.is_icy(dest) {
        let next = dest + step;
        if !world.map.is_walkable(next) || world.collidable_at(next, id).is_some() {
            break;
        }
        if slides >= params.slide_limit {
            warn!("{id:?}: slide capped at {dest} after {slides} steps");
            events.push(SimEvent::SlideCapped { entity: id, cell: dest });
            break;
        }
        slides += 1;
        dest = resolve_collisions(world, id, anchor, next, step, params);
    }

    if !world.map.is_walkable(dest) {
        return anchor;
    }
    dest
}

/// Clamp `target` against overlapping collidables until clear.
/// Gives up on the anchor if a clamp would go behind it or never settles.
fn resolve_collisions(
    world: &World,
    id: EntityId,
    anchor: IVec2,
    target: IVec2,
    step: IVec2,
    params: ResolveParams,
) -> IVec2 {
    let mut dest = target;
    for _ in 0..=params.slide_limit {
        let hit = world
            .collidables
            .iter()
            .map(|(cid, _)| cid)
            .filter(|cid| *cid != id)
            .filter_map(|cid| world.cell_of(cid))
            .find(|cell| overlaps(dest.as_vec2(), cell.as_vec2(), params.detection_width));

        let Some(obstacle) = hit else {
            return dest;
        };
        let clamped = clamp_against(dest, obstacle, step);
        if clamped == dest || (clamped - anchor).dot(step) < 0 {
            return anchor;
        }
        dest = clamped;
    }
    anchor
}

/// Revert group members that ended on another collidable's cell, carried
/// pushables before the mover, until nothing changes. Each member reverts at
/// most once, so this settles within `group.len()` passes.
fn separate_overlaps(world: &mut World, mover: EntityId, group: &[(EntityId, IVec2, IVec2)]) {
    let mut order: Vec<(EntityId, IVec2)> = group
        .iter()
        .filter(|(id, _, _)| *id != mover)
        .map(|(id, anchor, _)| (*id, *anchor))
        .collect();
    if let Some((_, anchor, _)) = group.iter().find(|(id, _, _)| *id == mover) {
        order.push((mover, *anchor));
    }

    for _ in 0..=order.len() {
        let mut changed = false;
        for &(id, anchor) in &order {
            let Some(cell) = world.cell_of(id) else {
                continue;
            };
            if cell != anchor && world.collidable_at(cell, id).is_some() {
                debug!("{id:?}: {cell} still occupied, staying at {anchor}");
                world.destinations.insert(id, Destination(anchor));
                set_velocity(world, id, IVec2::ZERO);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

fn set_velocity(world: &mut World, id: EntityId, step: IVec2) {
    if let Some(velocity) = world.velocities.get_mut(id) {
        *velocity = Velocity(Vec3::new(step.x as f32, step.y as f32, 0.0));
    }
}
