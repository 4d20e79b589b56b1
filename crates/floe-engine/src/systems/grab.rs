use glam::IVec2;
use log::debug;

use crate::api::types::EntityId;
use crate::components::markers::Grip;
use crate::core::world::World;

/// Blocks strictly closer than this many cells can be grabbed.
pub const GRAB_RANGE: f32 = 2.0;

/// Start and end pushes for every mover. Runs right before the resolver.
///
/// A held grab key keeps the nearest block in range; letting go releases it.
/// A fresh press toward an orthogonally adjacent block shoves it, together
/// with any blocks lined up straight behind it.
pub fn begin_pushes(world: &mut World) {
    for mover in world.inputs.ids() {
        let Some(input) = world.inputs.get(mover).copied() else {
            continue;
        };
        let Some(anchor) = world.cell_of(mover) else {
            continue;
        };
        if input.grab {
            grab_nearest(world, mover, anchor);
        } else {
            release_held(world, mover);
        }
        shove_line(world, mover, anchor, input.fresh_step());
    }
}

/// Drop every push that was started by pressing into a block.
/// Runs right after the resolver.
pub fn release_shoves(world: &mut World) {
    let shoved: Vec<EntityId> = world
        .pushables
        .iter()
        .filter(|(_, p)| p.grip == Grip::Shove)
        .map(|(id, _)| id)
        .collect();
    for id in shoved {
        world.release_push(id);
    }
}

fn grab_nearest(world: &mut World, mover: EntityId, anchor: IVec2) {
    let holding = world
        .pushables
        .iter()
        .any(|(_, p)| p.pusher == mover && p.grip == Grip::Hold);
    if holding {
        return;
    }

    let nearest = world
        .blocks
        .iter()
        .map(|(id, _)| id)
        .filter(|id| world.pushables.get(*id).map_or(true, |p| p.pusher == mover))
        .filter_map(|id| {
            let cell = world.cell_of(id)?;
            let distance = (cell - anchor).as_vec2().length();
            (distance < GRAB_RANGE).then_some((id, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((block, _)) = nearest {
        debug!("{mover:?} grabs {block:?}");
        world.start_push(mover, block, Grip::Hold);
    }
}

fn release_held(world: &mut World, mover: EntityId) {
    let held: Vec<EntityId> = world
        .pushables
        .iter()
        .filter(|(_, p)| p.pusher == mover && p.grip == Grip::Hold)
        .map(|(id, _)| id)
        .collect();
    for id in held {
        debug!("{mover:?} lets go of {id:?}");
        world.release_push(id);
    }
}

fn shove_line(world: &mut World, mover: EntityId, anchor: IVec2, step: IVec2) {
    if step == IVec2::ZERO {
        return;
    }
    let mut cell = anchor + step;
    for _ in 0..world.blocks.len() {
        let Some(block) = world.block_at(cell) else {
            return;
        };
        if !world.start_push(mover, block, Grip::Shove) {
            return;
        }
        cell += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Direction;
    use crate::components::input::Input;
    use crate::components::markers::{Block, Collidable};
    use crate::components::motion::{Destination, Position};

    fn spawn_block(world: &mut World, x: i32, y: i32) -> EntityId {
        let id = world.spawn();
        let cell = IVec2::new(x, y);
        world.positions.insert(id, Position::at_cell(cell, 2.0));
        world.destinations.insert(id, Destination(cell));
        world.collidables.insert(id, Collidable);
        world.blocks.insert(id, Block);
        id
    }

    fn spawn_player(world: &mut World, x: i32, y: i32) -> EntityId {
        let id = world.spawn();
        let cell = IVec2::new(x, y);
        world.positions.insert(id, Position::at_cell(cell, 3.0));
        world.destinations.insert(id, Destination(cell));
        world.collidables.insert(id, Collidable);
        world.inputs.insert(id, Input::default());
        id
    }

    fn set_input(world: &mut World, player: EntityId, mask: Direction, grab: bool) {
        if let Some(input) = world.inputs.get_mut(player) {
            input.advance(mask);
            input.grab = grab;
        }
    }

    #[test]
    fn fresh_press_shoves_adjacent_block() {
        let mut world = World::default();
        let player = spawn_player(&mut world, 0, 0);
        let block = spawn_block(&mut world, 1, 0);
        set_input(&mut world, player, Direction::RIGHT, false);

        begin_pushes(&mut world);
        let pushable = world.pushables.get(block).copied();
        assert_eq!(pushable.map(|p| (p.offset, p.grip)), Some((IVec2::X, Grip::Shove)));

        release_shoves(&mut world);
        assert!(world.pushables.is_empty());
        assert!(world.blocks.contains(block));
    }

    #[test]
    fn shove_takes_the_whole_straight_line() {
        let mut world = World::default();
        let player = spawn_player(&mut world, 0, 0);
        let first = spawn_block(&mut world, 1, 0);
        let second = spawn_block(&mut world, 2, 0);
        let gap = spawn_block(&mut world, 4, 0);
        set_input(&mut world, player, Direction::RIGHT, false);

        begin_pushes(&mut world);
        assert_eq!(world.carried_by(player), vec![first, second]);
        assert!(!world.pushables.contains(gap));
    }

    #[test]
    fn remote_and_trailing_blocks_are_left_alone() {
        let mut world = World::default();
        let player = spawn_player(&mut world, 2, 0);
        let behind = spawn_block(&mut world, 1, 0);
        let two_away = spawn_block(&mut world, 4, 0);
        let remote = spawn_block(&mut world, 5, 3);
        set_input(&mut world, player, Direction::RIGHT, false);

        begin_pushes(&mut world);
        assert!(world.pushables.is_empty());
        for id in [behind, two_away, remote] {
            assert!(world.blocks.contains(id));
        }
    }

    #[test]
    fn held_direction_does_not_shove() {
        let mut world = World::default();
        let player = spawn_player(&mut world, 0, 0);
        spawn_block(&mut world, 1, 0);
        set_input(&mut world, player, Direction::RIGHT, false);
        set_input(&mut world, player, Direction::RIGHT, false);

        begin_pushes(&mut world);
        assert!(world.pushables.is_empty());
    }

    #[test]
    fn grab_key_holds_nearest_block_in_range() {
        let mut world = World::default();
        let player = spawn_player(&mut world, 2, 2);
        let diagonal = spawn_block(&mut world, 3, 3);
        let beside = spawn_block(&mut world, 2, 1);
        let out_of_range = spawn_block(&mut world, 4, 2);
        set_input(&mut world, player, Direction::NONE, true);

        begin_pushes(&mut world);
        assert_eq!(world.carried_by(player), vec![beside]);
        assert_eq!(world.pushables.get(beside).map(|p| p.grip), Some(Grip::Hold));

        // Still held across ticks, and untouched by the post-resolve release.
        release_shoves(&mut world);
        begin_pushes(&mut world);
        assert_eq!(world.carried_by(player), vec![beside]);
        assert!(!world.pushables.contains(diagonal));
        assert!(!world.pushables.contains(out_of_range));

        set_input(&mut world, player, Direction::NONE, false);
        begin_pushes(&mut world);
        assert!(world.pushables.is_empty());
    }

    #[test]
    fn grab_with_nothing_in_range_does_nothing() {
        let mut world = World::default();
        let player = spawn_player(&mut world, 0, 0);
        spawn_block(&mut world, 0, 2);
        set_input(&mut world, player, Direction::NONE, true);

        begin_pushes(&mut world);
        assert!(world.pushables.is_empty());
    }
}
