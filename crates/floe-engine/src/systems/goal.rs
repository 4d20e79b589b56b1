use glam::IVec2;
use log::{debug, info};

use crate::api::types::{EntityId, SimEvent};
use crate::components::markers::Satisfied;
use crate::core::world::World;

/// Places blocks that came to rest on a goal and tracks whether the level
/// is solved.
///
/// A placed block loses its Block capability (and any push in progress) for
/// good and gains Satisfied; it stays Collidable. The level is solved once
/// goals exist and no unplaced block is left.
#[derive(Debug, Clone, Default)]
pub struct GoalDetector {
    solved: bool,
}

impl GoalDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Run after movement resolution and interpolation.
    /// Scenes without goal markers are left untouched.
    pub fn update(&mut self, world: &mut World, events: &mut Vec<SimEvent>) {
        if world.goals.is_empty() {
            return;
        }

        let goal_cells: Vec<IVec2> = world
            .goals
            .iter()
            .filter_map(|(id, _)| world.positions.get(id).map(|p| p.cell()))
            .collect();

        // Only blocks that have arrived count; a slide across a goal does not.
        let placed: Vec<(EntityId, IVec2)> = world
            .blocks
            .iter()
            .filter_map(|(id, _)| {
                let cell = world.cell_of(id)?;
                let arrived = world.positions.get(id)?.is_at(cell);
                (arrived && goal_cells.contains(&cell)).then_some((id, cell))
            })
            .collect();

        for (id, cell) in placed {
            debug!("{id:?} placed on goal {cell}");
            world.release_push(id);
            world.blocks.remove(id);
            world.highlighted.remove(id);
            world.satisfied.insert(id, Satisfied);
            events.push(SimEvent::GoalReached { entity: id, cell });
        }

        let solved = world.blocks.is_empty();
        if solved && !self.solved {
            info!("level solved");
            events.push(SimEvent::Solved);
        }
        self.solved = solved;
    }

    pub fn reset(&mut self) {
        self.solved = false;
    }
}
