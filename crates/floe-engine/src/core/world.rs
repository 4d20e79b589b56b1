use glam::IVec2;
use log::debug;

use crate::api::types::EntityId;
use crate::components::grid::GridMap;
use crate::components::input::Input;
use crate::components::markers::{
    Block, Collidable, GoalMarker, Grip, Highlighted, Icy, Pushable, Satisfied,
};
use crate::components::motion::{Destination, Position, Velocity};

/// Dense component table indexed by entity slot.
///
/// Each occupied slot remembers the generation it was written for, so a stale
/// handle reads as absent. Iteration runs in ascending slot order, which keeps
/// every system deterministic.
#[derive(Debug, Clone)]
pub struct Table<T> {
    slots: Vec<Option<(u32, T)>>,
    len: usize,
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new(), len: 0 }
    }

    /// Insert or replace. Returns the previous value for the same entity.
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        let index = id.index as usize;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        match self.slots[index].replace((id.generation, value)) {
            Some((generation, old)) if generation == id.generation => Some(old),
            Some(_) => None,
            None => {
                self.len += 1;
                None
            }
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if !matches!(slot, Some((generation, _)) if *generation == id.generation) {
            return None;
        }
        self.len -= 1;
        slot.take().map(|(_, value)| value)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        match self.slots.get(id.index as usize)? {
            Some((generation, value)) if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        match self.slots.get_mut(id.index as usize)? {
            Some((generation, value)) if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|(generation, value)| (EntityId::new(index as u32, *generation), value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            slot.as_mut()
                .map(|(generation, value)| (EntityId::new(index as u32, *generation), value))
        })
    }

    /// Snapshot of the ids currently in the table, in slot order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn clear_slot(&mut self, index: u32) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            if slot.take().is_some() {
                self.len -= 1;
            }
        }
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Entity arena plus one table per component, and the level's map.
///
/// Designed for puzzle-sized levels (hundreds of entities, not millions).
#[derive(Debug, Clone, Default)]
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    pub map: GridMap,
    pub positions: Table<Position>,
    pub destinations: Table<Destination>,
    pub velocities: Table<Velocity>,
    pub inputs: Table<Input>,
    pub collidables: Table<Collidable>,
    pub blocks: Table<Block>,
    pub pushables: Table<Pushable>,
    pub icy: Table<Icy>,
    pub goals: Table<GoalMarker>,
    pub satisfied: Table<Satisfied>,
    pub highlighted: Table<Highlighted>,
}

impl World {
    pub fn new(map: GridMap) -> Self {
        Self { map, ..Self::default() }
    }

    /// Allocate a fresh entity handle, recycling freed slots.
    pub fn spawn(&mut self) -> EntityId {
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            return EntityId::new(index, self.generations[slot]);
        }
        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        EntityId::new(index, 0)
    }

    /// Remove an entity and all of its components.
    /// Returns false for stale or unknown handles.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let index = id.index;
        self.positions.clear_slot(index);
        self.destinations.clear_slot(index);
        self.velocities.clear_slot(index);
        self.inputs.clear_slot(index);
        self.collidables.clear_slot(index);
        self.blocks.clear_slot(index);
        self.pushables.clear_slot(index);
        self.icy.clear_slot(index);
        self.goals.clear_slot(index);
        self.satisfied.clear_slot(index);
        self.highlighted.clear_slot(index);

        let slot = index as usize;
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(index);
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        let slot = id.index as usize;
        slot < self.alive.len() && self.alive[slot] && self.generations[slot] == id.generation
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    /// The cell an entity occupies for collision purposes: its Destination if
    /// it has one, else its rounded Position.
    pub fn cell_of(&self, id: EntityId) -> Option<IVec2> {
        self.destinations
            .get(id)
            .map(|d| d.0)
            .or_else(|| self.positions.get(id).map(Position::cell))
    }

    /// Collidable entity occupying `cell`, ignoring `skip`.
    pub fn collidable_at(&self, cell: IVec2, skip: EntityId) -> Option<EntityId> {
        self.collidables
            .iter()
            .map(|(id, _)| id)
            .filter(|id| *id != skip)
            .find(|id| self.cell_of(*id) == Some(cell))
    }

    /// Unplaced block occupying `cell`.
    pub fn block_at(&self, cell: IVec2) -> Option<EntityId> {
        self.blocks
            .iter()
            .map(|(id, _)| id)
            .find(|id| self.cell_of(*id) == Some(cell))
    }

    pub fn is_icy(&self, cell: IVec2) -> bool {
        self.icy
            .iter()
            .any(|(id, _)| self.positions.get(id).map(Position::cell) == Some(cell))
    }

    /// Pushables currently carried by `pusher`, in slot order.
    pub fn carried_by(&self, pusher: EntityId) -> Vec<EntityId> {
        self.pushables
            .iter()
            .filter(|(_, p)| p.pusher == pusher)
            .map(|(id, _)| id)
            .collect()
    }

    /// Start carrying `target` with `pusher`, capturing the offset between
    /// their cells.
    ///
    /// Refuses placed (satisfied) targets, self-pushes, targets another mover
    /// already carries, and entities without a cell. Pushing a target this
    /// pusher already holds keeps the `Hold` grip. Returns whether `target`
    /// is carried by `pusher` afterwards.
    pub fn start_push(&mut self, pusher: EntityId, target: EntityId, grip: Grip) -> bool {
        if pusher == target || self.satisfied.contains(target) {
            debug!("refusing push of {target:?} by {pusher:?}");
            return false;
        }
        let grip = match self.pushables.get(target) {
            Some(p) if p.pusher != pusher => return false,
            Some(p) if p.grip == Grip::Hold => Grip::Hold,
            _ => grip,
        };
        let (Some(from), Some(to)) = (self.cell_of(pusher), self.cell_of(target)) else {
            return false;
        };
        self.pushables.insert(target, Pushable { offset: to - from, pusher, grip });
        true
    }

    /// Stop carrying `target`. Returns whether it was being carried.
    pub fn release_push(&mut self, target: EntityId) -> bool {
        self.pushables.remove(target).is_some()
    }
}
