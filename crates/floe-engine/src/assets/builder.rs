use glam::IVec2;
use log::info;

use crate::api::types::EntityId;
use crate::assets::level::{Glyph, LevelDesc, LevelError};
use crate::components::grid::GridMap;
use crate::components::input::Input;
use crate::components::layer::DepthLayer;
use crate::components::markers::{Block, Collidable, GoalMarker, Icy};
use crate::components::motion::{Destination, Position, Velocity};
use crate::core::world::World;

/// Builder for a grid entity. Components are attached as the chain runs.
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    id: EntityId,
    cell: IVec2,
}

impl<'w> EntityBuilder<'w> {
    /// Spawn an entity resting on `cell` at the given depth.
    pub fn new(world: &'w mut World, cell: IVec2, layer: DepthLayer) -> Self {
        let id = world.spawn();
        world.positions.insert(id, Position::at_cell(cell, layer.z()));
        Self { world, id, cell }
    }

    pub fn collidable(self) -> Self {
        self.world.collidables.insert(self.id, Collidable);
        self
    }

    /// Give the entity a Destination and Velocity so the interpolator moves it.
    pub fn movable(self) -> Self {
        self.world.destinations.insert(self.id, Destination(self.cell));
        self.world.velocities.insert(self.id, Velocity::ZERO);
        self
    }

    /// Mark the entity as a block movers can shove or grab.
    pub fn block(self) -> Self {
        self.world.blocks.insert(self.id, Block);
        self
    }

    pub fn controlled(self) -> Self {
        self.world.inputs.insert(self.id, Input::default());
        self
    }

    pub fn icy(self) -> Self {
        self.world.icy.insert(self.id, Icy);
        self
    }

    pub fn goal(self) -> Self {
        self.world.goals.insert(self.id, GoalMarker);
        self
    }

    pub fn id(self) -> EntityId {
        self.id
    }
}

pub fn spawn_wall(world: &mut World, cell: IVec2) -> EntityId {
    EntityBuilder::new(world, cell, DepthLayer::Block).collidable().id()
}

pub fn spawn_ice(world: &mut World, cell: IVec2) -> EntityId {
    EntityBuilder::new(world, cell, DepthLayer::Decal).icy().id()
}

pub fn spawn_goal(world: &mut World, cell: IVec2) -> EntityId {
    EntityBuilder::new(world, cell, DepthLayer::Decal).goal().id()
}

pub fn spawn_block(world: &mut World, cell: IVec2) -> EntityId {
    EntityBuilder::new(world, cell, DepthLayer::Block)
        .collidable()
        .movable()
        .block()
        .id()
}

pub fn spawn_player(world: &mut World, cell: IVec2) -> EntityId {
    EntityBuilder::new(world, cell, DepthLayer::Actor)
        .collidable()
        .movable()
        .controlled()
        .id()
}

/// Build a fresh World from a level description.
///
/// Blocks start out free; a push only begins once a mover shoves or grabs one.
pub fn load_level(desc: &LevelDesc) -> Result<World, LevelError> {
    desc.validate()?;
    let glyphs = desc.glyphs()?;

    let mut map = GridMap::new(desc.width(), desc.height());
    for (cell, glyph) in &glyphs {
        map.set(*cell, glyph.tile());
    }
    let mut world = World::new(map);

    for (cell, glyph) in glyphs {
        match glyph {
            Glyph::Void | Glyph::Floor => {}
            Glyph::Wall => {
                spawn_wall(&mut world, cell);
            }
            Glyph::Ice => {
                spawn_ice(&mut world, cell);
            }
            Glyph::Goal => {
                spawn_goal(&mut world, cell);
            }
            Glyph::Block => {
                spawn_block(&mut world, cell);
            }
            Glyph::BlockOnGoal => {
                spawn_goal(&mut world, cell);
                spawn_block(&mut world, cell);
            }
            Glyph::BlockOnIce => {
                spawn_ice(&mut world, cell);
                spawn_block(&mut world, cell);
            }
            Glyph::Player => {
                spawn_player(&mut world, cell);
            }
            Glyph::PlayerOnIce => {
                spawn_ice(&mut world, cell);
                spawn_player(&mut world, cell);
            }
        }
    }

    info!(
        "loaded level {:?}: {}x{}, {} entities, {} players, {} blocks, {} goals",
        desc.name,
        desc.width(),
        desc.height(),
        world.entity_count(),
        world.inputs.len(),
        world.blocks.len(),
        world.goals.len()
    );
    Ok(world)
}
