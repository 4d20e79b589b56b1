use crate::api::types::EntityId;
use crate::components::markers::Highlighted;
use crate::core::world::World;

/// The controlled entity: the first entity with Input and Position.
pub fn controlled_entity(world: &World) -> Option<EntityId> {
    world
        .inputs
        .iter()
        .map(|(id, _)| id)
        .find(|id| world.positions.contains(*id))
}

/// Mark blocks one orthogonal step from the controlled entity as
/// Highlighted and clear the mark everywhere else.
pub fn highlight_adjacent(world: &mut World) {
    let Some(player) = controlled_entity(world).and_then(|id| world.positions.get(id).copied()) else {
        return;
    };
    let player_cell = player.cell();

    let adjacent: Vec<EntityId> = world
        .blocks
        .iter()
        .map(|(id, _)| id)
        .filter(|id| {
            world.positions.get(*id).is_some_and(|pos| {
                let d = (pos.cell() - player_cell).abs();
                d.x + d.y == 1
            })
        })
        .collect();

    for id in world.highlighted.ids() {
        if !adjacent.contains(&id) {
            world.highlighted.remove(id);
        }
    }
    for id in adjacent {
        world.highlighted.insert(id, Highlighted);
    }
}
