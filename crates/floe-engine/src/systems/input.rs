use crate::api::types::Direction;
use crate::core::world::World;

/// Feed this tick's mask and grab state to every Input, shifting the old mask
/// into `last_direction`. Runs once per tick, before the resolver.
pub fn apply(world: &mut World, mask: Direction, grab: bool) {
    for (_, input) in world.inputs.iter_mut() {
        input.advance(mask);
        input.grab = grab;
    }
}
