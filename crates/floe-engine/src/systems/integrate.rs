use crate::core::world::World;

/// Advance Position by Velocity over `dt` for every entity that has both.
pub fn integrate(world: &mut World, dt: f32) {
    let World {
        positions,
        velocities,
        ..
    } = world;

    for (id, velocity) in velocities.iter() {
        if let Some(position) = positions.get_mut(id) {
            position.0 += velocity.0 * dt;
        }
    }
}
