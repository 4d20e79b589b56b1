use glam::Vec3;

use crate::components::motion::Velocity;
use crate::core::world::World;

/// Default interpolation speed in cells per second.
pub const SPEED: f32 = 8.0;

/// Steer every {Position, Destination, Velocity} entity toward its Destination.
///
/// Within one tick's travel (`dt * speed`) the entity snaps onto the cell and
/// stops. Otherwise only Velocity is written; [`integrate`](super::integrate)
/// advances Position on the next tick, so Position never overshoots.
pub fn interpolate(world: &mut World, dt: f32, speed: f32) {
    let World {
        positions,
        destinations,
        velocities,
        ..
    } = world;

    for (id, velocity) in velocities.iter_mut() {
        let (Some(position), Some(destination)) = (positions.get_mut(id), destinations.get(id)) else {
            continue;
        };
        let delta = destination.0.as_vec2() - position.xy();
        let dist = delta.length();
        if dist < dt * speed {
            position.0.x = destination.0.x as f32;
            position.0.y = destination.0.y as f32;
            *velocity = Velocity::ZERO;
            continue;
        }
        let dir = delta / dist;
        *velocity = Velocity(Vec3::new(dir.x * speed, dir.y * speed, 0.0));
    }
}
