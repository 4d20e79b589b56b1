pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod input;
pub mod assets;
pub mod bridge;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, KeyBindings, SimConfig};
pub use api::simulation::Simulation;
pub use api::types::{Direction, EntityId, SimEvent};
pub use assets::builder::load_level;
pub use assets::level::{render_board, LevelDesc, LevelError};
pub use bridge::snapshot::{EntityFrame, FrameBuffer};
pub use components::grid::{GridMap, TileId};
pub use components::input::Input;
pub use components::layer::DepthLayer;
pub use components::markers::{
    Block, Collidable, GoalMarker, Grip, Highlighted, Icy, Pushable, Satisfied,
};
pub use components::motion::{Destination, Position, Velocity};
pub use core::time::SimClock;
pub use core::world::World;
pub use input::pad::DirectionPad;
pub use input::queue::{InputEvent, InputQueue};
pub use systems::goal::GoalDetector;
