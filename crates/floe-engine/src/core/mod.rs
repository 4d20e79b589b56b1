pub mod collision;
pub mod time;
pub mod world;
