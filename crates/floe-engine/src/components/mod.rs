pub mod grid;
pub mod input;
pub mod layer;
pub mod markers;
pub mod motion;
