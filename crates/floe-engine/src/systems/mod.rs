pub mod destination;
pub mod goal;
pub mod grab;
pub mod input;
pub mod integrate;
pub mod movement;
pub mod pushable;
