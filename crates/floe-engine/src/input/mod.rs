pub mod pad;
pub mod queue;
