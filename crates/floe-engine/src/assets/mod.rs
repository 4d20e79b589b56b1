pub mod builder;
pub mod level;
