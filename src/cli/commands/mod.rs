//! CLI command implementations.

pub mod evaluate;
pub mod size;
pub mod validate;

mod market;
