pub mod catalog;
pub mod cloning;
pub mod engine;
pub mod idgen;

pub use catalog::*;
pub use engine::*;
