pub mod annotation;
pub mod common;
pub mod system;
pub mod transition;

pub use annotation::*;
pub use common::*;
pub use system::*;
pub use transition::*;
