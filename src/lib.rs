pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export logic types
pub use logic::{ApiChanger, ChangeKind};

// Export all model types
pub use model::*;

// Export store types
pub use store::{SnapshotError, SnapshotStore};
