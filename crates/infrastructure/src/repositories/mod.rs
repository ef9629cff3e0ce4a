//! Repository implementations
//!
//! In-memory and PostgreSQL implementations of the application store ports.

mod dataset_repository;
mod memory;
mod model_repository;

pub use dataset_repository::PgDatasetStore;
pub use memory::{InMemoryDatasetStore, InMemoryModelStore};
pub use model_repository::PgModelStore;
