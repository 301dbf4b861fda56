//! Document database layer.
//!
//! [`DocumentBackend`] is the seam the application's stores are written
//! against. [`MongoBackend`] implements it over the MongoDB driver;
//! [`MemoryBackend`] is an in-process implementation for tests.

pub mod backend;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod types;

pub use backend::DocumentBackend;
pub use error::{DbError, DbResult};
pub use memory::MemoryBackend;
pub use mongo::{MongoBackend, MongoBackendBuilder};
pub use types::{FindOptions, IndexSpec, UpdateOutcome};
