//! The document backend trait.

use async_trait::async_trait;
use bson::Document;

use crate::error::DbResult;
use crate::types::{FindOptions, IndexSpec, UpdateOutcome};

/// Operations the application performs against a document database
///
/// Filters and updates are plain BSON documents; collections are
/// addressed by name. Implementations: [`crate::MongoBackend`] for
/// production, [`crate::MemoryBackend`] for tests.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
	/// Find the first document matching the filter
	async fn find_one(&self, collection: &str, filter: Document) -> DbResult<Option<Document>>;

	/// Find all documents matching the filter
	async fn find_many(
		&self,
		collection: &str,
		filter: Document,
		options: FindOptions,
	) -> DbResult<Vec<Document>>;

	/// Insert a document, returning its id as a string
	async fn insert_one(&self, collection: &str, document: Document) -> DbResult<String>;

	/// Apply an update (`$set`, `$push`, ...) to the first matching document
	async fn update_one(
		&self,
		collection: &str,
		filter: Document,
		update: Document,
	) -> DbResult<UpdateOutcome>;

	/// Delete the first matching document, returning the deleted count
	async fn delete_one(&self, collection: &str, filter: Document) -> DbResult<u64>;

	/// Declare an index on a collection (idempotent)
	async fn create_index(&self, collection: &str, spec: IndexSpec) -> DbResult<()>;

	/// Verify the backend is reachable
	async fn health_check(&self) -> DbResult<()>;
}
