//! Access to the `sharetokens` collection.

use bson::{Document, doc};
use std::sync::Arc;
use std::time::Duration;

use tomados_db::{DocumentBackend, IndexSpec};
use tomados_http::{Error, Result};

use super::models::{ShareToken, TokenUsage};

const COLLECTION: &str = "sharetokens";

/// Store accessor for share tokens
#[derive(Clone)]
pub struct ShareTokenStore {
	backend: Arc<dyn DocumentBackend>,
}

impl ShareTokenStore {
	pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
		Self { backend }
	}

	/// Declare the unique token index and the TTL index on `expiresAt`
	///
	/// The TTL index physically removes expired tokens; until the reaper
	/// runs, expiry is still enforced by timestamp comparison.
	pub async fn ensure_indexes(&self) -> Result<()> {
		self.backend
			.create_index(COLLECTION, IndexSpec::new(doc! {"token": 1}).unique())
			.await
			.map_err(db_err)?;
		self.backend
			.create_index(
				COLLECTION,
				IndexSpec::new(doc! {"expiresAt": 1}).expire_after(Duration::ZERO),
			)
			.await
			.map_err(db_err)
	}

	/// Persist a newly issued token
	pub async fn insert(&self, share_token: &ShareToken) -> Result<()> {
		let document = serialize_token(share_token)?;
		self.backend
			.insert_one(COLLECTION, document)
			.await
			.map_err(db_err)?;
		Ok(())
	}

	/// Look up a token by its opaque string
	pub async fn find_by_token(&self, token: &str) -> Result<Option<ShareToken>> {
		let document = self
			.backend
			.find_one(COLLECTION, doc! {"token": token})
			.await
			.map_err(db_err)?;

		document.map(deserialize_token).transpose()
	}

	/// Append a consumption record to a token's usage list
	///
	/// This append and the preceding duplicate check are not atomic; two
	/// racing imports by the same identity can both pass the check. An
	/// accepted race, inherited from the original data model.
	pub async fn record_usage(&self, token: &str, usage: &TokenUsage) -> Result<()> {
		let entry = bson::serialize_to_document(usage)
			.map_err(|e| Error::Serialization(e.to_string()))?;
		self.backend
			.update_one(
				COLLECTION,
				doc! {"token": token},
				doc! {"$push": {"usedBy": entry}},
			)
			.await
			.map_err(db_err)?;
		Ok(())
	}
}

fn serialize_token(token: &ShareToken) -> Result<Document> {
	bson::serialize_to_document(token).map_err(|e| Error::Serialization(e.to_string()))
}

fn deserialize_token(document: Document) -> Result<ShareToken> {
	bson::deserialize_from_document(document).map_err(|e| Error::Serialization(e.to_string()))
}

fn db_err(error: tomados_db::DbError) -> Error {
	Error::Database(error.to_string())
}
