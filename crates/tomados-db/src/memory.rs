//! In-process document backend for tests.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::backend::DocumentBackend;
use crate::error::{DbError, DbResult};
use crate::types::{FindOptions, IndexSpec, UpdateOutcome};

/// In-memory [`DocumentBackend`]
///
/// Supports the operation subset the application uses: equality filters,
/// `$set` and `$push` updates, single-key sorting, and index recording.
/// Declared indexes are recorded (so tests can assert on them) but not
/// enforced; TTL removal in particular does not happen, matching the lazy
/// reaping of the real storage engine.
///
/// Clones share the same underlying state.
#[derive(Clone, Default)]
pub struct MemoryBackend {
	collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
	indexes: Arc<Mutex<HashMap<String, Vec<IndexSpec>>>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Indexes declared for a collection
	pub fn indexes(&self, collection: &str) -> Vec<IndexSpec> {
		let indexes = self.indexes.lock().unwrap_or_else(|e| e.into_inner());
		indexes.get(collection).cloned().unwrap_or_default()
	}

	/// Number of documents in a collection
	pub fn count(&self, collection: &str) -> usize {
		let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
		collections.get(collection).map_or(0, Vec::len)
	}

	fn matches(document: &Document, filter: &Document) -> bool {
		filter
			.iter()
			.all(|(key, expected)| document.get(key) == Some(expected))
	}

	fn apply_update(document: &mut Document, update: &Document) -> DbResult<bool> {
		let mut changed = false;
		for (operator, fields) in update.iter() {
			let fields = fields.as_document().ok_or_else(|| {
				DbError::Execution(format!("Update operator {} requires a document", operator))
			})?;
			match operator.as_str() {
				"$set" => {
					for (key, value) in fields.iter() {
						if document.get(key) != Some(value) {
							document.insert(key.clone(), value.clone());
							changed = true;
						}
					}
				}
				"$push" => {
					for (key, value) in fields.iter() {
						match document.get_mut(key) {
							Some(Bson::Array(array)) => array.push(value.clone()),
							_ => {
								document
									.insert(key.clone(), Bson::Array(vec![value.clone()]));
							}
						}
						changed = true;
					}
				}
				other => {
					return Err(DbError::Execution(format!(
						"Unsupported update operator: {}",
						other
					)));
				}
			}
		}
		Ok(changed)
	}

	fn compare(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
		match (a, b) {
			(Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
			(Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.cmp(y),
			(Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
			(Some(Bson::Int32(x)), Some(Bson::Int32(y))) => x.cmp(y),
			(Some(Bson::Int64(x)), Some(Bson::Int64(y))) => x.cmp(y),
			(Some(Bson::Double(x)), Some(Bson::Double(y))) => {
				x.partial_cmp(y).unwrap_or(Ordering::Equal)
			}
			(Some(_), None) => Ordering::Greater,
			(None, Some(_)) => Ordering::Less,
			_ => Ordering::Equal,
		}
	}
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
	async fn find_one(&self, collection: &str, filter: Document) -> DbResult<Option<Document>> {
		let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
		Ok(collections
			.get(collection)
			.and_then(|docs| docs.iter().find(|doc| Self::matches(doc, &filter)))
			.cloned())
	}

	async fn find_many(
		&self,
		collection: &str,
		filter: Document,
		options: FindOptions,
	) -> DbResult<Vec<Document>> {
		let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
		let mut results: Vec<Document> = collections
			.get(collection)
			.map(|docs| {
				docs.iter()
					.filter(|doc| Self::matches(doc, &filter))
					.cloned()
					.collect()
			})
			.unwrap_or_default();

		if let Some(sort) = &options.sort
			&& let Some((key, direction)) = sort.iter().next()
		{
			let descending = matches!(direction, Bson::Int32(d) if *d < 0)
				|| matches!(direction, Bson::Int64(d) if *d < 0);
			results.sort_by(|a, b| {
				let ordering = Self::compare(a.get(key), b.get(key));
				if descending { ordering.reverse() } else { ordering }
			});
		}

		if let Some(skip) = options.skip {
			results = results.into_iter().skip(skip as usize).collect();
		}
		if let Some(limit) = options.limit {
			results.truncate(limit as usize);
		}

		Ok(results)
	}

	async fn insert_one(&self, collection: &str, mut document: Document) -> DbResult<String> {
		let id = match document.get("_id") {
			Some(Bson::ObjectId(oid)) => oid.to_hex(),
			Some(Bson::String(s)) => s.clone(),
			Some(other) => other.to_string(),
			None => {
				let oid = ObjectId::new();
				document.insert("_id", oid);
				oid.to_hex()
			}
		};

		let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
		collections
			.entry(collection.to_string())
			.or_default()
			.push(document);
		Ok(id)
	}

	async fn update_one(
		&self,
		collection: &str,
		filter: Document,
		update: Document,
	) -> DbResult<UpdateOutcome> {
		let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
		let Some(docs) = collections.get_mut(collection) else {
			return Ok(UpdateOutcome::new(0, 0));
		};

		match docs.iter_mut().find(|doc| Self::matches(doc, &filter)) {
			Some(document) => {
				let changed = Self::apply_update(document, &update)?;
				Ok(UpdateOutcome::new(1, u64::from(changed)))
			}
			None => Ok(UpdateOutcome::new(0, 0)),
		}
	}

	async fn delete_one(&self, collection: &str, filter: Document) -> DbResult<u64> {
		let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
		let Some(docs) = collections.get_mut(collection) else {
			return Ok(0);
		};

		match docs.iter().position(|doc| Self::matches(doc, &filter)) {
			Some(index) => {
				docs.remove(index);
				Ok(1)
			}
			None => Ok(0),
		}
	}

	async fn create_index(&self, collection: &str, spec: IndexSpec) -> DbResult<()> {
		let mut indexes = self.indexes.lock().unwrap_or_else(|e| e.into_inner());
		indexes.entry(collection.to_string()).or_default().push(spec);
		Ok(())
	}

	async fn health_check(&self) -> DbResult<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bson::doc;
	use std::time::Duration;

	#[tokio::test]
	async fn test_insert_assigns_object_id() {
		let backend = MemoryBackend::new();
		let id = backend
			.insert_one("todos", doc! {"title": "Buy milk"})
			.await
			.unwrap();

		assert_eq!(id.len(), 24);
		assert_eq!(backend.count("todos"), 1);
	}

	#[tokio::test]
	async fn test_find_one_equality_filter() {
		let backend = MemoryBackend::new();
		backend
			.insert_one("todos", doc! {"title": "A", "userId": "alice"})
			.await
			.unwrap();
		backend
			.insert_one("todos", doc! {"title": "B", "userId": "bob"})
			.await
			.unwrap();

		let found = backend
			.find_one("todos", doc! {"userId": "bob"})
			.await
			.unwrap()
			.unwrap();
		assert_eq!(found.get_str("title").unwrap(), "B");

		let missing = backend
			.find_one("todos", doc! {"userId": "carol"})
			.await
			.unwrap();
		assert!(missing.is_none());
	}

	#[tokio::test]
	async fn test_filter_requires_all_fields() {
		let backend = MemoryBackend::new();
		let id = backend
			.insert_one("todos", doc! {"title": "A", "userId": "alice"})
			.await
			.unwrap();
		let oid = ObjectId::parse_str(&id).unwrap();

		let wrong_owner = backend
			.find_one("todos", doc! {"_id": oid, "userId": "bob"})
			.await
			.unwrap();
		assert!(wrong_owner.is_none());
	}

	#[tokio::test]
	async fn test_find_many_sort_descending() {
		let backend = MemoryBackend::new();
		for (title, millis) in [("old", 1_000i64), ("new", 3_000), ("mid", 2_000)] {
			backend
				.insert_one(
					"todos",
					doc! {"title": title, "createdAt": bson::DateTime::from_millis(millis)},
				)
				.await
				.unwrap();
		}

		let results = backend
			.find_many(
				"todos",
				doc! {},
				FindOptions::new().with_sort(doc! {"createdAt": -1}),
			)
			.await
			.unwrap();

		let titles: Vec<&str> = results.iter().map(|d| d.get_str("title").unwrap()).collect();
		assert_eq!(titles, vec!["new", "mid", "old"]);
	}

	#[tokio::test]
	async fn test_update_set() {
		let backend = MemoryBackend::new();
		backend
			.insert_one("todos", doc! {"title": "A", "completed": false})
			.await
			.unwrap();

		let outcome = backend
			.update_one(
				"todos",
				doc! {"title": "A"},
				doc! {"$set": {"completed": true}},
			)
			.await
			.unwrap();
		assert_eq!(outcome, UpdateOutcome::new(1, 1));

		let updated = backend
			.find_one("todos", doc! {"title": "A"})
			.await
			.unwrap()
			.unwrap();
		assert!(updated.get_bool("completed").unwrap());
	}

	#[tokio::test]
	async fn test_update_no_match() {
		let backend = MemoryBackend::new();
		let outcome = backend
			.update_one(
				"todos",
				doc! {"title": "missing"},
				doc! {"$set": {"completed": true}},
			)
			.await
			.unwrap();
		assert!(!outcome.matched());
	}

	#[tokio::test]
	async fn test_update_push_creates_and_appends() {
		let backend = MemoryBackend::new();
		backend
			.insert_one("sharetokens", doc! {"token": "t1"})
			.await
			.unwrap();

		for user in ["bob", "carol"] {
			backend
				.update_one(
					"sharetokens",
					doc! {"token": "t1"},
					doc! {"$push": {"usedBy": {"userId": user}}},
				)
				.await
				.unwrap();
		}

		let document = backend
			.find_one("sharetokens", doc! {"token": "t1"})
			.await
			.unwrap()
			.unwrap();
		let used_by = document.get_array("usedBy").unwrap();
		assert_eq!(used_by.len(), 2);
	}

	#[tokio::test]
	async fn test_delete_one() {
		let backend = MemoryBackend::new();
		backend
			.insert_one("todos", doc! {"title": "A"})
			.await
			.unwrap();

		assert_eq!(
			backend.delete_one("todos", doc! {"title": "A"}).await.unwrap(),
			1
		);
		assert_eq!(
			backend.delete_one("todos", doc! {"title": "A"}).await.unwrap(),
			0
		);
		assert_eq!(backend.count("todos"), 0);
	}

	#[tokio::test]
	async fn test_indexes_recorded() {
		let backend = MemoryBackend::new();
		backend
			.create_index(
				"sharetokens",
				IndexSpec::new(doc! {"expiresAt": 1}).expire_after(Duration::ZERO),
			)
			.await
			.unwrap();

		let indexes = backend.indexes("sharetokens");
		assert_eq!(indexes.len(), 1);
		assert_eq!(indexes[0].expire_after, Some(Duration::ZERO));
	}

	#[tokio::test]
	async fn test_clones_share_state() {
		let backend = MemoryBackend::new();
		let clone = backend.clone();

		backend
			.insert_one("todos", doc! {"title": "A"})
			.await
			.unwrap();
		assert_eq!(clone.count("todos"), 1);
	}
}
