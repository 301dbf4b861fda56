//! Owner-scoped access to the `todos` collection.

use bson::oid::ObjectId;
use bson::{Document, doc};
use std::sync::Arc;

use tomados_db::{DocumentBackend, FindOptions, IndexSpec};
use tomados_http::{Error, Result};

use super::models::Todo;

const COLLECTION: &str = "todos";

/// Store accessor for todos
///
/// Every read and write is scoped by the owner identity: a lookup that
/// does not match both id and owner behaves exactly like a missing
/// record.
#[derive(Clone)]
pub struct TodoStore {
	backend: Arc<dyn DocumentBackend>,
}

impl TodoStore {
	pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
		Self { backend }
	}

	/// Declare the `(userId, completed)` compound index
	pub async fn ensure_indexes(&self) -> Result<()> {
		self.backend
			.create_index(
				COLLECTION,
				IndexSpec::new(doc! {"userId": 1, "completed": 1}),
			)
			.await
			.map_err(db_err)
	}

	/// All todos owned by the caller, newest first
	pub async fn list_for_owner(&self, owner: &str) -> Result<Vec<Todo>> {
		let documents = self
			.backend
			.find_many(
				COLLECTION,
				doc! {"userId": owner},
				FindOptions::new().with_sort(doc! {"createdAt": -1}),
			)
			.await
			.map_err(db_err)?;

		documents.into_iter().map(deserialize_todo).collect()
	}

	/// Insert a new todo, assigning its id
	pub async fn insert(&self, mut todo: Todo) -> Result<Todo> {
		todo.id = Some(ObjectId::new());
		let document = serialize_todo(&todo)?;
		self.backend
			.insert_one(COLLECTION, document)
			.await
			.map_err(db_err)?;
		Ok(todo)
	}

	/// Find a todo by `(id, owner)`
	pub async fn find_owned(&self, id: &ObjectId, owner: &str) -> Result<Option<Todo>> {
		let document = self
			.backend
			.find_one(COLLECTION, owned_filter(id, owner))
			.await
			.map_err(db_err)?;

		document.map(deserialize_todo).transpose()
	}

	/// Overwrite the stored fields of an owned todo
	///
	/// Returns false when `(id, owner)` matched nothing.
	pub async fn update_owned(&self, id: &ObjectId, owner: &str, todo: &Todo) -> Result<bool> {
		let mut fields = serialize_todo(todo)?;
		fields.remove("_id");

		let outcome = self
			.backend
			.update_one(COLLECTION, owned_filter(id, owner), doc! {"$set": fields})
			.await
			.map_err(db_err)?;
		Ok(outcome.matched())
	}

	/// Delete a todo by `(id, owner)`, returning whether one was removed
	pub async fn delete_owned(&self, id: &ObjectId, owner: &str) -> Result<bool> {
		let deleted = self
			.backend
			.delete_one(COLLECTION, owned_filter(id, owner))
			.await
			.map_err(db_err)?;
		Ok(deleted > 0)
	}
}

fn owned_filter(id: &ObjectId, owner: &str) -> Document {
	doc! {"_id": *id, "userId": owner}
}

fn serialize_todo(todo: &Todo) -> Result<Document> {
	bson::serialize_to_document(todo).map_err(|e| Error::Serialization(e.to_string()))
}

fn deserialize_todo(document: Document) -> Result<Todo> {
	bson::deserialize_from_document(document).map_err(|e| Error::Serialization(e.to_string()))
}

fn db_err(error: tomados_db::DbError) -> Error {
	Error::Database(error.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apps::todos::models::Priority;
	use tomados_db::MemoryBackend;

	fn store() -> (TodoStore, Arc<MemoryBackend>) {
		let backend = Arc::new(MemoryBackend::new());
		(TodoStore::new(backend.clone()), backend)
	}

	fn todo_for(owner: &str, title: &str, created_millis: i64) -> Todo {
		Todo {
			id: None,
			title: title.to_string(),
			description: None,
			color: None,
			date: bson::DateTime::from_millis(created_millis),
			priority: Priority::default(),
			completed: false,
			created_at: bson::DateTime::from_millis(created_millis),
			user_id: owner.to_string(),
		}
	}

	#[tokio::test]
	async fn test_insert_assigns_id() {
		let (store, _) = store();
		let inserted = store.insert(todo_for("alice", "A", 1_000)).await.unwrap();
		assert!(inserted.id.is_some());
	}

	#[tokio::test]
	async fn test_list_is_owner_scoped_and_newest_first() {
		let (store, _) = store();
		store.insert(todo_for("alice", "old", 1_000)).await.unwrap();
		store.insert(todo_for("alice", "new", 2_000)).await.unwrap();
		store.insert(todo_for("bob", "other", 3_000)).await.unwrap();

		let todos = store.list_for_owner("alice").await.unwrap();
		let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
		assert_eq!(titles, vec!["new", "old"]);
	}

	#[tokio::test]
	async fn test_find_owned_rejects_foreign_owner() {
		let (store, _) = store();
		let inserted = store.insert(todo_for("alice", "A", 1_000)).await.unwrap();
		let id = inserted.id.unwrap();

		assert!(store.find_owned(&id, "alice").await.unwrap().is_some());
		assert!(store.find_owned(&id, "bob").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_update_owned_rejects_foreign_owner() {
		let (store, _) = store();
		let mut todo = store.insert(todo_for("alice", "A", 1_000)).await.unwrap();
		let id = todo.id.unwrap();
		todo.completed = true;

		assert!(!store.update_owned(&id, "bob", &todo).await.unwrap());
		assert!(store.update_owned(&id, "alice", &todo).await.unwrap());

		let reloaded = store.find_owned(&id, "alice").await.unwrap().unwrap();
		assert!(reloaded.completed);
	}

	#[tokio::test]
	async fn test_delete_owned() {
		let (store, backend) = store();
		let inserted = store.insert(todo_for("alice", "A", 1_000)).await.unwrap();
		let id = inserted.id.unwrap();

		assert!(!store.delete_owned(&id, "bob").await.unwrap());
		assert!(store.delete_owned(&id, "alice").await.unwrap());
		assert_eq!(backend.count("todos"), 0);
	}

	#[tokio::test]
	async fn test_ensure_indexes_declares_compound_index() {
		let (store, backend) = store();
		store.ensure_indexes().await.unwrap();

		let indexes = backend.indexes("todos");
		assert_eq!(indexes.len(), 1);
		assert_eq!(indexes[0].keys, doc! {"userId": 1, "completed": 1});
	}
}
