//! Session store backends.

use async_trait::async_trait;
use bson::doc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use tomados_db::DocumentBackend;

use crate::session::{Session, SessionId};

/// Storage backend for sessions
///
/// Lookups return `Option` rather than `Result`: a failed load is treated
/// as "no session" so the request proceeds anonymously instead of
/// failing.
#[async_trait]
pub trait SessionStore: Send + Sync {
	/// Load session data by session ID
	async fn load(&self, session_id: &SessionId) -> Option<Session>;

	/// Save session data
	async fn save(&self, session_id: &SessionId, session: &Session);

	/// Delete session data
	async fn delete(&self, session_id: &SessionId);

	/// Create a new session ID
	fn create_session_id(&self) -> SessionId {
		Uuid::new_v4().to_string()
	}
}

/// In-memory session store for tests and development
pub struct MemorySessionStore {
	sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl MemorySessionStore {
	pub fn new() -> Self {
		Self {
			sessions: Arc::new(Mutex::new(HashMap::new())),
		}
	}
}

impl Default for MemorySessionStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl SessionStore for MemorySessionStore {
	async fn load(&self, session_id: &SessionId) -> Option<Session> {
		let sessions = self.sessions.lock().await;
		sessions.get(session_id).cloned()
	}

	async fn save(&self, session_id: &SessionId, session: &Session) {
		let mut sessions = self.sessions.lock().await;
		sessions.insert(session_id.clone(), session.clone());
	}

	async fn delete(&self, session_id: &SessionId) {
		let mut sessions = self.sessions.lock().await;
		sessions.remove(session_id);
	}
}

/// Session store persisted in the `sessions` collection
///
/// Documents are `{_id: <session id>, data: {...}}`; the external login
/// flow writes them, this service reads them.
pub struct MongoSessionStore {
	backend: Arc<dyn DocumentBackend>,
}

const SESSIONS_COLLECTION: &str = "sessions";

impl MongoSessionStore {
	pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
		Self { backend }
	}
}

#[async_trait]
impl SessionStore for MongoSessionStore {
	async fn load(&self, session_id: &SessionId) -> Option<Session> {
		let document = self
			.backend
			.find_one(SESSIONS_COLLECTION, doc! {"_id": session_id.as_str()})
			.await
			.ok()??;
		let data = document.get_document("data").ok()?;
		let data = bson::deserialize_from_document(data.clone()).ok()?;
		Some(Session { data })
	}

	async fn save(&self, session_id: &SessionId, session: &Session) {
		let Ok(data) = bson::serialize_to_document(&session.data) else {
			return;
		};
		let _ = self
			.backend
			.delete_one(SESSIONS_COLLECTION, doc! {"_id": session_id.as_str()})
			.await;
		let _ = self
			.backend
			.insert_one(
				SESSIONS_COLLECTION,
				doc! {"_id": session_id.as_str(), "data": data},
			)
			.await;
	}

	async fn delete(&self, session_id: &SessionId) {
		let _ = self
			.backend
			.delete_one(SESSIONS_COLLECTION, doc! {"_id": session_id.as_str()})
			.await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::SESSION_KEY_USER;
	use crate::user::CurrentUser;
	use tomados_db::MemoryBackend;

	fn session_for(user_id: &str) -> Session {
		let mut session = Session::new();
		session
			.set(
				SESSION_KEY_USER,
				&CurrentUser {
					id: user_id.to_string(),
					name: None,
					image: None,
				},
			)
			.unwrap();
		session
	}

	#[tokio::test]
	async fn test_memory_store_roundtrip() {
		let store = MemorySessionStore::new();
		let session_id = store.create_session_id();

		assert!(store.load(&session_id).await.is_none());

		store.save(&session_id, &session_for("alice")).await;
		let loaded = store.load(&session_id).await.unwrap();
		assert_eq!(
			loaded.get::<CurrentUser>(SESSION_KEY_USER).map(|u| u.id),
			Some("alice".to_string())
		);

		store.delete(&session_id).await;
		assert!(store.load(&session_id).await.is_none());
	}

	#[tokio::test]
	async fn test_session_ids_are_unique() {
		let store = MemorySessionStore::new();
		assert_ne!(store.create_session_id(), store.create_session_id());
	}

	#[tokio::test]
	async fn test_mongo_store_roundtrip_over_memory_backend() {
		let backend = Arc::new(MemoryBackend::new());
		let store = MongoSessionStore::new(backend);
		let session_id = "sess-1".to_string();

		store.save(&session_id, &session_for("bob")).await;
		let loaded = store.load(&session_id).await.unwrap();
		assert_eq!(
			loaded.get::<CurrentUser>(SESSION_KEY_USER).map(|u| u.id),
			Some("bob".to_string())
		);

		store.delete(&session_id).await;
		assert!(store.load(&session_id).await.is_none());
	}

	#[tokio::test]
	async fn test_save_replaces_existing_session() {
		let backend = Arc::new(MemoryBackend::new());
		let store = MongoSessionStore::new(backend.clone());
		let session_id = "sess-1".to_string();

		store.save(&session_id, &session_for("bob")).await;
		store.save(&session_id, &session_for("carol")).await;

		assert_eq!(backend.count("sessions"), 1);
		let loaded = store.load(&session_id).await.unwrap();
		assert_eq!(
			loaded.get::<CurrentUser>(SESSION_KEY_USER).map(|u| u.id),
			Some("carol".to_string())
		);
	}
}
