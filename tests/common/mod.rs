//! Shared harness: the full middleware + router stack over in-memory
//! backends.

use hyper::Method;
use std::sync::Arc;

use tomados::apps::sharing::ShareTokenStore;
use tomados::apps::todos::TodoStore;
use tomados::{AppContext, build_router};
use tomados_auth::{
	CurrentUser, MemorySessionStore, SESSION_KEY_USER, Session, SessionMiddleware, SessionStore,
};
use tomados_db::{DocumentBackend, MemoryBackend};
use tomados_http::{Handler, MiddlewareChain, Request, Response};

pub const BASE_URL: &str = "http://localhost:3000";

pub struct TestApp {
	handler: Arc<dyn Handler>,
	pub backend: MemoryBackend,
	pub todos: TodoStore,
	pub share_tokens: ShareTokenStore,
	pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
	pub async fn new() -> Self {
		let backend = MemoryBackend::new();
		let shared: Arc<dyn DocumentBackend> = Arc::new(backend.clone());

		let todos = TodoStore::new(shared.clone());
		todos.ensure_indexes().await.unwrap();
		let share_tokens = ShareTokenStore::new(shared);
		share_tokens.ensure_indexes().await.unwrap();

		let sessions = Arc::new(MemorySessionStore::new());

		let router = build_router(&AppContext {
			todos: todos.clone(),
			share_tokens: share_tokens.clone(),
			base_url: BASE_URL.to_string(),
		});
		let chain = MiddlewareChain::new(Arc::new(router))
			.with_middleware(Arc::new(SessionMiddleware::new(sessions.clone())));

		Self {
			handler: Arc::new(chain),
			backend,
			todos,
			share_tokens,
			sessions,
		}
	}

	/// Seed a session for the given user and return its id
	pub async fn login(&self, user_id: &str) -> String {
		let session_id = format!("sess-{}", user_id);
		let mut session = Session::new();
		session
			.set(
				SESSION_KEY_USER,
				&CurrentUser {
					id: user_id.to_string(),
					name: Some(format!("{} Example", user_id)),
					image: None,
				},
			)
			.unwrap();
		self.sessions.save(&session_id, &session).await;
		session_id
	}

	pub async fn request(
		&self,
		method: Method,
		path: &str,
		session: Option<&str>,
		body: Option<serde_json::Value>,
	) -> Response {
		let mut builder = Request::builder().method(method).uri(path);
		if let Some(session) = session {
			builder = builder.header("cookie", &format!("tomados_session={}", session));
		}
		if let Some(body) = body {
			builder = builder.body(body.to_string());
		}
		let request = builder.build().unwrap();
		self.handler.handle(request).await.unwrap()
	}

	/// Create a todo through the API and return its JSON representation
	pub async fn create_todo(&self, session: &str, body: serde_json::Value) -> serde_json::Value {
		let response = self
			.request(Method::POST, "/todos", Some(session), Some(body))
			.await;
		assert_eq!(response.status, hyper::StatusCode::CREATED);
		json_body(&response)
	}
}

pub fn json_body(response: &Response) -> serde_json::Value {
	serde_json::from_slice(&response.body).unwrap()
}
