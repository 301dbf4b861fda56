//! Session-resolving middleware.

use async_trait::async_trait;
use std::sync::Arc;

use tomados_http::{Handler, Middleware, Request, Response, Result};

use crate::session::SESSION_KEY_USER;
use crate::store::SessionStore;
use crate::user::CurrentUser;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "tomados_session";

/// Resolves the caller's identity into request extensions
///
/// Looks for the session cookie (or an `Authorization: Bearer` token),
/// loads the session, and attaches the stored [`CurrentUser`]. Requests
/// without a resolvable session pass through anonymous; enforcement
/// happens in the handlers, which lets unauthenticated endpoints share
/// the same chain.
pub struct SessionMiddleware {
	store: Arc<dyn SessionStore>,
}

impl SessionMiddleware {
	pub fn new(store: Arc<dyn SessionStore>) -> Self {
		Self { store }
	}
}

#[async_trait]
impl Middleware for SessionMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let session_id = request
			.cookie(SESSION_COOKIE)
			.or_else(|| request.bearer_token());

		if let Some(session_id) = session_id
			&& let Some(session) = self.store.load(&session_id).await
			&& let Some(user) = session.get::<CurrentUser>(SESSION_KEY_USER)
		{
			request.extensions.insert(user);
		}

		next.handle(request).await
	}
}
