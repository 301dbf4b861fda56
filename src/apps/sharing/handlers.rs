//! HTTP handlers for the share-token flow.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use hyper::Method;

use tomados_auth::CurrentUser;
use tomados_http::{Error, Handler, Request, Response, Result};

use crate::apps::todos::{TodoResponse, TodoStore};

use super::models::{
	SharePayload, ShareInfoResponse, ShareLinkResponse, ShareToken, SnapshotResponse,
	TOKEN_TTL_DAYS, TodoSnapshot, TokenUsage, generate_token,
};
use super::store::ShareTokenStore;

/// `POST /todos/share` — issue a share token for an owned todo
pub struct ShareTodoHandler {
	todos: TodoStore,
	tokens: ShareTokenStore,
	base_url: String,
}

impl ShareTodoHandler {
	pub fn new(todos: TodoStore, tokens: ShareTokenStore, base_url: impl Into<String>) -> Self {
		Self {
			todos,
			tokens,
			base_url: base_url.into(),
		}
	}

	async fn share(&self, request: &Request) -> Result<Response> {
		let user = CurrentUser::require(request)?;
		let payload: SharePayload = request.json()?;

		let Some(todo_id) = payload.todo_id.filter(|id| !id.is_empty()) else {
			return Err(Error::Validation("Todo ID is required".to_string()));
		};
		let todo_id = ObjectId::parse_str(&todo_id)
			.map_err(|_| Error::NotFound("Todo not found".to_string()))?;

		// Only the owner may share; a foreign id reads as missing
		let todo = self
			.todos
			.find_owned(&todo_id, &user.id)
			.await?
			.ok_or_else(|| Error::NotFound("Todo not found".to_string()))?;

		let expires_at = Utc::now() + Duration::days(TOKEN_TTL_DAYS);
		let share_token = ShareToken {
			id: None,
			token: generate_token(),
			todo_data: TodoSnapshot::from(&todo),
			shared_by: user.id.clone(),
			shared_by_name: Some(user.display_name().to_string()),
			shared_by_image: user.image.clone(),
			created_at: bson::DateTime::now(),
			expires_at: bson::DateTime::from_chrono(expires_at),
			used_by: Vec::new(),
		};
		self.tokens.insert(&share_token).await?;

		let share_url = format!(
			"{}/shared/{}",
			self.base_url.trim_end_matches('/'),
			share_token.token
		);
		Response::ok().with_json(&ShareLinkResponse {
			share_url,
			token: share_token.token,
			expires_at,
		})
	}
}

#[async_trait]
impl Handler for ShareTodoHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::POST => self.share(&request).await,
			_ => Err(Error::MethodNotAllowed),
		}
	}
}

/// `GET` and `POST` on `/todos/import/{token}`
///
/// GET is the unauthenticated preview; POST consumes the token.
pub struct ImportTodoHandler {
	todos: TodoStore,
	tokens: ShareTokenStore,
}

impl ImportTodoHandler {
	pub fn new(todos: TodoStore, tokens: ShareTokenStore) -> Self {
		Self { todos, tokens }
	}

	async fn info(&self, request: &Request) -> Result<Response> {
		let token = request.path_param("token")?;
		let share_token = self
			.tokens
			.find_by_token(token)
			.await?
			.ok_or_else(token_not_found)?;

		// Expired tokens still preview; the flag tells the UI
		let is_expired = share_token.is_expired_at(bson::DateTime::now());

		// Best effort: an unauthenticated caller simply reads `false`
		let has_already_imported = CurrentUser::resolve(request)
			.map(|user| share_token.consumed_by(&user.id))
			.unwrap_or(false);

		Response::ok().with_json(&ShareInfoResponse {
			todo_data: SnapshotResponse::from(&share_token.todo_data),
			shared_by: share_token.shared_by.clone(),
			shared_by_name: share_token.shared_by_name.clone(),
			shared_by_image: share_token.shared_by_image.clone(),
			is_expired,
			has_already_imported,
		})
	}

	async fn import(&self, request: &Request) -> Result<Response> {
		let user = CurrentUser::require(request)?;
		let token = request.path_param("token")?;

		let share_token = self
			.tokens
			.find_by_token(token)
			.await?
			.ok_or_else(token_not_found)?;

		if share_token.is_expired_at(bson::DateTime::now()) {
			return Err(Error::Gone("Share link has expired".to_string()));
		}
		if share_token.shared_by == user.id {
			return Err(Error::SelfImport(
				"You cannot import your own shared todo".to_string(),
			));
		}
		if share_token.consumed_by(&user.id) {
			return Err(Error::Conflict(
				"You have already imported this todo".to_string(),
			));
		}

		let todo = self
			.todos
			.insert(share_token.todo_for_importer(&user.id))
			.await?;

		self.tokens
			.record_usage(
				&share_token.token,
				&TokenUsage {
					user_id: user.id,
					used_at: bson::DateTime::now(),
				},
			)
			.await?;

		Response::created().with_json(&TodoResponse::from(&todo))
	}
}

#[async_trait]
impl Handler for ImportTodoHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET => self.info(&request).await,
			Method::POST => self.import(&request).await,
			_ => Err(Error::MethodNotAllowed),
		}
	}
}

fn token_not_found() -> Error {
	Error::NotFound("Share link not found or expired".to_string())
}
