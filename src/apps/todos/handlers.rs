//! HTTP handlers for the todo CRUD endpoints.

use async_trait::async_trait;
use bson::oid::ObjectId;
use hyper::Method;

use tomados_auth::CurrentUser;
use tomados_http::{Error, Handler, Request, Response, Result};

use super::models::{CreateTodoPayload, Todo, TodoResponse, UpdateTodoPayload, parse_due_date};
use super::store::TodoStore;

/// `GET /todos` and `POST /todos`
pub struct TodoCollectionHandler {
	store: TodoStore,
}

impl TodoCollectionHandler {
	pub fn new(store: TodoStore) -> Self {
		Self { store }
	}

	async fn list(&self, request: &Request) -> Result<Response> {
		let user = CurrentUser::require(request)?;
		let todos = self.store.list_for_owner(&user.id).await?;
		let body: Vec<TodoResponse> = todos.iter().map(TodoResponse::from).collect();
		Response::ok().with_json(&body)
	}

	async fn create(&self, request: &Request) -> Result<Response> {
		let user = CurrentUser::require(request)?;
		let payload: CreateTodoPayload = request.json()?;

		let title = payload.title.filter(|t| !t.trim().is_empty());
		let date = payload.date.filter(|d| !d.trim().is_empty());
		let (Some(title), Some(date)) = (title, date) else {
			return Err(Error::Validation("Title and date are required".to_string()));
		};

		let todo = Todo {
			id: None,
			title,
			description: payload.description,
			color: payload.color,
			date: bson::DateTime::from_chrono(parse_due_date(&date)?),
			priority: payload.priority.unwrap_or_default(),
			completed: false,
			created_at: bson::DateTime::now(),
			user_id: user.id,
		};
		todo.validate()?;

		let created = self.store.insert(todo).await?;
		Response::created().with_json(&TodoResponse::from(&created))
	}
}

#[async_trait]
impl Handler for TodoCollectionHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET => self.list(&request).await,
			Method::POST => self.create(&request).await,
			_ => Err(Error::MethodNotAllowed),
		}
	}
}

/// `GET`, `PATCH`, and `DELETE` on `/todos/{id}`
pub struct TodoDetailHandler {
	store: TodoStore,
}

impl TodoDetailHandler {
	pub fn new(store: TodoStore) -> Self {
		Self { store }
	}

	async fn retrieve(&self, request: &Request) -> Result<Response> {
		let user = CurrentUser::require(request)?;
		let id = todo_id(request)?;

		let todo = self
			.store
			.find_owned(&id, &user.id)
			.await?
			.ok_or_else(not_found)?;
		Response::ok().with_json(&TodoResponse::from(&todo))
	}

	async fn update(&self, request: &Request) -> Result<Response> {
		let user = CurrentUser::require(request)?;
		let id = todo_id(request)?;
		let payload: UpdateTodoPayload = request.json()?;

		let mut todo = self
			.store
			.find_owned(&id, &user.id)
			.await?
			.ok_or_else(not_found)?;
		todo.apply(payload)?;

		if !self.store.update_owned(&id, &user.id, &todo).await? {
			return Err(not_found());
		}
		Response::ok().with_json(&TodoResponse::from(&todo))
	}

	async fn delete(&self, request: &Request) -> Result<Response> {
		let user = CurrentUser::require(request)?;
		let id = todo_id(request)?;

		if !self.store.delete_owned(&id, &user.id).await? {
			return Err(not_found());
		}
		Response::ok().with_json(&serde_json::json!({
			"message": "Todo deleted successfully",
		}))
	}
}

#[async_trait]
impl Handler for TodoDetailHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET => self.retrieve(&request).await,
			Method::PATCH => self.update(&request).await,
			Method::DELETE => self.delete(&request).await,
			_ => Err(Error::MethodNotAllowed),
		}
	}
}

/// Parse the `{id}` path parameter
///
/// A malformed id cannot name any record, so it is reported as Not Found
/// rather than a validation error.
fn todo_id(request: &Request) -> Result<ObjectId> {
	let raw = request.path_param("id")?;
	ObjectId::parse_str(raw).map_err(|_| not_found())
}

fn not_found() -> Error {
	Error::NotFound("Todo not found".to_string())
}
