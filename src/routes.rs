//! URL table for the service.

use hyper::Method;
use std::sync::Arc;

use tomados_urls::{Route, UrlRouter};

use crate::apps::sharing::{ImportTodoHandler, ShareTodoHandler, ShareTokenStore};
use crate::apps::todos::{TodoCollectionHandler, TodoDetailHandler, TodoStore};

/// Everything the route handlers need
#[derive(Clone)]
pub struct AppContext {
	pub todos: TodoStore,
	pub share_tokens: ShareTokenStore,
	/// Public base URL used when building share links
	pub base_url: String,
}

/// Build the router for all eight endpoints
///
/// `/todos/share` is registered ahead of `/todos/{id}` so the literal
/// segment is not captured as an id.
pub fn build_router(ctx: &AppContext) -> UrlRouter {
	let mut router = UrlRouter::new();

	router.add_route(
		Route::new(
			"/todos/share",
			Arc::new(ShareTodoHandler::new(
				ctx.todos.clone(),
				ctx.share_tokens.clone(),
				ctx.base_url.clone(),
			)),
		)
		.with_method(Method::POST)
		.with_name("todo-share"),
	);
	router.add_route(
		Route::new(
			"/todos/import/{token}",
			Arc::new(ImportTodoHandler::new(
				ctx.todos.clone(),
				ctx.share_tokens.clone(),
			)),
		)
		.with_name("todo-import"),
	);
	router.add_route(
		Route::new(
			"/todos",
			Arc::new(TodoCollectionHandler::new(ctx.todos.clone())),
		)
		.with_name("todo-list"),
	);
	router.add_route(
		Route::new(
			"/todos/{id}",
			Arc::new(TodoDetailHandler::new(ctx.todos.clone())),
		)
		.with_name("todo-detail"),
	);

	router
}
