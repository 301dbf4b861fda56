//! Request dispatch.

use async_trait::async_trait;
use std::sync::Arc;
use tomados_http::{Error, Handler, Request, Response, Result};

use crate::route::Route;

/// Dispatches requests to the first route whose pattern and method match
///
/// The router is the handler boundary of the service: errors returned by
/// endpoint handlers are converted here into their JSON representation,
/// so callers above the router always see a well-formed `Response`.
pub struct UrlRouter {
	routes: Vec<Route>,
}

impl UrlRouter {
	pub fn new() -> Self {
		Self { routes: Vec::new() }
	}

	pub fn add_route(&mut self, route: Route) {
		self.routes.push(route);
	}

	/// Register a handler for a path and method (builder style)
	pub fn route(
		mut self,
		path: &str,
		method: hyper::Method,
		handler: Arc<dyn Handler>,
	) -> Self {
		self.routes
			.push(Route::new(path, handler).with_method(method));
		self
	}

	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	async fn dispatch(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();
		let mut path_matched = false;

		for route in &self.routes {
			let Some(params) = route.match_path(&path) else {
				continue;
			};
			path_matched = true;
			if !route.accepts_method(&request.method) {
				continue;
			}

			for (key, value) in params {
				request.set_path_param(key, value);
			}
			return route.handler_arc().handle(request).await;
		}

		if path_matched {
			Err(Error::MethodNotAllowed)
		} else {
			Err(Error::NotFound(format!("No route matches {}", path)))
		}
	}
}

impl Default for UrlRouter {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Handler for UrlRouter {
	async fn handle(&self, request: Request) -> Result<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();

		match self.dispatch(request).await {
			Ok(response) => Ok(response),
			Err(error) => {
				if error.is_internal() {
					tracing::error!(%method, %path, %error, "request failed");
				}
				Ok(Response::from(error))
			}
		}
	}
}
