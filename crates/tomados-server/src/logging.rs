//! Request logging middleware.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tomados_http::{Handler, Middleware, Request, Response, Result};

/// Logs method, path, status, and latency for every request
pub struct RequestLogMiddleware;

impl RequestLogMiddleware {
	pub fn new() -> Self {
		Self
	}
}

impl Default for RequestLogMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware for RequestLogMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let start = Instant::now();
		let method = request.method.to_string();
		let path = request.path().to_string();

		let result = next.handle(request).await;
		let elapsed_ms = start.elapsed().as_millis();

		match &result {
			Ok(response) => {
				tracing::info!(
					%method,
					%path,
					status = response.status.as_u16(),
					elapsed_ms,
					"request"
				);
			}
			Err(error) => {
				tracing::error!(%method, %path, %error, elapsed_ms, "request failed");
			}
		}

		result
	}
}
