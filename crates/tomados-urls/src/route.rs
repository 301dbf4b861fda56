//! Route definition and path pattern matching.

use hyper::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tomados_http::Handler;

/// A compiled path pattern
///
/// Patterns are matched segment-wise; `{name}` segments capture the
/// corresponding path segment. Trailing slashes are ignored on both
/// sides.
///
/// # Examples
///
/// ```
/// use tomados_urls::PathPattern;
///
/// let pattern = PathPattern::new("/todos/{id}");
/// let params = pattern.matches("/todos/42").unwrap();
/// assert_eq!(params.get("id"), Some(&"42".to_string()));
///
/// assert!(pattern.matches("/todos").is_none());
/// assert!(pattern.matches("/todos/42/extra").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
	segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
	Literal(String),
	Param(String),
}

impl PathPattern {
	pub fn new(pattern: &str) -> Self {
		let segments = pattern
			.trim_matches('/')
			.split('/')
			.filter(|s| !s.is_empty())
			.map(|s| {
				if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
					Segment::Param(name.to_string())
				} else {
					Segment::Literal(s.to_string())
				}
			})
			.collect();
		Self { segments }
	}

	/// Match a request path, returning captured parameters on success
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let parts: Vec<&str> = path
			.trim_matches('/')
			.split('/')
			.filter(|s| !s.is_empty())
			.collect();

		if parts.len() != self.segments.len() {
			return None;
		}

		let mut params = HashMap::new();
		for (segment, part) in self.segments.iter().zip(parts) {
			match segment {
				Segment::Literal(literal) => {
					if literal != part {
						return None;
					}
				}
				Segment::Param(name) => {
					params.insert(name.clone(), part.to_string());
				}
			}
		}
		Some(params)
	}
}

/// A single route: pattern, optional method constraint, handler
#[derive(Clone)]
pub struct Route {
	pub path: String,
	pub method: Option<Method>,
	pub name: Option<String>,
	pattern: PathPattern,
	handler: Arc<dyn Handler>,
}

impl Route {
	pub fn new(path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		let path = path.into();
		let pattern = PathPattern::new(&path);
		Self {
			path,
			method: None,
			name: None,
			pattern,
			handler,
		}
	}

	/// Restrict this route to a single HTTP method
	pub fn with_method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	/// Name the route (used in logs and debugging)
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Whether this route accepts the given method
	pub fn accepts_method(&self, method: &Method) -> bool {
		self.method.as_ref().is_none_or(|m| m == method)
	}

	/// Match a request path against this route's pattern
	pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
		self.pattern.matches(path)
	}

	pub fn handler_arc(&self) -> Arc<dyn Handler> {
		Arc::clone(&self.handler)
	}
}
