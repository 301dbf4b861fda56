//! HTTP request representation.

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::extensions::Extensions;

/// HTTP request as seen by handlers
///
/// The server constructs one of these per inbound request; routers fill
/// in `path_params` while dispatching.
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub remote_addr: Option<SocketAddr>,
	/// Parameters extracted from the matched route pattern, e.g. `{id}`
	pub path_params: HashMap<String, String>,
	/// Raw query string parameters
	pub query_params: HashMap<String, String>,
	/// Type-keyed values attached by middleware
	pub extensions: Extensions,
}

impl Request {
	/// Create a request from its parts
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
			path_params: HashMap::new(),
			query_params,
			extensions: Extensions::new(),
		}
	}

	/// Start building a request (mainly useful in tests)
	///
	/// # Examples
	///
	/// ```
	/// use tomados_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/todos")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/todos");
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::new()
	}

	/// The request path without the query string
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Deserialize the body as JSON
	///
	/// Fails with a validation error so malformed client payloads map to
	/// 400 rather than 500.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body)
			.map_err(|e| Error::Validation(format!("Invalid JSON body: {}", e)))
	}

	/// Set a path parameter (called by routers during dispatch)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Get a required path parameter
	pub fn path_param(&self, key: &str) -> Result<&str> {
		self.path_params
			.get(key)
			.map(String::as_str)
			.ok_or_else(|| Error::Internal(format!("Missing path parameter '{}'", key)))
	}

	/// URL-decoded query parameters
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| {
				let key = percent_decode_str(k).decode_utf8_lossy().to_string();
				let value = percent_decode_str(v).decode_utf8_lossy().to_string();
				(key, value)
			})
			.collect()
	}

	/// Value of a cookie from the `Cookie` header, if present
	pub fn cookie(&self, name: &str) -> Option<String> {
		let header = self.headers.get(hyper::header::COOKIE)?.to_str().ok()?;
		header.split(';').find_map(|pair| {
			let (key, value) = pair.trim().split_once('=')?;
			(key == name).then(|| value.to_string())
		})
	}

	/// Token from an `Authorization: Bearer ...` header, if present
	pub fn bearer_token(&self) -> Option<String> {
		let header = self
			.headers
			.get(hyper::header::AUTHORIZATION)?
			.to_str()
			.ok()?;
		header.strip_prefix("Bearer ").map(|t| t.trim().to_string())
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter_map(|pair| {
						// Split on the first '=' only so values may contain '='
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Builder for [`Request`]
pub struct RequestBuilder {
	method: Method,
	uri: Option<Uri>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl RequestBuilder {
	fn new() -> Self {
		Self {
			method: Method::GET,
			uri: None,
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			remote_addr: None,
		}
	}

	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: &str) -> Self {
		self.uri = uri.parse().ok();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Add a single header, ignoring invalid names or values
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri = self
			.uri
			.ok_or_else(|| Error::Internal("Request URI is missing or invalid".to_string()))?;
		let mut request = Request::new(self.method, uri, self.version, self.headers, self.body);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_query_param_parsing() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/todos?completed=true&color=red")
			.build()
			.unwrap();

		assert_eq!(
			request.query_params.get("completed"),
			Some(&"true".to_string())
		);
		assert_eq!(request.query_params.get("color"), Some(&"red".to_string()));
	}

	#[test]
	fn test_query_param_value_keeps_equals() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/todos?cursor=abc=def")
			.build()
			.unwrap();

		assert_eq!(
			request.query_params.get("cursor"),
			Some(&"abc=def".to_string())
		);
	}

	#[test]
	fn test_decoded_query_params() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/todos?title=Buy%20milk")
			.build()
			.unwrap();

		assert_eq!(
			request.decoded_query_params().get("title"),
			Some(&"Buy milk".to_string())
		);
	}

	#[test]
	fn test_json_body() {
		#[derive(serde::Deserialize)]
		struct Payload {
			title: String,
		}

		let request = Request::builder()
			.method(Method::POST)
			.uri("/todos")
			.body(r#"{"title": "Buy milk"}"#)
			.build()
			.unwrap();

		let payload: Payload = request.json().unwrap();
		assert_eq!(payload.title, "Buy milk");
	}

	#[test]
	fn test_json_body_invalid_is_validation_error() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/todos")
			.body("{not json")
			.build()
			.unwrap();

		let result: Result<serde_json::Value> = request.json();
		assert!(matches!(result, Err(Error::Validation(_))));
	}

	#[test]
	fn test_cookie_extraction() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/todos")
			.header("cookie", "theme=dark; tomados_session=sess-1")
			.build()
			.unwrap();

		assert_eq!(
			request.cookie("tomados_session"),
			Some("sess-1".to_string())
		);
		assert_eq!(request.cookie("missing"), None);
	}

	#[test]
	fn test_bearer_token() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/todos")
			.header("authorization", "Bearer sess-2")
			.build()
			.unwrap();

		assert_eq!(request.bearer_token(), Some("sess-2".to_string()));
	}

	#[test]
	fn test_path_param_missing() {
		let request = Request::builder()
			.method(Method::GET)
			.uri("/todos/1")
			.build()
			.unwrap();

		assert!(request.path_param("id").is_err());
	}
}
