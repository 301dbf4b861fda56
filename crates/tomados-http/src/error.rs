//! Service-wide error taxonomy.
//!
//! Every failure a handler can produce is one of these variants; the
//! router maps them to an HTTP status plus a `{"error": "..."}` JSON body
//! at the boundary.

use thiserror::Error as ThisError;

/// Result type used across the service
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for request handling
#[derive(Debug, ThisError)]
pub enum Error {
	/// No valid session was resolved for a data-touching operation
	#[error("Unauthorized")]
	Unauthorized,

	/// A required field is missing or a field failed validation
	#[error("{0}")]
	Validation(String),

	/// No record matches the lookup, scoped by the caller's identity
	#[error("{0}")]
	NotFound(String),

	/// The issuing identity attempted to consume its own share token
	#[error("{0}")]
	SelfImport(String),

	/// The caller already consumed this share token
	#[error("{0}")]
	Conflict(String),

	/// The share token passed its expiry timestamp
	#[error("{0}")]
	Gone(String),

	/// The route exists but not for this HTTP method
	#[error("Method not allowed")]
	MethodNotAllowed,

	/// Payload could not be serialized or deserialized
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// A database round trip failed
	#[error("Database error: {0}")]
	Database(String),

	/// Anything else
	#[error("{0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code this error maps to at the handler boundary
	///
	/// # Examples
	///
	/// ```
	/// use tomados_http::Error;
	///
	/// assert_eq!(Error::Unauthorized.status_code(), 401);
	/// assert_eq!(Error::NotFound("Todo not found".into()).status_code(), 404);
	/// assert_eq!(Error::Gone("Share link has expired".into()).status_code(), 410);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::Unauthorized => 401,
			Error::Validation(_) | Error::SelfImport(_) => 400,
			Error::NotFound(_) => 404,
			Error::Conflict(_) => 409,
			Error::Gone(_) => 410,
			Error::MethodNotAllowed => 405,
			Error::Serialization(_) | Error::Database(_) | Error::Internal(_) => 500,
		}
	}

	/// Whether this error is an unexpected server-side failure worth logging
	pub fn is_internal(&self) -> bool {
		self.status_code() >= 500
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::Unauthorized, 401)]
	#[case(Error::Validation("Title and date are required".into()), 400)]
	#[case(Error::SelfImport("You cannot import your own shared todo".into()), 400)]
	#[case(Error::NotFound("Todo not found".into()), 404)]
	#[case(Error::Conflict("You have already imported this todo".into()), 409)]
	#[case(Error::Gone("Share link has expired".into()), 410)]
	#[case(Error::MethodNotAllowed, 405)]
	#[case(Error::Database("connection reset".into()), 500)]
	fn test_status_codes(#[case] error: Error, #[case] expected: u16) {
		assert_eq!(error.status_code(), expected);
	}

	#[test]
	fn test_internal_classification() {
		assert!(Error::Database("boom".into()).is_internal());
		assert!(Error::Internal("boom".into()).is_internal());
		assert!(!Error::Unauthorized.is_internal());
		assert!(!Error::NotFound("missing".into()).is_internal());
	}

	#[test]
	fn test_display_uses_message() {
		let err = Error::Conflict("You have already imported this todo".to_string());
		assert_eq!(err.to_string(), "You have already imported this todo");
	}
}
