//! Database error types.

use thiserror::Error;

/// Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Unified error type for document database operations
#[derive(Debug, Error)]
pub enum DbError {
	/// Could not reach or authenticate with the database
	#[error("Connection error: {0}")]
	Connection(String),

	/// A query or write failed to execute
	#[error("Execution error: {0}")]
	Execution(String),

	/// A document could not be (de)serialized
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Invalid configuration or arguments
	#[error("Configuration error: {0}")]
	Config(String),

	/// Driver-level error that fits no other variant
	#[error("Database error: {0}")]
	Database(String),
}

impl From<mongodb::error::Error> for DbError {
	fn from(err: mongodb::error::Error) -> Self {
		use mongodb::error::ErrorKind;

		match *err.kind {
			ErrorKind::Authentication { .. } => DbError::Connection(err.to_string()),
			ErrorKind::InvalidArgument { .. } => DbError::Config(err.to_string()),
			ErrorKind::Io(_) => DbError::Connection(err.to_string()),
			_ => DbError::Database(err.to_string()),
		}
	}
}

// In bson v3, ser and de errors are both aliases for bson::error::Error
impl From<bson::error::Error> for DbError {
	fn from(err: bson::error::Error) -> Self {
		DbError::Serialization(err.to_string())
	}
}
