//! Session data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tomados_http::{Error, Result};

/// Session ID type
pub type SessionId = String;

/// Key under which the logged-in user is stored in session data
pub const SESSION_KEY_USER: &str = "_auth_user";

/// Session data stored in a backend
///
/// # Examples
///
/// ```
/// use tomados_auth::Session;
///
/// let mut session = Session::new();
/// session.set("theme", &"dark").unwrap();
/// assert_eq!(session.get::<String>("theme"), Some("dark".to_string()));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
	/// Session data as key-value pairs
	pub data: HashMap<String, serde_json::Value>,
}

impl Session {
	/// Create a new empty session
	pub fn new() -> Self {
		Self::default()
	}

	/// Get a typed value from the session
	pub fn get<T>(&self, key: &str) -> Option<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		self.data
			.get(key)
			.and_then(|value| serde_json::from_value(value.clone()).ok())
	}

	/// Set a value in the session
	pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
		let value =
			serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))?;
		self.data.insert(key.into(), value);
		Ok(())
	}

	/// Remove a value from the session
	pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
		self.data.remove(key)
	}

	/// Check if the session holds no data
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}
