//! Share token model and payloads.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::apps::todos::{Priority, Todo};

/// How long a share token stays valid after issuance
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Immutable copy of a todo's shareable fields, captured at share time
///
/// Completion state and ownership are deliberately excluded: the
/// importer starts with a fresh, uncompleted copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSnapshot {
	pub title: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	pub date: bson::DateTime,
	#[serde(default)]
	pub priority: Priority,
}

impl From<&Todo> for TodoSnapshot {
	fn from(todo: &Todo) -> Self {
		Self {
			title: todo.title.clone(),
			description: todo.description.clone(),
			color: todo.color.clone(),
			date: todo.date,
			priority: todo.priority,
		}
	}
}

/// One recorded consumption of a share token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
	pub user_id: String,
	pub used_at: bson::DateTime,
}

/// A share token as stored in the `sharetokens` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareToken {
	#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<ObjectId>,
	pub token: String,
	pub todo_data: TodoSnapshot,
	pub shared_by: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shared_by_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shared_by_image: Option<String>,
	pub created_at: bson::DateTime,
	pub expires_at: bson::DateTime,
	#[serde(default)]
	pub used_by: Vec<TokenUsage>,
}

impl ShareToken {
	/// Whether the token is past its expiry at the given instant
	pub fn is_expired_at(&self, now: bson::DateTime) -> bool {
		now > self.expires_at
	}

	/// Whether the given identity already consumed this token
	pub fn consumed_by(&self, user_id: &str) -> bool {
		self.used_by.iter().any(|usage| usage.user_id == user_id)
	}

	/// Build a fresh todo for an importer from the snapshot
	pub fn todo_for_importer(&self, user_id: &str) -> Todo {
		Todo {
			id: None,
			title: self.todo_data.title.clone(),
			description: self.todo_data.description.clone(),
			color: self.todo_data.color.clone(),
			date: self.todo_data.date,
			priority: self.todo_data.priority,
			completed: false,
			created_at: bson::DateTime::now(),
			user_id: user_id.to_string(),
		}
	}
}

/// Generate an opaque share token: 32 random bytes as 64 hex characters
pub fn generate_token() -> String {
	let mut bytes = [0u8; 32];
	rand::thread_rng().fill_bytes(&mut bytes);
	bytes.iter().fold(String::with_capacity(64), |mut out, b| {
		let _ = write!(out, "{:02x}", b);
		out
	})
}

/// Body of `POST /todos/share`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
	pub todo_id: Option<String>,
}

/// Response of `POST /todos/share`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
	pub share_url: String,
	pub token: String,
	pub expires_at: DateTime<Utc>,
}

/// Snapshot as returned by the info endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
	pub title: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	pub date: DateTime<Utc>,
	pub priority: Priority,
}

impl From<&TodoSnapshot> for SnapshotResponse {
	fn from(snapshot: &TodoSnapshot) -> Self {
		Self {
			title: snapshot.title.clone(),
			description: snapshot.description.clone(),
			color: snapshot.color.clone(),
			date: snapshot.date.to_chrono(),
			priority: snapshot.priority,
		}
	}
}

/// Response of `GET /todos/import/{token}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfoResponse {
	pub todo_data: SnapshotResponse,
	pub shared_by: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shared_by_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shared_by_image: Option<String>,
	pub is_expired: bool,
	pub has_already_imported: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_token(expires_millis: i64) -> ShareToken {
		ShareToken {
			id: None,
			token: generate_token(),
			todo_data: TodoSnapshot {
				title: "Buy milk".to_string(),
				description: Some("2 liters".to_string()),
				color: None,
				date: bson::DateTime::from_millis(1_000),
				priority: Priority::High,
			},
			shared_by: "alice".to_string(),
			shared_by_name: Some("Alice".to_string()),
			shared_by_image: None,
			created_at: bson::DateTime::from_millis(0),
			expires_at: bson::DateTime::from_millis(expires_millis),
			used_by: Vec::new(),
		}
	}

	#[test]
	fn test_generate_token_shape() {
		let token = generate_token();
		assert_eq!(token.len(), 64);
		assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn test_generate_token_uniqueness() {
		assert_ne!(generate_token(), generate_token());
	}

	#[test]
	fn test_expiry_check() {
		let token = sample_token(5_000);
		assert!(!token.is_expired_at(bson::DateTime::from_millis(4_999)));
		assert!(token.is_expired_at(bson::DateTime::from_millis(5_001)));
	}

	#[test]
	fn test_consumed_by() {
		let mut token = sample_token(5_000);
		assert!(!token.consumed_by("bob"));

		token.used_by.push(TokenUsage {
			user_id: "bob".to_string(),
			used_at: bson::DateTime::from_millis(1_000),
		});
		assert!(token.consumed_by("bob"));
		assert!(!token.consumed_by("carol"));
	}

	#[test]
	fn test_snapshot_excludes_completion_and_owner() {
		let token = sample_token(5_000);
		let todo = token.todo_for_importer("bob");

		assert_eq!(todo.title, "Buy milk");
		assert_eq!(todo.priority, Priority::High);
		assert!(!todo.completed);
		assert_eq!(todo.user_id, "bob");
		assert!(todo.id.is_none());
	}

	#[test]
	fn test_share_token_wire_names() {
		let token = sample_token(5_000);
		let document = bson::serialize_to_document(&token).unwrap();

		assert!(document.contains_key("todoData"));
		assert!(document.contains_key("sharedBy"));
		assert!(document.contains_key("expiresAt"));
		assert!(document.contains_key("usedBy"));
	}
}
