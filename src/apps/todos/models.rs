//! Todo model and payloads.

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use tomados_http::{Error, Result};

/// Maximum allowed title length in characters
pub const MAX_TITLE_LEN: usize = 100;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	Low,
	#[default]
	Medium,
	High,
}

/// A todo item as stored in the `todos` collection
///
/// Owned exclusively by one user identity; every lookup is scoped by
/// `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
	#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<ObjectId>,
	pub title: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Due date
	pub date: bson::DateTime,
	#[serde(default)]
	pub priority: Priority,
	#[serde(default)]
	pub completed: bool,
	pub created_at: bson::DateTime,
	pub user_id: String,
}

impl Todo {
	/// Application-level validation, applied on create and after merge
	pub fn validate(&self) -> Result<()> {
		if self.title.trim().is_empty() {
			return Err(Error::Validation(
				"Please provide a title for this task".to_string(),
			));
		}
		if self.title.chars().count() > MAX_TITLE_LEN {
			return Err(Error::Validation(format!(
				"Title cannot be more than {} characters",
				MAX_TITLE_LEN
			)));
		}
		Ok(())
	}

	/// Apply a partial update, leaving absent fields unchanged
	pub fn apply(&mut self, payload: UpdateTodoPayload) -> Result<()> {
		if let Some(title) = payload.title {
			self.title = title;
		}
		if let Some(description) = payload.description {
			self.description = Some(description);
		}
		if let Some(color) = payload.color {
			self.color = Some(color);
		}
		if let Some(date) = payload.date {
			self.date = bson::DateTime::from_chrono(parse_due_date(&date)?);
		}
		if let Some(priority) = payload.priority {
			self.priority = priority;
		}
		if let Some(completed) = payload.completed {
			self.completed = completed;
		}
		self.validate()
	}
}

/// Body of `POST /todos`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoPayload {
	pub title: Option<String>,
	pub description: Option<String>,
	pub color: Option<String>,
	pub date: Option<String>,
	pub priority: Option<Priority>,
}

/// Body of `PATCH /todos/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoPayload {
	pub title: Option<String>,
	pub description: Option<String>,
	pub color: Option<String>,
	pub date: Option<String>,
	pub priority: Option<Priority>,
	pub completed: Option<bool>,
}

/// JSON representation of a todo returned by the API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
	pub id: String,
	pub title: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	pub date: DateTime<Utc>,
	pub priority: Priority,
	pub completed: bool,
	pub created_at: DateTime<Utc>,
	pub user_id: String,
}

impl From<&Todo> for TodoResponse {
	fn from(todo: &Todo) -> Self {
		Self {
			id: todo.id.map(|oid| oid.to_hex()).unwrap_or_default(),
			title: todo.title.clone(),
			description: todo.description.clone(),
			color: todo.color.clone(),
			date: todo.date.to_chrono(),
			priority: todo.priority,
			completed: todo.completed,
			created_at: todo.created_at.to_chrono(),
			user_id: todo.user_id.clone(),
		}
	}
}

/// Parse a client-supplied due date
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (interpreted
/// as midnight UTC).
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>> {
	if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
		return Ok(parsed.with_timezone(&Utc));
	}
	if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
		return Ok(date.and_time(NaiveTime::MIN).and_utc());
	}
	Err(Error::Validation(format!("Invalid due date: {}", value)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample_todo() -> Todo {
		Todo {
			id: Some(ObjectId::new()),
			title: "Buy milk".to_string(),
			description: None,
			color: None,
			date: bson::DateTime::now(),
			priority: Priority::default(),
			completed: false,
			created_at: bson::DateTime::now(),
			user_id: "alice".to_string(),
		}
	}

	#[rstest]
	#[case("Buy milk", true)]
	#[case("", false)]
	#[case("   ", false)]
	fn test_title_presence(#[case] title: &str, #[case] valid: bool) {
		let todo = Todo {
			title: title.to_string(),
			..sample_todo()
		};
		assert_eq!(todo.validate().is_ok(), valid);
	}

	#[test]
	fn test_title_length_limit() {
		let todo = Todo {
			title: "x".repeat(MAX_TITLE_LEN),
			..sample_todo()
		};
		assert!(todo.validate().is_ok());

		let too_long = Todo {
			title: "x".repeat(MAX_TITLE_LEN + 1),
			..sample_todo()
		};
		assert!(matches!(too_long.validate(), Err(Error::Validation(_))));
	}

	#[test]
	fn test_priority_defaults_to_medium() {
		assert_eq!(Priority::default(), Priority::Medium);

		let payload: CreateTodoPayload =
			serde_json::from_str(r#"{"title": "t", "date": "2025-01-01"}"#).unwrap();
		assert!(payload.priority.is_none());
	}

	#[test]
	fn test_priority_serializes_lowercase() {
		assert_eq!(serde_json::to_string(&Priority::High).unwrap(), r#""high""#);
		let parsed: Priority = serde_json::from_str(r#""low""#).unwrap();
		assert_eq!(parsed, Priority::Low);
	}

	#[rstest]
	#[case("2025-01-01")]
	#[case("2025-01-01T09:30:00Z")]
	#[case("2025-01-01T09:30:00+02:00")]
	fn test_parse_due_date_accepted_formats(#[case] value: &str) {
		assert!(parse_due_date(value).is_ok());
	}

	#[rstest]
	#[case("")]
	#[case("tomorrow")]
	#[case("01/02/2025")]
	fn test_parse_due_date_rejected_formats(#[case] value: &str) {
		assert!(matches!(parse_due_date(value), Err(Error::Validation(_))));
	}

	#[test]
	fn test_apply_merges_only_present_fields() {
		let mut todo = sample_todo();
		let original_date = todo.date;

		todo.apply(UpdateTodoPayload {
			completed: Some(true),
			..Default::default()
		})
		.unwrap();

		assert!(todo.completed);
		assert_eq!(todo.title, "Buy milk");
		assert_eq!(todo.date, original_date);
	}

	#[test]
	fn test_apply_revalidates() {
		let mut todo = sample_todo();
		let result = todo.apply(UpdateTodoPayload {
			title: Some(String::new()),
			..Default::default()
		});
		assert!(matches!(result, Err(Error::Validation(_))));
	}

	#[test]
	fn test_document_roundtrip_uses_wire_names() {
		let todo = sample_todo();
		let document = bson::serialize_to_document(&todo).unwrap();

		assert!(document.contains_key("_id"));
		assert!(document.contains_key("createdAt"));
		assert!(document.contains_key("userId"));
		assert!(!document.contains_key("description"));

		let roundtripped: Todo = bson::deserialize_from_document(document).unwrap();
		assert_eq!(roundtripped.title, todo.title);
		assert_eq!(roundtripped.user_id, todo.user_id);
	}
}
