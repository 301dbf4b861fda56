//! Options and result types shared by backends.

use bson::Document;
use std::time::Duration;

/// Options for `find_many`
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
	pub limit: Option<i64>,
	pub skip: Option<u64>,
	/// Sort specification, e.g. `doc! {"createdAt": -1}`
	pub sort: Option<Document>,
}

impl FindOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_sort(mut self, sort: Document) -> Self {
		self.sort = Some(sort);
		self
	}

	pub fn with_limit(mut self, limit: i64) -> Self {
		self.limit = Some(limit);
		self
	}
}

/// Result of an update operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
	pub matched_count: u64,
	pub modified_count: u64,
}

impl UpdateOutcome {
	pub fn new(matched_count: u64, modified_count: u64) -> Self {
		Self {
			matched_count,
			modified_count,
		}
	}

	/// Whether the filter matched any document
	pub fn matched(&self) -> bool {
		self.matched_count > 0
	}
}

/// Declarative index specification
///
/// Covers the index shapes this service needs: plain and compound key
/// indexes, unique constraints, and TTL expiry.
///
/// # Examples
///
/// ```
/// use bson::doc;
/// use std::time::Duration;
/// use tomados_db::IndexSpec;
///
/// let unique = IndexSpec::new(doc! {"token": 1}).unique();
/// assert!(unique.unique);
///
/// let ttl = IndexSpec::new(doc! {"expiresAt": 1}).expire_after(Duration::ZERO);
/// assert_eq!(ttl.expire_after, Some(Duration::ZERO));
/// ```
#[derive(Debug, Clone)]
pub struct IndexSpec {
	pub keys: Document,
	pub unique: bool,
	/// TTL: documents are removed once `now > field + expire_after`
	pub expire_after: Option<Duration>,
}

impl IndexSpec {
	pub fn new(keys: Document) -> Self {
		Self {
			keys,
			unique: false,
			expire_after: None,
		}
	}

	pub fn unique(mut self) -> Self {
		self.unique = true;
		self
	}

	pub fn expire_after(mut self, ttl: Duration) -> Self {
		self.expire_after = Some(ttl);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bson::doc;

	#[test]
	fn test_update_outcome_matched() {
		assert!(UpdateOutcome::new(1, 1).matched());
		assert!(UpdateOutcome::new(1, 0).matched());
		assert!(!UpdateOutcome::new(0, 0).matched());
	}

	#[test]
	fn test_find_options_builders() {
		let options = FindOptions::new()
			.with_sort(doc! {"createdAt": -1})
			.with_limit(10);

		assert_eq!(options.sort, Some(doc! {"createdAt": -1}));
		assert_eq!(options.limit, Some(10));
		assert_eq!(options.skip, None);
	}
}
