//! Caller identity.

use serde::{Deserialize, Serialize};

use tomados_http::{Error, Request, Result};

/// The authenticated caller, as resolved by the session middleware
///
/// Stored in request extensions; handlers fetch it with [`require`] for
/// data-touching operations or [`resolve`] where anonymous access is
/// allowed.
///
/// [`require`]: CurrentUser::require
/// [`resolve`]: CurrentUser::resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
	/// Owner identity used to scope all store operations
	pub id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl CurrentUser {
	/// The caller's identity, or `Unauthorized` if no session resolved
	pub fn require(request: &Request) -> Result<Self> {
		Self::resolve(request).ok_or(Error::Unauthorized)
	}

	/// The caller's identity if a session resolved, `None` otherwise
	///
	/// Resolution failures were already swallowed by the middleware, so
	/// this never errors; endpoints that allow unauthenticated access use
	/// this form.
	pub fn resolve(request: &Request) -> Option<Self> {
		request.extensions.get::<CurrentUser>()
	}

	/// Display name with the identity as fallback
	pub fn display_name(&self) -> &str {
		self.name.as_deref().unwrap_or(&self.id)
	}
}
