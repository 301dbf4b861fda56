//! Declarative URL routing.
//!
//! Routes pair a path pattern such as `/todos/{id}` with a handler;
//! [`UrlRouter`] dispatches requests to the first matching route and
//! maps handler errors to JSON responses at the boundary.

pub mod route;
pub mod router;

pub use route::{PathPattern, Route};
pub use router::UrlRouter;
