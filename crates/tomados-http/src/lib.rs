//! HTTP primitives for the Tomados service.
//!
//! Provides the [`Request`] and [`Response`] types the rest of the
//! workspace is written against, the [`Handler`] and [`Middleware`]
//! traits, and the service-wide error taxonomy.

pub mod error;
pub mod extensions;
pub mod handler;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use extensions::Extensions;
pub use handler::{Handler, Middleware, MiddlewareChain};
pub use request::Request;
pub use response::Response;
