//! Tomados: a personal task-management web service.
//!
//! Authenticated users create, update, delete, and share todo items over
//! an HTTP/JSON API backed by MongoDB. Sharing works through opaque,
//! time-limited tokens that snapshot a todo at share time; other users
//! can import the snapshot into their own collection exactly once.

pub mod apps;
pub mod routes;
pub mod settings;

pub use routes::{AppContext, build_router};
pub use settings::{DatabaseSettings, Settings, SettingsError};
