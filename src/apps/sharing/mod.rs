//! The sharing app: share-token issuance and consumption.

pub mod handlers;
pub mod models;
pub mod store;

pub use handlers::{ImportTodoHandler, ShareTodoHandler};
pub use models::{ShareToken, TodoSnapshot, TokenUsage, generate_token};
pub use store::ShareTokenStore;
