//! The todos app: model, store, and CRUD handlers.

pub mod handlers;
pub mod models;
pub mod store;

pub use handlers::{TodoCollectionHandler, TodoDetailHandler};
pub use models::{CreateTodoPayload, Priority, Todo, TodoResponse, UpdateTodoPayload};
pub use store::TodoStore;
