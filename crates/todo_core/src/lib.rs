//! Core logic for the to-do list application.
//! This crate owns the to-do store and its JSON-file persistence.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod route;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{StoreConfig, DEFAULT_SLOT};
pub use db::{open_db, open_db_in_memory, DbError, DbResult, JsonDb};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{
    normalize_title, FilterMode, ParseFilterError, TodoId, TodoItem, TodoPatch,
    TodoValidationError,
};
pub use repo::todo_repo::{
    JsonTodoRepository, RepoError, RepoResult, TodoRepository, TODOS_COLLECTION,
};
pub use route::{filter_from_path, path_for, ResolvedFilter, RouteError};
pub use service::todo_store::TodoStore;
