//! Core logic for the kanban task board.
//! This crate is the single source of truth for task placement rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{BoardConfig, ConfigError, LoggingConfig, StoreBackend, StoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::record::TaskRecord;
pub use model::task::{
    Column, NewTask, ParseTaskFieldError, Priority, StatusFlags, Task, TaskDraft, TaskId,
    TaskPatch, TaskValidationError, DEFAULT_USER_ID,
};
pub use service::board_service::{
    BoardError, BoardResult, BoardSnapshot, ColumnView, ConfirmDelete, DeleteOutcome,
    FailureKind, TaskBoard,
};
pub use store::http_store::HttpTaskStore;
pub use store::sqlite_store::SqliteTaskStore;
pub use store::{open_store, StoreError, StoreResult, TaskListQuery, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
