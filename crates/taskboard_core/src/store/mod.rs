//! Task store contracts and implementations.
//!
//! # Responsibility
//! - Define the request/response contract the board uses to persist tasks.
//! - Classify store failures so callers can tell transport problems from
//!   rejections.
//!
//! # Invariants
//! - `create_task` returns the full stored representation, including the
//!   store-assigned id.
//! - `update_task` and `delete_task` report success or failure only.
//! - Every request is logged as one `store_request` start/terminal pair
//!   sharing an `op_id`; task text is never logged.
//!
//! # See also
//! - `crate::service::board_service` for how failures map to `FailureKind`.

pub mod http_store;
pub mod sqlite_store;

use crate::config::{StoreBackend, StoreConfig};
use crate::db::{DbError, DbResult};
use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::store::http_store::HttpTaskStore;
use crate::store::sqlite_store::SqliteTaskStore;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a task store.
#[derive(Debug)]
pub enum StoreError {
    /// The request never completed (connection, DNS, timeout).
    Network(String),
    /// The store answered with a non-success status.
    Rejected { status: u16, body: String },
    /// The addressed task does not exist in the store.
    NotFound(TaskId),
    /// The store returned or holds data that cannot be decoded.
    InvalidData(String),
    /// The store refused to persist an invalid task.
    Validation(TaskValidationError),
    /// Local database failure.
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "task store unreachable: {message}"),
            Self::Rejected { status, body } if body.is_empty() => {
                write!(f, "task store rejected request with status {status}")
            }
            Self::Rejected { status, body } => {
                write!(f, "task store rejected request with status {status}: {body}")
            }
            Self::NotFound(id) => write!(f, "task not found in store: {id}"),
            Self::InvalidData(message) => write!(f, "invalid task data from store: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Filter options for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Restrict to one assignee.
    pub user_id: Option<u64>,
}

impl TaskListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

/// System of record for tasks.
pub trait TaskStore {
    fn list_tasks(&self, query: &TaskListQuery) -> StoreResult<Vec<Task>>;
    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>>;
    fn create_task(&self, task: &NewTask) -> StoreResult<Task>;
    fn update_task(&self, task: &Task) -> StoreResult<()>;
    fn delete_task(&self, id: TaskId) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for Box<S> {
    fn list_tasks(&self, query: &TaskListQuery) -> StoreResult<Vec<Task>> {
        (**self).list_tasks(query)
    }

    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        (**self).get_task(id)
    }

    fn create_task(&self, task: &NewTask) -> StoreResult<Task> {
        (**self).create_task(task)
    }

    fn update_task(&self, task: &Task) -> StoreResult<()> {
        (**self).update_task(task)
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete_task(id)
    }
}

/// Database file used when the SQLite backend has no explicit path.
pub const DEFAULT_SQLITE_FILE: &str = "taskboard.sqlite3";

/// Builds the store selected by `config`.
///
/// # Errors
/// - Only the SQLite backend can fail here, with the `DbError` from
///   opening or migrating the database file.
///
/// # Side effects
/// - The SQLite backend creates its database file when missing.
pub fn open_store(config: &StoreConfig) -> DbResult<Box<dyn TaskStore>> {
    match config.backend {
        StoreBackend::Http => Ok(Box::new(HttpTaskStore::from_config(config))),
        StoreBackend::Sqlite => {
            let path = config
                .sqlite_path
                .clone()
                .unwrap_or_else(|| DEFAULT_SQLITE_FILE.into());
            Ok(Box::new(SqliteTaskStore::open(path)?))
        }
    }
}

/// Runs one store request between correlated start/terminal log events.
pub(crate) fn logged_request<T>(
    backend: &str,
    op: &str,
    target: &str,
    request: impl FnOnce() -> StoreResult<T>,
) -> StoreResult<T> {
    let op_id = Uuid::new_v4();
    let started_at = Instant::now();
    debug!(
        "event=store_request module=store status=start backend={backend} op={op} op_id={op_id} target={target}"
    );

    let result = request();
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => debug!(
            "event=store_request module=store status=ok backend={backend} op={op} op_id={op_id} duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event=store_request module=store status=error backend={backend} op={op} op_id={op_id} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}
