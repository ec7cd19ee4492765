//! Wire representation of tasks at the store boundary.
//!
//! # Responsibility
//! - Mirror the camelCase JSON shape used by the remote todo service.
//! - Convert between three status flags and a single `Column`.
//!
//! # Invariants
//! - Missing flags decode as `false`; missing `priority` as `medium`;
//!   missing `userId` as `DEFAULT_USER_ID`.
//! - An empty `dueDate` string decodes as absent.
//! - Create payloads never carry an `id`.

use crate::model::task::{
    normalize_body, Column, NewTask, Priority, StatusFlags, Task, TaskId, DEFAULT_USER_ID,
};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// JSON record exchanged with task stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    #[serde(default = "default_user_id")]
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub in_progress: bool,
    #[serde(default)]
    pub in_review: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<NaiveDate>,
}

impl TaskRecord {
    pub fn flags(&self) -> StatusFlags {
        StatusFlags {
            completed: self.completed,
            in_progress: self.in_progress,
            in_review: self.in_review,
        }
    }

    fn with_flags(mut self, flags: StatusFlags) -> Self {
        self.completed = flags.completed;
        self.in_progress = flags.in_progress;
        self.in_review = flags.in_review;
        self
    }
}

/// Error for records that cannot become a confirmed `Task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    MissingId,
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "task record has no `id`"),
        }
    }
}

impl Error for RecordError {}

impl TryFrom<TaskRecord> for Task {
    type Error = RecordError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = record.id.ok_or(RecordError::MissingId)?;
        let column = Column::from_flags(record.flags());
        Ok(Task {
            id,
            user_id: record.user_id,
            title: record.title,
            body: normalize_body(record.body),
            priority: record.priority,
            due_date: record.due_date,
            column,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let flags = task.flags();
        Self {
            id: Some(task.id),
            user_id: task.user_id,
            title: task.title,
            body: task.body,
            completed: false,
            in_progress: false,
            in_review: false,
            priority: task.priority,
            due_date: task.due_date,
        }
        .with_flags(flags)
    }
}

impl From<NewTask> for TaskRecord {
    fn from(task: NewTask) -> Self {
        let flags = task.column.flags();
        Self {
            id: None,
            user_id: task.user_id,
            title: task.title,
            body: task.body,
            completed: false,
            in_progress: false,
            in_review: false,
            priority: task.priority,
            due_date: task.due_date,
        }
        .with_flags(flags)
    }
}

fn default_user_id() -> u64 {
    DEFAULT_USER_ID
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_due_date(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid dueDate `{value}`"))),
    }
}

/// Parses `YYYY-MM-DD`, also accepting RFC 3339 timestamps by date part.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}
