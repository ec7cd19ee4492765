//! Task domain model.
//!
//! # Responsibility
//! - Define `Task`, its column placement and creation/edit inputs.
//! - Provide validation applied before any store submission.
//!
//! # Invariants
//! - `title` must contain at least one non-whitespace character.
//! - `body` is `None` rather than an empty string.
//! - Column transitions change only `column`; edits never touch it unless
//!   the patch overrides it explicitly.

use crate::model::record::TaskRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Assignee used when a draft does not name one.
pub const DEFAULT_USER_ID: u64 = 1;

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority. Defaults to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseTaskFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseTaskFieldError::Priority(other.to_string())),
        }
    }
}

/// Wire-level status flags as exchanged with task stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub completed: bool,
    pub in_progress: bool,
    pub in_review: bool,
}

/// One of the four board columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl Column {
    /// All columns in board order.
    pub const ALL: [Column; 4] = [
        Column::Todo,
        Column::InProgress,
        Column::Review,
        Column::Done,
    ];

    /// Stable column identifier (`todo|in-progress|review|done`).
    pub fn id(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Display title for column headers.
    pub fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }

    /// Collapses a flag triple into exactly one column.
    ///
    /// Precedence: `completed` > `in_review` > `in_progress` > none.
    pub fn from_flags(flags: StatusFlags) -> Self {
        if flags.completed {
            Self::Done
        } else if flags.in_review {
            Self::Review
        } else if flags.in_progress {
            Self::InProgress
        } else {
            Self::Todo
        }
    }

    /// Flag triple for this column. At most one flag is set.
    pub fn flags(self) -> StatusFlags {
        StatusFlags {
            completed: self == Self::Done,
            in_progress: self == Self::InProgress,
            in_review: self == Self::Review,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Column {
    type Err = ParseTaskFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            other => Err(ParseTaskFieldError::Column(other.to_string())),
        }
    }
}

/// Error for parsing textual column/priority identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTaskFieldError {
    Column(String),
    Priority(String),
}

impl Display for ParseTaskFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Column(value) => write!(
                f,
                "unknown column `{value}`; expected todo|in-progress|review|done"
            ),
            Self::Priority(value) => {
                write!(f, "unknown priority `{value}`; expected low|medium|high")
            }
        }
    }
}

impl Error for ParseTaskFieldError {}

/// Validation errors raised before a task reaches any store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A task confirmed by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub user_id: u64,
    pub title: String,
    pub body: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub column: Column,
}

impl Task {
    /// Ensures the task can be submitted to a store.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }

    /// Copy of this task placed in `column`; every other field is unchanged.
    pub fn with_column(&self, column: Column) -> Self {
        Self {
            column,
            ..self.clone()
        }
    }

    /// Copy of this task with `patch` merged over its data.
    pub fn patched(&self, patch: &TaskPatch) -> Self {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(body) = &patch.body {
            next.body = normalize_body(body.clone());
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        if let Some(user_id) = patch.user_id {
            next.user_id = user_id;
        }
        if let Some(column) = patch.column {
            next.column = column;
        }
        next
    }

    /// Wire status flags for this task.
    pub fn flags(&self) -> StatusFlags {
        self.column.flags()
    }
}

/// Caller-supplied fields for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub body: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub user_id: Option<u64>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Unconfirmed task submitted in a create request. Carries no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "TaskRecord")]
pub struct NewTask {
    pub user_id: u64,
    pub title: String,
    pub body: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub column: Column,
}

impl NewTask {
    /// Builds a validated create payload placed in `column`.
    ///
    /// Applies defaults: priority `medium`, assignee `DEFAULT_USER_ID`,
    /// empty body as `None`.
    pub fn from_draft(draft: TaskDraft, column: Column) -> Result<Self, TaskValidationError> {
        let task = Self {
            user_id: draft.user_id.unwrap_or(DEFAULT_USER_ID),
            title: draft.title.trim().to_string(),
            body: normalize_body(draft.body),
            priority: draft.priority.unwrap_or_default(),
            due_date: draft.due_date,
            column,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }

    /// Attaches a store-assigned id.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            user_id: self.user_id,
            title: self.title,
            body: self.body,
            priority: self.priority,
            due_date: self.due_date,
            column: self.column,
        }
    }
}

/// Partial edit merged onto an existing task's data.
///
/// `None` leaves a field unchanged. `body`/`due_date` use a nested option so
/// callers can clear them with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub body: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub user_id: Option<u64>,
    /// Explicit column override; edits keep the current column otherwise.
    pub column: Option<Column>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

pub(crate) fn normalize_body(body: Option<String>) -> Option<String> {
    body.filter(|value| !value.trim().is_empty())
}
