//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist tasks locally with the same contract as the remote store.
//! - Keep SQL details and the three-flag column encoding inside this module.
//!
//! # Invariants
//! - Write paths validate the task before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Ids come from `AUTOINCREMENT` and are never reused.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::record::parse_due_date;
use crate::model::task::{Column, NewTask, Priority, StatusFlags, Task, TaskId};
use crate::store::{logged_request, StoreError, StoreResult, TaskListQuery, TaskStore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    body,
    completed,
    in_progress,
    in_review,
    priority,
    due_date
FROM tasks";

/// Task store over an owned SQLite connection.
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) a task database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::new)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::new)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TaskStore for SqliteTaskStore {
    fn list_tasks(&self, query: &TaskListQuery) -> StoreResult<Vec<Task>> {
        logged_request("sqlite", "list", "tasks", || {
            let mut stmt = self.conn.prepare(&format!(
                "{TASK_SELECT_SQL}
                 WHERE (?1 IS NULL OR user_id = ?1)
                 ORDER BY id ASC;"
            ))?;
            let user_id = query.user_id.map(id_to_db).transpose()?;
            let mut rows = stmt.query(params![user_id])?;

            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(parse_task_row(row)?);
            }
            Ok(tasks)
        })
    }

    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        logged_request("sqlite", "get", &id.to_string(), || {
            let mut stmt = self
                .conn
                .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query(params![id_to_db(id.0)?])?;
            match rows.next()? {
                Some(row) => Ok(Some(parse_task_row(row)?)),
                None => Ok(None),
            }
        })
    }

    fn create_task(&self, task: &NewTask) -> StoreResult<Task> {
        task.validate()?;

        logged_request("sqlite", "create", "tasks", || {
            let flags = task.column.flags();
            self.conn.execute(
                "INSERT INTO tasks (
                    user_id,
                    title,
                    body,
                    completed,
                    in_progress,
                    in_review,
                    priority,
                    due_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    id_to_db(task.user_id)?,
                    task.title.as_str(),
                    task.body.as_deref(),
                    flags.completed,
                    flags.in_progress,
                    flags.in_review,
                    task.priority.as_str(),
                    task.due_date.map(|date| date.to_string()),
                ],
            )?;

            let id = id_from_db(self.conn.last_insert_rowid())?;
            Ok(task.clone().into_task(id))
        })
    }

    fn update_task(&self, task: &Task) -> StoreResult<()> {
        task.validate()?;

        logged_request("sqlite", "update", &task.id.to_string(), || {
            let flags = task.flags();
            let changed = self.conn.execute(
                "UPDATE tasks
                 SET
                    user_id = ?1,
                    title = ?2,
                    body = ?3,
                    completed = ?4,
                    in_progress = ?5,
                    in_review = ?6,
                    priority = ?7,
                    due_date = ?8
                 WHERE id = ?9;",
                params![
                    id_to_db(task.user_id)?,
                    task.title.as_str(),
                    task.body.as_deref(),
                    flags.completed,
                    flags.in_progress,
                    flags.in_review,
                    task.priority.as_str(),
                    task.due_date.map(|date| date.to_string()),
                    id_to_db(task.id.0)?,
                ],
            )?;

            if changed == 0 {
                return Err(StoreError::NotFound(task.id));
            }
            Ok(())
        })
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        logged_request("sqlite", "delete", &id.to_string(), || {
            let changed = self
                .conn
                .execute("DELETE FROM tasks WHERE id = ?1;", params![id_to_db(id.0)?])?;
            if changed == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let id = id_from_db(row.get("id")?)?;
    let user_id = id_from_db(row.get("user_id")?)?.0;

    let flags = StatusFlags {
        completed: parse_flag(row, "completed")?,
        in_progress: parse_flag(row, "in_progress")?,
        in_review: parse_flag(row, "in_review")?,
    };

    let priority_text: String = row.get("priority")?;
    let priority = priority_text.parse::<Priority>().map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(parse_due_date(&value).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid due date `{value}` in tasks.due_date"))
        })?),
        None => None,
    };

    let task = Task {
        id,
        user_id,
        title: row.get("title")?,
        body: row.get("body")?,
        priority,
        due_date,
        column: Column::from_flags(flags),
    };
    task.validate()?;
    Ok(task)
}

fn parse_flag(row: &Row<'_>, column: &str) -> StoreResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid flag value `{other}` in tasks.{column}"
        ))),
    }
}

fn id_to_db(value: u64) -> StoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("id `{value}` exceeds sqlite integer range")))
}

fn id_from_db(value: i64) -> StoreResult<TaskId> {
    u64::try_from(value)
        .map(TaskId)
        .map_err(|_| StoreError::InvalidData(format!("negative id `{value}` in tasks")))
}

/// Returns whether a task row exists, regardless of its content validity.
pub fn task_row_exists(conn: &Connection, id: TaskId) -> StoreResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM tasks WHERE id = ?1;",
            params![id_to_db(id.0)?],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}
