//! Kanban task board state machine.
//!
//! # Responsibility
//! - Own the local task set, its four-column view and the drag slot.
//! - Submit create/edit/move/delete requests and apply confirmed results.
//!
//! # Invariants
//! - Column membership is derived from each task's `Column` on every read;
//!   nothing caches per-column lists.
//! - At most one task is in drag; `drop_on_column` always ends the drag,
//!   before the request is issued.
//! - A failed store call leaves the local set untouched and clears the drag.
//! - Validation failures never reach the store.

use crate::model::task::{
    Column, NewTask, Task, TaskDraft, TaskId, TaskPatch, TaskValidationError,
};
use crate::store::{StoreError, TaskListQuery, TaskStore};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Coarse failure class used by the presentation layer to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never completed.
    NetworkFailure,
    /// The store answered with an error or unusable data.
    RemoteRejection,
    /// Input was rejected locally before any request.
    ValidationFailure,
}

/// Board operation failure.
#[derive(Debug)]
pub enum BoardError {
    Validation(TaskValidationError),
    Store(StoreError),
    /// The task is not part of the local board.
    UnknownTask(TaskId),
}

impl BoardError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) | Self::UnknownTask(_) => FailureKind::ValidationFailure,
            Self::Store(StoreError::Network(_) | StoreError::Db(_)) => FailureKind::NetworkFailure,
            Self::Store(StoreError::Validation(_)) => FailureKind::ValidationFailure,
            Self::Store(
                StoreError::Rejected { .. } | StoreError::NotFound(_) | StoreError::InvalidData(_),
            ) => FailureKind::RemoteRejection,
        }
    }
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownTask(id) => write!(f, "task {id} is not on the board"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::UnknownTask(_) => None,
        }
    }
}

impl From<TaskValidationError> for BoardError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Confirmation collaborator consulted before a delete is submitted.
pub trait ConfirmDelete {
    fn confirm_delete(&self, task: &Task) -> bool;
}

impl<F> ConfirmDelete for F
where
    F: Fn(&Task) -> bool,
{
    fn confirm_delete(&self, task: &Task) -> bool {
        self(task)
    }
}

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Task),
    /// The confirmation prompt was declined; no request was issued.
    Declined,
}

/// One rendered column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub column: Column,
    pub tasks: Vec<Task>,
}

impl ColumnView {
    pub fn id(&self) -> &'static str {
        self.column.id()
    }

    pub fn title(&self) -> &'static str {
        self.column.title()
    }
}

/// Render-ready view of the whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Columns in board order.
    pub columns: Vec<ColumnView>,
    pub dragged: Option<TaskId>,
}

/// Task board over a store implementation.
pub struct TaskBoard<S: TaskStore> {
    store: S,
    query: TaskListQuery,
    tasks: Vec<Task>,
    loaded: bool,
    dragged: Option<Task>,
}

impl<S: TaskStore> TaskBoard<S> {
    /// Creates an empty board showing every task in `store`.
    pub fn new(store: S) -> Self {
        Self::with_query(store, TaskListQuery::all())
    }

    /// Creates an empty board scoped by `query` (e.g. one assignee).
    pub fn with_query(store: S, query: TaskListQuery) -> Self {
        Self {
            store,
            query,
            tasks: Vec::new(),
            loaded: false,
            dragged: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a full list has been fetched at least once.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetches the full task set and replaces the local copy with it.
    ///
    /// Store order is preserved. On failure the local set is unchanged.
    pub fn list_tasks(&mut self) -> BoardResult<&[Task]> {
        match self.store.list_tasks(&self.query) {
            Ok(tasks) => {
                info!(
                    "event=board_refresh module=board status=ok count={}",
                    tasks.len()
                );
                self.tasks = tasks;
                self.loaded = true;
                Ok(&self.tasks)
            }
            Err(err) => Err(self.remote_failure("board_refresh", None, err)),
        }
    }

    /// Local task set in store order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks placed in `column`, recomputed on every call.
    pub fn tasks_in_column(&self, column: Column) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.column == column)
            .collect()
    }

    /// Tasks assigned to `user_id`.
    pub fn tasks_for_user(&self, user_id: u64) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.user_id == user_id)
            .collect()
    }

    /// Task count per column, in board order.
    pub fn column_counts(&self) -> [(Column, usize); 4] {
        Column::ALL.map(|column| (column, self.tasks_in_column(column).len()))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            columns: Column::ALL
                .iter()
                .map(|&column| ColumnView {
                    column,
                    tasks: self
                        .tasks_in_column(column)
                        .into_iter()
                        .cloned()
                        .collect(),
                })
                .collect(),
            dragged: self.dragged.as_ref().map(|task| task.id),
        }
    }

    /// Selects `task` for a pending move, replacing any previous selection.
    pub fn begin_drag(&mut self, task: &Task) {
        if let Some(previous) = &self.dragged {
            debug!(
                "event=drag_replace module=board previous_task_id={} task_id={}",
                previous.id, task.id
            );
        }
        self.dragged = Some(task.clone());
    }

    pub fn dragged(&self) -> Option<&Task> {
        self.dragged.as_ref()
    }

    /// Clears the drag slot, returning the task that was selected.
    pub fn cancel_drag(&mut self) -> Option<Task> {
        self.dragged.take()
    }

    /// Moves the dragged task to `column`.
    ///
    /// Returns `Ok(None)` without contacting the store when nothing is in
    /// drag. A drop onto the task's current column is still submitted.
    ///
    /// # Errors
    /// - `UnknownTask` when a refresh since `begin_drag` removed the task;
    ///   the drag ends and no request is issued.
    /// - `Store` when the update fails.
    pub fn drop_on_column(&mut self, column: Column) -> BoardResult<Option<Task>> {
        let Some(dragged) = self.dragged.take() else {
            debug!("event=task_move module=board status=skipped reason=no_drag");
            return Ok(None);
        };

        // The local copy carries edits made mid-drag.
        let Some(current) = self.task(dragged.id).cloned() else {
            warn!(
                "event=task_move module=board status=skipped reason=stale_drag task_id={}",
                dragged.id
            );
            return Err(BoardError::UnknownTask(dragged.id));
        };
        let from = current.column;
        let moved = current.with_column(column);

        if let Err(err) = self.store.update_task(&moved) {
            return Err(self.remote_failure("task_move", Some(moved.id), err));
        }

        info!(
            "event=task_move module=board status=ok task_id={} from={from} to={column} same_column={}",
            moved.id,
            from == column
        );
        self.upsert(moved.clone());
        Ok(Some(moved))
    }

    /// Creates a task in `column` from caller-supplied fields.
    ///
    /// The store-confirmed task, carrying its assigned id, is merged into the
    /// local set.
    pub fn create_task(&mut self, draft: TaskDraft, column: Column) -> BoardResult<Task> {
        let new_task = NewTask::from_draft(draft, column).map_err(|err| {
            debug!("event=task_create module=board status=invalid error={err}");
            BoardError::Validation(err)
        })?;

        match self.store.create_task(&new_task) {
            Ok(created) => {
                if self.task(created.id).is_some() {
                    warn!(
                        "event=task_create module=board status=id_collision task_id={} replaced=true",
                        created.id
                    );
                }
                info!(
                    "event=task_create module=board status=ok task_id={} column={}",
                    created.id, created.column
                );
                self.upsert(created.clone());
                Ok(created)
            }
            Err(err) => Err(self.remote_failure("task_create", None, err)),
        }
    }

    /// Applies `patch` to a task on the board and submits the full result.
    ///
    /// The task keeps its column unless the patch overrides it.
    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> BoardResult<Task> {
        let current = self.task(id).ok_or(BoardError::UnknownTask(id))?;
        let updated = current.patched(patch);
        updated.validate()?;

        if let Err(err) = self.store.update_task(&updated) {
            return Err(self.remote_failure("task_update", Some(id), err));
        }

        info!(
            "event=task_update module=board status=ok task_id={id} column={}",
            updated.column
        );
        self.upsert(updated.clone());
        Ok(updated)
    }

    /// Deletes a task after `confirm` approves it.
    pub fn delete_task(
        &mut self,
        id: TaskId,
        confirm: &dyn ConfirmDelete,
    ) -> BoardResult<DeleteOutcome> {
        let task = self.task(id).cloned().ok_or(BoardError::UnknownTask(id))?;
        if !confirm.confirm_delete(&task) {
            debug!("event=task_delete module=board status=declined task_id={id}");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(err) = self.store.delete_task(id) {
            return Err(self.remote_failure("task_delete", Some(id), err));
        }

        info!("event=task_delete module=board status=ok task_id={id}");
        self.tasks.retain(|task| task.id != id);
        if self.dragged.as_ref().is_some_and(|task| task.id == id) {
            self.dragged = None;
        }
        Ok(DeleteOutcome::Deleted(task))
    }

    fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    fn remote_failure(&mut self, event: &str, id: Option<TaskId>, err: StoreError) -> BoardError {
        let cleared_drag = self.dragged.take().is_some();
        let error = BoardError::Store(err);
        match id {
            Some(id) => warn!(
                "event={event} module=board status=error task_id={id} kind={:?} cleared_drag={cleared_drag} error={error}",
                error.kind()
            ),
            None => warn!(
                "event={event} module=board status=error kind={:?} cleared_drag={cleared_drag} error={error}",
                error.kind()
            ),
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardError, FailureKind};
    use crate::model::task::{TaskId, TaskValidationError};
    use crate::store::StoreError;

    #[test]
    fn failure_kinds_follow_error_taxonomy() {
        let network = BoardError::Store(StoreError::Network("timed out".to_string()));
        let rejected = BoardError::Store(StoreError::Rejected {
            status: 500,
            body: String::new(),
        });
        let missing = BoardError::Store(StoreError::NotFound(TaskId(3)));
        let invalid = BoardError::Validation(TaskValidationError::EmptyTitle);

        assert_eq!(network.kind(), FailureKind::NetworkFailure);
        assert_eq!(rejected.kind(), FailureKind::RemoteRejection);
        assert_eq!(missing.kind(), FailureKind::RemoteRejection);
        assert_eq!(invalid.kind(), FailureKind::ValidationFailure);
        assert_eq!(
            BoardError::UnknownTask(TaskId(9)).kind(),
            FailureKind::ValidationFailure
        );
    }
}
