#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use taskboard_core::{
    Column, NewTask, Priority, StoreError, StoreResult, Task, TaskId, TaskListQuery, TaskStore,
};

/// Failure injected into the next store calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Network,
    Status(u16),
}

impl Failure {
    fn to_error(self) -> StoreError {
        match self {
            Self::Network => StoreError::Network("connection refused".to_string()),
            Self::Status(status) => StoreError::Rejected {
                status,
                body: "{}".to_string(),
            },
        }
    }
}

/// In-memory store that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    tasks: RefCell<Vec<Task>>,
    next_id: Cell<u64>,
    calls: RefCell<Vec<String>>,
    failure: Cell<Option<Failure>>,
    fixed_id: Cell<Option<u64>>,
}

impl RecordingStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|task| task.id.0).max().unwrap_or(0) + 1;
        Self {
            tasks: RefCell::new(tasks),
            next_id: Cell::new(next_id),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        self.failure.set(Some(failure));
    }

    /// Answers every create with the same id, like a non-persisting demo API.
    pub fn assign_fixed_id(&self, id: u64) {
        self.fixed_id.set(Some(id));
    }

    pub fn recover(&self) {
        self.failure.set(None);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn stored(&self, id: TaskId) -> Option<Task> {
        self.tasks.borrow().iter().find(|task| task.id == id).cloned()
    }

    fn record(&self, call: String) -> StoreResult<()> {
        self.calls.borrow_mut().push(call);
        match self.failure.get() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

impl TaskStore for RecordingStore {
    fn list_tasks(&self, query: &TaskListQuery) -> StoreResult<Vec<Task>> {
        self.record("list".to_string())?;
        Ok(self
            .tasks
            .borrow()
            .iter()
            .filter(|task| query.user_id.map_or(true, |user_id| task.user_id == user_id))
            .cloned()
            .collect())
    }

    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        self.record(format!("get {id}"))?;
        Ok(self.stored(id))
    }

    fn create_task(&self, task: &NewTask) -> StoreResult<Task> {
        self.record("create".to_string())?;
        let id = match self.fixed_id.get() {
            Some(id) => TaskId(id),
            None => {
                let id = TaskId(self.next_id.get());
                self.next_id.set(id.0 + 1);
                id
            }
        };
        let created = task.clone().into_task(id);
        self.tasks.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_task(&self, task: &Task) -> StoreResult<()> {
        self.record(format!("update {}", task.id))?;
        let mut tasks = self.tasks.borrow_mut();
        let existing = tasks
            .iter_mut()
            .find(|existing| existing.id == task.id)
            .ok_or(StoreError::NotFound(task.id))?;
        *existing = task.clone();
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.record(format!("delete {id}"))?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

pub fn task(id: u64, title: &str, column: Column) -> Task {
    Task {
        id: TaskId(id),
        user_id: 1,
        title: title.to_string(),
        body: None,
        priority: Priority::Medium,
        due_date: None,
        column,
    }
}
