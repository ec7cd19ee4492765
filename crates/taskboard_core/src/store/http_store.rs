//! REST/JSON task store over a todo-style HTTP service.
//!
//! Routes (relative to the configured base URL):
//! - `GET /todos[?userId=N]`, `GET /todos/{id}`
//! - `POST /todos`, `PUT /todos/{id}`, `DELETE /todos/{id}`
//!
//! Transport failures (including timeouts) map to `StoreError::Network`,
//! non-2xx statuses to `StoreError::Rejected`.

use crate::config::StoreConfig;
use crate::model::task::{NewTask, Task, TaskId};
use crate::store::{logged_request, StoreError, StoreResult, TaskListQuery, TaskStore};
use std::time::Duration;

/// Default remote service the board was built against.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

const RESOURCE_PATH: &str = "/todos";
const USER_AGENT: &str = concat!("taskboard/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Blocking HTTP task store.
pub struct HttpTaskStore {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTaskStore {
    /// Creates a store rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.base_url.as_str(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{RESOURCE_PATH}", self.base_url)
    }

    fn item_url(&self, id: TaskId) -> String {
        format!("{}{RESOURCE_PATH}/{id}", self.base_url)
    }
}

impl TaskStore for HttpTaskStore {
    fn list_tasks(&self, query: &TaskListQuery) -> StoreResult<Vec<Task>> {
        let url = self.collection_url();
        logged_request("http", "list", &url, || {
            let mut request = self.agent.get(&url).set("Accept", "application/json");
            if let Some(user_id) = query.user_id {
                request = request.query("userId", &user_id.to_string());
            }
            let response = request.call().map_err(map_ureq_error)?;
            decode(response)
        })
    }

    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let url = self.item_url(id);
        logged_request("http", "get", &url, || {
            match self.agent.get(&url).set("Accept", "application/json").call() {
                Ok(response) => decode(response).map(Some),
                Err(ureq::Error::Status(404, _)) => Ok(None),
                Err(err) => Err(map_ureq_error(err)),
            }
        })
    }

    fn create_task(&self, task: &NewTask) -> StoreResult<Task> {
        let url = self.collection_url();
        logged_request("http", "create", &url, || {
            let response = self
                .agent
                .post(&url)
                .set("Accept", "application/json")
                .send_json(task)
                .map_err(map_ureq_error)?;
            decode(response)
        })
    }

    fn update_task(&self, task: &Task) -> StoreResult<()> {
        let url = self.item_url(task.id);
        logged_request("http", "update", &url, || {
            self.agent
                .put(&url)
                .set("Accept", "application/json")
                .send_json(task)
                .map_err(|err| map_missing(err, task.id))?;
            Ok(())
        })
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        let url = self.item_url(id);
        logged_request("http", "delete", &url, || {
            self.agent
                .delete(&url)
                .call()
                .map_err(|err| map_missing(err, id))?;
            Ok(())
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: ureq::Response) -> StoreResult<T> {
    response
        .into_json::<T>()
        .map_err(|err| StoreError::InvalidData(err.to_string()))
}

fn map_missing(err: ureq::Error, id: TaskId) -> StoreError {
    match err {
        ureq::Error::Status(404, _) => StoreError::NotFound(id),
        other => map_ureq_error(other),
    }
}

fn map_ureq_error(err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            StoreError::Rejected {
                status,
                body: truncate(body.trim(), MAX_ERROR_BODY_CHARS),
            }
        }
        ureq::Error::Transport(transport) => StoreError::Network(transport.to_string()),
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{truncate, HttpTaskStore};
    use crate::model::task::TaskId;
    use std::time::Duration;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let store = HttpTaskStore::new("http://localhost:3000/", Duration::from_secs(1));
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(store.collection_url(), "http://localhost:3000/todos");
        assert_eq!(store.item_url(TaskId(42)), "http://localhost:3000/todos/42");
    }

    #[test]
    fn truncate_caps_long_error_bodies() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }
}
