//! Task API surface built on the authenticated pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::executor::{ExecuteOutcome, RequestExecutor};
use crate::normalize::normalize;
use crate::transport::RequestDescriptor;

const TASKS_PATH: &str = "/api/tasks";

/// A task as the server returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub user_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub position: i64,
}

/// Fields the caller supplies when creating or updating a task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: String,
}

/// Per-user aggregates from the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserStatistics {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    #[serde(default)]
    pub in_progress_tasks: i64,
}

/// Result of an API call that may instead demand a fresh login.
///
/// Mirrors [`ExecuteOutcome`] one level up: the redirect is data, not an
/// error, so callers must handle it explicitly to get at the value.
#[derive(Debug)]
pub enum ApiOutcome<T> {
    Success(T),
    RedirectToLogin,
}

impl<T> ApiOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Success(value) => ApiOutcome::Success(f(value)),
            ApiOutcome::RedirectToLogin => ApiOutcome::RedirectToLogin,
        }
    }
}

/// Typed client for the task endpoints.
pub struct TaskClient {
    executor: Arc<RequestExecutor>,
}

impl TaskClient {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    pub async fn list(&self) -> Result<ApiOutcome<Vec<Task>>, ApiError> {
        self.call(RequestDescriptor::get(TASKS_PATH))
            .await
            .map(|outcome| outcome.map(Option::unwrap_or_default))
    }

    pub async fn get(&self, id: i64) -> Result<ApiOutcome<Task>, ApiError> {
        let outcome = self
            .call::<Task>(RequestDescriptor::get(format!("{}/{}", TASKS_PATH, id)))
            .await?;
        require_body(outcome)
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<ApiOutcome<Task>, ApiError> {
        let body = serde_json::to_value(draft).map_err(encode_error)?;
        let outcome = self
            .call::<Task>(RequestDescriptor::post(TASKS_PATH, body))
            .await?;
        require_body(outcome)
    }

    pub async fn update(&self, id: i64, draft: &TaskDraft) -> Result<ApiOutcome<Task>, ApiError> {
        let body = serde_json::to_value(draft).map_err(encode_error)?;
        let outcome = self
            .call::<Task>(RequestDescriptor::put(format!("{}/{}", TASKS_PATH, id), body))
            .await?;
        require_body(outcome)
    }

    pub async fn delete(&self, id: i64) -> Result<ApiOutcome<()>, ApiError> {
        let outcome = self
            .call::<serde_json::Value>(RequestDescriptor::delete(format!(
                "{}/{}",
                TASKS_PATH, id
            )))
            .await?;
        Ok(outcome.map(|_| ()))
    }

    /// Change only the status of a task, preserving its other fields.
    pub async fn update_status(&self, id: i64, status: &str) -> Result<ApiOutcome<Task>, ApiError> {
        let current = match self.get(id).await? {
            ApiOutcome::Success(task) => task,
            ApiOutcome::RedirectToLogin => return Ok(ApiOutcome::RedirectToLogin),
        };
        let draft = TaskDraft {
            title: current.title,
            description: current.description,
            status: status.to_string(),
        };
        self.update(id, &draft).await
    }

    /// Persist a reordering: map of task id to its new position.
    pub async fn update_positions(
        &self,
        positions: &BTreeMap<i64, i64>,
    ) -> Result<ApiOutcome<()>, ApiError> {
        let map: BTreeMap<String, i64> = positions
            .iter()
            .map(|(id, position)| (id.to_string(), *position))
            .collect();
        let outcome = self
            .call::<serde_json::Value>(RequestDescriptor::put(
                format!("{}/positions", TASKS_PATH),
                json!(map),
            ))
            .await?;
        Ok(outcome.map(|_| ()))
    }

    pub async fn statistics(&self) -> Result<ApiOutcome<UserStatistics>, ApiError> {
        let outcome = self
            .call::<UserStatistics>(RequestDescriptor::get("/api/users/statistics"))
            .await?;
        require_body(outcome)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<ApiOutcome<Option<T>>, ApiError> {
        match self.executor.execute(&request).await? {
            ExecuteOutcome::Response(response) => {
                Ok(ApiOutcome::Success(normalize(&response)?))
            }
            ExecuteOutcome::RedirectToLogin => Ok(ApiOutcome::RedirectToLogin),
        }
    }
}

fn require_body<T>(outcome: ApiOutcome<Option<T>>) -> Result<ApiOutcome<T>, ApiError> {
    match outcome {
        ApiOutcome::Success(Some(value)) => Ok(ApiOutcome::Success(value)),
        ApiOutcome::Success(None) => Err(ApiError::Decode {
            status: 204,
            message: "expected a response body".to_string(),
        }),
        ApiOutcome::RedirectToLogin => Ok(ApiOutcome::RedirectToLogin),
    }
}

fn encode_error(e: serde_json::Error) -> ApiError {
    ApiError::State(format!("failed to encode request body: {}", e))
}
