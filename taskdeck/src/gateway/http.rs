//! HTTP implementation of the remote task store boundary.
//!
//! Posts JSON bodies to the four task routes and maps transport and status
//! failures onto [`RemoteError`]. The store's error bodies are surfaced in
//! the mapped error when they can be decoded.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use taskdeck_proto::api::{
    CREATE_TASK_PATH, CreateTaskRequest, CreateTaskResponse, DELETE_TASK_PATH, DeleteTaskRequest,
    DeleteTaskResponse, ErrorResponse, GET_ALL_TASKS_PATH, ListTasksRequest, ListTasksResponse,
    UPDATE_TASK_PATH, UpdateTaskRequest,
};
use taskdeck_proto::task::{OwnerId, Task, TaskDraft, TaskId, TaskPatch};

use super::{RemoteError, RemoteTaskGateway};

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway speaking JSON-over-POST to a `taskdeck-server` instance.
pub struct HttpTaskGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskGateway {
    /// Creates a gateway for the given base URL with the default timeout.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Creates a gateway with a custom per-request timeout.
    #[must_use]
    pub fn with_timeout(base_url: &Url, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Posts a JSON body to a route and decodes the success response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, err = %e, "task store request failed");
                RemoteError::Unreachable(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| RemoteError::Codec(e.to_string()));
        }

        // Prefer the store's own error body; fall back to the status reason.
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        };
        tracing::warn!(url = %url, status = status.as_u16(), message = %message, "task store rejected request");
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl RemoteTaskGateway for HttpTaskGateway {
    async fn create(&self, owner: &OwnerId, draft: &TaskDraft) -> Result<Task, RemoteError> {
        let request = CreateTaskRequest {
            owner_id: owner.clone(),
            task_id: None,
            draft: draft.clone(),
        };
        let response: CreateTaskResponse = self.post_json(CREATE_TASK_PATH, &request).await?;
        Ok(response.item)
    }

    async fn list_all(&self, owner: &OwnerId) -> Result<Vec<Task>, RemoteError> {
        let request = ListTasksRequest {
            owner_id: owner.clone(),
        };
        let response: ListTasksResponse = self.post_json(GET_ALL_TASKS_PATH, &request).await?;
        Ok(response.tasks)
    }

    async fn update(
        &self,
        owner: &OwnerId,
        task_id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<(), RemoteError> {
        let request = UpdateTaskRequest {
            owner_id: owner.clone(),
            task_id: task_id.clone(),
            patch: patch.clone(),
        };
        // The echoed record is ignored; the manager merges its own patch.
        let _: serde::de::IgnoredAny = self.post_json(UPDATE_TASK_PATH, &request).await?;
        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, task_id: &TaskId) -> Result<(), RemoteError> {
        let request = DeleteTaskRequest {
            owner_id: owner.clone(),
            task_id: task_id.clone(),
        };
        let _: DeleteTaskResponse = self.post_json(DELETE_TASK_PATH, &request).await?;
        Ok(())
    }
}
