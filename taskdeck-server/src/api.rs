//! HTTP surface of the task store: shared state, route handlers, and
//! server startup.
//!
//! Four JSON-over-POST routes map one-to-one onto table operations. The
//! server holds no session state; every request carries the owner it acts
//! for, and unknown routes answer 400 with an error body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use taskdeck_proto::api::{
    CREATE_TASK_PATH, CreateTaskRequest, CreateTaskResponse, DELETE_TASK_PATH, DeleteTaskRequest,
    DeleteTaskResponse, ErrorResponse, GET_ALL_TASKS_PATH, ListTasksRequest, ListTasksResponse,
    UPDATE_TASK_PATH, UpdateTaskRequest, UpdateTaskResponse,
};
use taskdeck_proto::task::{TaskId, ValidationError};

use crate::table::{TableError, TaskTable};

/// Errors that can occur while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind the listen address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was attempted.
        addr: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Shared server state: the task table behind all routes.
pub struct AppState {
    /// The per-owner task rows.
    pub table: TaskTable,
}

impl AppState {
    /// Creates server state around an existing table.
    #[must_use]
    pub const fn new(table: TaskTable) -> Self {
        Self { table }
    }
}

/// Request failures mapped to HTTP statuses with a JSON error body.
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task limit of {limit} reached for this user")]
    CapacityExceeded { limit: usize },
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

impl From<TableError> for ApiError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::CapacityExceeded { limit } => Self::CapacityExceeded { limit },
            TableError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::CapacityExceeded { .. } => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /tasks/create-task` — validate the draft, assign an ID, store it.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<CreateTaskResponse>, ApiError> {
    let task_id = req.task_id.unwrap_or_else(TaskId::new);
    let task = req.draft.into_task(req.owner_id, task_id)?;
    state.table.put(task.clone()).await?;
    tracing::info!(owner = %task.owner_id, task = %task.task_id, "task created");
    Ok(Json(CreateTaskResponse {
        message: "Task created".to_string(),
        item: task,
    }))
}

/// `POST /tasks/get-all-tasks` — the owner's full task set, oldest first.
async fn get_all_tasks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListTasksRequest>,
) -> Json<ListTasksResponse> {
    let tasks = state.table.query(&req.owner_id).await;
    tracing::debug!(owner = %req.owner_id, count = tasks.len(), "task query");
    Json(ListTasksResponse { tasks })
}

/// `POST /tasks/update-task` — patch fields of an existing task.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<UpdateTaskResponse>, ApiError> {
    req.patch.validate()?;
    let item = state
        .table
        .update(&req.owner_id, &req.task_id, &req.patch)
        .await?;
    tracing::info!(owner = %req.owner_id, task = %req.task_id, "task updated");
    Ok(Json(UpdateTaskResponse {
        message: "Task updated".to_string(),
        item,
    }))
}

/// `POST /tasks/delete-task` — remove a task; absent keys succeed.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteTaskRequest>,
) -> Json<DeleteTaskResponse> {
    let existed = state.table.delete(&req.owner_id, &req.task_id).await;
    tracing::info!(owner = %req.owner_id, task = %req.task_id, existed, "task deleted");
    Json(DeleteTaskResponse {
        message: "Task deleted".to_string(),
    })
}

/// Fallback for any route outside the task API.
async fn unknown_route() -> Response {
    let body = ErrorResponse {
        error: "unknown route".to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Builds the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(CREATE_TASK_PATH, post(create_task))
        .route(GET_ALL_TASKS_PATH, post(get_all_tasks))
        .route(UPDATE_TASK_PATH, post(update_task))
        .route(DELETE_TASK_PATH, post(delete_task))
        .fallback(unknown_route)
        .with_state(state)
}

/// Starts a server with default state on the given address.
///
/// Binding `127.0.0.1:0` yields an OS-assigned port, which is how tests run
/// an in-process store.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound.
pub async fn start_server(
    bind_addr: &str,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), ServerError> {
    start_server_with_state(bind_addr, Arc::new(AppState::new(TaskTable::new()))).await
}

/// Starts a server over the given state, returning the bound address and
/// the serve task handle.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound.
pub async fn start_server_with_state(
    bind_addr: &str,
    state: Arc<AppState>,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), ServerError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.to_string(),
            source,
        })?;
    let addr = listener.local_addr().map_err(|source| ServerError::Bind {
        addr: bind_addr.to_string(),
        source,
    })?;

    let app = router(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task store server failed");
        }
    });

    Ok((addr, handle))
}
