use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::db::{self, DbHandle};
use crate::models::{
    CreateProjectInput, CreateTaskInput, Project, Task, UpdateProjectInput, UpdateTaskInput,
};

const MAX_NAME_LEN: usize = 100;
const MAX_TITLE_LEN: usize = 200;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub db: DbHandle,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

/// Handler failure, rendered as `{"detail": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Unprocessable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(e) => {
                error!(error = ?e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let detail = match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::Unprocessable(rejection.body_text()))
}

fn check_text(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Unprocessable(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(ApiError::Unprocessable(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

// ── Request/response types ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub project_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/seed", post(seed))
        .route("/health", get(health_check))
}

// ── Projects ──────────────────────────────────────────────────────────

async fn list_projects(State(state): State<SharedState>) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state.db.call(db::project::list_projects).await?;
    Ok(Json(projects))
}

async fn create_project(
    State(state): State<SharedState>,
    payload: Result<Json<CreateProjectInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    check_text("name", &input.name, MAX_NAME_LEN)?;

    let project = state
        .db
        .call(move |db| db::project::create_project(db, input))
        .await?;
    info!(id = project.id, name = %project.name, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError> {
    state
        .db
        .call(move |db| db::project::get_project(db, id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Project not found"))
}

async fn update_project(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateProjectInput>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let input = body(payload)?;
    if let Some(name) = &input.name {
        check_text("name", name, MAX_NAME_LEN)?;
    }

    state
        .db
        .call(move |db| db::project::update_project(db, id, input))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Project not found"))
}

async fn delete_project(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .call(move |db| db::project::delete_project(db, id))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Project not found"));
    }
    info!(id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ── Tasks ─────────────────────────────────────────────────────────────

async fn list_tasks(
    State(state): State<SharedState>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .db
        .call(move |db| db::task::list_tasks(db, query.project_id))
        .await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<SharedState>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    check_text("title", &input.title, MAX_TITLE_LEN)?;

    let task = state
        .db
        .call(move |db| {
            if db::project::get_project(db, input.project_id)?.is_none() {
                return Ok(None);
            }
            db::task::create_task(db, input).map(Some)
        })
        .await?
        .ok_or(ApiError::NotFound("Project not found"))?;
    info!(id = task.id, project_id = task.project_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    state
        .db
        .call(move |db| db::task::get_task(db, id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Task not found"))
}

async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let input = body(payload)?;
    if let Some(title) = &input.title {
        check_text("title", title, MAX_TITLE_LEN)?;
    }

    state
        .db
        .call(move |db| db::task::update_task(db, id, input))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Task not found"))
}

async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .call(move |db| db::task::delete_task(db, id))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ── Seed ──────────────────────────────────────────────────────────────

async fn seed(State(state): State<SharedState>) -> Result<Json<SeedResponse>, ApiError> {
    let seeded = state.db.call(db::seed::seed_demo_data).await?;
    let message = if seeded {
        info!("demo data seeded");
        "Seeded successfully"
    } else {
        "Already seeded"
    };
    Ok(Json(SeedResponse { message }))
}

async fn health_check() -> &'static str {
    "ok"
}
