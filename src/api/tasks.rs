//! Task CRUD, completion, suggestion, and dependency handlers.

use super::auth::AuthUser;
use super::server::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    CompletionResult, EnergyLevel, NewTask, Priority, Task, TaskStatus, TaskUpdate,
    TaskWithEnergyMatch, in_level_domain,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

fn validate_energy_level(field: &str, level: EnergyLevel) -> ApiResult<()> {
    if in_level_domain(level) {
        Ok(())
    } else {
        Err(ApiError::invalid_value(
            field,
            "energy level must be between 1 and 5",
        ))
    }
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    if input.title.trim().is_empty() {
        return Err(ApiError::missing_field("title"));
    }

    let task = state
        .db()
        .create_task(user.id(), input)
        .map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<TaskStatus>,
    pub project_id: Option<String>,
    pub priority: Option<Priority>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<i32>,
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .db()
        .list_tasks(
            user.id(),
            query.status,
            query.project_id.as_deref(),
            query.priority,
            query.sort_by.as_deref(),
            query.sort_order.as_deref(),
            query.limit,
        )
        .map_err(ApiError::from)?;
    Ok(Json(tasks))
}

pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Task>> {
    let found = state
        .db()
        .get_task(&task_id, user.id())
        .map_err(ApiError::from)?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::task_not_found(&task_id))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
    Json(input): Json<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    if let Some(ref title) = input.title {
        if title.trim().is_empty() {
            return Err(ApiError::invalid_value("title", "title cannot be empty"));
        }
    }

    let task = state
        .db()
        .update_task(&task_id, user.id(), input)
        .map_err(ApiError::from)?;
    Ok(Json(task))
}

pub async fn delete_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .db()
        .delete_task(&task_id, user.id())
        .map_err(ApiError::from)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::task_not_found(&task_id))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteTaskRequest {
    pub actual_duration: Option<i64>,
    pub current_energy_level: Option<EnergyLevel>,
}

pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
    Json(input): Json<CompleteTaskRequest>,
) -> ApiResult<Json<CompletionResult>> {
    if let Some(level) = input.current_energy_level {
        validate_energy_level("current_energy_level", level)?;
    }

    let result = state
        .db()
        .complete_task(
            &task_id,
            user.id(),
            input.actual_duration,
            input.current_energy_level,
        )
        .map_err(ApiError::from)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub energy_level: EnergyLevel,
    pub limit: Option<usize>,
}

/// Pending tasks ranked by how well they fit the caller's current energy.
pub async fn suggestions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SuggestionsQuery>,
) -> ApiResult<Json<Vec<TaskWithEnergyMatch>>> {
    validate_energy_level("energy_level", query.energy_level)?;

    let matches = state
        .db()
        .suggest_tasks(user.id(), query.energy_level, query.limit)
        .map_err(ApiError::from)?;
    Ok(Json(matches))
}

pub async fn add_dependency(
    State(state): State<AppState>,
    user: AuthUser,
    Path((task_id, dep_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .db()
        .add_dependency(user.id(), &task_id, &dep_id)
        .map_err(ApiError::from)?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_dependency(
    State(state): State<AppState>,
    user: AuthUser,
    Path((task_id, dep_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let removed = state
        .db()
        .remove_dependency(user.id(), &task_id, &dep_id)
        .map_err(ApiError::from)?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::task_not_found(&dep_id))
    }
}

pub async fn list_dependencies(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let deps = state
        .db()
        .list_dependencies(user.id(), &task_id)
        .map_err(ApiError::from)?;
    Ok(Json(deps))
}
