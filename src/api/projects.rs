//! Project CRUD handlers.

use super::auth::AuthUser;
use super::server::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::Project;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    if input.name.trim().is_empty() {
        return Err(ApiError::missing_field("name"));
    }

    let project = state
        .db()
        .create_project(user.id(), input.name, input.description, input.color)
        .map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.db().list_projects(user.id()).map_err(ApiError::from)?;
    Ok(Json(projects))
}

pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Project>> {
    let found = state
        .db()
        .get_project(&project_id, user.id())
        .map_err(ApiError::from)?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::project_not_found(&project_id))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(input): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(ApiError::invalid_value("name", "name cannot be empty"));
        }
    }

    let project = state
        .db()
        .update_project(
            &project_id,
            user.id(),
            input.name,
            input.description,
            input.color,
        )
        .map_err(ApiError::from)?;
    Ok(Json(project))
}

pub async fn delete_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .db()
        .delete_project(&project_id, user.id())
        .map_err(ApiError::from)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::project_not_found(&project_id))
    }
}
