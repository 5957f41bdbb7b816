//! Team and membership handlers.

use super::auth::AuthUser;
use super::server::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{Team, TeamMember};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    if input.name.trim().is_empty() {
        return Err(ApiError::missing_field("name"));
    }

    let team = state
        .db()
        .create_team(user.id(), input.name)
        .map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Team>>> {
    let teams = state.db().list_teams(user.id()).map_err(ApiError::from)?;
    Ok(Json(teams))
}

pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Team>> {
    let found = state
        .db()
        .get_team(&team_id, user.id())
        .map_err(ApiError::from)?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::team_not_found(&team_id))
}

pub async fn delete_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .db()
        .delete_team(&team_id, user.id())
        .map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((team_id, member_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let member = state
        .db()
        .add_team_member(&team_id, user.id(), &member_id)
        .map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((team_id, member_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .db()
        .remove_team_member(&team_id, user.id(), &member_id)
        .map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let members = state
        .db()
        .list_team_members(&team_id, user.id())
        .map_err(ApiError::from)?;
    Ok(Json(members))
}
