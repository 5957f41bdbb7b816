//! User registration, profile, and stats handlers.

use super::auth::AuthUser;
use super::server::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{User, UserStats};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Register (or refresh) the caller's profile.
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<RegisterRequest>,
) -> ApiResult<Json<User>> {
    let created = state
        .db()
        .upsert_user(user.id(), input.email, input.display_name)
        .map_err(ApiError::from)?;
    Ok(Json(created))
}

/// The caller's profile.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<User>> {
    let found = state.db().get_user(user.id()).map_err(ApiError::from)?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::user_not_found(user.id()))
}

/// Delete the caller and everything they own.
pub async fn delete_me(State(state): State<AppState>, user: AuthUser) -> ApiResult<StatusCode> {
    let deleted = state.db().delete_user(user.id()).map_err(ApiError::from)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::user_not_found(user.id()))
    }
}

/// Aggregate statistics for the caller.
pub async fn stats(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<UserStats>> {
    let stats = state.db().user_stats(user.id()).map_err(ApiError::from)?;
    Ok(Json(stats))
}
