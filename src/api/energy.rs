//! Energy log, pattern, and insight handlers.

use super::auth::AuthUser;
use super::server::AppState;
use crate::db::energy::DAY_MS;
use crate::db::now_ms;
use crate::error::{ApiError, ApiResult};
use crate::scoring;
use crate::types::{EnergyInsight, EnergyLevel, EnergyLog, EnergyPattern, in_level_domain};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{Timelike, Utc};
use serde::Deserialize;

/// Window used for pattern derivation and insights.
const PATTERN_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    pub energy_level: EnergyLevel,
    #[serde(default)]
    pub mood_tags: Vec<String>,
    pub notes: Option<String>,
    pub logged_at: Option<i64>,
}

/// Record an energy level. Validation happens before any store access.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateLogRequest>,
) -> ApiResult<(StatusCode, Json<EnergyLog>)> {
    if !in_level_domain(input.energy_level) {
        return Err(ApiError::invalid_value(
            "energy_level",
            "energy level must be between 1 and 5",
        ));
    }

    let log = state
        .db()
        .create_energy_log(
            user.id(),
            input.energy_level,
            input.mood_tags,
            input.notes,
            input.logged_at,
        )
        .map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// Fetch one log by id.
pub async fn get_one(
    State(state): State<AppState>,
    user: AuthUser,
    Path(log_id): Path<String>,
) -> ApiResult<Json<EnergyLog>> {
    let found = state
        .db()
        .get_energy_log(&log_id, user.id())
        .map_err(ApiError::from)?;
    found
        .map(Json)
        .ok_or_else(|| ApiError::energy_log_not_found(&log_id))
}

#[derive(Debug, Deserialize)]
pub struct ListLogsQuery {
    /// Trailing window in days (default 30).
    pub days: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListLogsQuery>,
) -> ApiResult<Json<Vec<EnergyLog>>> {
    let days = query.days.unwrap_or(PATTERN_WINDOW_DAYS);
    if days <= 0 {
        return Err(ApiError::invalid_value("days", "days must be positive"));
    }

    let since = now_ms() - days * DAY_MS;
    let logs = state
        .db()
        .list_energy_logs(user.id(), since)
        .map_err(ApiError::from)?;
    Ok(Json(logs))
}

fn derive_pattern(state: &AppState, user_id: &str) -> ApiResult<EnergyPattern> {
    let since = now_ms() - PATTERN_WINDOW_DAYS * DAY_MS;
    let logs = state
        .db()
        .list_energy_logs(user_id, since)
        .map_err(ApiError::from)?;
    Ok(scoring::energy_pattern(&logs))
}

/// The caller's derived energy pattern over the trailing 30 days.
pub async fn pattern(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<EnergyPattern>> {
    Ok(Json(derive_pattern(&state, user.id())?))
}

/// Insights derived from the caller's pattern and latest log.
pub async fn insights(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<EnergyInsight>>> {
    let pattern = derive_pattern(&state, user.id())?;
    let latest = state
        .db()
        .latest_energy_log(user.id())
        .map_err(ApiError::from)?;

    let current_hour = Utc::now().hour();
    let insights = scoring::energy_insights(&pattern, latest.as_ref(), current_hour);
    Ok(Json(insights))
}
