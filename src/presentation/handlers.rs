// HTTP request handlers
use crate::domain::analytics::{parse_days, ActivityPoint, UserStats};
use crate::domain::filter::FilterQuery;
use crate::domain::settings::{AppSettings, SettingsPatch};
use crate::domain::user::{User, UserUpdate};
use crate::domain::ValidationError;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub days: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub data: Vec<User>,
    pub count: u64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List users matching the query filters, one page at a time
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let filter = query.validate()?;
    let page = state.user_service.list_users(&filter).await?;
    Ok(Json(UserListResponse {
        data: page.data,
        count: page.count,
    }))
}

/// Fetch a single user by id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .user_service
        .get_user(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Apply a partial update to a user
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<User>, ApiError> {
    let update: UserUpdate = serde_json::from_value(body)
        .map_err(|err| ValidationError::new("body", err.to_string()))?;
    let changes = update.into_changes()?;
    state
        .user_service
        .update_user(&id, &changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn ban_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .user_service
        .ban_user(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn unban_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .user_service
        .unban_user(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Set the VIP flag. The body must be `{ "isVip": <bool> }`; anything else
/// is rejected before any write happens.
pub async fn set_vip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<User>, ApiError> {
    let Some(vip) = body.get("isVip").and_then(Value::as_bool) else {
        return Err(ValidationError::new("isVip", "must be a boolean").into());
    };
    state
        .user_service
        .set_vip(&id, vip)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Aggregate user counts
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<UserStats>, ApiError> {
    Ok(Json(state.analytics_service.stats().await?))
}

/// Per-day signup counts over a trailing window
pub async fn activity_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityPoint>>, ApiError> {
    let days = parse_days(query.days.as_deref())?;
    Ok(Json(state.analytics_service.activity(days).await?))
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AppSettings>, ApiError> {
    Ok(Json(state.settings.get().await?))
}

/// Merge a partial settings record into the stored one
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<AppSettings>, ApiError> {
    let patch: SettingsPatch = serde_json::from_value(body)
        .map_err(|err| ValidationError::new("body", err.to_string()))?;
    Ok(Json(state.settings.update(&patch).await?))
}
