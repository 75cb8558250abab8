//! Profile and settings routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use daybook_shared::types::{ProfileResponse, SettingsResponse, UpdateSettingsRequest};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/settings", put(update_settings))
}

/// GET /api/v1/profile - Profile with settings
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = UserService::get_profile_with_settings(&state.db, auth.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile/settings - Partial settings update
async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateSettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    let settings = UserService::update_settings(&state.db, auth.user_id, req).await?;
    Ok(Json(settings))
}
