//! Dashboard route

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::EntryService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use daybook_shared::types::DashboardResponse;

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// GET /api/v1/dashboard - Recent entries, weekly mood, and counts
async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardResponse>> {
    let dashboard = EntryService::dashboard(&state.db, auth.user_id).await?;
    Ok(Json(dashboard))
}
