//! Mood series route

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::MoodService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use daybook_shared::mood::MoodSeries;
use daybook_shared::types::MoodSeriesQuery;

/// Create mood routes
pub fn mood_routes() -> Router<AppState> {
    Router::new().route("/series", get(get_mood_series))
}

/// GET /api/v1/mood/series - Daily mood averages over a date range
async fn get_mood_series(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MoodSeriesQuery>,
) -> ApiResult<Json<MoodSeries>> {
    let series = MoodService::series(&state.db, auth.user_id, query).await?;
    Ok(Json(series))
}
