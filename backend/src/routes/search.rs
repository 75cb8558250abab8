//! Search route

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::SearchService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use daybook_shared::types::{SearchQuery, SearchResponse};

/// Create search routes
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/", get(search_entries))
}

/// GET /api/v1/search - Substring search over entry content and answers
async fn search_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let results = SearchService::search(&state.db, auth.user_id, query).await?;
    Ok(Json(results))
}
