//! Journal entry routes
//!
//! Guided and quick entry creation, the paginated card listing, single-entry
//! detail, and deletion. All handlers are owner-scoped through [`AuthUser`].

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::EntryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use daybook_shared::types::{
    CreateGuidedEntryRequest, CreateQuickEntryRequest, EntryCard, EntryListQuery, EntryResponse,
    PaginatedResponse,
};
use uuid::Uuid;

/// Create entry routes
pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/guided", post(create_guided_entry))
        .route("/quick", post(create_quick_entry))
        .route("/", get(list_entries))
        .route("/:id", get(get_entry))
        .route("/:id", delete(delete_entry))
}

/// POST /api/v1/entries/guided - Create a guided entry from template answers
async fn create_guided_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGuidedEntryRequest>,
) -> ApiResult<(StatusCode, Json<EntryResponse>)> {
    let entry = EntryService::create_guided(&state.db, auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/v1/entries/quick - Create a free-form entry
async fn create_quick_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateQuickEntryRequest>,
) -> ApiResult<(StatusCode, Json<EntryResponse>)> {
    let entry = EntryService::create_quick(&state.db, auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/entries - Paginated entry cards, newest first
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<EntryListQuery>,
) -> ApiResult<Json<PaginatedResponse<EntryCard>>> {
    let page = EntryService::list(&state.db, auth.user_id, query).await?;
    Ok(Json(page))
}

/// GET /api/v1/entries/:id - Full entry detail
async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EntryResponse>> {
    let entry = EntryService::get(&state.db, auth.user_id, id).await?;
    Ok(Json(entry))
}

/// DELETE /api/v1/entries/:id - Delete an entry and its owned children
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    EntryService::delete(&state.db, auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
