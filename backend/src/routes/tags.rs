//! Tag routes
//!
//! CRUD over the user's tag set. The listing includes per-tag entry counts
//! for the tag management screen.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::TagService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use daybook_shared::types::{CreateTagRequest, TagResponse, UpdateTagRequest};
use uuid::Uuid;

/// Create tag routes
pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags))
        .route("/", post(create_tag))
        .route("/:id", put(update_tag))
        .route("/:id", delete(delete_tag))
}

/// GET /api/v1/tags - All tags with usage counts
async fn list_tags(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TagResponse>>> {
    let tags = TagService::list(&state.db, auth.user_id).await?;
    Ok(Json(tags))
}

/// POST /api/v1/tags - Create a tag
async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<TagResponse>)> {
    let tag = TagService::create(&state.db, auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /api/v1/tags/:id - Rename or recolor a tag
async fn update_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTagRequest>,
) -> ApiResult<Json<TagResponse>> {
    let tag = TagService::update(&state.db, auth.user_id, id, req).await?;
    Ok(Json(tag))
}

/// DELETE /api/v1/tags/:id - Delete a tag, unlinking it from entries
async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    TagService::delete(&state.db, auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
