//! Question template routes
//!
//! Built-in templates are addressed by key, user templates by UUID; the
//! service layer resolves whichever shape arrives in the path.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::TemplateService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use daybook_shared::types::{CreateTemplateRequest, TemplateResponse, UpdateTemplateRequest};

/// Create template routes
pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates))
        .route("/", post(create_template))
        .route("/:key", get(get_template))
        .route("/:key", put(update_template))
        .route("/:key", delete(delete_template))
}

/// GET /api/v1/templates - Built-in templates first, then the user's own
async fn list_templates(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TemplateResponse>>> {
    let templates = TemplateService::list(&state.db, auth.user_id).await?;
    Ok(Json(templates))
}

/// POST /api/v1/templates - Create a user template
async fn create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTemplateRequest>,
) -> ApiResult<(StatusCode, Json<TemplateResponse>)> {
    let template = TemplateService::create(&state.db, auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/v1/templates/:key - Single template by key or id
async fn get_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<Json<TemplateResponse>> {
    let template = TemplateService::get(&state.db, auth.user_id, &key).await?;
    Ok(Json(template))
}

/// PUT /api/v1/templates/:key - Update a user template
async fn update_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    Json(req): Json<UpdateTemplateRequest>,
) -> ApiResult<Json<TemplateResponse>> {
    let template = TemplateService::update(&state.db, auth.user_id, &key, req).await?;
    Ok(Json(template))
}

/// DELETE /api/v1/templates/:key - Delete a user template
async fn delete_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    TemplateService::delete(&state.db, auth.user_id, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
