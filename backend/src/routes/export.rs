//! Data export API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::export::ExportService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Create export routes
pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/json", get(export_json))
        .route("/entries.csv", get(export_entries_csv))
}

/// GET /api/v1/export/json - Export the full account as JSON
async fn export_json(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let export = ExportService::export_json(&state.db, auth.user_id).await?;

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("JSON serialization error: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"daybook-export.json\""),
    );

    Ok((headers, json))
}

/// GET /api/v1/export/entries.csv - Export entries as CSV
async fn export_entries_csv(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let csv = ExportService::export_entries_csv(&state.db, auth.user_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"entries.csv\""),
    );

    Ok((headers, csv))
}
