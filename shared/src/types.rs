//! API request and response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mood::MoodSeries;
use crate::questions::QuestionDefinition;
use crate::search::MatchContext;

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Auth and Profile Types
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// User settings response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_template: Option<String>,
}

/// Profile with settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub settings: SettingsResponse,
}

/// User settings update request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSettingsRequest {
    /// IANA timezone name (e.g. "Europe/Vienna")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Built-in template key or user template id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_template: Option<String>,
}

// ============================================================================
// Template Types
// ============================================================================

/// Template representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateResponse {
    /// Built-in key or user template UUID
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// True for the read-only templates that ship with the app
    pub builtin: bool,
    pub questions: Vec<QuestionDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create template request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionDefinition>,
}

/// Update template request (full replacement of the question list)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionDefinition>>,
}

// ============================================================================
// Entry Types
// ============================================================================

/// New tag created inline with an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTagInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Location/weather snapshot supplied with an entry
///
/// Values arrive already resolved; the API never calls out to geocoding
/// or weather providers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Photo reference supplied with an entry
///
/// `file_ref` is the stored-file reference handed back by the upload
/// collaborator; this API never sees photo bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoInput {
    pub file_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Create guided entry request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGuidedEntryRequest {
    /// Built-in template key or user template id; defaults to the user's
    /// preferred template, falling back to the app default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Raw answers keyed by question id (or form-style `question_<id>`)
    pub answers: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    #[serde(default)]
    pub new_tags: Vec<NewTagInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotInput>,
    #[serde(default)]
    pub photos: Vec<PhotoInput>,
}

/// Create quick entry request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuickEntryRequest {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    #[serde(default)]
    pub new_tags: Vec<NewTagInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotInput>,
    #[serde(default)]
    pub photos: Vec<PhotoInput>,
}

/// One stored response in an entry detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub question_id: String,
    pub question_text: String,
    /// Normalized answer string; emotion answers are a JSON array string
    pub answer: String,
}

/// Tag representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Number of entries using this tag (list endpoint only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_count: Option<i64>,
}

/// Create tag request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Update tag request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTagRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Stored snapshot returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Stored photo reference returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: String,
    pub file_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Full entry detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    pub id: String,
    pub entry_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Template provenance for guided entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ordered responses; empty for quick entries
    pub responses: Vec<ResponsePayload>,
    pub tags: Vec<TagResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotResponse>,
    pub photos: Vec<PhotoResponse>,
}

/// Dashboard card summary of one entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCard {
    pub id: String,
    pub entry_kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feeling_value: Option<i32>,
    pub emotions: Vec<String>,
    pub tags: Vec<String>,
    /// Main-content preview, word-boundary truncated
    pub preview: String,
}

/// Entry list query parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntryListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

// ============================================================================
// Mood, Search, and Dashboard Types
// ============================================================================

/// Mood series query parameters (defaults to the last 30 days)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MoodSeriesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

/// Search query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// One search hit with its highlight context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub entry_id: String,
    pub entry_kind: String,
    pub created_at: DateTime<Utc>,
    /// Which guided question matched; None when quick content matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    pub context: MatchContext,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultItem>,
}

/// Dashboard response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub recent_entries: Vec<EntryCard>,
    /// Seven-day mood series ending today
    pub mood_week: MoodSeries,
    pub entry_count: i64,
    pub tag_count: i64,
}
