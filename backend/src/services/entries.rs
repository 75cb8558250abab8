//! Journal entry service
//!
//! Orchestrates template resolution, answer capture, and the atomic
//! persistence of the entry aggregate; builds the card summaries used by
//! the list view and the dashboard.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::repositories::{
    CreateEntry, EntryRecord, EntryRepository, NewEntryTag, NewPhoto, NewResponse, NewSnapshot,
    PhotoRecord, ResponseRecord, SnapshotRecord, TagRecord, TagRepository,
};
use crate::services::{day_end, day_start, MoodService, TemplateService};
use chrono::{Duration, Utc};
use daybook_shared::capture::{capture_responses, decode_emotion_list, RawAnswerMap};
use daybook_shared::models::EntryKind;
use daybook_shared::mood::{truncate_preview, CARD_PREVIEW_CHARS};
use daybook_shared::questions::well_known;
use daybook_shared::types::{
    CreateGuidedEntryRequest, CreateQuickEntryRequest, DashboardResponse, EntryCard,
    EntryListQuery, EntryResponse, NewTagInput, PaginatedResponse, PhotoInput, PhotoResponse,
    ResponsePayload, SnapshotInput, SnapshotResponse, TagResponse,
};
use daybook_shared::validation::{
    validate_entry_content, validate_hex_color, validate_latitude, validate_longitude,
    validate_tag_name,
};
use sqlx::PgPool;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const DASHBOARD_RECENT_ENTRIES: i64 = 5;
const DASHBOARD_MOOD_DAYS: i64 = 7;

/// Journal entry service
pub struct EntryService;

impl EntryService {
    /// Create a guided entry from raw answers
    ///
    /// Resolves the template, validates and normalizes every answer
    /// against it, then persists the whole aggregate in one transaction.
    pub async fn create_guided(
        pool: &PgPool,
        user_id: Uuid,
        request: CreateGuidedEntryRequest,
    ) -> Result<EntryResponse, ApiError> {
        let template = match &request.template {
            Some(key_or_id) => match TemplateService::resolve(pool, user_id, key_or_id).await {
                Ok(template) => template,
                Err(ApiError::NotFound(_)) => {
                    return Err(ApiError::Validation(format!(
                        "Unknown template '{}'",
                        key_or_id
                    )));
                }
                Err(err) => return Err(err),
            },
            None => TemplateService::resolve_default(pool, user_id).await?,
        };

        let answers = RawAnswerMap::from_json_object(&request.answers)?;
        let captured = capture_responses(&template.questions, &answers)?;

        // Question text is copied onto each response so entries survive
        // template edits and deletion unchanged
        let responses: Vec<NewResponse> = captured
            .into_iter()
            .map(|response| NewResponse {
                question_id: response.question_id,
                question_text: response.question_text,
                answer: response.value.storage_string(),
            })
            .collect();

        let extras = prepare_extras(
            pool,
            user_id,
            request.tags,
            &request.new_tags,
            request.snapshot.as_ref(),
            &request.photos,
        )
        .await?;

        let entry = EntryRepository::create(
            pool,
            CreateEntry {
                user_id,
                entry_kind: EntryKind::Guided.as_str().to_string(),
                content: None,
                template_key: Some(template.key),
                responses,
                tag_ids: extras.tag_ids,
                new_tags: extras.new_tags,
                snapshot: extras.snapshot,
                photos: extras.photos,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        load_detail(pool, entry).await
    }

    /// Create a quick free-text entry
    pub async fn create_quick(
        pool: &PgPool,
        user_id: Uuid,
        request: CreateQuickEntryRequest,
    ) -> Result<EntryResponse, ApiError> {
        validate_entry_content(&request.content).map_err(ApiError::Validation)?;

        let extras = prepare_extras(
            pool,
            user_id,
            request.tags,
            &request.new_tags,
            request.snapshot.as_ref(),
            &request.photos,
        )
        .await?;

        let entry = EntryRepository::create(
            pool,
            CreateEntry {
                user_id,
                entry_kind: EntryKind::Quick.as_str().to_string(),
                content: Some(request.content.trim().to_string()),
                template_key: None,
                responses: Vec::new(),
                tag_ids: extras.tag_ids,
                new_tags: extras.new_tags,
                snapshot: extras.snapshot,
                photos: extras.photos,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        load_detail(pool, entry).await
    }

    /// Get one entry with its full aggregate
    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<EntryResponse, ApiError> {
        let entry = EntryRepository::get_by_id(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Entry not found".to_string()))?;

        load_detail(pool, entry).await
    }

    /// List entries as cards, newest first, optionally date-filtered
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: EntryListQuery,
    ) -> Result<PaginatedResponse<EntryCard>, ApiError> {
        if let (Some(start), Some(end)) = (query.start, query.end) {
            if start > end {
                return Err(ApiError::Validation(
                    "start date must not be after end date".to_string(),
                ));
            }
        }

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let start = query.start.map(day_start);
        let end = query.end.map(day_end);
        let offset = i64::from(page - 1) * i64::from(per_page);

        let (entries, total) = tokio::join!(
            EntryRepository::list_page(pool, user_id, start, end, i64::from(per_page), offset),
            EntryRepository::count_in_range(pool, user_id, start, end),
        );
        let entries = entries.map_err(ApiError::Internal)?;
        let total = total.map_err(ApiError::Internal)? as u64;

        let data = build_cards(pool, &entries).await?;

        Ok(PaginatedResponse {
            data,
            total,
            page,
            per_page,
            total_pages: total_pages(total, per_page),
        })
    }

    /// Delete an entry and its aggregate
    ///
    /// The snapshot is detached rather than deleted; everything else owned
    /// by the entry goes with it.
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let deleted = EntryRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Entry not found".to_string()));
        }
        Ok(())
    }

    /// Build the dashboard: recent cards, the week's mood, and counts
    pub async fn dashboard(pool: &PgPool, user_id: Uuid) -> Result<DashboardResponse, ApiError> {
        let today = Utc::now().date_naive();
        let week_start = today - Duration::days(DASHBOARD_MOOD_DAYS - 1);

        let (recent, entry_count, tag_count, mood_week) = tokio::join!(
            EntryRepository::recent(pool, user_id, DASHBOARD_RECENT_ENTRIES),
            EntryRepository::count_for_user(pool, user_id),
            TagRepository::count_for_user(pool, user_id),
            MoodService::series_between(pool, user_id, day_start(week_start), day_end(today)),
        );

        let recent = recent.map_err(ApiError::Internal)?;
        let recent_entries = build_cards(pool, &recent).await?;

        Ok(DashboardResponse {
            recent_entries,
            mood_week: mood_week?,
            entry_count: entry_count.map_err(ApiError::Internal)?,
            tag_count: tag_count.map_err(ApiError::Internal)?,
        })
    }
}

/// Validated attachment inputs ready for persistence
struct PreparedExtras {
    tag_ids: Vec<Uuid>,
    new_tags: Vec<NewEntryTag>,
    snapshot: Option<NewSnapshot>,
    photos: Vec<NewPhoto>,
}

/// Validate tags, snapshot, and photos shared by both entry kinds
async fn prepare_extras(
    pool: &PgPool,
    user_id: Uuid,
    tag_ids: Vec<Uuid>,
    new_tags: &[NewTagInput],
    snapshot: Option<&SnapshotInput>,
    photos: &[PhotoInput],
) -> Result<PreparedExtras, ApiError> {
    let mut tag_ids = tag_ids;
    tag_ids.sort_unstable();
    tag_ids.dedup();

    // Referencing another user's tag (or a deleted one) fails the whole
    // request instead of silently dropping the link
    if !tag_ids.is_empty() {
        let owned = TagRepository::filter_owned(pool, user_id, &tag_ids)
            .await
            .map_err(ApiError::Internal)?;
        if owned.len() != tag_ids.len() {
            return Err(ApiError::NotFound("Tag not found".to_string()));
        }
    }

    let new_tags = new_tags
        .iter()
        .map(|tag| {
            validate_tag_name(&tag.name).map_err(ApiError::Validation)?;
            if let Some(color) = &tag.color {
                validate_hex_color(color).map_err(ApiError::Validation)?;
            }
            Ok(NewEntryTag {
                name: tag.name.trim().to_string(),
                color: tag.color.clone(),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let snapshot = match snapshot {
        Some(input) => {
            if let Some(latitude) = input.latitude {
                validate_latitude(latitude).map_err(ApiError::Validation)?;
            }
            if let Some(longitude) = input.longitude {
                validate_longitude(longitude).map_err(ApiError::Validation)?;
            }
            Some(NewSnapshot {
                place_name: input.place_name.clone(),
                latitude: input.latitude,
                longitude: input.longitude,
                weather_summary: input.weather_summary.clone(),
                temperature_c: input.temperature_c,
                recorded_at: input.recorded_at,
            })
        }
        None => None,
    };

    let photos = photos
        .iter()
        .map(|photo| {
            if photo.file_ref.trim().is_empty() {
                return Err(ApiError::Validation(
                    "Photo file reference cannot be empty".to_string(),
                ));
            }
            Ok(NewPhoto {
                file_ref: photo.file_ref.clone(),
                caption: photo.caption.clone(),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(PreparedExtras {
        tag_ids,
        new_tags,
        snapshot,
        photos,
    })
}

/// Load the aggregate for one entry into its detail view
async fn load_detail(pool: &PgPool, entry: EntryRecord) -> Result<EntryResponse, ApiError> {
    let (responses, tags, snapshot, photos) = tokio::join!(
        EntryRepository::responses_for_entry(pool, entry.id),
        TagRepository::tags_for_entry(pool, entry.id),
        EntryRepository::snapshot_for_entry(pool, entry.id),
        EntryRepository::photos_for_entry(pool, entry.id),
    );

    Ok(entry_response(
        entry,
        responses.map_err(ApiError::Internal)?,
        tags.map_err(ApiError::Internal)?,
        snapshot.map_err(ApiError::Internal)?,
        photos.map_err(ApiError::Internal)?,
    ))
}

/// Batch-load responses and tags, then summarize each entry as a card
async fn build_cards(pool: &PgPool, entries: &[EntryRecord]) -> Result<Vec<EntryCard>, ApiError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
    let (responses, tags) = tokio::join!(
        EntryRepository::responses_for_entries(pool, &ids),
        TagRepository::tags_for_entries(pool, &ids),
    );
    let responses = responses.map_err(ApiError::Internal)?;
    let tags = tags.map_err(ApiError::Internal)?;

    let mut responses_by_entry: HashMap<Uuid, Vec<ResponseRecord>> = HashMap::new();
    for response in responses {
        responses_by_entry
            .entry(response.entry_id)
            .or_default()
            .push(response);
    }
    let mut tags_by_entry: HashMap<Uuid, Vec<String>> = HashMap::new();
    for tag in tags {
        tags_by_entry.entry(tag.entry_id).or_default().push(tag.name);
    }

    Ok(entries
        .iter()
        .map(|entry| {
            let responses = responses_by_entry.remove(&entry.id).unwrap_or_default();
            let tags = tags_by_entry.remove(&entry.id).unwrap_or_default();
            summarize_card(entry, &responses, tags)
        })
        .collect())
}

/// Summarize one entry for the list and dashboard views
///
/// Feeling value and emotions come from the well-known questions; the
/// preview comes from quick content or the designated highlight answer.
fn summarize_card(entry: &EntryRecord, responses: &[ResponseRecord], tags: Vec<String>) -> EntryCard {
    let answer_for = |id: &str| {
        responses
            .iter()
            .find(|r| r.question_id == id)
            .map(|r| r.answer.as_str())
    };

    let feeling_value = answer_for(well_known::FEELING_SCALE).and_then(|a| a.trim().parse().ok());
    let emotions = answer_for(well_known::ADDITIONAL_EMOTIONS)
        .map(decode_emotion_list)
        .unwrap_or_default();

    let preview_source = if entry.entry_kind == EntryKind::Quick.as_str() {
        entry.content.as_deref().unwrap_or_default()
    } else {
        answer_for(well_known::DAY_HIGHLIGHT).unwrap_or_default()
    };

    EntryCard {
        id: entry.id.to_string(),
        entry_kind: entry.entry_kind.clone(),
        created_at: entry.created_at,
        feeling_value,
        emotions,
        tags,
        preview: truncate_preview(preview_source, CARD_PREVIEW_CHARS),
    }
}

fn entry_response(
    entry: EntryRecord,
    responses: Vec<ResponseRecord>,
    tags: Vec<TagRecord>,
    snapshot: Option<SnapshotRecord>,
    photos: Vec<PhotoRecord>,
) -> EntryResponse {
    EntryResponse {
        id: entry.id.to_string(),
        entry_kind: entry.entry_kind,
        content: entry.content,
        template: entry.template_key,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
        responses: responses
            .into_iter()
            .map(|r| ResponsePayload {
                question_id: r.question_id,
                question_text: r.question_text,
                answer: r.answer,
            })
            .collect(),
        tags: tags
            .into_iter()
            .map(|t| TagResponse {
                id: t.id.to_string(),
                name: t.name,
                color: t.color,
                entry_count: None,
            })
            .collect(),
        snapshot: snapshot.map(snapshot_response),
        photos: photos
            .into_iter()
            .map(|p| PhotoResponse {
                id: p.id.to_string(),
                file_ref: p.file_ref,
                caption: p.caption,
            })
            .collect(),
    }
}

fn snapshot_response(record: SnapshotRecord) -> SnapshotResponse {
    SnapshotResponse {
        id: record.id.to_string(),
        place_name: record.place_name,
        latitude: record.latitude,
        longitude: record.longitude,
        weather_summary: record.weather_summary,
        temperature_c: record.temperature_c,
        recorded_at: record.recorded_at,
    }
}

fn total_pages(total: u64, per_page: u32) -> u32 {
    ((total + u64::from(per_page) - 1) / u64::from(per_page)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(kind: EntryKind, content: Option<&str>) -> EntryRecord {
        EntryRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            entry_kind: kind.as_str().to_string(),
            content: content.map(str::to_string),
            template_key: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn response(entry_id: Uuid, question_id: &str, answer: &str, position: i32) -> ResponseRecord {
        ResponseRecord {
            id: Uuid::new_v4(),
            entry_id,
            question_id: question_id.to_string(),
            question_text: format!("{}?", question_id),
            answer: answer.to_string(),
            position,
        }
    }

    #[test]
    fn test_guided_card_pulls_well_known_answers() {
        let entry = entry(EntryKind::Guided, None);
        let responses = vec![
            response(entry.id, well_known::FEELING_SCALE, "8", 0),
            response(
                entry.id,
                well_known::ADDITIONAL_EMOTIONS,
                r#"["Happy","Calm"]"#,
                1,
            ),
            response(entry.id, well_known::DAY_HIGHLIGHT, "Long walk by the river", 2),
        ];

        let card = summarize_card(&entry, &responses, vec!["outdoors".to_string()]);

        assert_eq!(card.feeling_value, Some(8));
        assert_eq!(card.emotions, vec!["Happy", "Calm"]);
        assert_eq!(card.tags, vec!["outdoors"]);
        assert_eq!(card.preview, "Long walk by the river");
    }

    #[test]
    fn test_card_emotions_survive_missing_feeling_scale() {
        let entry = entry(EntryKind::Guided, None);
        let responses = vec![response(
            entry.id,
            well_known::ADDITIONAL_EMOTIONS,
            r#"["Curious"]"#,
            0,
        )];

        let card = summarize_card(&entry, &responses, Vec::new());

        assert_eq!(card.feeling_value, None);
        assert_eq!(card.emotions, vec!["Curious"]);
        assert_eq!(card.preview, "");
    }

    #[test]
    fn test_quick_card_previews_content() {
        let long_note = "word ".repeat(60);
        let entry = entry(EntryKind::Quick, Some(long_note.as_str()));

        let card = summarize_card(&entry, &[], Vec::new());

        assert_eq!(card.feeling_value, None);
        assert!(card.preview.ends_with('…'));
        assert!(card.preview.chars().count() <= CARD_PREVIEW_CHARS + 1);
    }

    #[test]
    fn test_unparseable_feeling_value_is_dropped() {
        let entry = entry(EntryKind::Guided, None);
        let responses = vec![response(entry.id, well_known::FEELING_SCALE, "great", 0)];

        let card = summarize_card(&entry, &responses, Vec::new());
        assert_eq!(card.feeling_value, None);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(100, 20), 5);
    }
}
