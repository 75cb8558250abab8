//! Account export service
//!
//! Produces a complete JSON export of everything a user owns, plus a
//! flat CSV of entries for spreadsheets. Exports read through the same
//! repositories as the API, so they see exactly what the app sees.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::repositories::{EntryRepository, TagRepository, UserRepository};
use chrono::{DateTime, Utc};
use daybook_shared::capture::decode_emotion_list;
use daybook_shared::models::EntryKind;
use daybook_shared::questions::well_known;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Complete account export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountExport {
    pub export_version: String,
    pub exported_at: DateTime<Utc>,
    pub profile: ProfileExport,
    pub tags: Vec<TagExport>,
    pub entries: Vec<EntryExport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileExport {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub timezone: String,
    pub default_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagExport {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryExport {
    pub id: String,
    pub entry_kind: String,
    pub content: Option<String>,
    pub template: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responses: Vec<ResponseExport>,
    pub tags: Vec<String>,
    pub snapshot: Option<SnapshotExport>,
    pub photos: Vec<PhotoExport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseExport {
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotExport {
    pub place_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weather_summary: Option<String>,
    pub temperature_c: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoExport {
    pub file_ref: String,
    pub caption: Option<String>,
}

/// CSV export row: one line per entry
#[derive(Debug, Clone, Serialize)]
pub struct EntryCsvRow {
    pub id: String,
    pub kind: String,
    pub created_at: String,
    pub feeling_value: Option<i32>,
    pub emotions: String,
    pub tags: String,
    pub text: String,
}

/// Account export service
pub struct ExportService;

impl ExportService {
    /// Export the whole account as JSON
    pub async fn export_json(pool: &PgPool, user_id: Uuid) -> Result<AccountExport, ApiError> {
        let (profile, tags, entries) = tokio::join!(
            Self::fetch_profile(pool, user_id),
            Self::fetch_tags(pool, user_id),
            Self::fetch_entries(pool, user_id),
        );

        Ok(AccountExport {
            export_version: "1.0".to_string(),
            exported_at: Utc::now(),
            profile: profile?,
            tags: tags?,
            entries: entries?,
        })
    }

    /// Export entries as CSV, one row per entry oldest first
    pub async fn export_entries_csv(pool: &PgPool, user_id: Uuid) -> Result<String, ApiError> {
        let entries = Self::fetch_entries(pool, user_id).await?;

        let rows: Vec<EntryCsvRow> = entries.iter().map(csv_row).collect();
        Self::to_csv(&rows)
    }

    /// Convert data to CSV string
    fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }

    async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<ProfileExport, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let settings = UserRepository::get_settings(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let (timezone, default_template) = match settings {
            Some(s) => (s.timezone, s.default_template),
            None => ("UTC".to_string(), None),
        };

        Ok(ProfileExport {
            id: user.id.to_string(),
            email: user.email,
            created_at: user.created_at,
            timezone,
            default_template,
        })
    }

    async fn fetch_tags(pool: &PgPool, user_id: Uuid) -> Result<Vec<TagExport>, ApiError> {
        let records = TagRepository::list_with_counts(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records
            .into_iter()
            .map(|r| TagExport {
                id: r.id.to_string(),
                name: r.name,
                color: r.color,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn fetch_entries(pool: &PgPool, user_id: Uuid) -> Result<Vec<EntryExport>, ApiError> {
        let entries = EntryRepository::list_all_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        let (responses, tags, snapshots, photos) = tokio::join!(
            EntryRepository::responses_for_entries(pool, &ids),
            TagRepository::tags_for_entries(pool, &ids),
            EntryRepository::snapshots_for_entries(pool, &ids),
            EntryRepository::photos_for_entries(pool, &ids),
        );

        let mut responses_by_entry: HashMap<Uuid, Vec<ResponseExport>> = HashMap::new();
        for r in responses.map_err(ApiError::Internal)? {
            responses_by_entry
                .entry(r.entry_id)
                .or_default()
                .push(ResponseExport {
                    question_id: r.question_id,
                    question_text: r.question_text,
                    answer: r.answer,
                });
        }
        let mut tags_by_entry: HashMap<Uuid, Vec<String>> = HashMap::new();
        for t in tags.map_err(ApiError::Internal)? {
            tags_by_entry.entry(t.entry_id).or_default().push(t.name);
        }
        let mut snapshot_by_entry: HashMap<Uuid, SnapshotExport> = HashMap::new();
        for s in snapshots.map_err(ApiError::Internal)? {
            if let Some(entry_id) = s.entry_id {
                snapshot_by_entry.insert(
                    entry_id,
                    SnapshotExport {
                        place_name: s.place_name,
                        latitude: s.latitude,
                        longitude: s.longitude,
                        weather_summary: s.weather_summary,
                        temperature_c: s.temperature_c,
                        recorded_at: s.recorded_at,
                    },
                );
            }
        }
        let mut photos_by_entry: HashMap<Uuid, Vec<PhotoExport>> = HashMap::new();
        for p in photos.map_err(ApiError::Internal)? {
            photos_by_entry
                .entry(p.entry_id)
                .or_default()
                .push(PhotoExport {
                    file_ref: p.file_ref,
                    caption: p.caption,
                });
        }

        Ok(entries
            .into_iter()
            .map(|e| EntryExport {
                responses: responses_by_entry.remove(&e.id).unwrap_or_default(),
                tags: tags_by_entry.remove(&e.id).unwrap_or_default(),
                snapshot: snapshot_by_entry.remove(&e.id),
                photos: photos_by_entry.remove(&e.id).unwrap_or_default(),
                id: e.id.to_string(),
                entry_kind: e.entry_kind,
                content: e.content,
                template: e.template_key,
                created_at: e.created_at,
                updated_at: e.updated_at,
            })
            .collect())
    }
}

fn csv_row(entry: &EntryExport) -> EntryCsvRow {
    let answer_for = |id: &str| {
        entry
            .responses
            .iter()
            .find(|r| r.question_id == id)
            .map(|r| r.answer.as_str())
    };

    let feeling_value = answer_for(well_known::FEELING_SCALE).and_then(|a| a.trim().parse().ok());
    let emotions = answer_for(well_known::ADDITIONAL_EMOTIONS)
        .map(decode_emotion_list)
        .unwrap_or_default();

    let text = if entry.entry_kind == EntryKind::Quick.as_str() {
        entry.content.clone().unwrap_or_default()
    } else {
        answer_for(well_known::DAY_HIGHLIGHT)
            .unwrap_or_default()
            .to_string()
    };

    EntryCsvRow {
        id: entry.id.clone(),
        kind: entry.entry_kind.clone(),
        created_at: entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        feeling_value,
        emotions: emotions.join("; "),
        tags: entry.tags.join("; "),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry_export(kind: EntryKind) -> EntryExport {
        EntryExport {
            id: Uuid::new_v4().to_string(),
            entry_kind: kind.as_str().to_string(),
            content: None,
            template: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            responses: vec![],
            tags: vec![],
            snapshot: None,
            photos: vec![],
        }
    }

    #[test]
    fn test_full_export_serialization() {
        let export = AccountExport {
            export_version: "1.0".to_string(),
            exported_at: Utc::now(),
            profile: ProfileExport {
                id: Uuid::new_v4().to_string(),
                email: "casey@example.com".to_string(),
                created_at: Utc::now(),
                timezone: "Europe/Vienna".to_string(),
                default_template: Some("daily_reflection".to_string()),
            },
            tags: vec![],
            entries: vec![],
        };

        let json = serde_json::to_string(&export).unwrap();
        let parsed: AccountExport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.export_version, "1.0");
        assert_eq!(parsed.profile.timezone, "Europe/Vienna");
    }

    #[test]
    fn test_csv_row_for_guided_entry() {
        let mut entry = entry_export(EntryKind::Guided);
        entry.responses = vec![
            ResponseExport {
                question_id: well_known::FEELING_SCALE.to_string(),
                question_text: "How are you?".to_string(),
                answer: "7".to_string(),
            },
            ResponseExport {
                question_id: well_known::ADDITIONAL_EMOTIONS.to_string(),
                question_text: "Emotions?".to_string(),
                answer: r#"["Happy","Calm"]"#.to_string(),
            },
            ResponseExport {
                question_id: well_known::DAY_HIGHLIGHT.to_string(),
                question_text: "Highlight?".to_string(),
                answer: "Dinner with friends".to_string(),
            },
        ];
        entry.tags = vec!["friends".to_string(), "food".to_string()];

        let row = csv_row(&entry);
        assert_eq!(row.feeling_value, Some(7));
        assert_eq!(row.emotions, "Happy; Calm");
        assert_eq!(row.tags, "friends; food");
        assert_eq!(row.text, "Dinner with friends");
    }

    #[test]
    fn test_csv_output_quotes_embedded_commas() {
        let mut entry = entry_export(EntryKind::Quick);
        entry.content = Some("Rain, then sun".to_string());

        let rows = vec![csv_row(&entry)];
        let csv = ExportService::to_csv(&rows).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,kind,created_at,feeling_value,emotions,tags,text"
        );
        assert!(lines.next().unwrap().ends_with("\"Rain, then sun\""));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_entry_export_roundtrip(
            content in "[a-zA-Z ]{1,80}",
            tag in "[a-z]{3,10}",
        ) {
            let mut export = entry_export(EntryKind::Quick);
            export.content = Some(content.clone());
            export.tags = vec![tag.clone()];

            let json = serde_json::to_string(&export).unwrap();
            let parsed: EntryExport = serde_json::from_str(&json).unwrap();

            prop_assert_eq!(parsed.content.unwrap(), content);
            prop_assert_eq!(&parsed.tags[0], &tag);
        }

        #[test]
        fn test_snapshot_export_roundtrip(
            latitude in -90.0f64..=90.0,
            longitude in -180.0f64..=180.0,
        ) {
            let export = SnapshotExport {
                place_name: Some("Somewhere".to_string()),
                latitude: Some(latitude),
                longitude: Some(longitude),
                weather_summary: None,
                temperature_c: Some(18.5),
                recorded_at: Some(Utc::now()),
            };

            let json = serde_json::to_string(&export).unwrap();
            let parsed: SnapshotExport = serde_json::from_str(&json).unwrap();

            prop_assert!((parsed.latitude.unwrap() - latitude).abs() < 1e-9);
            prop_assert!((parsed.longitude.unwrap() - longitude).abs() < 1e-9);
        }
    }
}
