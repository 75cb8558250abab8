//! Mood series service
//!
//! Fetches guided entries and their responses, then hands the rows to the
//! shared extraction and aggregation functions.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::repositories::{EntryRepository, ResponseRecord};
use crate::services::{day_end, day_start};
use chrono::{DateTime, Duration, Utc};
use daybook_shared::mood::{aggregate_mood_series, extract_mood_point, MoodSeries, ResponseView};
use daybook_shared::types::MoodSeriesQuery;
use sqlx::PgPool;
use uuid::Uuid;

/// Days covered when the query names no range
const DEFAULT_SERIES_DAYS: i64 = 30;

/// Mood series service
pub struct MoodService;

impl MoodService {
    /// Mood series for the query's date range
    ///
    /// Defaults to the last [`DEFAULT_SERIES_DAYS`] days ending today.
    pub async fn series(
        pool: &PgPool,
        user_id: Uuid,
        query: MoodSeriesQuery,
    ) -> Result<MoodSeries, ApiError> {
        let today = Utc::now().date_naive();
        let start = query.start.unwrap_or(today - Duration::days(DEFAULT_SERIES_DAYS - 1));
        let end = query.end.unwrap_or(today);

        if start > end {
            return Err(ApiError::Validation(
                "start date must not be after end date".to_string(),
            ));
        }

        Self::series_between(pool, user_id, day_start(start), day_end(end)).await
    }

    /// Mood series between two instants
    pub async fn series_between(
        pool: &PgPool,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MoodSeries, ApiError> {
        let entries = EntryRepository::guided_in_range(pool, user_id, start, end)
            .await
            .map_err(ApiError::Internal)?;
        if entries.is_empty() {
            return Ok(MoodSeries::empty());
        }

        let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        let responses = EntryRepository::responses_for_entries(pool, &ids)
            .await
            .map_err(ApiError::Internal)?;

        let mut responses_by_entry: HashMap<Uuid, Vec<ResponseRecord>> = HashMap::new();
        for response in responses {
            responses_by_entry
                .entry(response.entry_id)
                .or_default()
                .push(response);
        }

        // Entries without a feeling answer fall out here instead of
        // contributing fabricated zeros
        let points: Vec<_> = entries
            .iter()
            .filter_map(|entry| {
                let responses = responses_by_entry.get(&entry.id)?;
                let views: Vec<ResponseView<'_>> = responses
                    .iter()
                    .map(|r| ResponseView {
                        question_id: &r.question_id,
                        answer: &r.answer,
                    })
                    .collect();
                extract_mood_point(entry.id, entry.created_at, &views)
            })
            .collect();

        Ok(aggregate_mood_series(&points))
    }
}
