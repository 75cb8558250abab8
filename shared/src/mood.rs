//! Mood extraction and aggregation
//!
//! Derives mood points from guided responses and folds them into the
//! day-bucketed series consumed by the mood chart, plus the text preview
//! used by dashboard cards.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: everything here is side-effect free; services
//!    feed in rows and render the results
//! 2. **Absence is explicit**: entries without a feeling answer yield no
//!    point, and an empty series reports no statistics instead of zeros

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::capture::decode_emotion_list;
use crate::questions::well_known;

/// Character budget for dashboard card previews
pub const CARD_PREVIEW_CHARS: usize = 150;

// ============================================================================
// Mood Points
// ============================================================================

/// Borrowed view of one stored guided response
#[derive(Debug, Clone, Copy)]
pub struct ResponseView<'a> {
    pub question_id: &'a str,
    pub answer: &'a str,
}

/// One entry's contribution to the mood chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPoint {
    pub entry_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    /// The feeling-scale answer
    pub feeling_value: i32,
    /// Selected emotions, already decoded from storage
    pub emotions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Derive a mood point from an entry's responses
///
/// Returns `None` when there is no parseable feeling-scale answer, which
/// covers quick entries (no responses at all) and templates without the
/// feeling question. Such entries are simply invisible to the mood chart.
pub fn extract_mood_point(
    entry_id: Uuid,
    recorded_at: DateTime<Utc>,
    responses: &[ResponseView<'_>],
) -> Option<MoodPoint> {
    let answer_for = |id: &str| {
        responses
            .iter()
            .find(|r| r.question_id == id)
            .map(|r| r.answer)
    };

    let feeling_value: i32 = answer_for(well_known::FEELING_SCALE)?.trim().parse().ok()?;

    let emotions = answer_for(well_known::ADDITIONAL_EMOTIONS)
        .map(decode_emotion_list)
        .unwrap_or_default();

    let reason = answer_for(well_known::FEELING_REASON)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    Some(MoodPoint {
        entry_id,
        recorded_at,
        feeling_value,
        emotions,
        reason,
    })
}

// ============================================================================
// Series Aggregation
// ============================================================================

/// Summary statistics over the raw feeling values in a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStats {
    /// Mean feeling value, rounded to one decimal
    pub average: f64,
    pub min: i32,
    pub max: i32,
    pub count: usize,
}

/// Day-bucketed series for the mood chart
///
/// `dates` and `values` run oldest-first and always have equal length.
/// `stats` is `None` when there are no points; the chart renders its
/// empty state from that rather than from fabricated zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MoodStats>,
}

impl MoodSeries {
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            values: Vec::new(),
            stats: None,
        }
    }
}

/// Fold mood points into a day-bucketed series
///
/// Days with multiple points chart their mean; statistics are computed
/// over the raw points, not the day means.
pub fn aggregate_mood_series(points: &[MoodPoint]) -> MoodSeries {
    if points.is_empty() {
        return MoodSeries::empty();
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<i32>> = BTreeMap::new();
    for point in points {
        by_day
            .entry(point.recorded_at.date_naive())
            .or_default()
            .push(point.feeling_value);
    }

    let mut dates = Vec::with_capacity(by_day.len());
    let mut values = Vec::with_capacity(by_day.len());
    for (date, day_values) in &by_day {
        let sum: i64 = day_values.iter().map(|&v| v as i64).sum();
        dates.push(*date);
        values.push(round_one_decimal(sum as f64 / day_values.len() as f64));
    }

    let raw: Vec<i32> = points.iter().map(|p| p.feeling_value).collect();
    let sum: i64 = raw.iter().map(|&v| v as i64).sum();
    let stats = MoodStats {
        average: round_one_decimal(sum as f64 / raw.len() as f64),
        min: *raw.iter().min().unwrap_or(&0),
        max: *raw.iter().max().unwrap_or(&0),
        count: raw.len(),
    };

    MoodSeries {
        dates,
        values,
        stats: Some(stats),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Card Previews
// ============================================================================

/// Shorten text for a dashboard card
///
/// Cuts at the last word boundary inside the budget where one exists and
/// appends an ellipsis. Operates on characters, so multi-byte text is safe.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let hard_cut: String = trimmed.chars().take(max_chars).collect();
    let cut = match hard_cut.rfind(' ') {
        Some(idx) if idx > 0 => &hard_cut[..idx],
        _ => hard_cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn point(value: i32, recorded_at: DateTime<Utc>) -> MoodPoint {
        MoodPoint {
            entry_id: Uuid::new_v4(),
            recorded_at,
            feeling_value: value,
            emotions: vec![],
            reason: None,
        }
    }

    // =========================================================================
    // Extraction Tests
    // =========================================================================

    #[test]
    fn test_extract_full_mood_point() {
        let responses = [
            ResponseView { question_id: "feeling_scale", answer: "8" },
            ResponseView { question_id: "feeling_reason", answer: "Slept well" },
            ResponseView { question_id: "additional_emotions", answer: r#"["Happy","Calm"]"# },
            ResponseView { question_id: "day_highlight", answer: "Walk" },
        ];
        let entry_id = Uuid::new_v4();
        let recorded = at(2024, 3, 5, 9);

        let mood = extract_mood_point(entry_id, recorded, &responses).unwrap();
        assert_eq!(mood.entry_id, entry_id);
        assert_eq!(mood.feeling_value, 8);
        assert_eq!(mood.emotions, vec!["Happy".to_string(), "Calm".to_string()]);
        assert_eq!(mood.reason.as_deref(), Some("Slept well"));
    }

    #[test]
    fn test_extract_requires_feeling_scale() {
        // No responses at all (a quick entry)
        assert!(extract_mood_point(Uuid::new_v4(), at(2024, 3, 5, 9), &[]).is_none());

        // Responses without the feeling question
        let responses = [ResponseView { question_id: "day_highlight", answer: "Walk" }];
        assert!(extract_mood_point(Uuid::new_v4(), at(2024, 3, 5, 9), &responses).is_none());

        // Unparsable feeling value is skipped, not an error
        let responses = [ResponseView { question_id: "feeling_scale", answer: "great" }];
        assert!(extract_mood_point(Uuid::new_v4(), at(2024, 3, 5, 9), &responses).is_none());
    }

    #[test]
    fn test_extract_minimal_point_defaults() {
        let responses = [ResponseView { question_id: "feeling_scale", answer: "5" }];
        let mood = extract_mood_point(Uuid::new_v4(), at(2024, 3, 5, 9), &responses).unwrap();
        assert!(mood.emotions.is_empty());
        assert!(mood.reason.is_none());

        // A blank reason stays None
        let responses = [
            ResponseView { question_id: "feeling_scale", answer: "5" },
            ResponseView { question_id: "feeling_reason", answer: "   " },
        ];
        let mood = extract_mood_point(Uuid::new_v4(), at(2024, 3, 5, 9), &responses).unwrap();
        assert!(mood.reason.is_none());
    }

    // =========================================================================
    // Aggregation Tests
    // =========================================================================

    #[test]
    fn test_aggregate_known_values() {
        let points = vec![
            point(3, at(2024, 3, 1, 9)),
            point(7, at(2024, 3, 2, 9)),
            point(10, at(2024, 3, 3, 9)),
        ];
        let series = aggregate_mood_series(&points);

        let stats = series.stats.unwrap();
        assert_eq!(stats.average, 6.7);
        assert_eq!(stats.min, 3);
        assert_eq!(stats.max, 10);
        assert_eq!(stats.count, 3);
        assert_eq!(series.values, vec![3.0, 7.0, 10.0]);
    }

    #[test]
    fn test_aggregate_empty_is_explicit() {
        let series = aggregate_mood_series(&[]);
        assert!(series.dates.is_empty());
        assert!(series.values.is_empty());
        assert!(series.stats.is_none());
    }

    #[test]
    fn test_aggregate_buckets_same_day() {
        let points = vec![
            point(4, at(2024, 3, 1, 8)),
            point(7, at(2024, 3, 1, 21)),
            point(10, at(2024, 3, 2, 12)),
        ];
        let series = aggregate_mood_series(&points);

        assert_eq!(series.dates.len(), 2);
        assert_eq!(series.values, vec![5.5, 10.0]);
        // Stats are over raw points, not day means
        let stats = series.stats.unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average, 7.0);
    }

    #[test]
    fn test_aggregate_orders_oldest_first() {
        let points = vec![
            point(9, at(2024, 3, 10, 9)),
            point(2, at(2024, 3, 1, 9)),
            point(6, at(2024, 3, 5, 9)),
        ];
        let series = aggregate_mood_series(&points);
        assert_eq!(
            series.dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            ]
        );
    }

    #[test]
    fn test_average_rounding() {
        // 1 + 2 / 2 = 1.5 exactly
        let points = vec![point(1, at(2024, 3, 1, 9)), point(2, at(2024, 3, 2, 9))];
        assert_eq!(aggregate_mood_series(&points).stats.unwrap().average, 1.5);

        // 20 / 3 = 6.666... -> 6.7
        let points = vec![
            point(6, at(2024, 3, 1, 9)),
            point(7, at(2024, 3, 2, 9)),
            point(7, at(2024, 3, 3, 9)),
        ];
        assert_eq!(aggregate_mood_series(&points).stats.unwrap().average, 6.7);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: stats stay within the raw value envelope
        #[test]
        fn prop_stats_bounded_by_values(values in proptest::collection::vec(1i32..=10, 1..40)) {
            let points: Vec<MoodPoint> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| point(v, at(2024, 1, 1, 0) + chrono::Duration::hours(i as i64 * 7)))
                .collect();

            let series = aggregate_mood_series(&points);
            let stats = series.stats.unwrap();

            prop_assert_eq!(stats.count, values.len());
            prop_assert_eq!(stats.min, *values.iter().min().unwrap());
            prop_assert_eq!(stats.max, *values.iter().max().unwrap());
            prop_assert!(stats.average >= stats.min as f64 - 0.05);
            prop_assert!(stats.average <= stats.max as f64 + 0.05);
            prop_assert_eq!(series.dates.len(), series.values.len());
        }

        /// Property: day means also stay within the template's 1-10 range
        #[test]
        fn prop_day_means_in_range(values in proptest::collection::vec(1i32..=10, 1..40)) {
            let points: Vec<MoodPoint> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| point(v, at(2024, 1, 1, 0) + chrono::Duration::hours(i as i64)))
                .collect();

            let series = aggregate_mood_series(&points);
            for value in series.values {
                prop_assert!((1.0..=10.0).contains(&value));
            }
        }
    }

    // =========================================================================
    // Preview Tests
    // =========================================================================

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(truncate_preview("A quiet day", 150), "A quiet day");
        assert_eq!(truncate_preview("  padded  ", 150), "padded");
        assert_eq!(truncate_preview("", 150), "");
    }

    #[test]
    fn test_preview_cuts_at_word_boundary() {
        let text = "The morning started slow but the afternoon turned into something special";
        let preview = truncate_preview(text, 30);

        assert!(preview.ends_with('…'));
        let body = preview.trim_end_matches('…');
        assert!(body.chars().count() <= 30);
        // Never cuts mid-word: the original continues each kept word
        assert!(text.starts_with(body));
        assert!(!body.ends_with(' '));
    }

    #[test]
    fn test_preview_unbroken_text_hard_cuts() {
        let text = "a".repeat(200);
        let preview = truncate_preview(&text, 150);
        assert_eq!(preview.chars().count(), 151); // 150 + ellipsis
    }

    #[test]
    fn test_preview_multibyte_safe() {
        let text = "día tras día ".repeat(30);
        let preview = truncate_preview(&text, 150);
        assert!(preview.chars().count() <= 151);
        assert!(preview.ends_with('…'));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: previews never exceed the budget plus the ellipsis
        #[test]
        fn prop_preview_within_budget(text in ".{0,400}", max in 10usize..200) {
            let preview = truncate_preview(&text, max);
            prop_assert!(preview.chars().count() <= max + 1);
        }
    }
}
