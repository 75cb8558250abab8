//! Property tests for the guided-entry pipeline
//!
//! Exercises the capture-to-storage path the entry handlers depend on:
//! answers validated against a template, normalized to storage strings,
//! and read back for cards and mood extraction.

#[cfg(test)]
mod tests {
    use crate::services::{day_end, day_start};
    use chrono::{Duration, NaiveDate};
    use daybook_shared::capture::{capture_responses, decode_emotion_list, RawAnswerMap};
    use daybook_shared::questions::{
        daily_reflection_template, quick_checkin_template, well_known, NEGATIVE_EMOTIONS,
        NEUTRAL_EMOTIONS, POSITIVE_EMOTIONS,
    };
    use proptest::prelude::*;

    fn all_emotions() -> Vec<&'static str> {
        POSITIVE_EMOTIONS
            .iter()
            .chain(NEGATIVE_EMOTIONS)
            .chain(NEUTRAL_EMOTIONS)
            .copied()
            .collect()
    }

    proptest! {
        /// A feeling value inside the scale survives capture, storage
        /// normalization, and the integer parse the card builder applies.
        #[test]
        fn prop_feeling_value_survives_storage(feeling in 1i32..=10) {
            let template = quick_checkin_template();
            let mut answers = RawAnswerMap::new();
            answers.insert_text(well_known::FEELING_SCALE, &feeling.to_string());
            answers.insert_list(well_known::ADDITIONAL_EMOTIONS, &[]);
            answers.insert_text(well_known::DAY_HIGHLIGHT, "a day");

            let captured = capture_responses(&template.questions, &answers).unwrap();
            let stored = captured[0].value.storage_string();

            prop_assert_eq!(stored.parse::<i32>().unwrap(), feeling);
        }

        /// A feeling value outside the scale is rejected and the error
        /// names the feeling question, not some other field.
        #[test]
        fn prop_out_of_scale_feeling_is_rejected(feeling in prop_oneof![-1000i32..=0, 11i32..=1000]) {
            let template = quick_checkin_template();
            let mut answers = RawAnswerMap::new();
            answers.insert_text(well_known::FEELING_SCALE, &feeling.to_string());
            answers.insert_list(well_known::ADDITIONAL_EMOTIONS, &[]);
            answers.insert_text(well_known::DAY_HIGHLIGHT, "a day");

            let err = capture_responses(&template.questions, &answers).unwrap_err();
            prop_assert_eq!(err.question_id, well_known::FEELING_SCALE);
        }

        /// Any catalogue selection round-trips through the stored JSON
        /// string unchanged, in selection order.
        #[test]
        fn prop_emotion_selection_round_trips(
            selection in proptest::sample::subsequence(all_emotions(), 0..12)
        ) {
            let template = quick_checkin_template();
            let mut answers = RawAnswerMap::new();
            answers.insert_text(well_known::FEELING_SCALE, "5");
            answers.insert_list(well_known::ADDITIONAL_EMOTIONS, &selection);
            answers.insert_text(well_known::DAY_HIGHLIGHT, "a day");

            let captured = capture_responses(&template.questions, &answers).unwrap();
            let stored = captured[1].value.storage_string();
            let decoded = decode_emotion_list(&stored);

            let expected: Vec<String> = selection.iter().map(|s| s.to_string()).collect();
            prop_assert_eq!(decoded, expected);
        }

        /// Captured responses always come back in template order, whatever
        /// the answers hold.
        #[test]
        fn prop_response_order_mirrors_template(exercised in any::<bool>()) {
            let template = daily_reflection_template();
            let mut answers = RawAnswerMap::new();
            answers.insert_text(well_known::FEELING_SCALE, "7");
            answers.insert_text(well_known::FEELING_REASON, "slept well");
            answers.insert_list(well_known::ADDITIONAL_EMOTIONS, &["Calm"]);
            answers.insert_text(well_known::DAY_HIGHLIGHT, "a walk");
            answers.insert_text("gratitude", "coffee");
            if exercised {
                answers.insert_text(well_known::EXERCISE, "Yes");
                answers.insert_text(well_known::EXERCISE_TYPE, "running");
            } else {
                answers.insert_text(well_known::EXERCISE, "No");
            }

            let captured = capture_responses(&template.questions, &answers).unwrap();

            let captured_ids: Vec<&str> =
                captured.iter().map(|r| r.question_id.as_str()).collect();
            let template_ids: Vec<&str> =
                template.questions.iter().map(|q| q.id.as_str()).collect();
            prop_assert_eq!(captured_ids, template_ids);
        }

        /// The day bounds used by range filters cover one calendar day and
        /// never bleed into the next.
        #[test]
        fn prop_day_bounds_cover_one_day(days in 0i64..40_000) {
            let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Duration::days(days);

            let start = day_start(date);
            let end = day_end(date);

            prop_assert!(start <= end);
            prop_assert_eq!(start.date_naive(), date);
            prop_assert_eq!(end.date_naive(), date);
            prop_assert!(end < day_start(date + Duration::days(1)));
        }
    }
}
