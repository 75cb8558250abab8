//! Daybook WASM Module
//!
//! WebAssembly bindings over the shared domain logic, so the browser can
//! validate forms and preview entries without a server round-trip.

use daybook_shared::capture::{capture_responses, RawAnswerMap};
use daybook_shared::mood::{aggregate_mood_series, truncate_preview, MoodPoint, CARD_PREVIEW_CHARS};
use daybook_shared::questions::QuestionDefinition;
use daybook_shared::validation;
use wasm_bindgen::prelude::*;

/// Validate an email address; returns the error message or null
#[wasm_bindgen]
pub fn check_email(email: &str) -> Option<String> {
    validation::validate_email(email).err()
}

/// Validate a password; returns the error message or null
#[wasm_bindgen]
pub fn check_password(password: &str) -> Option<String> {
    validation::validate_password(password).err()
}

/// Validate a tag name; returns the error message or null
#[wasm_bindgen]
pub fn check_tag_name(name: &str) -> Option<String> {
    validation::validate_tag_name(name).err()
}

/// Validate a `#rrggbb` color; returns the error message or null
#[wasm_bindgen]
pub fn check_hex_color(color: &str) -> Option<String> {
    validation::validate_hex_color(color).err()
}

/// Render the card preview for entry text, as the dashboard will show it
#[wasm_bindgen]
pub fn card_preview(text: &str) -> String {
    truncate_preview(text, CARD_PREVIEW_CHARS)
}

/// Validate guided answers against a template's questions before submit
///
/// `questions_json` is the `questions` array from the templates API;
/// `answers_json` is the answer object the form would post. Returns the
/// first capture error as `"question_id: message"`, or null when the
/// submission would be accepted.
#[wasm_bindgen]
pub fn check_guided_answers(questions_json: &str, answers_json: &str) -> Option<String> {
    let questions: Vec<QuestionDefinition> = match serde_json::from_str(questions_json) {
        Ok(questions) => questions,
        Err(e) => return Some(format!("Invalid questions payload: {}", e)),
    };
    let object: serde_json::Map<String, serde_json::Value> =
        match serde_json::from_str(answers_json) {
            Ok(object) => object,
            Err(e) => return Some(format!("Invalid answers payload: {}", e)),
        };

    let answers = match RawAnswerMap::from_json_object(&object) {
        Ok(answers) => answers,
        Err(e) => return Some(e.to_string()),
    };

    capture_responses(&questions, &answers).err().map(|e| e.to_string())
}

/// Build the day-bucketed mood series a chart can render directly
///
/// `points_json` is the array of mood points the mood API returns. The
/// result is the series as JSON: ISO dates, per-day mean values rounded
/// to one decimal, and overall stats (null when there are no points).
/// Throws when the input does not parse.
#[wasm_bindgen]
pub fn build_mood_series(points_json: &str) -> Result<String, String> {
    let points: Vec<MoodPoint> = serde_json::from_str(points_json)
        .map_err(|e| format!("Invalid mood points payload: {}", e))?;
    serde_json::to_string(&aggregate_mood_series(&points))
        .map_err(|e| format!("Could not encode mood series: {}", e))
}
