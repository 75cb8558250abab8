//! Guided response capture
//!
//! Turns a raw answer map (form or JSON submission) into typed, validated
//! responses ordered by the template's question list.
//!
//! # Design Principles
//!
//! 1. **Template-driven**: the question list drives processing; unknown
//!    keys in the submission are ignored
//! 2. **Typed in memory**: emotions are a string list everywhere in-process;
//!    the JSON-array string form exists only at the storage boundary
//! 3. **Rules as data**: conditional requirements live in one table instead
//!    of scattered branches

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::questions::{
    is_catalogue_emotion, well_known, AnswerType, QuestionDefinition, MAX_TEXT_ANSWER_CHARS,
};

/// Prefix used by form-style submissions (`question_feeling_scale=8`)
pub const FORM_KEY_PREFIX: &str = "question_";

// ============================================================================
// Raw Submission
// ============================================================================

/// A single raw answer before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnswer {
    Text(String),
    List(Vec<String>),
}

/// Capture failure, naming the offending question
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{question_id}: {message}")]
pub struct CaptureError {
    pub question_id: String,
    pub message: String,
}

impl CaptureError {
    pub fn new(question_id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: question_id.to_string(),
            message: message.into(),
        }
    }
}

/// Raw answers keyed by question id
///
/// Lookups accept both the bare question id and the `question_` prefixed
/// form-field name, so browser form posts and API clients share one path.
#[derive(Debug, Clone, Default)]
pub struct RawAnswerMap {
    answers: HashMap<String, RawAnswer>,
}

impl RawAnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, answer: RawAnswer) {
        self.answers.insert(key.to_string(), answer);
    }

    pub fn insert_text(&mut self, key: &str, value: &str) {
        self.insert(key, RawAnswer::Text(value.to_string()));
    }

    pub fn insert_list(&mut self, key: &str, values: &[&str]) {
        self.insert(
            key,
            RawAnswer::List(values.iter().map(|v| v.to_string()).collect()),
        );
    }

    /// Look up an answer for a question id (prefixed form key wins)
    pub fn get(&self, question_id: &str) -> Option<&RawAnswer> {
        let prefixed = format!("{}{}", FORM_KEY_PREFIX, question_id);
        self.answers
            .get(&prefixed)
            .or_else(|| self.answers.get(question_id))
    }

    /// Build from a JSON object, as sent to the entries API
    ///
    /// Strings and numbers become text answers; arrays of strings become
    /// list answers. Anything else is rejected naming the question.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Result<Self, CaptureError> {
        let mut map = Self::new();
        for (key, value) in object {
            let question_id = key.strip_prefix(FORM_KEY_PREFIX).unwrap_or(key);
            let answer = match value {
                serde_json::Value::String(s) => RawAnswer::Text(s.clone()),
                serde_json::Value::Number(n) => RawAnswer::Text(n.to_string()),
                serde_json::Value::Null => continue,
                serde_json::Value::Array(items) => {
                    let mut list = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            serde_json::Value::String(s) => list.push(s.clone()),
                            _ => {
                                return Err(CaptureError::new(
                                    question_id,
                                    "List answers must contain only strings",
                                ))
                            }
                        }
                    }
                    RawAnswer::List(list)
                }
                _ => {
                    return Err(CaptureError::new(
                        question_id,
                        "Answers must be strings, numbers, or string lists",
                    ))
                }
            };
            map.insert(key, answer);
        }
        Ok(map)
    }
}

// ============================================================================
// Captured Output
// ============================================================================

/// A validated, normalized answer value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CapturedValue {
    Number(i32),
    Text(String),
    Boolean(bool),
    Emotions(Vec<String>),
}

impl CapturedValue {
    /// Serialize for the `guided_responses.answer` column
    ///
    /// Emotion lists become a JSON array string here and nowhere else.
    pub fn storage_string(&self) -> String {
        match self {
            CapturedValue::Number(n) => n.to_string(),
            CapturedValue::Text(s) => s.clone(),
            CapturedValue::Boolean(b) => if *b { "Yes" } else { "No" }.to_string(),
            // Serializing Vec<String> cannot fail
            CapturedValue::Emotions(list) => {
                serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

/// Decode a stored emotion-list answer back into memory form
///
/// Reads are lenient: anything that is not a JSON string array yields an
/// empty selection rather than an error.
pub fn decode_emotion_list(stored: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(stored).unwrap_or_default()
}

/// One captured response, in template order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedResponse {
    pub question_id: String,
    pub question_text: String,
    pub value: CapturedValue,
}

// ============================================================================
// Conditional Requirements
// ============================================================================

/// "If `when_id` was answered `equals`, then `then_required` must be filled"
#[derive(Debug, Clone, Copy)]
pub struct ConditionalRule {
    pub when_id: &'static str,
    pub equals: &'static str,
    pub then_required: &'static str,
}

/// The shipped rule set
pub const CONDITIONAL_RULES: &[ConditionalRule] = &[ConditionalRule {
    when_id: well_known::EXERCISE,
    equals: "Yes",
    then_required: well_known::EXERCISE_TYPE,
}];

// ============================================================================
// Capture
// ============================================================================

/// Validate and normalize a raw submission against a question list
///
/// Output order mirrors the question list. The first violation aborts
/// capture with the offending question id.
pub fn capture_responses(
    questions: &[QuestionDefinition],
    answers: &RawAnswerMap,
) -> Result<Vec<CapturedResponse>, CaptureError> {
    let mut captured = Vec::with_capacity(questions.len());

    for question in questions {
        let value = capture_one(question, answers.get(&question.id))?;
        captured.push(CapturedResponse {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            value,
        });
    }

    apply_conditional_rules(&captured)?;

    Ok(captured)
}

fn capture_one(
    question: &QuestionDefinition,
    raw: Option<&RawAnswer>,
) -> Result<CapturedValue, CaptureError> {
    match &question.answer_type {
        AnswerType::Number { min, max } => {
            let text = require_scalar(question, raw)?;
            let value: i32 = text.trim().parse().map_err(|_| {
                CaptureError::new(&question.id, "Answer must be a whole number")
            })?;
            if value < *min || value > *max {
                return Err(CaptureError::new(
                    &question.id,
                    format!("Answer must be between {} and {}", min, max),
                ));
            }
            Ok(CapturedValue::Number(value))
        }
        AnswerType::Text => {
            let text = match raw {
                None => String::new(),
                Some(RawAnswer::Text(s)) => s.trim().to_string(),
                Some(RawAnswer::List(_)) => {
                    return Err(CaptureError::new(
                        &question.id,
                        "Expected a single text answer",
                    ))
                }
            };
            if text.chars().count() > MAX_TEXT_ANSWER_CHARS {
                return Err(CaptureError::new(
                    &question.id,
                    format!("Answer must be at most {} characters", MAX_TEXT_ANSWER_CHARS),
                ));
            }
            Ok(CapturedValue::Text(text))
        }
        AnswerType::Boolean => {
            let text = require_scalar(question, raw)?;
            match text.trim() {
                "Yes" => Ok(CapturedValue::Boolean(true)),
                "No" => Ok(CapturedValue::Boolean(false)),
                _ => Err(CaptureError::new(
                    &question.id,
                    "Answer must be exactly 'Yes' or 'No'",
                )),
            }
        }
        AnswerType::Emotions => {
            let names = match raw {
                None => Vec::new(),
                Some(RawAnswer::List(list)) => list.clone(),
                Some(RawAnswer::Text(s)) if s.trim().is_empty() => Vec::new(),
                Some(RawAnswer::Text(s)) => {
                    serde_json::from_str::<Vec<String>>(s).map_err(|_| {
                        CaptureError::new(
                            &question.id,
                            "Answer must be a JSON array of emotion names",
                        )
                    })?
                }
            };
            for name in &names {
                if !is_catalogue_emotion(name) {
                    return Err(CaptureError::new(
                        &question.id,
                        format!("'{}' is not a recognized emotion", name),
                    ));
                }
            }
            Ok(CapturedValue::Emotions(dedup_preserving_order(names)))
        }
    }
}

fn require_scalar(
    question: &QuestionDefinition,
    raw: Option<&RawAnswer>,
) -> Result<String, CaptureError> {
    match raw {
        Some(RawAnswer::Text(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(RawAnswer::Text(_)) | None => {
            Err(CaptureError::new(&question.id, "An answer is required"))
        }
        Some(RawAnswer::List(_)) => Err(CaptureError::new(
            &question.id,
            format!("Expected a single {} answer", question.answer_type.kind()),
        )),
    }
}

fn apply_conditional_rules(captured: &[CapturedResponse]) -> Result<(), CaptureError> {
    for rule in CONDITIONAL_RULES {
        let trigger = captured
            .iter()
            .find(|r| r.question_id == rule.when_id)
            .map(|r| r.value.storage_string());
        if trigger.as_deref() != Some(rule.equals) {
            continue;
        }
        let dependent = captured.iter().find(|r| r.question_id == rule.then_required);
        let filled = matches!(
            dependent.map(|r| &r.value),
            Some(CapturedValue::Text(s)) if !s.is_empty()
        );
        if !filled {
            return Err(CaptureError::new(
                rule.then_required,
                format!(
                    "An answer is required when '{}' is '{}'",
                    rule.when_id, rule.equals
                ),
            ));
        }
    }
    Ok(())
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}
