//! Question catalogue and guided-entry templates
//!
//! Defines the answer-type model, question/template definitions, the
//! emotion catalogue, and the built-in templates that ship with the app.
//!
//! # Design Principles
//!
//! 1. **Typed constraints**: each answer type carries its own constraints,
//!    so adding a type never touches unrelated validation code
//! 2. **Order is data**: a template's question order is meaningful and is
//!    preserved through capture, storage, and reads
//! 3. **Named contract**: the well-known question ids used by derived views
//!    (mood charts, dashboards) live in one place

use serde::{Deserialize, Serialize};

use crate::validation::validate_question_id;

/// Maximum length of a free-text answer, in characters
pub const MAX_TEXT_ANSWER_CHARS: usize = 10_000;

// ============================================================================
// Answer Types
// ============================================================================

/// The kind of answer a question accepts, with per-type constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerType {
    /// Whole number within an inclusive range
    Number { min: i32, max: i32 },
    /// Free text up to [`MAX_TEXT_ANSWER_CHARS`]
    Text,
    /// Exactly "Yes" or "No"
    Boolean,
    /// Zero or more emotion names from the catalogue
    Emotions,
}

impl AnswerType {
    /// Short name used in validation messages
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerType::Number { .. } => "number",
            AnswerType::Text => "text",
            AnswerType::Boolean => "boolean",
            AnswerType::Emotions => "emotions",
        }
    }
}

// ============================================================================
// Questions and Templates
// ============================================================================

/// A single question within a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Stable snake_case key, unique within its template
    pub id: String,
    /// Prompt shown to the user; copied onto entries at capture time
    pub text: String,
    #[serde(flatten)]
    pub answer_type: AnswerType,
}

impl QuestionDefinition {
    pub fn new(id: &str, text: &str, answer_type: AnswerType) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            answer_type,
        }
    }

    /// Check a single definition for structural problems
    pub fn validate(&self) -> Result<(), String> {
        validate_question_id(&self.id)?;
        if self.text.trim().is_empty() {
            return Err(format!("Question '{}' has empty text", self.id));
        }
        if let AnswerType::Number { min, max } = self.answer_type {
            if min >= max {
                return Err(format!(
                    "Question '{}' has an invalid range: min {} must be less than max {}",
                    self.id, min, max
                ));
            }
        }
        Ok(())
    }
}

/// An ordered set of questions presented as a guided journaling flow
///
/// Built-in templates are identified by their string key; user templates
/// by UUID (the key field then holds the UUID's string form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionDefinition>,
}

impl QuestionTemplate {
    /// Look up a question by id
    pub fn question(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Validate a question set as used by a template (create/update path)
///
/// Checks each definition individually plus cross-question rules:
/// at least one question, ids unique within the set.
pub fn validate_question_set(questions: &[QuestionDefinition]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("A template needs at least one question".to_string());
    }
    for question in questions {
        question.validate()?;
    }
    for (i, question) in questions.iter().enumerate() {
        if questions[..i].iter().any(|other| other.id == question.id) {
            return Err(format!("Duplicate question id '{}'", question.id));
        }
    }
    Ok(())
}

// ============================================================================
// Well-Known Question Ids
// ============================================================================

/// Question ids with app-level meaning
///
/// Capture treats these like any other question; derived views (mood
/// extraction, dashboard cards) look them up by these names. Renaming one
/// here is a data migration, not a refactor.
pub mod well_known {
    /// Number 1..=10; the anchor of every mood point
    pub const FEELING_SCALE: &str = "feeling_scale";
    /// Free-text reason attached to the mood point
    pub const FEELING_REASON: &str = "feeling_reason";
    /// Emotion multi-select enriching the mood point
    pub const ADDITIONAL_EMOTIONS: &str = "additional_emotions";
    /// Boolean gate for the conditional exercise question
    pub const EXERCISE: &str = "exercise";
    /// Required only when `exercise` was answered Yes
    pub const EXERCISE_TYPE: &str = "exercise_type";
    /// Designated main-content question; feeds card previews and search
    pub const DAY_HIGHLIGHT: &str = "day_highlight";
}

// ============================================================================
// Emotion Catalogue
// ============================================================================

/// Grouping of catalogue emotions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Positive,
    Negative,
    Neutral,
}

pub const POSITIVE_EMOTIONS: &[&str] = &[
    "Happy", "Excited", "Grateful", "Calm", "Confident", "Hopeful", "Proud", "Loved",
];

pub const NEGATIVE_EMOTIONS: &[&str] = &[
    "Sad", "Anxious", "Angry", "Frustrated", "Lonely", "Overwhelmed", "Guilty", "Tired",
];

pub const NEUTRAL_EMOTIONS: &[&str] = &[
    "Reflective", "Curious", "Surprised", "Nostalgic", "Indifferent",
];

/// All selectable emotions grouped by category
pub fn emotion_catalogue() -> Vec<(EmotionCategory, &'static [&'static str])> {
    vec![
        (EmotionCategory::Positive, POSITIVE_EMOTIONS),
        (EmotionCategory::Negative, NEGATIVE_EMOTIONS),
        (EmotionCategory::Neutral, NEUTRAL_EMOTIONS),
    ]
}

/// Exact, case-sensitive membership check against the catalogue
pub fn is_catalogue_emotion(name: &str) -> bool {
    POSITIVE_EMOTIONS.contains(&name)
        || NEGATIVE_EMOTIONS.contains(&name)
        || NEUTRAL_EMOTIONS.contains(&name)
}

// ============================================================================
// Built-In Templates
// ============================================================================

/// Key of the default template offered to new users
pub const DEFAULT_TEMPLATE_KEY: &str = "daily_reflection";

/// The full daily reflection flow (the default)
pub fn daily_reflection_template() -> QuestionTemplate {
    QuestionTemplate {
        key: DEFAULT_TEMPLATE_KEY.to_string(),
        name: "Daily Reflection".to_string(),
        description: Some("A guided look back at your day".to_string()),
        questions: vec![
            QuestionDefinition::new(
                well_known::FEELING_SCALE,
                "On a scale of 1-10, how are you feeling today?",
                AnswerType::Number { min: 1, max: 10 },
            ),
            QuestionDefinition::new(
                well_known::FEELING_REASON,
                "What's the main reason you feel this way?",
                AnswerType::Text,
            ),
            QuestionDefinition::new(
                well_known::ADDITIONAL_EMOTIONS,
                "Which other emotions are present for you right now?",
                AnswerType::Emotions,
            ),
            QuestionDefinition::new(
                well_known::DAY_HIGHLIGHT,
                "What was the highlight of your day?",
                AnswerType::Text,
            ),
            QuestionDefinition::new(
                "gratitude",
                "What are you grateful for today?",
                AnswerType::Text,
            ),
            QuestionDefinition::new(
                well_known::EXERCISE,
                "Did you move your body today?",
                AnswerType::Boolean,
            ),
            QuestionDefinition::new(
                well_known::EXERCISE_TYPE,
                "What kind of movement was it?",
                AnswerType::Text,
            ),
        ],
    }
}

/// A shorter check-in variant for busy days
pub fn quick_checkin_template() -> QuestionTemplate {
    QuestionTemplate {
        key: "quick_checkin".to_string(),
        name: "Quick Check-in".to_string(),
        description: Some("Three questions, under a minute".to_string()),
        questions: vec![
            QuestionDefinition::new(
                well_known::FEELING_SCALE,
                "On a scale of 1-10, how are you feeling today?",
                AnswerType::Number { min: 1, max: 10 },
            ),
            QuestionDefinition::new(
                well_known::ADDITIONAL_EMOTIONS,
                "Which emotions are present for you right now?",
                AnswerType::Emotions,
            ),
            QuestionDefinition::new(
                well_known::DAY_HIGHLIGHT,
                "What stands out about today?",
                AnswerType::Text,
            ),
        ],
    }
}

/// All built-in templates, default first
pub fn builtin_templates() -> Vec<QuestionTemplate> {
    vec![daily_reflection_template(), quick_checkin_template()]
}

/// Resolve a built-in template by key
pub fn find_builtin_template(key: &str) -> Option<QuestionTemplate> {
    builtin_templates().into_iter().find(|t| t.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_answer_type_json_shape() {
        let number = AnswerType::Number { min: 1, max: 10 };
        let json = serde_json::to_value(&number).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["min"], 1);
        assert_eq!(json["max"], 10);

        let emotions = AnswerType::Emotions;
        let json = serde_json::to_value(&emotions).unwrap();
        assert_eq!(json["type"], "emotions");
    }

    #[test]
    fn test_question_definition_roundtrip() {
        let question = QuestionDefinition::new(
            "feeling_scale",
            "How are you?",
            AnswerType::Number { min: 1, max: 10 },
        );
        let json = serde_json::to_string(&question).unwrap();
        let back: QuestionDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(question, back);
    }

    #[test]
    fn test_question_validation_rejects_inverted_range() {
        let question =
            QuestionDefinition::new("scale", "Scale?", AnswerType::Number { min: 10, max: 1 });
        assert!(question.validate().is_err());

        let degenerate =
            QuestionDefinition::new("scale", "Scale?", AnswerType::Number { min: 5, max: 5 });
        assert!(degenerate.validate().is_err());
    }

    #[test]
    fn test_question_validation_rejects_empty_text() {
        let question = QuestionDefinition::new("scale", "   ", AnswerType::Text);
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_question_set_rejects_duplicates_and_empty() {
        assert!(validate_question_set(&[]).is_err());

        let questions = vec![
            QuestionDefinition::new("mood", "Mood?", AnswerType::Text),
            QuestionDefinition::new("mood", "Mood again?", AnswerType::Text),
        ];
        let err = validate_question_set(&questions).unwrap_err();
        assert!(err.contains("Duplicate"));
    }

    #[test]
    fn test_builtin_templates_are_valid() {
        for template in builtin_templates() {
            assert!(
                validate_question_set(&template.questions).is_ok(),
                "built-in template '{}' failed validation",
                template.key
            );
        }
    }

    #[test]
    fn test_default_template_has_mood_contract() {
        let template = daily_reflection_template();
        let feeling = template.question(well_known::FEELING_SCALE).unwrap();
        assert_eq!(
            feeling.answer_type,
            AnswerType::Number { min: 1, max: 10 }
        );
        assert!(template.question(well_known::ADDITIONAL_EMOTIONS).is_some());
        assert!(template.question(well_known::FEELING_REASON).is_some());
        assert!(template.question(well_known::EXERCISE).is_some());
        assert!(template.question(well_known::EXERCISE_TYPE).is_some());
    }

    #[test]
    fn test_find_builtin_template() {
        assert!(find_builtin_template(DEFAULT_TEMPLATE_KEY).is_some());
        assert!(find_builtin_template("quick_checkin").is_some());
        assert!(find_builtin_template("nope").is_none());
    }

    #[test]
    fn test_emotion_membership_is_case_sensitive() {
        assert!(is_catalogue_emotion("Happy"));
        assert!(is_catalogue_emotion("Anxious"));
        assert!(!is_catalogue_emotion("happy"));
        assert!(!is_catalogue_emotion("HAPPY"));
        assert!(!is_catalogue_emotion("Euphoric"));
        assert!(!is_catalogue_emotion(""));
    }

    #[test]
    fn test_catalogue_has_no_cross_category_duplicates() {
        let mut all: Vec<&str> = emotion_catalogue()
            .into_iter()
            .flat_map(|(_, names)| names.iter().copied())
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: catalogue membership only matches exact names
        #[test]
        fn prop_unknown_strings_not_in_catalogue(name in "[a-z]{1,12}") {
            // Catalogue names are capitalized, so all-lowercase never matches
            prop_assert!(!is_catalogue_emotion(&name));
        }

        /// Property: any valid min < max range passes question validation
        #[test]
        fn prop_valid_ranges_accepted(min in -100i32..100, span in 1i32..100) {
            let question = QuestionDefinition::new(
                "scale",
                "Scale?",
                AnswerType::Number { min, max: min + span },
            );
            prop_assert!(question.validate().is_ok());
        }
    }
}
