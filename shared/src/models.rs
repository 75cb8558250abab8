//! Data models for the Daybook application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Free-text entry with no question flow
    Quick,
    /// Entry produced by answering a question template
    Guided,
}

impl EntryKind {
    /// Storage form used in the `journal_entries.entry_kind` column
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Quick => "quick",
            EntryKind::Guided => "guided",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(EntryKind::Quick),
            "guided" => Ok(EntryKind::Guided),
            _ => Err(format!("Unknown entry kind: {}", s)),
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User settings and preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: Uuid,
    /// IANA timezone name used by clients to render timestamps
    pub timezone: String,
    /// Preferred guided template (built-in key or user template id)
    pub default_template: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            user_id: Uuid::nil(),
            timezone: "UTC".to_string(),
            default_template: None,
            updated_at: Utc::now(),
        }
    }
}

/// User-defined label attached to entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Optional display color as `#rrggbb`
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_roundtrip() {
        for kind in [EntryKind::Quick, EntryKind::Guided] {
            let parsed: EntryKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("journal".parse::<EntryKind>().is_err());
    }

    #[test]
    fn test_entry_kind_serde_form() {
        assert_eq!(
            serde_json::to_string(&EntryKind::Guided).unwrap(),
            "\"guided\""
        );
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "casey@example.com".to_string(),
            password_hash: "argon2-hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2-hash"));
        assert!(!json.contains("password_hash"));
    }
}
