//! Entry search service
//!
//! Case-insensitive substring search over quick-entry content and guided
//! answers, with a highlight context window around the first match.

use std::collections::HashSet;

use crate::error::ApiError;
use crate::repositories::EntryRepository;
use daybook_shared::search::{find_match_context, DEFAULT_CONTEXT_WINDOW};
use daybook_shared::types::{SearchQuery, SearchResponse, SearchResultItem};
use daybook_shared::validation::validate_search_query;
use sqlx::PgPool;
use uuid::Uuid;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 50;

/// Entry search service
pub struct SearchService;

impl SearchService {
    /// Search the user's entries for a substring
    ///
    /// Results carry one hit per entry, newest first. For guided entries
    /// the hit is the first matching answer in stored question order.
    pub async fn search(
        pool: &PgPool,
        user_id: Uuid,
        query: SearchQuery,
    ) -> Result<SearchResponse, ApiError> {
        validate_search_query(&query.q).map_err(ApiError::Validation)?;
        let needle = query.q.trim().to_string();
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let pattern = format!("%{}%", escape_like(&needle));

        let (content_hits, response_hits) = tokio::join!(
            EntryRepository::search_content(pool, user_id, &pattern, limit),
            EntryRepository::search_responses(pool, user_id, &pattern, limit),
        );
        let content_hits = content_hits.map_err(ApiError::Internal)?;
        let response_hits = response_hits.map_err(ApiError::Internal)?;

        let mut results: Vec<SearchResultItem> = Vec::new();
        let mut seen: HashSet<Uuid> = HashSet::new();

        for entry in &content_hits {
            let Some(content) = entry.content.as_deref() else {
                continue;
            };
            let Some(context) = find_match_context(content, &needle, DEFAULT_CONTEXT_WINDOW)
            else {
                continue;
            };
            seen.insert(entry.id);
            results.push(SearchResultItem {
                entry_id: entry.id.to_string(),
                entry_kind: entry.entry_kind.clone(),
                created_at: entry.created_at,
                question_id: None,
                question_text: None,
                context,
            });
        }

        // A content match wins over a response match for the same entry
        for hit in &response_hits {
            if seen.contains(&hit.entry_id) {
                continue;
            }
            let Some(context) = find_match_context(&hit.answer, &needle, DEFAULT_CONTEXT_WINDOW)
            else {
                continue;
            };
            results.push(SearchResultItem {
                entry_id: hit.entry_id.to_string(),
                entry_kind: hit.entry_kind.clone(),
                created_at: hit.created_at,
                question_id: Some(hit.question_id.clone()),
                question_text: Some(hit.question_text.clone()),
                context,
            });
        }

        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        results.truncate(limit as usize);

        Ok(SearchResponse {
            query: needle,
            results,
        })
    }
}

/// Escape ILIKE metacharacters so the needle matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("coffee"), "coffee");
        assert_eq!(escape_like("walk by the river"), "walk by the river");
    }

    #[test]
    fn test_escape_like_quotes_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
