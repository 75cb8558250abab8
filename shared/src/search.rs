//! Search match highlighting
//!
//! Locates a query inside entry text and carves out the surrounding
//! context window for result snippets. Matching is case-insensitive but
//! the returned slices keep the original casing.

use serde::{Deserialize, Serialize};

/// Context characters kept on each side of a match
pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

/// A located match with its surrounding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub before: String,
    pub matched: String,
    pub after: String,
}

/// Find the first case-insensitive occurrence of `query` in `text`
///
/// Returns the matched slice in its original casing plus up to `window`
/// characters of context on each side, clipped at the text's boundaries.
/// `None` when the query is empty or absent. All indexing is by character,
/// so multi-byte text cannot split a code point.
pub fn find_match_context(text: &str, query: &str, window: usize) -> Option<MatchContext> {
    if query.is_empty() {
        return None;
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let needle: Vec<char> = query.chars().map(fold_char).collect();
    if chars.len() < needle.len() {
        return None;
    }

    // Byte offset of the i-th character (end of text past the last)
    let byte_at = |i: usize| chars.get(i).map(|&(b, _)| b).unwrap_or(text.len());

    for start in 0..=chars.len() - needle.len() {
        let candidate = chars[start..start + needle.len()]
            .iter()
            .map(|&(_, c)| fold_char(c));
        if !candidate.eq(needle.iter().copied()) {
            continue;
        }

        let match_end = start + needle.len();
        let before_start = start.saturating_sub(window);
        let after_end = (match_end + window).min(chars.len());

        return Some(MatchContext {
            before: text[byte_at(before_start)..byte_at(start)].to_string(),
            matched: text[byte_at(start)..byte_at(match_end)].to_string(),
            after: text[byte_at(match_end)..byte_at(after_end)].to_string(),
        });
    }

    None
}

// Simple one-to-one case folding; enough for search, avoids the index
// drift that full lowercase mappings (like ß -> ss) would introduce.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_window_clipping_both_sides() {
        let ctx = find_match_context("abcdefghij", "e", 2).unwrap();
        assert_eq!(ctx.before, "cd");
        assert_eq!(ctx.matched, "e");
        assert_eq!(ctx.after, "fg");
    }

    #[test]
    fn test_match_at_text_edges() {
        let ctx = find_match_context("abcdefghij", "a", 3).unwrap();
        assert_eq!(ctx.before, "");
        assert_eq!(ctx.matched, "a");
        assert_eq!(ctx.after, "bcd");

        let ctx = find_match_context("abcdefghij", "j", 3).unwrap();
        assert_eq!(ctx.before, "ghi");
        assert_eq!(ctx.matched, "j");
        assert_eq!(ctx.after, "");
    }

    #[test]
    fn test_case_insensitive_preserves_original_casing() {
        let ctx = find_match_context("Met Sarah for Coffee downtown", "coffee", 4).unwrap();
        assert_eq!(ctx.matched, "Coffee");
        assert_eq!(ctx.before, "for ");
        assert_eq!(ctx.after, " dow");

        let ctx = find_match_context("an ALL CAPS DAY", "all caps", 50).unwrap();
        assert_eq!(ctx.matched, "ALL CAPS");
    }

    #[test]
    fn test_absent_and_empty_queries() {
        assert!(find_match_context("abcdefghij", "xyz", 2).is_none());
        assert!(find_match_context("abcdefghij", "", 2).is_none());
        assert!(find_match_context("", "a", 2).is_none());
        assert!(find_match_context("ab", "abc", 2).is_none());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let ctx = find_match_context("echo echo echo", "echo", 2).unwrap();
        assert_eq!(ctx.before, "");
        assert_eq!(ctx.after, " e");
    }

    #[test]
    fn test_zero_window() {
        let ctx = find_match_context("abcdefghij", "e", 0).unwrap();
        assert_eq!(ctx.before, "");
        assert_eq!(ctx.matched, "e");
        assert_eq!(ctx.after, "");
    }

    #[test]
    fn test_multibyte_text() {
        let ctx = find_match_context("café au lait ☕ tarde", "LAIT", 3).unwrap();
        assert_eq!(ctx.matched, "lait");
        assert_eq!(ctx.before, "au ");
        assert_eq!(ctx.after, " ☕ ");

        let ctx = find_match_context("día de paseo", "Í", 2).unwrap();
        assert_eq!(ctx.matched, "í");
        assert_eq!(ctx.before, "d");
        assert_eq!(ctx.after, "a ");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: a window never yields more context than requested and
        /// the matched slice equals the query case-insensitively
        #[test]
        fn prop_context_bounded(
            prefix in "[a-z ]{0,60}",
            suffix in "[a-z ]{0,60}",
            window in 0usize..30,
        ) {
            let text = format!("{}NEEDLE{}", prefix, suffix);
            let ctx = find_match_context(&text, "needle", window).unwrap();

            prop_assert_eq!(ctx.matched.to_lowercase(), "needle");
            prop_assert!(ctx.before.chars().count() <= window);
            prop_assert!(ctx.after.chars().count() <= window);

            // The three slices reassemble into a substring of the original
            let joined = format!("{}{}{}", ctx.before, ctx.matched, ctx.after);
            prop_assert!(text.contains(&joined));
        }

        /// Property: searching for a slice of the text always finds it
        #[test]
        fn prop_present_substring_found(text in "[a-zA-Z ]{1,80}", start in 0usize..40, len in 1usize..12) {
            let chars: Vec<char> = text.chars().collect();
            let start = start % chars.len();
            let len = len.min(chars.len() - start);
            let query: String = chars[start..start + len].iter().collect();

            if !query.trim().is_empty() {
                prop_assert!(find_match_context(&text, &query, 10).is_some());
            }
        }
    }
}
