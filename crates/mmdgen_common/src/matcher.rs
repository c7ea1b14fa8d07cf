//! Failure matcher.
//!
//! Scores every knowledge-base entry against a renderer error message and
//! the classified diagram category, returns the top-ranked subset, and
//! synthesizes a fallback search query when no entry is trustworthy.
//!
//! Scoring is additive over heterogeneous textual signals; the weights are
//! fixed and the computation is pure over the pre-parsed catalog.

use crate::category::DiagramCategory;
use crate::troubleshooting::FailurePatternEntry;
use std::collections::HashSet;
use tracing::debug;

// ============================================================================
// Score weights
// ============================================================================

/// A known error string found verbatim (case-insensitive) in the message.
pub const SCORE_EXACT_ERROR: u32 = 10;

/// Fallback when the verbatim match fails but a word of the known error
/// string appears as a token of the message.
pub const SCORE_ERROR_WORD: u32 = 3;

/// Entry applies to all diagram categories.
pub const SCORE_WILDCARD_CATEGORY: u32 = 2;

/// Entry's applicability list names the current category.
pub const SCORE_CATEGORY: u32 = 5;

/// Diagnostic keyword shared by the message and the problem description.
pub const SCORE_PROBLEM_KEYWORD: u32 = 2;

/// Title word found in the message.
pub const SCORE_TITLE_WORD: u32 = 2;

/// Maximum number of ranked matches returned per lookup.
pub const MAX_MATCHES: usize = 5;

/// Diagnostic keywords checked against both the error message and the
/// entry's problem description.
const DIAGNOSTIC_KEYWORDS: &[&str] = &["reserved", "missing", "invalid", "incorrect", "error", "syntax"];

/// How much raw error text feeds the fallback search query.
const SEARCH_ERROR_CHAR_LIMIT: usize = 150;

// ============================================================================
// Match result
// ============================================================================

/// One ranked match from a failure lookup.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMatch<'a> {
    pub score: u32,
    pub entry: &'a FailurePatternEntry,
}

// ============================================================================
// Matcher
// ============================================================================

/// Ranks knowledge-base entries against renderer failures.
///
/// Holds a borrowed view of the parsed catalog; safe to reuse across
/// sequential lookups.
pub struct FailureMatcher<'a> {
    entries: &'a [FailurePatternEntry],
}

impl<'a> FailureMatcher<'a> {
    pub fn new(entries: &'a [FailurePatternEntry]) -> Self {
        Self { entries }
    }

    /// Rank catalog entries against an error message, best first.
    ///
    /// Entries scoring 0 are excluded; ties keep catalog order; at most
    /// [`MAX_MATCHES`] entries are returned.
    pub fn rank(&self, error_message: &str, category: DiagramCategory) -> Vec<ScoredMatch<'a>> {
        let error_lower = error_message.to_lowercase();
        let error_tokens: HashSet<String> = tokenize(&error_lower).into_iter().collect();
        let category_name = category.as_str();

        let mut matches: Vec<ScoredMatch<'a>> = Vec::new();

        for entry in self.entries {
            let mut score = 0;

            for known_error in &entry.known_error_substrings {
                let known_lower = known_error.to_lowercase();
                if error_lower.contains(&known_lower) {
                    score += SCORE_EXACT_ERROR;
                } else if tokenize(&known_lower)
                    .iter()
                    .any(|word| error_tokens.contains(word))
                {
                    score += SCORE_ERROR_WORD;
                }
            }

            // Wildcard and named-category bonuses are exclusive; the
            // wildcard is checked first.
            if entry
                .applicable_categories
                .iter()
                .any(|t| tokenize(t).iter().any(|w| w == "all"))
            {
                score += SCORE_WILDCARD_CATEGORY;
            } else if entry
                .applicable_categories
                .iter()
                .any(|t| t.contains(category_name))
            {
                score += SCORE_CATEGORY;
            }

            let problem_words: HashSet<String> =
                tokenize(&entry.problem.to_lowercase()).into_iter().collect();
            for keyword in DIAGNOSTIC_KEYWORDS {
                if error_lower.contains(keyword) && problem_words.contains(*keyword) {
                    score += SCORE_PROBLEM_KEYWORD;
                }
            }

            for word in tokenize(&entry.title.to_lowercase()) {
                if error_lower.contains(&word) {
                    score += SCORE_TITLE_WORD;
                }
            }

            if score > 0 {
                debug!("entry {} ({}) scored {}", entry.id, entry.title, score);
                matches.push(ScoredMatch { score, entry });
            }
        }

        // Stable sort: equal scores keep catalog insertion order.
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(MAX_MATCHES);
        matches
    }

    /// Whether the ranked result warrants a fallback search query: no match
    /// at all, or (defensively) a top match carrying the id-0 sentinel.
    pub fn needs_search_fallback(matches: &[ScoredMatch<'_>]) -> bool {
        match matches.first() {
            None => true,
            Some(best) => best.entry.id == 0,
        }
    }

    /// Synthesize a search query for external tools from the raw error
    /// message and the diagram category.
    pub fn search_query(&self, error_message: &str, category: DiagramCategory) -> String {
        // Collapse whitespace runs, bound the length, then drop everything
        // outside the approved character set.
        let collapsed = error_message.split_whitespace().collect::<Vec<_>>().join(" ");
        let bounded: String = collapsed.chars().take(SEARCH_ERROR_CHAR_LIMIT).collect();
        let cleaned: String = bounded
            .chars()
            .filter(|c| {
                c.is_alphanumeric() || *c == '_' || c.is_whitespace() || matches!(c, ':' | '.' | '-')
            })
            .collect();

        format!(
            "mermaid {} diagram syntax error: {}",
            category.as_str(),
            cleaned.trim()
        )
    }
}

/// Split text into lowercase tokens, trimming non-alphanumeric edges.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::troubleshooting::Severity;

    fn entry(id: u32, title: &str, categories: &[&str], errors: &[&str]) -> FailurePatternEntry {
        FailurePatternEntry {
            id,
            title: title.to_string(),
            severity: Severity::Medium,
            applicable_categories: categories.iter().map(|c| c.to_string()).collect(),
            problem: String::new(),
            incorrect_example: String::new(),
            correct_example: String::new(),
            known_error_substrings: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_exact_substring_plus_wildcard() {
        // Exact substring (+10) and wildcard applicability (+2).
        let entries = vec![entry(7, "Generic Failure", &["all"], &["Parse error"])];
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("Parse error on line 3", DiagramCategory::Flow);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, SCORE_EXACT_ERROR + SCORE_WILDCARD_CATEGORY);
        assert_eq!(ranked[0].entry.id, 7);
    }

    #[test]
    fn test_exact_match_outranks_word_fallback() {
        let entries = vec![
            entry(1, "Word Overlap", &[], &["error while walking"]),
            entry(2, "Verbatim Hit", &[], &["Parse error on line"]),
        ];
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("Parse error on line 12", DiagramCategory::Unknown);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].entry.id, 2);
        assert_eq!(ranked[0].score, SCORE_EXACT_ERROR);
        // "error" appears as a token of the message, so the weaker word
        // fallback fires for the other entry.
        assert_eq!(ranked[1].entry.id, 1);
        assert_eq!(ranked[1].score, SCORE_ERROR_WORD);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let entries = vec![entry(1, "Case", &[], &["PARSE ERROR"])];
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("parse error near token", DiagramCategory::Unknown);
        assert_eq!(ranked[0].score, SCORE_EXACT_ERROR);
    }

    #[test]
    fn test_category_bonus_is_exclusive_with_wildcard() {
        // "all diagrams" wins the wildcard branch even though "flowcharts"
        // also names the category.
        let wildcard = vec![entry(1, "W", &["all diagrams", "flowcharts"], &[])];
        let matcher = FailureMatcher::new(&wildcard);
        let ranked = matcher.rank("anything", DiagramCategory::Flow);
        assert_eq!(ranked[0].score, SCORE_WILDCARD_CATEGORY);

        // Without the wildcard, the named-category bonus applies, matched
        // as a substring of the applicability text.
        let named = vec![entry(2, "N", &["flowcharts", "state diagrams"], &[])];
        let matcher = FailureMatcher::new(&named);
        let ranked = matcher.rank("anything", DiagramCategory::Flow);
        assert_eq!(ranked[0].score, SCORE_CATEGORY);
    }

    #[test]
    fn test_problem_keyword_bonus() {
        let mut e = entry(1, "K", &[], &[]);
        e.problem = "A reserved keyword was used where syntax forbids it.".to_string();
        let entries = vec![e];
        let matcher = FailureMatcher::new(&entries);

        // "reserved" and "syntax" appear in both message and problem text.
        let ranked = matcher.rank("syntax error: reserved word", DiagramCategory::Unknown);
        assert_eq!(ranked[0].score, 2 * SCORE_PROBLEM_KEYWORD);
    }

    #[test]
    fn test_title_word_bonus() {
        let entries = vec![entry(1, "Subgraph Nesting", &[], &[])];
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("invalid subgraph near nesting level 2", DiagramCategory::Unknown);
        assert_eq!(ranked[0].score, 2 * SCORE_TITLE_WORD);
    }

    #[test]
    fn test_zero_score_entries_are_excluded() {
        let entries = vec![entry(1, "Unrelated", &[], &["something else entirely"])];
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("completely different text", DiagramCategory::Unknown);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_caps_at_five_and_sorts_descending() {
        let entries: Vec<FailurePatternEntry> = (1..=8)
            .map(|i| {
                let mut e = entry(i, "E", &[], &["Parse error"]);
                // Give later entries an extra category bonus so the order
                // is observable.
                if i > 4 {
                    e.applicable_categories = vec!["flowcharts".to_string()];
                }
                e
            })
            .collect();
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("Parse error", DiagramCategory::Flow);
        assert_eq!(ranked.len(), MAX_MATCHES);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // The +5 category entries (5..=8) outrank the plain ones.
        assert_eq!(ranked[0].entry.id, 5);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let entries = vec![
            entry(3, "", &["all"], &[]),
            entry(1, "", &["all"], &[]),
            entry(2, "", &["all"], &[]),
        ];
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("unrelated text", DiagramCategory::Unknown);
        let ids: Vec<u32> = ranked.iter().map(|m| m.entry.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_empty_catalog_needs_fallback() {
        let entries: Vec<FailurePatternEntry> = Vec::new();
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("Parse error on line 3", DiagramCategory::Flow);
        assert!(ranked.is_empty());
        assert!(FailureMatcher::needs_search_fallback(&ranked));

        let query = matcher.search_query("Parse error on line 3", DiagramCategory::Flow);
        assert!(!query.is_empty());
        assert!(query.contains("flow"));
    }

    #[test]
    fn test_id_zero_sentinel_triggers_fallback() {
        let entries = vec![entry(0, "Sentinel", &["all"], &[])];
        let matcher = FailureMatcher::new(&entries);

        let ranked = matcher.rank("whatever", DiagramCategory::Unknown);
        assert!(!ranked.is_empty());
        assert!(FailureMatcher::needs_search_fallback(&ranked));
    }

    #[test]
    fn test_search_query_cleanup() {
        let entries: Vec<FailurePatternEntry> = Vec::new();
        let matcher = FailureMatcher::new(&entries);

        let noisy = "Parse   error!\n\ton line 3:\tunexpected `token` (code=42)";
        let query = matcher.search_query(noisy, DiagramCategory::Sequence);

        assert!(query.starts_with("mermaid sequence diagram syntax error: "));
        // Whitespace runs collapse; forbidden characters are stripped.
        assert!(query.contains("Parse error on line 3: unexpected token"));
        assert!(!query.contains('!'));
        assert!(!query.contains('`'));
        assert!(!query.contains('('));
    }

    #[test]
    fn test_search_query_bounds_error_text() {
        let entries: Vec<FailurePatternEntry> = Vec::new();
        let matcher = FailureMatcher::new(&entries);

        let long = "x".repeat(500);
        let query = matcher.search_query(&long, DiagramCategory::Flow);
        let tail = query.split(": ").nth(1).unwrap();
        assert!(tail.len() <= 150);
    }
}
