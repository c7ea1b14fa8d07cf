//! Generation outcome record.
//!
//! The terminal record for one generation attempt, surfaced to the caller
//! as the machine-readable report. Constructed once, immutable after.

use crate::category::DiagramCategory;
use crate::matcher::ScoredMatch;
use crate::troubleshooting::{FailurePatternEntry, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report view of one ranked troubleshooting match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub error_number: u32,
    pub title: String,
    pub severity: Severity,
    pub diagram_types: Vec<String>,
    pub problem: String,
    pub correct_example: String,
}

impl MatchSummary {
    pub fn from_entry(entry: &FailurePatternEntry) -> Self {
        Self {
            error_number: entry.id,
            title: entry.title.clone(),
            severity: entry.severity,
            diagram_types: entry.applicable_categories.clone(),
            problem: entry.problem.clone(),
            correct_example: entry.correct_example.clone(),
        }
    }
}

/// Result of one diagram generation attempt.
///
/// Optional fields serialize as `null` so the report shape is stable for
/// machine consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub success: bool,

    /// Saved diagram source.
    pub mmd_path: PathBuf,

    /// Rendered artifact, present only on success.
    pub image_path: Option<PathBuf>,

    /// Classified diagram category.
    pub category: DiagramCategory,

    /// Raw renderer error text, present only on failure.
    pub error_message: Option<String>,

    /// Ranked troubleshooting matches, best first (at most 5).
    pub troubleshooting_matches: Vec<MatchSummary>,

    /// Correct example from the best match, when it has one.
    pub suggested_fix: Option<String>,

    /// Fallback query for external search tools, when no match is
    /// trustworthy.
    pub search_query: Option<String>,
}

impl GenerationOutcome {
    /// Outcome for a successful render: no error fields, no matches.
    pub fn succeeded(mmd_path: PathBuf, image_path: PathBuf, category: DiagramCategory) -> Self {
        Self {
            success: true,
            mmd_path,
            image_path: Some(image_path),
            category,
            error_message: None,
            troubleshooting_matches: Vec::new(),
            suggested_fix: None,
            search_query: None,
        }
    }

    /// Outcome for a failed render, carrying whatever recovery guidance
    /// could be derived.
    pub fn failed(
        mmd_path: PathBuf,
        category: DiagramCategory,
        error_message: String,
        matches: &[ScoredMatch<'_>],
        suggested_fix: Option<String>,
        search_query: Option<String>,
    ) -> Self {
        Self {
            success: false,
            mmd_path,
            image_path: None,
            category,
            error_message: Some(error_message),
            troubleshooting_matches: matches
                .iter()
                .map(|m| MatchSummary::from_entry(m.entry))
                .collect(),
            suggested_fix,
            search_query,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
