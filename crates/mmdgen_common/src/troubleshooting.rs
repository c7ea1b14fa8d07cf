//! Troubleshooting knowledge base.
//!
//! Parses the curated troubleshooting catalog (markdown with a fixed
//! section grammar) into structured failure-pattern entries at load time.
//! The catalog is read once and held immutable for the process lifetime.
//!
//! Malformed documents degrade gracefully: sections without a recognizable
//! header are dropped, every other field is extracted independently and
//! defaults to empty when missing. A missing catalog file is not an error;
//! matching simply degrades to "no matches".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment override for the catalog location.
pub const CATALOG_ENV_VAR: &str = "MMDGEN_TROUBLESHOOTING";

/// Default catalog path relative to the working directory.
pub const CATALOG_RELATIVE_PATH: &str = "references/troubleshooting.md";

// ============================================================================
// Severity
// ============================================================================

/// Severity tag of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    /// The catalog omitted or mangled the severity line.
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }

    /// Parse the severity word from the catalog, tolerating any casing.
    pub fn from_catalog_word(word: &str) -> Self {
        match word.to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

// ============================================================================
// Failure pattern entry
// ============================================================================

/// One curated entry in the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePatternEntry {
    /// Unique ordinal (the source-document section number).
    pub id: u32,

    /// Short human label.
    pub title: String,

    /// Severity tag.
    pub severity: Severity,

    /// Diagram-category names this entry applies to, lower-cased free text.
    /// May contain the wildcard "all" (e.g. "all diagrams").
    pub applicable_categories: Vec<String>,

    /// Free text explaining the defect class.
    pub problem: String,

    /// Verbatim Mermaid snippet illustrating the bug (may be empty).
    pub incorrect_example: String,

    /// Verbatim Mermaid snippet illustrating the fix (may be empty).
    pub correct_example: String,

    /// Literal substrings known to appear in the renderer's error output
    /// when this defect occurs.
    pub known_error_substrings: Vec<String>,
}

// ============================================================================
// Catalog grammar
// ============================================================================

/// Section header: `### ❌ Error <N>: <Title>`.
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^### ❌ Error (\d+): (.+)$").expect("valid regex"));

/// Severity line: `**Severity:** <emoji> <Word>`.
static SEVERITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Severity:\*\*\s*(?:🔴|🟠|🟡|🟢)?\s*(\w+)").expect("valid regex")
});

/// Problem statement up to the next labeled field or blank-line paragraph.
static PROBLEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\*\*Problem:\*\*\s*(.+?)(?:\n\n|\*\*)").expect("valid regex")
});

/// Applicability line: `**Diagram Types Affected:** <comma-separated>`.
static TYPES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Diagram Types Affected:\*\*\s*(.+)").expect("valid regex"));

/// Incorrect/correct example blocks, fenced as mermaid source.
static CODE_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\*\*(Incorrect|Correct)(?:\s+Solutions?)?:\*\*\s*```mermaid\s*\n(.*?)```")
        .expect("valid regex")
});

/// Bullet list of known error messages under `**Error Messages:**`.
static ERROR_LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Error Messages?:\*\*\s*\n((?:- `.+`\n?)+)").expect("valid regex")
});

/// A single inline-code span.
static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

/// Single inline form: `**Error Message:** <text>`.
static INLINE_MSG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Error Message:\*\*\s*`?(.+?)`?\n").expect("valid regex"));

// ============================================================================
// Knowledge base
// ============================================================================

/// Parsed troubleshooting catalog. Built once, immutable thereafter.
#[derive(Debug, Clone, Default)]
pub struct Troubleshooting {
    path: Option<PathBuf>,
    entries: Vec<FailurePatternEntry>,
}

impl Troubleshooting {
    /// Load the catalog from a file. A missing or unreadable file yields an
    /// empty knowledge base.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let entries = Self::parse(&content);
                debug!(
                    "loaded {} troubleshooting entries from {}",
                    entries.len(),
                    path.display()
                );
                Self {
                    path: Some(path.to_path_buf()),
                    entries,
                }
            }
            Err(err) => {
                debug!("troubleshooting catalog unavailable at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Load the catalog from the discovery chain, if any candidate exists.
    pub fn discover() -> Self {
        match discover_catalog() {
            Some(path) => Self::load(&path),
            None => Self::default(),
        }
    }

    /// Parse catalog text into entries.
    ///
    /// Sections are delimited by `### ❌ Error N:` headers; a section whose
    /// header does not parse is dropped whole. Every other field extractor
    /// is total and independent.
    pub fn parse(content: &str) -> Vec<FailurePatternEntry> {
        let starts: Vec<usize> = HEADER_RE.find_iter(content).map(|m| m.start()).collect();

        let mut entries = Vec::new();
        let mut seen_ids = HashSet::new();

        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(content.len());
            let section = &content[start..end];

            let Some(entry) = parse_section(section) else {
                continue;
            };

            // The id is the catalog's primary key; a duplicate section is a
            // catalog defect and the later one loses.
            if !seen_ids.insert(entry.id) {
                debug!("dropping duplicate troubleshooting entry {}", entry.id);
                continue;
            }

            entries.push(entry);
        }

        entries
    }

    pub fn entries(&self) -> &[FailurePatternEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Parse one catalog section. Returns `None` when the mandatory header
/// (number + title) is missing.
fn parse_section(section: &str) -> Option<FailurePatternEntry> {
    let header = HEADER_RE.captures(section)?;
    let id: u32 = header[1].parse().ok()?;
    let title = header[2].trim().to_string();

    let severity = SEVERITY_RE
        .captures(section)
        .map(|c| Severity::from_catalog_word(&c[1]))
        .unwrap_or(Severity::Unknown);

    let problem = PROBLEM_RE
        .captures(section)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let applicable_categories = TYPES_RE
        .captures(section)
        .map(|c| {
            c[1].split(',')
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let mut incorrect_example = String::new();
    let mut correct_example = String::new();
    for block in CODE_BLOCK_RE.captures_iter(section) {
        let code = block[2].trim().to_string();
        match &block[1] {
            "Incorrect" if incorrect_example.is_empty() => incorrect_example = code,
            "Correct" if correct_example.is_empty() => correct_example = code,
            _ => {}
        }
    }

    let mut known_error_substrings: Vec<String> = Vec::new();
    if let Some(list) = ERROR_LIST_RE.captures(section) {
        for line in list[1].lines() {
            if let Some(code) = INLINE_CODE_RE.captures(line) {
                known_error_substrings.push(code[1].to_string());
            }
        }
    }
    if known_error_substrings.is_empty() {
        if let Some(inline) = INLINE_MSG_RE.captures(section) {
            known_error_substrings.push(inline[1].trim_matches('`').trim().to_string());
        }
    }

    Some(FailurePatternEntry {
        id,
        title,
        severity,
        applicable_categories,
        problem,
        incorrect_example,
        correct_example,
        known_error_substrings,
    })
}

/// Catalog discovery chain.
///
/// Priority:
/// 1. `MMDGEN_TROUBLESHOOTING` environment variable
/// 2. `references/troubleshooting.md` relative to the working directory
/// 3. `<user data dir>/mmdgen/troubleshooting.md`
pub fn discover_catalog() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CATALOG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let relative = PathBuf::from(CATALOG_RELATIVE_PATH);
    if relative.exists() {
        return Some(relative);
    }

    if let Some(data_dir) = dirs::data_dir() {
        let shared = data_dir.join("mmdgen").join("troubleshooting.md");
        if shared.exists() {
            return Some(shared);
        }
    }

    None
}
