//! Artifact naming convention.
//!
//! Generated artifacts share a deterministic base name:
//! `{document}_{ordinal:02}_{category}_{title}` with `.mmd` for the source
//! and the image extension for the rendered file. The convention is part of
//! the external interface and must stay bit-for-bit stable.

use crate::category::DiagramCategory;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sanitized titles are truncated to keep filenames reasonable. Distinct
/// titles differing only beyond this length collide by design.
pub const TITLE_MAX_CHARS: usize = 20;

static NON_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_-]").expect("valid regex"));
static NON_TITLE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").expect("valid regex"));
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").expect("valid regex"));

/// Sanitize the source document name: lowercase, non-name characters
/// replaced by `_`, runs collapsed, edges trimmed.
pub fn sanitize_document_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let replaced = NON_NAME_CHARS.replace_all(&lowered, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Sanitize the diagram title: lowercase, every non-alphanumeric replaced
/// by `_`, runs collapsed, then truncated to [`TITLE_MAX_CHARS`].
pub fn sanitize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let replaced = NON_TITLE_CHARS.replace_all(&lowered, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');
    let truncated: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    truncated.trim_end_matches('_').to_string()
}

/// Base filename (no extension) for one generated diagram.
pub fn base_filename(
    document_name: &str,
    ordinal: u32,
    category: DiagramCategory,
    title: &str,
) -> String {
    format!(
        "{}_{:02}_{}_{}",
        sanitize_document_name(document_name),
        ordinal,
        category.as_str(),
        sanitize_title(title)
    )
}
