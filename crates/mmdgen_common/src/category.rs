//! Diagram category classification.
//!
//! Inspects raw Mermaid source and decides which diagram family it belongs
//! to by matching the signature line (first non-blank, non-comment line)
//! against an ordered table of anchored prefix patterns.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Mermaid comment marker. Lines starting with this are skipped when
/// locating the signature line.
const COMMENT_MARKER: &str = "%%";

/// Diagram category derived from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramCategory {
    Flow,
    Sequence,
    Class,
    State,
    EntityRelation,
    Gantt,
    Pie,
    Mindmap,
    Timeline,
    Quadrant,
    Requirement,
    Journey,
    C4,
    Unknown,
}

impl DiagramCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramCategory::Flow => "flow",
            DiagramCategory::Sequence => "sequence",
            DiagramCategory::Class => "class",
            DiagramCategory::State => "state",
            DiagramCategory::EntityRelation => "entity-relation",
            DiagramCategory::Gantt => "gantt",
            DiagramCategory::Pie => "pie",
            DiagramCategory::Mindmap => "mindmap",
            DiagramCategory::Timeline => "timeline",
            DiagramCategory::Quadrant => "quadrant",
            DiagramCategory::Requirement => "requirement",
            DiagramCategory::Journey => "journey",
            DiagramCategory::C4 => "c4",
            DiagramCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DiagramCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered (category, prefix patterns) table. Categories are tried top to
/// bottom; patterns are anchored and case-insensitive. The pattern set is
/// mutually exclusive by construction, so order only matters as a
/// tie-breaker for malformed input.
static CATEGORY_TABLE: Lazy<Vec<(DiagramCategory, Vec<Regex>)>> = Lazy::new(|| {
    let table: &[(DiagramCategory, &[&str])] = &[
        (
            DiagramCategory::Flow,
            &[
                r"(?i)^flowchart\s+(TB|TD|BT|RL|LR)",
                r"(?i)^graph\s+(TB|TD|BT|RL|LR)",
            ],
        ),
        (DiagramCategory::Sequence, &[r"(?i)^sequenceDiagram"]),
        (DiagramCategory::Class, &[r"(?i)^classDiagram"]),
        (DiagramCategory::State, &[r"(?i)^stateDiagram(-v2)?"]),
        (DiagramCategory::EntityRelation, &[r"(?i)^erDiagram"]),
        (DiagramCategory::Gantt, &[r"(?i)^gantt"]),
        (DiagramCategory::Pie, &[r"(?i)^pie"]),
        (DiagramCategory::Mindmap, &[r"(?i)^mindmap"]),
        (DiagramCategory::Timeline, &[r"(?i)^timeline"]),
        (DiagramCategory::Quadrant, &[r"(?i)^quadrantChart"]),
        (DiagramCategory::Requirement, &[r"(?i)^requirementDiagram"]),
        (DiagramCategory::Journey, &[r"(?i)^journey"]),
        (
            DiagramCategory::C4,
            &[r"(?i)^C4(Context|Container|Component|Deployment)"],
        ),
    ];

    table
        .iter()
        .map(|(category, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("category pattern is valid"))
                .collect();
            (*category, compiled)
        })
        .collect()
});

/// Locate the signature line: the first line that is neither blank nor a
/// `%%` comment.
fn signature_line(source: &str) -> Option<&str> {
    source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
}

/// Classify Mermaid source text into a diagram category.
///
/// Absence of a recognizable signature degrades to `Unknown` rather than
/// failing.
pub fn classify(source: &str) -> DiagramCategory {
    let Some(line) = signature_line(source) else {
        return DiagramCategory::Unknown;
    };

    for (category, patterns) in CATEGORY_TABLE.iter() {
        if patterns.iter().any(|p| p.is_match(line)) {
            return *category;
        }
    }

    DiagramCategory::Unknown
}
