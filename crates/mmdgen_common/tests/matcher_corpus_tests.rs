//! Matcher corpus: real-shaped mmdc errors against the shipped catalog.
//!
//! Each case pins the expected best match so scoring changes that reorder
//! results are caught immediately.

use mmdgen_common::category::DiagramCategory;
use mmdgen_common::matcher::FailureMatcher;
use mmdgen_common::troubleshooting::Troubleshooting;
use std::path::PathBuf;

fn load_catalog() -> Troubleshooting {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../references/troubleshooting.md");
    let kb = Troubleshooting::load(&path);
    assert!(!kb.is_empty());
    kb
}

struct Case {
    error: &'static str,
    category: DiagramCategory,
    expected_top: u32,
}

#[test]
fn corpus_best_match_per_error() {
    let kb = load_catalog();
    let matcher = FailureMatcher::new(kb.entries());

    let cases = [
        Case {
            error: "Parse error on line 2: Expecting 'SPACE', 'GRAPH', got 'end'",
            category: DiagramCategory::Flow,
            expected_top: 1,
        },
        Case {
            error: "UnknownDiagramError: No diagram type detected matching given configuration",
            category: DiagramCategory::Unknown,
            expected_top: 2,
        },
        Case {
            error: "Parse error on line 4: Expecting 'SQE', got 'PS'",
            category: DiagramCategory::Flow,
            expected_top: 3,
        },
        Case {
            error: "Parse error on line 9: Expecting 'end', got 'EOF'",
            category: DiagramCategory::Flow,
            expected_top: 4,
        },
        Case {
            error: "Expecting 'LINK', got 'MINUS'",
            category: DiagramCategory::Flow,
            expected_top: 5,
        },
        Case {
            error: "Error: Trying to inactivate an inactive participant (B)",
            category: DiagramCategory::Sequence,
            expected_top: 6,
        },
        Case {
            error: "Invalid date: task Kickoff",
            category: DiagramCategory::Gantt,
            expected_top: 7,
        },
        Case {
            error: "Parse error: Expecting 'NUMBER', got 'PERCENT'",
            category: DiagramCategory::Pie,
            expected_top: 8,
        },
    ];

    for case in &cases {
        let ranked = matcher.rank(case.error, case.category);
        assert!(
            !ranked.is_empty(),
            "no match for error {:?}",
            case.error
        );
        assert_eq!(
            ranked[0].entry.id, case.expected_top,
            "wrong best match for error {:?}: got entry {} ({})",
            case.error, ranked[0].entry.id, ranked[0].entry.title
        );
        assert!(
            !FailureMatcher::needs_search_fallback(&ranked),
            "matched error {:?} should not fall back to search",
            case.error
        );
    }
}

#[test]
fn generic_parse_error_hits_several_entries_but_caps_at_five() {
    let kb = load_catalog();
    let matcher = FailureMatcher::new(kb.entries());

    let ranked = matcher.rank("Parse error on line 1", DiagramCategory::Flow);
    assert!(ranked.len() > 1);
    assert!(ranked.len() <= 5);
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn timeout_failure_matches_nothing_and_recommends_search() {
    let kb = load_catalog();
    let matcher = FailureMatcher::new(kb.entries());

    // Timeouts are reported distinctly from syntax failures; no entry's
    // known error text matches them verbatim, so only weak category and
    // title points can accrue.
    let error = "Rendering timed out after 60 seconds";
    let ranked = matcher.rank(error, DiagramCategory::Flow);
    assert!(ranked.is_empty() || ranked[0].score < 10);

    let query = matcher.search_query(error, DiagramCategory::Flow);
    assert!(query.contains("mermaid flow diagram syntax error:"));
    assert!(query.contains("Rendering timed out"));
}

#[test]
fn exact_substring_entry_outranks_every_word_level_match() {
    let kb = load_catalog();
    let matcher = FailureMatcher::new(kb.entries());

    // Only entry 7 carries "Invalid date" verbatim; everything else can at
    // best collect word-level and keyword points.
    let ranked = matcher.rank("Invalid date encountered", DiagramCategory::Gantt);
    assert_eq!(ranked[0].entry.id, 7);
    for other in ranked.iter().skip(1) {
        assert!(ranked[0].score >= other.score);
    }
}
