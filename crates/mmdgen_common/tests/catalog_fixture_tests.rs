//! Parse the shipped troubleshooting catalog and pin down its shape.
//!
//! The catalog under references/ is both user-facing documentation and the
//! knowledge base; these tests keep the two in sync with the parser.

use mmdgen_common::troubleshooting::{Severity, Troubleshooting};
use std::collections::HashSet;
use std::path::PathBuf;

fn catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../references/troubleshooting.md")
}

#[test]
fn shipped_catalog_parses_completely() {
    let kb = Troubleshooting::load(&catalog_path());
    assert_eq!(kb.entries().len(), 8, "every catalog section must parse");

    let ids: HashSet<u32> = kb.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 8, "entry ids must be unique");

    for entry in kb.entries() {
        assert!(!entry.title.is_empty());
        assert_ne!(entry.severity, Severity::Unknown, "entry {} has no severity", entry.id);
        assert!(
            !entry.applicable_categories.is_empty(),
            "entry {} lists no diagram types",
            entry.id
        );
        assert!(!entry.problem.is_empty(), "entry {} has no problem text", entry.id);
        assert!(
            !entry.known_error_substrings.is_empty(),
            "entry {} has no error messages to match on",
            entry.id
        );
        assert!(
            !entry.correct_example.is_empty(),
            "entry {} has no fix example",
            entry.id
        );
    }
}

#[test]
fn shipped_catalog_first_entry_fields() {
    let kb = Troubleshooting::load(&catalog_path());
    let first = &kb.entries()[0];

    assert_eq!(first.id, 1);
    assert_eq!(first.title, "Reserved Keyword Used as Node Name");
    assert_eq!(first.severity, Severity::Critical);
    assert_eq!(
        first.applicable_categories,
        vec!["flowcharts".to_string(), "state diagrams".to_string()]
    );
    assert_eq!(first.known_error_substrings.len(), 2);
    assert!(first.incorrect_example.contains("start --> end"));
    assert!(first.correct_example.contains("finish[End]"));
}

#[test]
fn shipped_catalog_parsing_is_idempotent() {
    let content = std::fs::read_to_string(catalog_path()).unwrap();
    let first = Troubleshooting::parse(&content);
    let second = Troubleshooting::parse(&content);
    assert_eq!(first, second);
}

#[test]
fn inline_error_message_entries_parse_as_single_element_lists() {
    let kb = Troubleshooting::load(&catalog_path());
    let sequence_entry = kb.entries().iter().find(|e| e.id == 6).unwrap();
    assert_eq!(
        sequence_entry.known_error_substrings,
        vec!["Trying to inactivate an inactive participant".to_string()]
    );
}
