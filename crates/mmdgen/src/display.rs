//! Human-readable output for mmdgen commands.

use mmdgen_common::extract::MermaidBlock;
use mmdgen_common::outcome::GenerationOutcome;
use mmdgen_common::troubleshooting::Severity;
use owo_colors::OwoColorize;
use std::path::Path;

/// How many matches the human report shows (the JSON report carries all).
const MAX_DISPLAYED_MATCHES: usize = 3;

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Critical => severity.as_str().red().bold().to_string(),
        Severity::High => severity.as_str().red().to_string(),
        Severity::Medium => severity.as_str().yellow().to_string(),
        Severity::Low => severity.as_str().green().to_string(),
        Severity::Unknown => severity.as_str().dimmed().to_string(),
    }
}

/// Print the outcome of one generation attempt.
pub fn print_outcome(outcome: &GenerationOutcome) {
    if outcome.success {
        println!("{} Generated diagram", "SUCCESS:".green().bold());
        println!("  MMD file:   {}", outcome.mmd_path.display());
        if let Some(image) = &outcome.image_path {
            println!("  Image file: {}", image.display());
        }
        println!("  Category:   {}", outcome.category);
        return;
    }

    let error = outcome.error_message.as_deref().unwrap_or("unknown error");
    eprintln!("{} {}", "FAILED:".red().bold(), error);
    println!("  MMD file: {}", outcome.mmd_path.display());
    println!("  Category: {}", outcome.category);

    if !outcome.troubleshooting_matches.is_empty() {
        println!(
            "\nTroubleshooting matches found ({}):",
            outcome.troubleshooting_matches.len()
        );
        for m in outcome.troubleshooting_matches.iter().take(MAX_DISPLAYED_MATCHES) {
            println!(
                "  - Error {}: {} ({})",
                m.error_number,
                m.title,
                severity_label(m.severity)
            );
        }

        if let Some(fix) = &outcome.suggested_fix {
            let best = &outcome.troubleshooting_matches[0];
            println!("\nSuggested fix (from Error {}):", best.error_number);
            println!("```mermaid");
            println!("{}", fix);
            println!("```");
        }
    }

    if let Some(query) = &outcome.search_query {
        println!("\nNo exact match found. Search recommendation:");
        println!("  Query: {}", query);
    }
}

/// Print a listing of Mermaid blocks found in a markdown document.
pub fn print_blocks(document: &Path, blocks: &[MermaidBlock]) {
    if blocks.is_empty() {
        println!("No Mermaid diagrams found in {}.", document.display());
        return;
    }

    println!(
        "\nFound {} Mermaid diagram(s) in {}:\n",
        blocks.len(),
        document.display()
    );
    for block in blocks {
        println!("  #{} (line {}):", block.index, block.line_number);
        println!("    First line: {}", block.first_line());
        println!("    Lines: {}", block.line_count());
        println!();
    }
}

/// One line of per-file batch progress.
pub fn print_batch_item(source: &Path, error: Option<&str>) {
    match error {
        None => println!("  {} {}", "ok".green(), source.display()),
        Some(message) => println!("  {} {} — {}", "failed".red(), source.display(), message),
    }
}
