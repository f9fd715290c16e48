//! CLI output formatting for the scan and generate stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every document is
//! listed by its title and positional index; the repository path it came from
//! is secondary context on an indented `Source:` line.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Repository
//!     acme/widgets
//!     URL: https://github.com/acme/widgets
//!     Description: Widgets for everyone
//!     License: MIT License
//!     Commits: 42 (last March 5, 2024)
//!
//! Overview
//!     Source: README.md
//!
//! Documents
//! 001 Guide
//!     Source: docs/guide.md
//!
//! Images
//! 001 logo.png
//!     Source: assets/logo.png
//!
//! Contributors
//! 001 Ada (30 commits)
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 Guide → docs/docs/guide.html
//!
//! Site structure
//! dist/
//!   ├── index.html
//!   ...
//!
//! Generated 1 documentation page, 1 image
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::compose::INDEX_PAGE;
use crate::generate::GenerationResult;
use crate::nav::NavEntry;
use crate::naming::page_title;
use crate::snapshot::{RepositorySnapshot, file_name};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Scan output
// ============================================================================

pub fn format_scan_output(snapshot: &RepositorySnapshot) -> Vec<String> {
    let mut lines = vec!["Repository".to_string()];
    lines.push(format!("{}{}", indent(1), snapshot.full_name()));
    lines.push(format!("{}URL: {}", indent(1), snapshot.canonical_url));
    if !snapshot.description.is_empty() {
        lines.push(format!("{}Description: {}", indent(1), snapshot.description));
    }
    if let Some(license) = &snapshot.license {
        lines.push(format!("{}License: {}", indent(1), license));
    }
    let commits = match snapshot.last_commit_time {
        Some(t) => format!(
            "{}Commits: {} (last {})",
            indent(1),
            snapshot.commit_count,
            t.format("%B %-d, %Y")
        ),
        None => format!("{}Commits: {}", indent(1), snapshot.commit_count),
    };
    lines.push(commits);

    lines.push(String::new());
    lines.push("Overview".to_string());
    match &snapshot.readme_path {
        Some(path) => lines.push(format!("{}Source: {}", indent(1), path)),
        None => lines.push(format!("{}(none)", indent(1))),
    }

    let docs: Vec<(&str, &str)> = snapshot.doc_pages().collect();
    if !docs.is_empty() {
        lines.push(String::new());
        lines.push("Documents".to_string());
        for (i, (path, content)) in docs.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), page_title(path, content)));
            lines.push(format!("{}Source: {}", indent(1), path));
        }
    }

    if !snapshot.images.is_empty() {
        lines.push(String::new());
        lines.push("Images".to_string());
        for (i, rel) in snapshot.images.keys().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), file_name(rel)));
            lines.push(format!("{}Source: {}", indent(1), rel));
        }
    }

    if !snapshot.contributors.is_empty() {
        lines.push(String::new());
        lines.push("Contributors".to_string());
        for (i, c) in snapshot.contributors.iter().enumerate() {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                c.name,
                plural(c.commit_count, "commit", "commits")
            ));
        }
    }

    lines
}

pub fn print_scan_output(snapshot: &RepositorySnapshot) {
    for line in format_scan_output(snapshot) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

pub fn format_generate_output(navigation: &[NavEntry], result: &GenerationResult) -> Vec<String> {
    let mut lines = vec![format!("Home → {INDEX_PAGE}")];
    for (i, entry) in navigation.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            entry.title,
            entry.output_path
        ));
    }

    lines.push(String::new());
    lines.push("Site structure".to_string());
    lines.extend(result.structure_summary.lines().map(String::from));

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(
            result.document_count,
            "documentation page",
            "documentation pages"
        ),
        plural(result.image_count, "image", "images")
    ));
    lines
}

pub fn print_generate_output(navigation: &[NavEntry], result: &GenerationResult) {
    for line in format_generate_output(navigation, result) {
        println!("{}", line);
    }
}
