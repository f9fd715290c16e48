//! Page titles derived from document content and filenames.
//!
//! Every documentation page needs a display title for navigation and for the
//! browser tab. Two sources are consulted, first hit wins:
//!
//! 1. The first level-one heading in the markdown (`# Getting Started`).
//! 2. The filename, prettified: extension dropped, dashes and underscores
//!    become spaces, and each word starts with a capital letter.
//!
//! ```text
//! getting-started.md    → "Getting Started"
//! api_reference.md      → "Api Reference"
//! FAQ.md                → "FAQ"
//! ```

use regex::Regex;
use std::sync::LazyLock;

static H1_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("valid heading regex"));

/// Text of the first `# ` heading, if the document has one.
pub fn title_from_markdown(content: &str) -> Option<String> {
    H1_PATTERN
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Turn a filename like `getting-started.md` into `Getting Started`.
pub fn prettify_filename(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    };
    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title for a document: its heading, else its prettified filename.
pub fn page_title(path: &str, content: &str) -> String {
    title_from_markdown(content)
        .unwrap_or_else(|| prettify_filename(crate::snapshot::file_name(path)))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
