//! Site navigation: one entry per documentation page.
//!
//! The canonical list is built once per run and never marked. Each rendered
//! page gets its own copy from [`with_active`], with at most one entry flagged
//! as the page being viewed.

use crate::links::DOCS_ROOT;
use crate::naming::page_title;
use crate::paths::output_path_for;
use crate::snapshot::RepositorySnapshot;
use serde::Serialize;

/// A link in the documentation sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub title: String,
    /// Site-relative output path, e.g. `docs/api/client.html`.
    pub output_path: String,
    pub is_active: bool,
}

/// Build the canonical navigation for every non-overview document.
///
/// Entries are ordered by title using plain byte comparison, so `"Zebra"`
/// sorts before `"apple"`. Equal titles keep document path order.
pub fn build_navigation(snapshot: &RepositorySnapshot) -> Vec<NavEntry> {
    let mut entries: Vec<NavEntry> = snapshot
        .doc_pages()
        .map(|(path, content)| NavEntry {
            title: page_title(path, content),
            output_path: output_path_for(path, DOCS_ROOT),
            is_active: false,
        })
        .collect();
    entries.sort_by(|a, b| a.title.cmp(&b.title));
    entries
}

/// Copy of `entries` with the entry at `current_path` (if any) marked active.
pub fn with_active(entries: &[NavEntry], current_path: Option<&str>) -> Vec<NavEntry> {
    entries
        .iter()
        .map(|entry| NavEntry {
            is_active: current_path == Some(entry.output_path.as_str()),
            ..entry.clone()
        })
        .collect()
}
