//! The in-memory repository snapshot consumed by site generation.
//!
//! A snapshot is produced once (by [`crate::scan`] or any other acquisition
//! step) and never mutated while a site is being generated. It serializes to
//! JSON so the scan and generate commands can run independently, the same
//! way a manifest is handed from one pipeline stage to the next.
//!
//! All paths in [`RepositorySnapshot::documents`] and
//! [`RepositorySnapshot::images`] are relative to the repository root and use
//! forward slashes. Both maps are `BTreeMap`s so iteration order, and with it
//! the output of every generation run, is deterministic.

use crate::links::DOCS_ROOT;
use crate::paths::output_path_for;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Markdown extensions recognized as documentation (compared case-insensitively).
pub const MARKDOWN_EXTENSIONS: &[&str] = &[".md", ".markdown", ".mdown", ".mkdn"];

/// Image extensions copied into the site (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp"];

/// Default cap on the number of contributors kept in a snapshot.
pub const MAX_CONTRIBUTORS: usize = 5;

/// Everything the site generator knows about a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Canonical web URL of the repository (`https://{host}/{owner}/{name}`).
    pub canonical_url: String,
    /// Repo-relative path → raw markdown text.
    #[serde(default)]
    pub documents: BTreeMap<String, String>,
    /// Repo-relative path → absolute location on disk.
    #[serde(default)]
    pub images: BTreeMap<String, PathBuf>,
    /// The overview document rendered on the landing page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_path: Option<String>,
    #[serde(default)]
    pub readme_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Highest commit counts first, at most [`MAX_CONTRIBUTORS`] entries.
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    #[serde(default)]
    pub commit_count: usize,
    /// Newest author date, in the author's own UTC offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit_time: Option<DateTime<FixedOffset>>,
}

impl RepositorySnapshot {
    /// Start an empty snapshot for `owner/name` hosted on `host`.
    pub fn new(owner: &str, name: &str, host: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            canonical_url: format!("https://{host}/{owner}/{name}"),
            ..Self::default()
        }
    }

    /// `owner/name`, the label used in page titles.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Documents rendered as `docs/` pages: everything except overview files.
    ///
    /// When several documents map to the same output page (`guide.md` and
    /// `guide.markdown`), only the first in path order is kept.
    pub fn doc_pages(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut seen = HashSet::new();
        self.page_candidates()
            .filter(move |(path, _)| seen.insert(output_path_for(path, DOCS_ROOT)))
    }

    /// Documents dropped from [`doc_pages`](Self::doc_pages) because an
    /// earlier document already owns their output page.
    pub fn shadowed_documents(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.page_candidates()
            .filter(|(path, _)| !seen.insert(output_path_for(path, DOCS_ROOT)))
            .map(|(path, _)| path)
            .collect()
    }

    fn page_candidates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .filter(|(path, _)| !is_readme_file(file_name(path)))
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }
}

/// One commit author, aggregated by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub commit_count: usize,
}

/// Order contributors by descending commit count and keep the top `limit`.
///
/// The sort is stable, so contributors with equal counts stay in the order
/// they were first encountered.
pub fn rank_contributors(mut contributors: Vec<Contributor>, limit: usize) -> Vec<Contributor> {
    contributors.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));
    contributors.truncate(limit);
    contributors
}

/// Final component of a forward-slash path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}

/// True when `name` (a path or a bare link target) ends in a markdown extension.
pub fn is_markdown_file(name: &str) -> bool {
    has_extension(name, MARKDOWN_EXTENSIONS)
}

/// True when `name` (a path or a bare link target) ends in an image extension.
pub fn is_image_file(name: &str) -> bool {
    has_extension(name, IMAGE_EXTENSIONS)
}

/// Overview documents are any file whose name starts with `readme.`, in any case.
pub fn is_readme_file(filename: &str) -> bool {
    filename.to_lowercase().starts_with("readme.")
}

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoId {
    type Err = String;

    /// Exactly two non-empty `/`-separated parts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(format!("invalid repository '{s}': expected owner/name")),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributor(name: &str, commits: usize) -> Contributor {
        Contributor {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            commit_count: commits,
        }
    }

    #[test]
    fn new_snapshot_builds_canonical_url() {
        let snap = RepositorySnapshot::new("acme", "widgets", "github.com");
        assert_eq!(snap.canonical_url, "https://github.com/acme/widgets");
        assert_eq!(snap.full_name(), "acme/widgets");
    }

    #[test]
    fn rank_contributors_sorts_descending_and_truncates() {
        let ranked = rank_contributors(
            vec![
                contributor("a", 1),
                contributor("b", 9),
                contributor("c", 4),
                contributor("d", 7),
                contributor("e", 2),
                contributor("f", 3),
                contributor("g", 5),
            ],
            MAX_CONTRIBUTORS,
        );
        let counts: Vec<usize> = ranked.iter().map(|c| c.commit_count).collect();
        assert_eq!(counts, vec![9, 7, 5, 4, 3]);
    }

    #[test]
    fn rank_contributors_keeps_first_seen_order_on_ties() {
        let ranked = rank_contributors(
            vec![contributor("first", 2), contributor("second", 2), contributor("top", 3)],
            MAX_CONTRIBUTORS,
        );
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["top", "first", "second"]);
    }

    #[test]
    fn extension_checks_ignore_case() {
        assert!(is_markdown_file("docs/Guide.MD"));
        assert!(is_markdown_file("notes.mkdn"));
        assert!(!is_markdown_file("main.rs"));
        assert!(is_image_file("assets/Logo.PNG"));
        assert!(is_image_file("diagram.svg"));
        assert!(!is_image_file("diagram.pdf"));
    }

    #[test]
    fn readme_detection_is_prefix_based() {
        assert!(is_readme_file("README.md"));
        assert!(is_readme_file("readme.markdown"));
        assert!(is_readme_file("ReadMe.txt"));
        assert!(!is_readme_file("READMEFIRST.md"));
        assert!(!is_readme_file("guide.md"));
    }

    #[test]
    fn doc_pages_skip_nested_readmes() {
        let mut snap = RepositorySnapshot::new("o", "r", "github.com");
        snap.documents.insert("README.md".into(), "# Root".into());
        snap.documents.insert("docs/README.md".into(), "# Docs".into());
        snap.documents.insert("docs/guide.md".into(), "# Guide".into());
        let pages: Vec<&str> = snap.doc_pages().map(|(p, _)| p).collect();
        assert_eq!(pages, vec!["docs/guide.md"]);
    }

    #[test]
    fn first_document_owns_a_shared_output_page() {
        let mut snap = RepositorySnapshot::new("o", "r", "github.com");
        snap.documents.insert("guide.md".into(), "# From md".into());
        snap.documents.insert("guide.markdown".into(), "# From markdown".into());
        snap.documents.insert("intro.md".into(), "# Intro".into());
        let pages: Vec<&str> = snap.doc_pages().map(|(p, _)| p).collect();
        assert_eq!(pages, vec!["guide.markdown", "intro.md"]);
        assert_eq!(snap.shadowed_documents(), vec!["guide.md"]);
    }

    #[test]
    fn file_name_takes_last_segment() {
        assert_eq!(file_name("a/b/c.md"), "c.md");
        assert_eq!(file_name("c.md"), "c.md");
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut snap = RepositorySnapshot::new("o", "r", "github.com");
        snap.documents.insert("a.md".into(), "# A".into());
        snap.license = Some("MIT License".into());
        let json = serde_json::to_string(&snap).unwrap();
        let back: RepositorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn repo_id_parses_owner_and_name() {
        let id: RepoId = "acme/widgets".parse().unwrap();
        assert_eq!(id.owner, "acme");
        assert_eq!(id.name, "widgets");
        assert_eq!(id.to_string(), "acme/widgets");
    }

    #[test]
    fn repo_id_rejects_malformed_input() {
        for bad in ["acme", "acme/", "/widgets", "a/b/c", ""] {
            assert!(bad.parse::<RepoId>().is_err(), "{bad} should be rejected");
        }
    }
}
