//! Shared test utilities for the repo-site test suite.
//!
//! Provides snapshot builders and output-tree lookups so unit tests can
//! describe a repository in one line and assert on generated files without
//! repeating filesystem boilerplate.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let snap = snapshot_with_docs(&[
//!     ("README.md", "# Hi"),
//!     ("docs/guide.md", "# Guide"),
//! ]);
//! let out = TempDir::new().unwrap();
//! generate(&context_for(&snap), &BuiltinSkin, out.path()).unwrap();
//! assert!(read_output(&out, "docs/docs/guide.html").contains("Guide"));
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::compose::{PageModel, SiteContext};
use crate::nav::NavEntry;
use crate::snapshot::{Contributor, RepositorySnapshot, is_readme_file};

/// Fixed generation timestamp so rendered pages are reproducible in tests.
pub const FIXED_GENERATED_AT: &str = "2024-01-02 03:04:05";

// =========================================================================
// Snapshot builders
// =========================================================================

/// Snapshot of `acme/widgets` holding the given documents.
///
/// The first root-level `README.*` becomes the overview document.
pub fn snapshot_with_docs(docs: &[(&str, &str)]) -> RepositorySnapshot {
    let mut snap = RepositorySnapshot::new("acme", "widgets", "github.com");
    snap.description = "Widgets for everyone".to_string();
    for (path, content) in docs {
        snap.documents.insert(path.to_string(), content.to_string());
        if !path.contains('/') && is_readme_file(path) && snap.readme_path.is_none() {
            snap.readme_path = Some(path.to_string());
            snap.readme_content = content.to_string();
        }
    }
    snap
}

/// Write fake image files into `dir` and register them in the snapshot.
pub fn add_images(snap: &mut RepositorySnapshot, dir: &Path, images: &[(&str, &[u8])]) {
    for (rel, bytes) in images {
        let disk = dir.join(rel);
        if let Some(parent) = disk.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&disk, bytes).unwrap();
        snap.images.insert(rel.to_string(), disk);
    }
}

/// Site context for `snap` with the fixed test timestamp.
pub fn context_for(snap: &RepositorySnapshot) -> SiteContext<'_> {
    SiteContext::with_generated_at(snap, FIXED_GENERATED_AT)
}

/// Hand-built page model with one nav entry (`Guide`), for skin tests.
pub fn sample_model(current_page: &str) -> PageModel {
    PageModel {
        repo_owner: "acme".to_string(),
        repo_name: "widgets".to_string(),
        repo_full_name: "acme/widgets".to_string(),
        description: "Widgets for everyone".to_string(),
        commit_count: 42,
        last_update: "March 5, 2024".to_string(),
        license: Some("MIT License".to_string()),
        repo_url: "https://github.com/acme/widgets".to_string(),
        readme_html: "<h1>Hello</h1>".to_string(),
        contributors: vec![Contributor {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            commit_count: 30,
        }],
        docs_pages: vec![NavEntry {
            title: "Guide".to_string(),
            output_path: "docs/guide.html".to_string(),
            is_active: false,
        }],
        current_page: current_page.to_string(),
        page_title: "Guide - acme/widgets".to_string(),
        page_content: "<p>Doc body</p>".to_string(),
        generated_at: FIXED_GENERATED_AT.to_string(),
    }
}

// =========================================================================
// Output lookups: panic with a clear message on miss
// =========================================================================

/// Read a generated file relative to the output root. Panics if missing.
pub fn read_output(out: &TempDir, rel: &str) -> String {
    let path = out.path().join(rel);
    fs::read_to_string(&path).unwrap_or_else(|e| {
        let present = list_files(out.path());
        panic!("output '{rel}' not readable ({e}). Present: {present:?}")
    })
}

/// All files under `root`, as sorted forward-slash relative paths.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}
