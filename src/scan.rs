//! Repository scanning and snapshot generation.
//!
//! Walks a checked-out repository and produces the
//! [`RepositorySnapshot`] that site generation consumes.
//!
//! ## What is collected
//!
//! ```text
//! repo/
//! ├── README.md                # Overview document (root README.md preferred)
//! ├── LICENSE                  # License label, sniffed from content
//! ├── docs/
//! │   ├── guide.md             # Document: docs/guide.md
//! │   └── img/
//! │       └── flow.svg         # Image: docs/img/flow.svg → absolute path
//! ├── node_modules/            # Skipped (scan.skip_dirs)
//! └── .git/                    # Skipped; commit history read via `git log`
//! ```
//!
//! Files are visited in file-name order, so "first found" rules are stable
//! across platforms. Document keys always use forward slashes.
//!
//! Directories passed as `exclude` (the site output and the temp directory
//! when they live inside the checkout) are never entered, so a rebuild does
//! not pick up its own previous output.
//!
//! ## Commit statistics
//!
//! Commit count, newest author date and contributors come from `git log` run
//! inside the checkout. A missing `git` binary or a directory that is not a
//! repository yields zero statistics and a warning.

use crate::config::ScanConfig;
use crate::snapshot::{
    Contributor, RepositorySnapshot, is_image_file, is_markdown_file, is_readme_file,
    rank_contributors,
};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

const DESCRIPTION_LIMIT: usize = 150;
const LICENSE_FILE_NAMES: &[&str] = &["license", "license.md", "license.txt", "copying"];
const FIELD_SEPARATOR: char = '\u{1f}';

/// First line of text after the first `# ` heading.
static DESCRIPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+.+\n+(.+)").expect("valid description regex"));

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("repository root {path} is not accessible: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk repository: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scan the checkout at `root` into a snapshot of `owner/name` hosted on `host`.
///
/// Nothing under the `exclude` directories is collected. Paths that do not
/// exist yet are ignored.
pub fn scan(
    root: &Path,
    owner: &str,
    name: &str,
    host: &str,
    config: &ScanConfig,
    exclude: &[PathBuf],
) -> Result<RepositorySnapshot, ScanError> {
    let root = fs::canonicalize(root).map_err(|source| ScanError::Root {
        path: root.to_path_buf(),
        source,
    })?;
    let excluded: Vec<PathBuf> = exclude
        .iter()
        .filter_map(|dir| fs::canonicalize(dir).ok())
        .filter(|dir| dir != &root)
        .collect();
    let mut snapshot = RepositorySnapshot::new(owner, name, host);

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(is_skipped_dir(e, &config.skip_dirs) || is_excluded(e, &excluded))
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = relative_key(path, &root);
        let file_name = entry.file_name().to_string_lossy();

        if is_markdown_file(&file_name) {
            let content = read_text(path)?;
            tracing::debug!(document = %rel, "Found markdown file");
            if is_readme_file(&file_name)
                && (snapshot.readme_path.is_none() || rel == "README.md")
            {
                snapshot.readme_path = Some(rel.clone());
                snapshot.readme_content = content.clone();
            }
            snapshot.documents.insert(rel.clone(), content);
        }

        if is_image_file(&file_name) {
            tracing::debug!(image = %rel, "Found image file");
            snapshot.images.insert(rel.clone(), path.to_path_buf());
        }

        if snapshot.license.is_none() && is_license_file(&file_name) {
            let content = read_text(path)?;
            snapshot.license = Some(detect_license(&content).to_string());
        }
    }

    snapshot.description = extract_description(&snapshot.readme_content);

    let stats = commit_stats(&root);
    snapshot.commit_count = stats.commit_count;
    snapshot.last_commit_time = stats.last_commit_time;
    snapshot.contributors = rank_contributors(stats.contributors, config.max_contributors);

    tracing::info!(
        documents = snapshot.documents.len(),
        images = snapshot.images.len(),
        commits = snapshot.commit_count,
        "Scanned repository"
    );
    Ok(snapshot)
}

fn is_skipped_dir(entry: &walkdir::DirEntry, skip_dirs: &[String]) -> bool {
    entry.file_type().is_dir()
        && skip_dirs
            .iter()
            .any(|skip| entry.file_name().to_string_lossy() == skip.as_str())
}

fn is_excluded(entry: &walkdir::DirEntry, excluded: &[PathBuf]) -> bool {
    entry.file_type().is_dir() && excluded.iter().any(|dir| entry.path() == dir)
}

/// Forward-slash path of `path` relative to `root`.
fn relative_key(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a file as text; invalid UTF-8 is replaced rather than rejected.
fn read_text(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_license_file(file_name: &str) -> bool {
    LICENSE_FILE_NAMES.contains(&file_name.to_lowercase().as_str())
}

/// License label from the license text; `"License"` when unrecognized.
pub fn detect_license(content: &str) -> &'static str {
    let text = content.to_lowercase();
    if text.contains("mit license") {
        "MIT License"
    } else if text.contains("apache license") {
        "Apache License"
    } else if text.contains("gnu general public license") || text.contains("gpl") {
        "GPL License"
    } else if text.contains("bsd") {
        "BSD License"
    } else if text.contains("mozilla public license") {
        "Mozilla Public License"
    } else {
        "License"
    }
}

/// Short description from an overview document.
///
/// Prefers the first line after the first `# ` heading, else the first
/// non-heading line. Long lines are cut to 147 characters plus `...`.
pub fn extract_description(readme: &str) -> String {
    if let Some(caps) = DESCRIPTION_PATTERN.captures(readme) {
        return truncate(caps[1].trim_end());
    }
    readme
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(truncate)
        .unwrap_or_default()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_LIMIT {
        return text.to_string();
    }
    let cut: String = text.chars().take(DESCRIPTION_LIMIT - 3).collect();
    format!("{cut}...")
}

// ============================================================================
// Commit statistics
// ============================================================================

/// Aggregated `git log` results.
#[derive(Debug, Default, PartialEq)]
pub struct CommitStats {
    pub commit_count: usize,
    pub last_commit_time: Option<DateTime<FixedOffset>>,
    /// Unranked, in first-seen order.
    pub contributors: Vec<Contributor>,
}

fn commit_stats(root: &Path) -> CommitStats {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["log", "--format=%an%x1f%ae%x1f%aI"])
        .output();
    match output {
        Ok(out) if out.status.success() => parse_git_log(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            tracing::warn!(
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "git log failed; commit statistics unavailable"
            );
            CommitStats::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "git not available; commit statistics unavailable");
            CommitStats::default()
        }
    }
}

/// Parse `git log --format=%an%x1f%ae%x1f%aI` output.
///
/// Contributors are keyed by email; the first name seen for an email is kept.
/// Author dates keep the offset they were recorded with.
pub fn parse_git_log(log: &str) -> CommitStats {
    let mut stats = CommitStats::default();
    let mut by_email: HashMap<String, usize> = HashMap::new();

    for line in log.lines().filter(|l| !l.trim().is_empty()) {
        let mut fields = line.split(FIELD_SEPARATOR);
        let (Some(name), Some(email), Some(time)) = (fields.next(), fields.next(), fields.next())
        else {
            tracing::debug!(line, "Skipping malformed git log line");
            continue;
        };
        stats.commit_count += 1;

        let when = DateTime::parse_from_rfc3339(time.trim()).ok();
        if let Some(when) = when {
            if stats.last_commit_time.is_none_or(|last| when > last) {
                stats.last_commit_time = Some(when);
            }
        }

        let idx = *by_email.entry(email.to_string()).or_insert_with(|| {
            stats.contributors.push(Contributor {
                name: name.to_string(),
                email: email.to_string(),
                commit_count: 0,
            });
            stats.contributors.len() - 1
        });
        stats.contributors[idx].commit_count += 1;
    }
    stats
}
