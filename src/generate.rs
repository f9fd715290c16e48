//! Static site generation.
//!
//! Takes a [`RepositorySnapshot`](crate::snapshot::RepositorySnapshot) (wrapped
//! in a [`SiteContext`]) and writes the finished site.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Overview page (README)
//! ├── style.css                  # Skin stylesheet
//! ├── docs/
//! │   ├── guide.html             # guide.md at the repository root
//! │   └── api/
//! │       └── client.html        # api/client.md keeps its directory
//! └── images/
//!     └── logo.png               # every image, flattened by filename
//! ```
//!
//! ## Sequence
//!
//! 1. Create `docs/` and `images/`, write `style.css`
//! 2. Copy images into `images/<basename>` (later paths win on collision)
//! 3. Write the overview page
//! 4. Write documentation pages in parallel on the rayon pool
//! 5. Build the textual structure summary
//!
//! Any failure aborts the run. Files written before the failure are left in
//! place.

use crate::compose::{ComposeError, SiteContext, compose_doc_page, compose_overview};
use crate::links::{DOCS_ROOT, IMAGES_ROOT};
use crate::nav::NavEntry;
use crate::skin::Skin;
use crate::snapshot::file_name;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STYLESHEET: &str = "style.css";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy image {from} to {to}: {source}")]
    CopyImage {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Documentation pages written under `docs/`.
    pub document_count: usize,
    /// Image copies performed (collisions count once per copy; an image
    /// already sitting at its destination is not copied or counted).
    pub image_count: usize,
    /// Human-readable tree of the output directory.
    pub structure_summary: String,
}

pub fn generate(
    ctx: &SiteContext<'_>,
    skin: &dyn Skin,
    output_root: &Path,
) -> Result<GenerationResult, GenerateError> {
    let snapshot = ctx.snapshot();

    for dir in [output_root.join(DOCS_ROOT), output_root.join(IMAGES_ROOT)] {
        fs::create_dir_all(&dir).map_err(|source| GenerateError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }

    let css_path = output_root.join(STYLESHEET);
    fs::write(&css_path, skin.stylesheet()).map_err(|source| GenerateError::Write {
        path: css_path.clone(),
        source,
    })?;

    let image_count = copy_images(snapshot.images.iter(), &output_root.join(IMAGES_ROOT))?;
    tracing::info!(count = image_count, "Copied images");

    compose_overview(ctx, skin, output_root)?;

    for path in snapshot.shadowed_documents() {
        tracing::warn!(document = %path, "Document maps to an existing page; skipped");
    }
    let pages: Vec<(&str, &str)> = snapshot.doc_pages().collect();
    let written = pages
        .par_iter()
        .map(|(path, content)| compose_doc_page(ctx, skin, output_root, path, content))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(count = written.len(), "Wrote documentation pages");

    Ok(GenerationResult {
        document_count: written.len(),
        image_count,
        structure_summary: structure_summary(output_root, ctx.navigation(), image_count),
    })
}

/// Copy each image to `images_dir/<basename>`, in iteration order.
///
/// An image that already is its own destination is skipped: `fs::copy`
/// truncates the destination before reading, which would empty the file.
fn copy_images<'a>(
    images: impl Iterator<Item = (&'a String, &'a PathBuf)>,
    images_dir: &Path,
) -> Result<usize, GenerateError> {
    let mut seen = HashSet::new();
    let mut count = 0;
    for (rel, source) in images {
        let name = file_name(rel);
        if !seen.insert(name) {
            tracing::warn!(image = %rel, "Image filename collides with an earlier image");
        }
        let dest = images_dir.join(name);
        if is_same_file(source, &dest) {
            tracing::warn!(image = %rel, "Image source is its own destination; skipped");
            continue;
        }
        fs::copy(source, &dest).map_err(|err| GenerateError::CopyImage {
            from: source.clone(),
            to: dest.clone(),
            source: err,
        })?;
        tracing::debug!(image = %rel, "Copied image");
        count += 1;
    }
    Ok(count)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Tree view of the generated site, listing pages in navigation order.
pub fn structure_summary(output_root: &Path, navigation: &[NavEntry], image_count: usize) -> String {
    let mut lines = vec![
        format!("{}/", output_root.display()),
        "  ├── index.html".to_string(),
        "  ├── docs/".to_string(),
    ];

    if navigation.is_empty() {
        lines.push("  │   └── (empty)".to_string());
    }
    for (i, entry) in navigation.iter().enumerate() {
        let branch = if i + 1 == navigation.len() { "└──" } else { "├──" };
        lines.push(format!("  │   {branch} {}", file_name(&entry.output_path)));
    }

    lines.push("  └── images/".to_string());
    if image_count > 0 {
        lines.push(format!("      └── ... ({image_count} files)"));
    } else {
        lines.push("      └── (empty)".to_string());
    }

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}
