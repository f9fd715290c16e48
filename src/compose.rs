//! Page composition: snapshot + navigation + markdown → one written HTML file.
//!
//! A [`SiteContext`] is built once per run and shared read-only by every page
//! render, so documentation pages can be composed on any worker thread. Each
//! page gets its own [`PageModel`], including a private copy of the navigation
//! with the current page flagged.
//!
//! Only documentation pages pass through the reference rewriter. The overview
//! is written to the site root, where repository-relative links already point
//! roughly where they should.

use crate::links::{DOCS_ROOT, rewrite_references};
use crate::markdown::render_markdown;
use crate::nav::{NavEntry, build_navigation, with_active};
use crate::naming::page_title;
use crate::paths::output_path_for;
use crate::skin::{PageKind, Skin, SkinError};
use crate::snapshot::{Contributor, RepositorySnapshot};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output path of the overview page, relative to the site root.
pub const INDEX_PAGE: &str = "index.html";

const LAST_UPDATE_FORMAT: &str = "%B %-d, %Y";
const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("failed to render {page}: {source}")]
    Render {
        page: String,
        #[source]
        source: SkinError,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a skin needs to render one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageModel {
    pub repo_owner: String,
    pub repo_name: String,
    pub repo_full_name: String,
    pub description: String,
    pub commit_count: usize,
    /// Last commit date, e.g. `March 5, 2024`; empty when unknown.
    pub last_update: String,
    pub license: Option<String>,
    pub repo_url: String,
    /// Rendered overview document.
    pub readme_html: String,
    pub contributors: Vec<Contributor>,
    pub docs_pages: Vec<NavEntry>,
    /// Site-relative path of the page being rendered.
    pub current_page: String,
    pub page_title: String,
    /// Rendered body of a documentation page; empty on the overview.
    pub page_content: String,
    pub generated_at: String,
}

/// Read-only state shared by every page of one generation run.
#[derive(Debug)]
pub struct SiteContext<'a> {
    snapshot: &'a RepositorySnapshot,
    navigation: Vec<NavEntry>,
    generated_at: String,
}

impl<'a> SiteContext<'a> {
    /// Build navigation and stamp the run with the current local time.
    pub fn new(snapshot: &'a RepositorySnapshot) -> Self {
        let generated_at = Local::now().format(GENERATED_AT_FORMAT).to_string();
        Self::with_generated_at(snapshot, generated_at)
    }

    /// Like [`SiteContext::new`] with a caller-chosen timestamp string.
    pub fn with_generated_at(
        snapshot: &'a RepositorySnapshot,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            snapshot,
            navigation: build_navigation(snapshot),
            generated_at: generated_at.into(),
        }
    }

    pub fn snapshot(&self) -> &RepositorySnapshot {
        self.snapshot
    }

    /// Canonical navigation: sorted, no entry active.
    pub fn navigation(&self) -> &[NavEntry] {
        &self.navigation
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    /// Model with the repository metadata filled in and page fields empty.
    fn base_model(&self, current_page: &str, active: Option<&str>) -> PageModel {
        let snap = self.snapshot;
        PageModel {
            repo_owner: snap.owner.clone(),
            repo_name: snap.name.clone(),
            repo_full_name: snap.full_name(),
            description: snap.description.clone(),
            commit_count: snap.commit_count,
            last_update: snap
                .last_commit_time
                .map(|t| t.format(LAST_UPDATE_FORMAT).to_string())
                .unwrap_or_default(),
            license: snap.license.clone(),
            repo_url: snap.canonical_url.clone(),
            readme_html: String::new(),
            contributors: snap.contributors.clone(),
            docs_pages: with_active(&self.navigation, active),
            current_page: current_page.to_string(),
            page_title: String::new(),
            page_content: String::new(),
            generated_at: self.generated_at.clone(),
        }
    }
}

/// Model for the landing page. No navigation entry is active.
pub fn overview_model(ctx: &SiteContext<'_>) -> PageModel {
    let mut model = ctx.base_model(INDEX_PAGE, None);
    model.page_title = ctx.snapshot.full_name();
    model.readme_html = render_markdown(&ctx.snapshot.readme_content);
    model
}

/// Model for the documentation page generated from `source_path`.
pub fn doc_model(ctx: &SiteContext<'_>, source_path: &str, content: &str) -> PageModel {
    let output_path = output_path_for(source_path, DOCS_ROOT);
    let mut model = ctx.base_model(&output_path, Some(&output_path));
    model.page_title = format!(
        "{} - {}",
        page_title(source_path, content),
        ctx.snapshot.full_name()
    );
    model.page_content = render_markdown(&rewrite_references(content, source_path));
    model
}

/// Render and write `index.html`. Returns its site-relative path.
pub fn compose_overview(
    ctx: &SiteContext<'_>,
    skin: &dyn Skin,
    output_root: &Path,
) -> Result<String, ComposeError> {
    let model = overview_model(ctx);
    render_and_write(skin, PageKind::Main, &model, output_root)?;
    Ok(model.current_page)
}

/// Render and write one documentation page. Returns its site-relative path.
pub fn compose_doc_page(
    ctx: &SiteContext<'_>,
    skin: &dyn Skin,
    output_root: &Path,
    source_path: &str,
    content: &str,
) -> Result<String, ComposeError> {
    let model = doc_model(ctx, source_path, content);
    render_and_write(skin, PageKind::Doc, &model, output_root)?;
    Ok(model.current_page)
}

fn render_and_write(
    skin: &dyn Skin,
    kind: PageKind,
    model: &PageModel,
    output_root: &Path,
) -> Result<(), ComposeError> {
    let html = skin
        .render(kind, model)
        .map_err(|source| ComposeError::Render {
            page: model.current_page.clone(),
            source,
        })?;
    let path = output_root.join(&model.current_page);
    write_page(&path, &html)?;
    tracing::debug!(page = %model.current_page, "Wrote page");
    Ok(())
}

/// Write a fully rendered page, creating parent directories as needed.
pub fn write_page(path: &Path, html: &str) -> Result<(), ComposeError> {
    let write_err = |source| ComposeError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, html).map_err(write_err)
}
