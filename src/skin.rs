//! Page skins: turning a [`PageModel`] into HTML bytes.
//!
//! Two page kinds exist: the overview (`main`, written to `index.html`) and a
//! documentation page (`doc`). A skin also supplies the stylesheet written to
//! `style.css` at the site root.
//!
//! ## Built-in skin
//!
//! [`BuiltinSkin`] renders with [maud](https://maud.lambda.xyz/): markup is
//! checked at compile time and every interpolated value is escaped, except the
//! already-rendered markdown bodies which are inserted verbatim. Links to the
//! stylesheet and to other pages are prefixed with enough `../` to climb from
//! the current page back to the site root, so nested pages work offline.
//!
//! ## Template overrides
//!
//! [`TemplateSkin`] loads user-supplied [handlebars](https://handlebarsjs.com/)
//! templates. The model is exposed under its field names:
//!
//! ```text
//! {{repo_full_name}}  {{description}}  {{commit_count}}  {{last_update}}
//! {{license}}  {{repo_url}}  {{{readme_html}}}  {{{page_content}}}
//! {{page_title}}  {{current_page}}  {{generated_at}}
//! {{#each contributors}} {{name}} {{email}} {{commit_count}} {{/each}}
//! {{#each docs_pages}} {{title}} {{output_path}} {{is_active}} {{/each}}
//! ```
//!
//! Use triple braces for the HTML bodies. Any part without an override falls
//! back to the built-in skin.

use crate::compose::PageModel;
use crate::config::TemplatesConfig;
use crate::nav::NavEntry;
use handlebars::Handlebars;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_CSS: &str = include_str!("../static/style.css");

#[derive(Error, Debug)]
pub enum SkinError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {kind} template: {source}")]
    Parse {
        kind: PageKind,
        #[source]
        source: handlebars::TemplateError,
    },
    #[error("failed to render {kind} template: {source}")]
    Render {
        kind: PageKind,
        #[source]
        source: handlebars::RenderError,
    },
}

/// Which page layout a model is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The landing page built from the overview document.
    Main,
    /// A page under `docs/`.
    Doc,
}

impl PageKind {
    pub fn name(self) -> &'static str {
        match self {
            PageKind::Main => "main",
            PageKind::Doc => "doc",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders page models and supplies the site stylesheet.
///
/// Skins are shared by every page-rendering worker, hence `Sync`.
pub trait Skin: Sync {
    fn render(&self, kind: PageKind, model: &PageModel) -> Result<String, SkinError>;
    fn stylesheet(&self) -> &str;
}

// ============================================================================
// Built-in skin
// ============================================================================

/// The default maud skin with the embedded stylesheet.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinSkin;

impl Skin for BuiltinSkin {
    fn render(&self, kind: PageKind, model: &PageModel) -> Result<String, SkinError> {
        let markup = match kind {
            PageKind::Main => render_main(model),
            PageKind::Doc => render_doc(model),
        };
        Ok(markup.into_string())
    }

    fn stylesheet(&self) -> &str {
        BUILTIN_CSS
    }
}

/// `../` repeated once per directory between `current_page` and the site root.
fn root_prefix(current_page: &str) -> String {
    "../".repeat(current_page.matches('/').count())
}

/// Renders the base HTML document structure
fn base_document(model: &PageModel, body_class: &str, content: Markup) -> Markup {
    let root = root_prefix(&model.current_page);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !model.description.is_empty() {
                    meta name="description" content=(model.description);
                }
                title { (model.page_title) }
                link rel="stylesheet" href={ (root) "style.css" };
            }
            body class=(body_class) {
                (site_header(model, &root))
                div.layout {
                    (render_nav(&model.docs_pages, &root))
                    main.content { (content) }
                }
                (site_footer(model))
            }
        }
    }
}

fn site_header(model: &PageModel, root: &str) -> Markup {
    html! {
        header.site-header {
            a.site-title href={ (root) "index.html" } { (model.repo_full_name) }
            @if !model.description.is_empty() {
                p.site-description { (model.description) }
            }
            a.repo-link href=(model.repo_url) target="_blank" rel="noopener" { "View repository" }
        }
    }
}

/// Renders the documentation sidebar; the active entry gets the `active` class.
pub fn render_nav(entries: &[NavEntry], root: &str) -> Markup {
    html! {
        nav.docs-nav {
            h2 { "Documentation" }
            @if entries.is_empty() {
                p.nav-empty { "No additional documentation." }
            } @else {
                ul {
                    @for entry in entries {
                        li class=[entry.is_active.then_some("active")] {
                            a href={ (root) (entry.output_path) } { (entry.title) }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(model: &PageModel) -> Markup {
    html! {
        footer.site-footer {
            p {
                "Generated " (model.generated_at) " from "
                a href=(model.repo_url) target="_blank" rel="noopener" { (model.repo_full_name) }
            }
        }
    }
}

fn repo_stats(model: &PageModel) -> Markup {
    html! {
        section.repo-stats {
            h2 { "Repository" }
            dl {
                dt { "Commits" }
                dd { (model.commit_count) }
                @if !model.last_update.is_empty() {
                    dt { "Last update" }
                    dd { (model.last_update) }
                }
                @if let Some(license) = &model.license {
                    dt { "License" }
                    dd { (license) }
                }
            }
            @if !model.contributors.is_empty() {
                h3 { "Top contributors" }
                ol.contributors {
                    @for contributor in &model.contributors {
                        li {
                            span.contributor-name { (contributor.name) }
                            " "
                            span.contributor-commits { "(" (contributor.commit_count) " commits)" }
                        }
                    }
                }
            }
        }
    }
}

fn render_main(model: &PageModel) -> Markup {
    let content = html! {
        article.readme {
            (PreEscaped(model.readme_html.as_str()))
        }
        (repo_stats(model))
    };
    base_document(model, "main-page", content)
}

fn render_doc(model: &PageModel) -> Markup {
    let content = html! {
        article.doc {
            (PreEscaped(model.page_content.as_str()))
        }
    };
    base_document(model, "doc-page", content)
}

// ============================================================================
// Template override skin
// ============================================================================

/// Skin assembled from user templates, falling back to [`BuiltinSkin`].
pub struct TemplateSkin {
    registry: Handlebars<'static>,
    stylesheet: Option<String>,
}

impl TemplateSkin {
    /// Build from template sources. `None` keeps the built-in part.
    pub fn from_sources(
        main: Option<&str>,
        doc: Option<&str>,
        stylesheet: Option<String>,
    ) -> Result<Self, SkinError> {
        let mut registry = Handlebars::new();
        for (kind, source) in [(PageKind::Main, main), (PageKind::Doc, doc)] {
            if let Some(source) = source {
                registry
                    .register_template_string(kind.name(), source)
                    .map_err(|source| SkinError::Parse { kind, source })?;
            }
        }
        Ok(Self {
            registry,
            stylesheet,
        })
    }

    /// Load the overrides named in config; relative paths resolve against `base_dir`.
    pub fn from_config(templates: &TemplatesConfig, base_dir: &Path) -> Result<Self, SkinError> {
        let main = read_override(templates.main.as_deref(), base_dir)?;
        let doc = read_override(templates.doc.as_deref(), base_dir)?;
        let style = read_override(templates.style.as_deref(), base_dir)?;
        Self::from_sources(main.as_deref(), doc.as_deref(), style)
    }

    pub fn overrides(&self, kind: PageKind) -> bool {
        self.registry.has_template(kind.name())
    }
}

impl Skin for TemplateSkin {
    fn render(&self, kind: PageKind, model: &PageModel) -> Result<String, SkinError> {
        if !self.overrides(kind) {
            return BuiltinSkin.render(kind, model);
        }
        self.registry
            .render(kind.name(), model)
            .map_err(|source| SkinError::Render { kind, source })
    }

    fn stylesheet(&self) -> &str {
        self.stylesheet.as_deref().unwrap_or(BUILTIN_CSS)
    }
}

fn read_override(path: Option<&Path>, base_dir: &Path) -> Result<Option<String>, SkinError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let full = base_dir.join(path);
    tracing::info!(path = %full.display(), "Using template override");
    fs::read_to_string(&full)
        .map(Some)
        .map_err(|source| SkinError::Read { path: full, source })
}
