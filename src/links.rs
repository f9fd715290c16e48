//! Rewriting of in-repository references inside documentation pages.
//!
//! Documentation pages are rendered one directory below the site root
//! (`docs/…`), images are flattened into `images/`. Links written against the
//! repository layout therefore need rewriting before the markdown is rendered.
//!
//! Two passes run over the raw markdown, links first:
//!
//! | Pattern | Target | Result |
//! |---|---|---|
//! | `[t](x.md#a)` | markdown file | `[t](../docs/…/x.html#a)` |
//! | `[t](x.png)` | image via plain link | unchanged |
//! | `[t](http…)`, `[t](#a)` | external / anchor | unchanged |
//! | `![a](p/x.png)` | image embed | `![a](../images/x.png)` |
//! | `![a](http…)` | external embed | unchanged |
//!
//! Images reached through a plain link (not an embed) keep their repository
//! path and will not resolve in the generated site. Flattening means two
//! images with the same filename collide; the one copied last wins.
//!
//! Anything that does not match the patterns is passed through untouched.

use crate::paths::{is_external, output_path_for, resolve_relative};
use crate::snapshot::{file_name, is_image_file, is_markdown_file};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `[text](target)`, capturing an optional leading `!` so embeds can be skipped.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));

/// `![alt](target)`.
static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("valid image regex"));

/// Output subtree that documentation pages are written into.
pub const DOCS_ROOT: &str = "docs";

/// Output directory that every image is flattened into.
pub const IMAGES_ROOT: &str = "images";

/// Run both rewrite passes over a documentation page's markdown.
pub fn rewrite_references(content: &str, document_path: &str) -> String {
    let linked = rewrite_markdown_links(content, document_path);
    rewrite_image_embeds(&linked, document_path)
}

/// Point links at other markdown documents to their generated HTML pages.
pub fn rewrite_markdown_links(content: &str, document_path: &str) -> String {
    LINK_PATTERN
        .replace_all(content, |caps: &Captures| {
            let original = caps[0].to_string();
            if !caps[1].is_empty() {
                return original;
            }
            let text = &caps[2];
            let target = &caps[3];
            match rewrite_link_target(target, document_path) {
                Some(rewritten) => format!("[{text}]({rewritten})"),
                None => original,
            }
        })
        .into_owned()
}

/// Point image embeds at the flattened `images/` directory.
pub fn rewrite_image_embeds(content: &str, document_path: &str) -> String {
    IMAGE_PATTERN
        .replace_all(content, |caps: &Captures| {
            let alt = &caps[1];
            let target = &caps[2];
            if is_external(target) {
                return caps[0].to_string();
            }
            let resolved = resolve_relative(target, document_path);
            format!("![{alt}](../{IMAGES_ROOT}/{})", file_name(&resolved))
        })
        .into_owned()
}

/// New target for a plain link, or `None` to leave it alone.
fn rewrite_link_target(target: &str, document_path: &str) -> Option<String> {
    if is_external(target) || target.starts_with('#') {
        return None;
    }
    let (path, anchor) = match target.find('#') {
        Some(idx) => target.split_at(idx),
        None => (target, ""),
    };
    if is_image_file(path) || !is_markdown_file(path) {
        return None;
    }
    let resolved = resolve_relative(path, document_path);
    Some(format!("../{}{anchor}", output_path_for(&resolved, DOCS_ROOT)))
}
