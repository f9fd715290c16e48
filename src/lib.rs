//! # repo-site
//!
//! Turns a repository's Markdown documentation into a self-contained static
//! website: the README becomes the landing page, every other document becomes
//! a page under `docs/`, images are collected into `images/`, and links between
//! documents are rewritten so the site can be browsed offline or dropped on any
//! static host.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      checkout/  →  snapshot.json   (filesystem + git log → structured data)
//! 2. Generate  snapshot   →  dist/           (final HTML site)
//! ```
//!
//! The snapshot is plain JSON, so it can be inspected, edited, or produced by
//! something other than [`scan`] entirely. Generation never touches the
//! repository; it only reads the snapshot and the image files it points at.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`snapshot`] | `RepositorySnapshot`, contributor ranking, file-kind predicates |
//! | [`scan`] | Stage 1: walks a checkout and reads `git log` to build the snapshot |
//! | [`paths`] | Source path → output path mapping, relative reference resolution |
//! | [`links`] | Rewrites document links and image embeds for the output layout |
//! | [`naming`] | Page titles from headings or prettified filenames |
//! | [`nav`] | Sorted documentation navigation with a per-page active entry |
//! | [`markdown`] | Markdown → HTML with heading ids and external-link targets |
//! | [`skin`] | Page skins: built-in Maud skin and Handlebars overrides |
//! | [`compose`] | Per-page model assembly, rendering, and writing |
//! | [`generate`] | Stage 2: writes the whole site and its structure summary |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud For The Built-In Skin
//!
//! The default pages are generated with [Maud](https://maud.lambda.xyz/), so
//! malformed markup is a build error and every interpolated value is escaped.
//! User overrides need a runtime engine and use Handlebars; both sit behind the
//! [`skin::Skin`] trait so the generator never knows which one it has.
//!
//! ## Read-Only Site Context
//!
//! Navigation and the generation timestamp are computed once into a
//! [`compose::SiteContext`] and only read afterwards. Each page clones the
//! navigation to mark itself active. Documentation pages are therefore rendered
//! in parallel on the rayon pool with no locking.
//!
//! ## Flattened Images
//!
//! Every image is copied to `images/<filename>` regardless of where it lived in
//! the repository. Two images with the same filename collide and the one
//! copied last wins.

pub mod compose;
pub mod config;
pub mod generate;
pub mod links;
pub mod markdown;
pub mod naming;
pub mod nav;
pub mod output;
pub mod paths;
pub mod scan;
pub mod skin;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_helpers;
