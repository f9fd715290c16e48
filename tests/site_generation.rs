//! End-to-end site generation through the public library API.

use pretty_assertions::assert_eq;
use repo_site::compose::SiteContext;
use repo_site::config::ScanConfig;
use repo_site::generate::generate;
use repo_site::scan::scan;
use repo_site::skin::{BuiltinSkin, TemplateSkin};
use repo_site::snapshot::RepositorySnapshot;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const STAMP: &str = "2024-01-02 03:04:05";

fn snapshot(docs: &[(&str, &str)]) -> RepositorySnapshot {
    let mut snap = RepositorySnapshot::new("acme", "widgets", "github.com");
    for (path, content) in docs {
        snap.documents.insert(path.to_string(), content.to_string());
    }
    if let Some(content) = snap.documents.get("README.md") {
        snap.readme_path = Some("README.md".to_string());
        snap.readme_content = content.clone();
    }
    snap
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

fn files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

#[test]
fn overview_and_linked_pages() {
    let snap = snapshot(&[
        ("README.md", "# Hi\n\nWorld"),
        ("a.md", "# A\n\n[b](./b.md)"),
        ("b.md", "# B"),
    ]);
    let out = TempDir::new().unwrap();
    let result = generate(
        &SiteContext::with_generated_at(&snap, STAMP),
        &BuiltinSkin,
        out.path(),
    )
    .unwrap();

    assert_eq!(result.document_count, 2);
    assert_eq!(result.image_count, 0);

    let index = read(out.path(), "index.html");
    assert!(index.contains(">Hi</h1>"));
    assert!(index.contains("<p>World</p>"));
    assert!(index.contains("<title>acme/widgets</title>"));

    let a = read(out.path(), "docs/a.html");
    assert!(a.contains(r#"<a href="../docs/b.html">b</a>"#), "{a}");

    let b = read(out.path(), "docs/b.html");
    assert!(b.contains("<title>B - acme/widgets</title>"));
}

#[test]
fn nested_documents_keep_their_directory() {
    let snap = snapshot(&[
        ("docs/a.md", "# A\n\n[b](./b.md) and [top](/guide.md#setup)"),
        ("docs/b.md", "# B"),
        ("guide.md", "# Guide\n\n## Setup"),
    ]);
    let out = TempDir::new().unwrap();
    generate(
        &SiteContext::with_generated_at(&snap, STAMP),
        &BuiltinSkin,
        out.path(),
    )
    .unwrap();

    assert_eq!(
        files(out.path()),
        vec![
            "docs/docs/a.html",
            "docs/docs/b.html",
            "docs/guide.html",
            "index.html",
            "style.css",
        ]
    );
    let a = read(out.path(), "docs/docs/a.html");
    assert!(a.contains(r#"href="../docs/docs/b.html""#), "{a}");
    assert!(a.contains(r#"href="../docs/guide.html#setup""#), "{a}");
    assert!(read(out.path(), "docs/guide.html").contains(r#"<h2 id="setup">"#));
}

#[test]
fn images_are_flattened_and_embeds_rewritten() {
    let src = TempDir::new().unwrap();
    fs::create_dir_all(src.path().join("assets/deep")).unwrap();
    fs::write(src.path().join("assets/deep/d.png"), b"PNG").unwrap();

    let mut snap = snapshot(&[("docs/sub/page.md", "![diagram](../../assets/deep/d.png)")]);
    snap.images.insert(
        "assets/deep/d.png".to_string(),
        src.path().join("assets/deep/d.png"),
    );
    let out = TempDir::new().unwrap();
    let result = generate(
        &SiteContext::with_generated_at(&snap, STAMP),
        &BuiltinSkin,
        out.path(),
    )
    .unwrap();

    assert_eq!(result.image_count, 1);
    assert_eq!(read(out.path(), "images/d.png"), "PNG");
    let page = read(out.path(), "docs/docs/sub/page.html");
    assert!(page.contains(r#"src="../images/d.png""#), "{page}");
}

#[test]
fn each_page_marks_only_itself_active() {
    let snap = snapshot(&[
        ("README.md", "# Home"),
        ("one.md", "# One"),
        ("two.md", "# Two"),
        ("three.md", "# Three"),
    ]);
    let out = TempDir::new().unwrap();
    generate(
        &SiteContext::with_generated_at(&snap, STAMP),
        &BuiltinSkin,
        out.path(),
    )
    .unwrap();

    assert_eq!(read(out.path(), "index.html").matches(r#"class="active""#).count(), 0);
    for page in ["one", "two", "three"] {
        let html = read(out.path(), &format!("docs/{page}.html"));
        assert_eq!(html.matches(r#"class="active""#).count(), 1, "{page}");
        assert!(html.contains(&format!(
            r#"<li class="active"><a href="../docs/{page}.html">"#
        )));
    }
}

#[test]
fn regeneration_is_byte_identical() {
    let snap = snapshot(&[
        ("README.md", "# Hi\n\n| a | b |\n|---|---|\n| 1 | 2 |"),
        ("guide.md", "# Guide\n\n[faq](faq.md)"),
        ("faq.md", "# FAQ"),
    ]);
    let ctx = SiteContext::with_generated_at(&snap, STAMP);
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let result_a = generate(&ctx, &BuiltinSkin, first.path()).unwrap();
    let result_b = generate(&ctx, &BuiltinSkin, second.path()).unwrap();

    assert_eq!(result_a.document_count, result_b.document_count);
    let listing = files(first.path());
    assert_eq!(listing, files(second.path()));
    for rel in &listing {
        assert_eq!(read(first.path(), rel), read(second.path(), rel), "{rel}");
    }
}

#[test]
fn structure_summary_lists_pages_by_title() {
    let snap = snapshot(&[("z.md", "# Alpha"), ("a.md", "# Beta")]);
    let out = TempDir::new().unwrap();
    let result = generate(
        &SiteContext::with_generated_at(&snap, STAMP),
        &BuiltinSkin,
        out.path(),
    )
    .unwrap();

    let expected = format!(
        "{}/\n  ├── index.html\n  ├── docs/\n  │   ├── z.html\n  │   └── a.html\n  └── images/\n      └── (empty)\n",
        out.path().display()
    );
    assert_eq!(result.structure_summary, expected);
}

#[test]
fn template_override_replaces_doc_pages_only() {
    let snap = snapshot(&[("README.md", "# Home"), ("guide.md", "# Guide")]);
    let skin = TemplateSkin::from_sources(
        None,
        Some("<main data-page=\"{{current_page}}\">{{{page_content}}}</main>"),
        Some("body { color: red; }".to_string()),
    )
    .unwrap();
    let out = TempDir::new().unwrap();
    generate(&SiteContext::with_generated_at(&snap, STAMP), &skin, out.path()).unwrap();

    let guide = read(out.path(), "docs/guide.html");
    assert!(guide.starts_with(r#"<main data-page="docs/guide.html">"#), "{guide}");
    assert!(read(out.path(), "index.html").starts_with("<!DOCTYPE html>"));
    assert_eq!(read(out.path(), "style.css"), "body { color: red; }");
}

#[test]
fn scanned_checkout_generates_site() {
    let repo = TempDir::new().unwrap();
    let root = repo.path();
    fs::write(root.join("README.md"), "# Widgets\n\nTiny widgets.\n\n![logo](assets/logo.svg)").unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("docs/usage.md"), "# Usage\n\n![logo](../assets/logo.svg)").unwrap();
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("assets/logo.svg"), "<svg/>").unwrap();
    fs::write(root.join("LICENSE"), "MIT License\n\nCopyright").unwrap();

    let snap = scan(root, "acme", "widgets", "github.com", &ScanConfig::default(), &[]).unwrap();
    assert_eq!(snap.description, "Tiny widgets.");
    assert_eq!(snap.license.as_deref(), Some("MIT License"));

    let out = TempDir::new().unwrap();
    let result = generate(
        &SiteContext::with_generated_at(&snap, STAMP),
        &BuiltinSkin,
        out.path(),
    )
    .unwrap();

    assert_eq!(result.document_count, 1);
    assert_eq!(
        files(out.path()),
        vec!["docs/docs/usage.html", "images/logo.svg", "index.html", "style.css"]
    );
    let index = read(out.path(), "index.html");
    assert!(index.contains("MIT License"));
    assert!(index.contains(r#"src="assets/logo.svg""#));
    let usage = read(out.path(), "docs/docs/usage.html");
    assert!(usage.contains(r#"src="../images/logo.svg""#));
}

#[test]
fn rebuilding_into_the_checkout_keeps_images() {
    let repo = TempDir::new().unwrap();
    let root = repo.path();
    fs::write(root.join("README.md"), "# Widgets").unwrap();
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("assets/logo.png"), b"PNGDATA").unwrap();
    let out_dir = root.join("dist");
    let exclude = [out_dir.clone(), root.join(".repo-site-temp")];

    for run in 0..2 {
        let snap = scan(
            root,
            "acme",
            "widgets",
            "github.com",
            &ScanConfig::default(),
            &exclude,
        )
        .unwrap();
        let images: Vec<&str> = snap.images.keys().map(String::as_str).collect();
        assert_eq!(images, vec!["assets/logo.png"], "run {run}");

        let result = generate(
            &SiteContext::with_generated_at(&snap, STAMP),
            &BuiltinSkin,
            &out_dir,
        )
        .unwrap();
        assert_eq!(result.image_count, 1, "run {run}");
        assert_eq!(read(&out_dir, "images/logo.png"), "PNGDATA", "run {run}");
    }
}
