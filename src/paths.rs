//! Path resolution between repository locations and the generated site.
//!
//! Repository paths are forward-slash strings relative to the snapshot root.
//! Joins are lexical: `.` segments disappear and `..` segments consume the
//! preceding segment, which is all the normalization that happens. Callers
//! must not hand in references that climb above the repository root.

/// Map a markdown source path to its `.html` output path under `output_root`.
///
/// ```text
/// guide.md          + "docs" → docs/guide.html
/// api/client.md     + "docs" → docs/api/client.html
/// ```
pub fn output_path_for(source_path: &str, output_root: &str) -> String {
    let (dir, name) = split_dir(source_path);
    let html_name = format!("{}.html", strip_extension(name));
    match dir {
        None => join(&[output_root, &html_name]),
        Some(dir) => join(&[output_root, dir, &html_name]),
    }
}

/// Resolve a reference found inside `from_document` to a repo-relative path.
///
/// - `http…` and `#…` references are returned untouched.
/// - `/x` is taken from the repository root (`x`).
/// - `./x` and bare `x` are joined onto the document's directory, unless the
///   document sits at the root.
pub fn resolve_relative(reference: &str, from_document: &str) -> String {
    if is_external(reference) || reference.starts_with('#') {
        return reference.to_string();
    }
    if let Some(rooted) = reference.strip_prefix('/') {
        return rooted.to_string();
    }
    let reference = reference.strip_prefix("./").unwrap_or(reference);
    match split_dir(from_document).0 {
        Some(dir) => join(&[dir, reference]),
        None => reference.to_string(),
    }
}

/// References beginning with `http` (which covers `https`) leave the repository.
pub fn is_external(reference: &str) -> bool {
    reference.starts_with("http")
}

/// Join segments with `/` and normalize the result lexically.
pub fn join(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    clean(&joined)
}

/// Lexically normalize a relative forward-slash path.
///
/// Empty and `.` segments are dropped; `..` removes the previous segment, or
/// is kept when there is nothing left to remove. An empty result is `.`.
pub fn clean(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Split into (directory, filename); the directory is `None` at the root.
fn split_dir(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) if !dir.is_empty() && dir != "." => (Some(dir), name),
        Some((_, name)) => (None, name),
        None => (None, path),
    }
}

/// Drop the final `.ext` of a filename (a leading dot is part of the name).
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}
