//! Markdown to HTML rendering.
//!
//! Thin layer over `pulldown-cmark` with GitHub-style extensions enabled
//! (tables, strikethrough, task lists, footnotes). Two adjustments are made on
//! the event stream before HTML is written:
//!
//! - Headings without an explicit `{#id}` receive a slug id derived from their
//!   text, so in-page anchors like `guide.html#setup` resolve. Repeated slugs
//!   get `-1`, `-2`, … suffixes in document order.
//! - Links with a URL scheme (`https://…`, `mailto:…`) open in a new tab.
//!   Relative links stay in the current tab so offline navigation works.

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, html};
use std::collections::HashMap;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render markdown text to an HTML fragment.
pub fn render_markdown(text: &str) -> String {
    let events: Vec<Event> = Parser::new_ext(text, options()).collect();
    let events = assign_heading_ids(events)
        .into_iter()
        .map(open_external_links);

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn assign_heading_ids(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for i in 0..events.len() {
        if !matches!(&events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let slug = unique_slug(slugify(&heading_text(&events[i + 1..])), &mut seen);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
    events
}

/// Plain text of a heading, read from the events that follow its start tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Lowercase alphanumerics; every other run of characters becomes one dash.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

fn unique_slug(slug: String, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(slug.clone()).or_insert(0);
    let unique = if *count == 0 {
        slug
    } else {
        format!("{slug}-{count}")
    };
    *count += 1;
    unique
}

fn open_external_links(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) if link_type != LinkType::Email && has_scheme(&dest_url) => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(r#" title="{}""#, escape_attr(&title))
            };
            Event::InlineHtml(CowStr::from(format!(
                r#"<a href="{}"{title_attr} target="_blank">"#,
                escape_attr(&dest_url)
            )))
        }
        other => other,
    }
}

fn has_scheme(url: &str) -> bool {
    url.contains("://") || url.starts_with("mailto:")
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
