//! Pulls the "AI Twitter Recap" bullet list out of an AI News issue body.
//!
//! This is a pattern-matching heuristic over one known newsletter template,
//! not an HTML parser. Any structural deviation (heading renamed, list not
//! built from `<li>` items) yields an empty list rather than an error.

use std::sync::LazyLock;

use regex::Regex;

use super::types::TwitterRecapItem;

static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<h1>AI Twitter Recap</h1>(.*?)(?:<h1>|\z)").expect("valid section regex")
});
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<li>(.*?)</li>").expect("valid bullet regex"));
/// A link that closes the bullet: only whitespace or markup may follow it.
static TRAILING_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<a\b[^>]*>[^<]*</a>(?:\s*<[^>]*>)*\s*\z").expect("valid trailing anchor regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("valid tag regex"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*?):").expect("valid title regex"));
static HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"<a href="([^"]+)""#).expect("valid href regex"));

pub fn extract_recap_items(content: &str) -> Vec<TwitterRecapItem> {
    let content = html_escape::decode_html_entities(content);

    let Some(section) = SECTION.captures(&content).and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    BULLET
        .captures_iter(section.as_str())
        .filter_map(|c| c.get(1))
        .map(|bullet| recap_item(bullet.as_str()))
        .collect()
}

fn recap_item(bullet: &str) -> TwitterRecapItem {
    // a closing "link" label is noise; the target is kept in `link`
    let unlinked = TRAILING_ANCHOR.replace(bullet, "");
    let clean = TAG.replace_all(&unlinked, "");
    let clean = clean.trim();

    let (title, description) = match TITLE.captures(clean) {
        Some(c) => {
            let whole = c.get(0).map_or(0, |m| m.end());
            let title = c.get(1).map_or("", |m| m.as_str());
            (title.trim().to_string(), clean[whole..].trim().to_string())
        }
        None => (clean.to_string(), String::new()),
    };

    let link = HREF
        .captures(bullet)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    TwitterRecapItem { title, description, link }
}
