//! Titles and slugs for wiki pages.
//!
//! Every document gets two names: a human title and a filesystem-safe slug.
//! The title comes from the first level-1 heading; without one, it is derived
//! from the filename. The slug is derived from the title and becomes the wiki
//! page name:
//!
//! - `# Getting Started` → title "Getting Started", slug `getting-started`
//! - no heading, `api_reference.md` → title "Api Reference", slug `api-reference`
//! - `# ???` in `faq.md` → title "???", slug `faq` (empty slug falls back to the stem)
//!
//! ## Collisions
//!
//! Slugs only keep `[a-z0-9-]`, so titles that differ only in case or
//! punctuation map to the same page: "Setup Guide", "setup guide!" and
//! "SETUP/GUIDE" are all `setup-guide`. The generator reports these and the
//! document scanned last wins.

use regex::Regex;
use std::sync::LazyLock;

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").expect("heading pattern is valid"));

/// Slug used when neither the title nor the filename leaves any characters.
pub const FALLBACK_SLUG: &str = "untitled";

/// Sanitize text into a slug.
///
/// Lowercase, replace every character outside `[a-z0-9]` with `-`, collapse
/// runs of `-`, and strip leading/trailing `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Page slug for a document: the title's slug, else the stem's, else [`FALLBACK_SLUG`].
pub fn page_slug(title: &str, stem: &str) -> String {
    let from_title = slugify(title);
    if !from_title.is_empty() {
        return from_title;
    }
    let from_stem = slugify(stem);
    if !from_stem.is_empty() {
        return from_stem;
    }
    FALLBACK_SLUG.to_string()
}

/// Extract the title from markdown content, falling back to the filename stem.
pub fn extract_title(content: &str, stem: &str) -> String {
    H1_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| title_from_stem(stem))
}

/// Turn a filename stem into a display title.
///
/// Dashes and underscores become spaces, then every alphabetic run is
/// capitalized: `getting-started` → "Getting Started", `api_v2` → "Api V2".
pub fn title_from_stem(stem: &str) -> String {
    let spaced = stem.replace(['-', '_'], " ");
    let mut title = String::with_capacity(spaced.len());
    let mut in_word = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}

/// Heading for a source directory: `docs` → "Docs", `NOTES` → "Notes".
pub fn section_title(dir_name: &str) -> String {
    let mut chars = dir_name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
