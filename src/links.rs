//! Cross-document link rewriting.
//!
//! Documents are renamed on the way into the wiki (`docs/guide.md` becomes
//! `getting-started.md`), so relative links between them break unless they
//! are pointed at the new page names. The [`LinkMap`] remembers every name a
//! document could be linked by; [`rewrite_links`] swaps matching inline link
//! targets for the page slug.
//!
//! ## Resolution
//!
//! ```text
//! [See guide](guide.md)            exact stem          → [See guide](getting-started)
//! [API](api/reference.md#auth)     exact relative path → [API](api-reference#auth)
//! [Up](../overview.md)             boundary suffix     → [Up](project-overview)
//! [Gone](missing.md)               no match            → unchanged
//! [Rust](https://rust-lang.org)    external            → unchanged
//! ```
//!
//! The fallback is a heuristic. In `substring` mode `guide` also matches
//! `user-guide`, which can rewrite a link to the wrong page; `boundary` mode
//! only accepts matches aligned on `/`.
//!
//! Fenced code blocks (```` ``` ```` or `~~~`) and inline code spans are
//! copied as-is, so link syntax shown as an example stays intact. Indented
//! code blocks are not recognized.

use crate::config::LinkMatching;
use crate::types::Document;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// An inline code span, or an inline link whose text may hold an image.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<code>``[^`]+(?:`[^`]+)*``|`[^`\n]+`)",
        r"|(?P<bang>!?)\[(?P<text>(?:!\[[^\]]*\]\([^)]*\)|[^\]])*)\]",
        r#"\((?P<target>[^)\s]+)(?P<title>\s+"[^"]*")?\)"#,
    ))
    .expect("link pattern is valid")
});

/// Every name a document can be linked by, mapped to its page slug.
#[derive(Debug, Default)]
pub struct LinkMap {
    entries: BTreeMap<String, String>,
}

impl LinkMap {
    /// Build the map in document order. Keys claimed twice go to the later document.
    ///
    /// Each document is registered under its source path (`docs/api/reference`),
    /// its section-relative path (`api/reference`), and its bare stem
    /// (`reference`), all without `.md`.
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut entries = BTreeMap::new();
        for doc in documents {
            for key in [
                doc.source_path_without_ext(),
                doc.rel_path_without_ext(),
                doc.stem.clone(),
            ] {
                entries.insert(key, doc.slug.clone());
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a link path (no fragment) to a page slug.
    pub fn resolve(&self, target: &str, matching: LinkMatching) -> Option<&str> {
        let target = target.strip_suffix(".md").unwrap_or(target);
        if target.is_empty() {
            return None;
        }
        if let Some(slug) = self.entries.get(target) {
            return Some(slug.as_str());
        }
        // Longest key wins; on a tie, the first key in order.
        self.entries
            .iter()
            .filter(|(key, _)| fallback_matches(key, target, matching))
            .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(|(_, slug)| slug.as_str())
    }
}

fn fallback_matches(key: &str, target: &str, matching: LinkMatching) -> bool {
    match matching {
        LinkMatching::Boundary => {
            aligned_suffix(target, key) || aligned_suffix(key, target)
        }
        LinkMatching::Substring => target.contains(key) || key.contains(target),
    }
}

/// `path` ends with `/suffix`.
fn aligned_suffix(path: &str, suffix: &str) -> bool {
    path.strip_suffix(suffix)
        .is_some_and(|head| head.ends_with('/'))
}

/// Result of rewriting one document body.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub body: String,
    /// Links pointed at a page slug.
    pub rewritten: usize,
    /// `.md` link targets that matched no document, as written.
    pub unresolved: Vec<String>,
}

/// Rewrite inline links in `body` that point at known documents.
///
/// Images, links with a URL scheme, and pure `#fragment` links are never
/// touched. Unmatched links are left byte-for-byte as they were.
pub fn rewrite_links(body: &str, map: &LinkMap, matching: LinkMatching) -> Rewritten {
    let mut out = Rewritten {
        body: String::with_capacity(body.len()),
        rewritten: 0,
        unresolved: Vec::new(),
    };
    let mut prose = String::new();
    let mut fence: Option<Fence> = None;

    for line in body.split_inclusive('\n') {
        match &fence {
            Some(open) => {
                if open.closed_by(line) {
                    fence = None;
                }
                out.body.push_str(line);
            }
            None => match Fence::open(line) {
                Some(open) => {
                    rewrite_prose(&prose, map, matching, &mut out);
                    prose.clear();
                    fence = Some(open);
                    out.body.push_str(line);
                }
                None => prose.push_str(line),
            },
        }
    }
    rewrite_prose(&prose, map, matching, &mut out);
    out
}

/// Rewrite links in text outside fenced blocks, appending to `out`.
fn rewrite_prose(text: &str, map: &LinkMap, matching: LinkMatching, out: &mut Rewritten) {
    if text.is_empty() {
        return;
    }
    let new_text = LINK_RE.replace_all(text, |caps: &Captures| {
        let whole = caps[0].to_string();
        if caps.name("code").is_some() || !caps["bang"].is_empty() {
            return whole;
        }
        let target = &caps["target"];
        if is_external(target) {
            return whole;
        }
        let (path, fragment) = match target.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (target, None),
        };
        if path.is_empty() {
            return whole;
        }

        match map.resolve(path, matching) {
            Some(slug) => {
                out.rewritten += 1;
                let title = caps.name("title").map_or("", |m| m.as_str());
                let fragment = fragment.map(|f| format!("#{f}")).unwrap_or_default();
                format!("[{}]({slug}{fragment}{title})", &caps["text"])
            }
            None => {
                if path.ends_with(".md") {
                    out.unresolved.push(target.to_string());
                }
                whole
            }
        }
    });
    out.body.push_str(&new_text);
}

/// An open fenced code block: the fence character and its run length.
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// A line opening a fence: up to three spaces, then three or more of `` ` `` or `~`.
    fn open(line: &str) -> Option<Self> {
        let rest = fence_line(line)?;
        let marker = rest.chars().next()?;
        if marker != '`' && marker != '~' {
            return None;
        }
        let len = rest.chars().take_while(|&c| c == marker).count();
        // A backtick fence's info string cannot contain backticks.
        if len < 3 || (marker == '`' && rest[len..].contains('`')) {
            return None;
        }
        Some(Self { marker, len })
    }

    /// A closing fence: at least as long as the opener, nothing after it.
    fn closed_by(&self, line: &str) -> bool {
        let Some(rest) = fence_line(line) else {
            return false;
        };
        let len = rest.chars().take_while(|&c| c == self.marker).count();
        len >= self.len && rest[len..].trim().is_empty()
    }
}

/// The line without its leading indent, if indented by at most three spaces.
fn fence_line(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(' ');
    (line.len() - rest.len() <= 3).then_some(rest)
}

fn is_external(target: &str) -> bool {
    target.contains("://") || target.starts_with("mailto:")
}
