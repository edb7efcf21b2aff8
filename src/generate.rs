//! Wiki page generation.
//!
//! Stage 2 of the build. Takes the scan [`Manifest`], rewrites cross-document
//! links, and writes the flat wiki page set together with the index and
//! sidebar pages.
//!
//! ## Output Structure
//!
//! ```text
//! wiki/
//! ├── Home.md                # Index: every page, grouped by source directory
//! ├── _Sidebar.md            # Navigation: top-level structure + recent pages
//! ├── getting-started.md     # docs/guide.md
//! ├── api-reference.md       # docs/api/reference.md
//! └── todo-list.md           # notes/todo.md
//! ```
//!
//! ## Determinism
//!
//! Page bodies and the index depend only on the input files, so re-running
//! over unchanged input produces byte-identical output. Pages whose content
//! is already on disk are not rewritten. The sidebar's "Recently Updated"
//! list is the only timestamp-dependent output.

use crate::config::WikiConfig;
use crate::links::{LinkMap, rewrite_links};
use crate::scan::Manifest;
use crate::types::{Document, Section, SkippedFile};
use log::{debug, info, warn};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happened to one document.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub title: String,
    pub slug: String,
    pub source_path: String,
    pub rewritten_links: usize,
    pub unresolved_links: Vec<String>,
    /// Output already had identical content and was left alone.
    pub unchanged: bool,
}

/// Result of the generate stage.
#[derive(Debug, Default)]
pub struct Summary {
    pub pages: Vec<GeneratedPage>,
    pub skipped: Vec<SkippedFile>,
    pub collisions: BTreeMap<String, Vec<String>>,
    pub home_page: PathBuf,
    pub sidebar_page: PathBuf,
    pub source_dirs: usize,
}

impl Summary {
    pub fn unchanged_count(&self) -> usize {
        self.pages.iter().filter(|p| p.unchanged).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.pages.iter().map(|p| p.unresolved_links.len()).sum()
    }
}

pub fn generate(
    manifest: &Manifest,
    output_dir: &Path,
    config: &WikiConfig,
) -> Result<Summary, GenerateError> {
    fs::create_dir_all(output_dir).map_err(|source| GenerateError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let link_map = LinkMap::build(manifest.documents());
    debug!("Link map has {} entries", link_map.len());

    let mut summary = Summary {
        skipped: manifest.skipped.clone(),
        source_dirs: manifest.sections.len(),
        ..Summary::default()
    };

    for (slug, sources) in manifest.slug_collisions() {
        warn!(
            "Slug '{}' is shared by {}; {} wins",
            slug,
            sources.join(", "),
            sources.last().map(String::as_str).unwrap_or_default()
        );
        summary.collisions.insert(slug.to_string(), sources);
    }

    let mut written = HashSet::new();
    for doc in manifest.documents() {
        let result = rewrite_links(&doc.body, &link_map, config.links.matching);
        let page_path = output_dir.join(format!("{}.md", doc.slug));

        match write_if_changed(&page_path, &result.body) {
            Ok(changed) => {
                info!("Processed: {} → {}", doc.source_path(), page_path.display());
                for target in &result.unresolved {
                    debug!("{}: unresolved link {}", doc.source_path(), target);
                }
                written.insert(doc.source_path());
                summary.pages.push(GeneratedPage {
                    title: doc.title.clone(),
                    slug: doc.slug.clone(),
                    source_path: doc.source_path(),
                    rewritten_links: result.rewritten,
                    unresolved_links: result.unresolved,
                    unchanged: !changed,
                });
            }
            Err(err) => {
                warn!("Error processing {}: {}", doc.source_path(), err);
                summary.skipped.push(SkippedFile {
                    path: page_path,
                    reason: err.to_string(),
                });
            }
        }
    }

    let home_path = output_dir.join(format!("{}.md", config.pages.home));
    write_if_changed(&home_path, &render_index(manifest, &written))?;

    let sidebar_path = output_dir.join(format!("{}.md", config.pages.sidebar));
    write_if_changed(&sidebar_path, &render_sidebar(manifest, &written, config))?;

    summary.home_page = home_path;
    summary.sidebar_page = sidebar_path;
    Ok(summary)
}

/// Write `content` unless the file already holds exactly these bytes.
///
/// Returns whether the file was written.
fn write_if_changed(path: &Path, content: &str) -> std::io::Result<bool> {
    if fs::read(path).is_ok_and(|existing| existing == content.as_bytes()) {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

// ============================================================================
// Index page
// ============================================================================

/// Documents of one directory level, with nested directories by name.
#[derive(Default)]
struct DirNode<'a> {
    documents: Vec<&'a Document>,
    children: BTreeMap<&'a str, DirNode<'a>>,
}

impl<'a> DirNode<'a> {
    fn from_section(section: &'a Section, written: &HashSet<String>) -> Self {
        let mut root = DirNode::default();
        for doc in &section.documents {
            if !written.contains(&doc.source_path()) {
                continue;
            }
            let mut node = &mut root;
            for component in doc.dir_components() {
                node = node.children.entry(component).or_default();
            }
            node.documents.push(doc);
        }
        root.sort();
        root
    }

    fn sort(&mut self) {
        self.documents.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        for child in self.children.values_mut() {
            child.sort();
        }
    }

    fn page_count(&self) -> usize {
        self.documents.len() + self.children.values().map(DirNode::page_count).sum::<usize>()
    }

    fn render(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        for doc in &self.documents {
            out.push_str(&format!("{indent}- {}\n", page_link(doc)));
        }
        for (name, child) in &self.children {
            out.push_str(&format!("{indent}- **{name}**\n"));
            child.render(depth + 1, out);
        }
    }
}

fn page_link(doc: &Document) -> String {
    format!("[{}]({})", doc.title, doc.slug)
}

/// Render the index page: every written document, grouped by section and
/// nested by directory. Files come before subdirectories at each level.
pub fn render_index(manifest: &Manifest, written: &HashSet<String>) -> String {
    let mut out = String::from("# Wiki Index\n\n");
    out.push_str(&format!(
        "*Generated from {} markdown files across {} directories*\n\n",
        written.len(),
        manifest.sections.len()
    ));

    for section in &manifest.sections {
        out.push_str(&format!("## {}\n\n", section.title));
        let tree = DirNode::from_section(section, written);
        if tree.page_count() == 0 {
            out.push_str("*No pages*\n");
        } else {
            tree.render(0, &mut out);
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// Sidebar page
// ============================================================================

/// Render the sidebar: a home link, each section's root pages and top-level
/// directories, then the most recently modified pages.
pub fn render_sidebar(
    manifest: &Manifest,
    written: &HashSet<String>,
    config: &WikiConfig,
) -> String {
    let home = &config.pages.home;
    let mut out = format!("**[{home}]({home})**\n\n");

    for section in &manifest.sections {
        out.push_str(&format!("### {}\n\n", section.title));
        let tree = DirNode::from_section(section, written);
        for doc in &tree.documents {
            out.push_str(&format!("- {}\n", page_link(doc)));
        }
        for (name, child) in &tree.children {
            let count = child.page_count();
            let noun = if count == 1 { "page" } else { "pages" };
            out.push_str(&format!("- **{name}** ({count} {noun})\n"));
        }
        out.push('\n');
    }

    let recent = recently_updated(manifest, written, config.sidebar.recent_limit);
    if !recent.is_empty() {
        out.push_str("### Recently Updated\n\n");
        for doc in recent {
            out.push_str(&format!("- {}\n", page_link(doc)));
        }
        out.push('\n');
    }
    out
}

/// Up to `limit` written documents, newest first, ties by slug.
fn recently_updated<'a>(
    manifest: &'a Manifest,
    written: &HashSet<String>,
    limit: usize,
) -> Vec<&'a Document> {
    let mut docs: Vec<&Document> = manifest
        .documents()
        .filter(|d| d.modified.is_some() && written.contains(&d.source_path()))
        .collect();
    docs.sort_by(|a, b| {
        Reverse(a.modified)
            .cmp(&Reverse(b.modified))
            .then_with(|| a.slug.cmp(&b.slug))
    });
    docs.truncate(limit);
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_helpers::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn generate_fixtures() -> (TempDir, Summary) {
        let tmp = setup_fixtures();
        let config = WikiConfig::default();
        let manifest = scan(tmp.path(), &config).unwrap();
        let summary = generate(&manifest, &config.output_path(tmp.path()), &config).unwrap();
        (tmp, summary)
    }

    fn all_written(manifest: &Manifest) -> HashSet<String> {
        manifest.documents().map(|d| d.source_path()).collect()
    }

    #[test]
    fn pages_written_under_slug() {
        let (tmp, summary) = generate_fixtures();
        assert_eq!(summary.pages.len(), 5);
        for slug in [
            "getting-started",
            "project-overview",
            "api-reference",
            "wire-format",
            "todo-list",
        ] {
            assert!(
                tmp.path().join("wiki").join(format!("{slug}.md")).is_file(),
                "missing page {slug}"
            );
        }
    }

    #[test]
    fn body_without_links_copied_verbatim() {
        let (tmp, _) = generate_fixtures();
        let original = fs::read_to_string(tmp.path().join("docs/guide.md")).unwrap();
        assert_eq!(read_output(tmp.path(), "getting-started.md"), original);
    }

    #[test]
    fn links_rewritten_in_output() {
        let (tmp, summary) = generate_fixtures();
        let overview = read_output(tmp.path(), "project-overview.md");
        assert!(overview.contains("[guide](getting-started)"));
        assert!(overview.contains("[API notes](api-reference#endpoints)"));
        assert!(overview.contains("[Rust](https://www.rust-lang.org)"));
        assert!(overview.contains("![diagram](diagram.png)"));

        let todo = summary
            .pages
            .iter()
            .find(|p| p.slug == "todo-list")
            .unwrap();
        assert_eq!(todo.rewritten_links, 1);
        assert_eq!(todo.unresolved_links, vec!["missing.md".to_string()]);
    }

    #[test]
    fn index_lists_hierarchy() {
        let (tmp, _) = generate_fixtures();
        let home = read_output(tmp.path(), "Home.md");
        assert_eq!(
            home,
            "# Wiki Index\n\
             \n\
             *Generated from 5 markdown files across 2 directories*\n\
             \n\
             ## Docs\n\
             \n\
             - [Getting Started](getting-started)\n\
             - [Project Overview](project-overview)\n\
             - **api**\n\
             \x20\x20- [API Reference](api-reference)\n\
             \x20\x20- **internal**\n\
             \x20\x20\x20\x20- [Wire Format](wire-format)\n\
             \n\
             ## Notes\n\
             \n\
             - [TODO List](todo-list)\n\
             \n"
        );
    }

    #[test]
    fn index_marks_empty_section() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("notes")).unwrap();
        let manifest = scan(tmp.path(), &WikiConfig::default()).unwrap();

        let home = render_index(&manifest, &HashSet::new());
        assert!(home.contains("## Notes\n\n*No pages*\n"));
        assert!(home.contains("*Generated from 0 markdown files across 1 directories*"));
    }

    #[test]
    fn index_omits_unwritten_documents() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path(), &WikiConfig::default()).unwrap();
        let mut written = all_written(&manifest);
        written.remove("docs/guide.md");

        let home = render_index(&manifest, &written);
        assert!(!home.contains("getting-started"));
        assert!(home.contains("*Generated from 4 markdown files"));
    }

    #[test]
    fn sidebar_summarizes_top_level() {
        let (tmp, _) = generate_fixtures();
        let sidebar = read_output(tmp.path(), "_Sidebar.md");
        assert!(sidebar.starts_with("**[Home](Home)**\n\n### Docs\n\n"));
        assert!(sidebar.contains("- [Getting Started](getting-started)\n"));
        assert!(sidebar.contains("- **api** (2 pages)\n"));
        assert!(sidebar.contains("### Notes\n\n- [TODO List](todo-list)\n"));
        // Nested pages are not listed individually outside the recent list
        let structure = sidebar.split("### Recently Updated").next().unwrap();
        assert!(!structure.contains("wire-format"));
        assert!(!structure.contains("internal"));
    }

    #[test]
    fn sidebar_recent_list_ordered_by_mtime() {
        let tmp = setup_fixtures();
        let mut manifest = scan(tmp.path(), &WikiConfig::default()).unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        for (i, doc) in manifest.sections[0].documents.iter_mut().enumerate() {
            doc.modified = Some(base + Duration::from_secs(i as u64));
        }
        manifest.sections[1].documents[0].modified = None;

        let mut config = WikiConfig::default();
        config.sidebar.recent_limit = 2;
        let sidebar = render_sidebar(&manifest, &all_written(&manifest), &config);
        let recent = sidebar.split("### Recently Updated\n\n").nth(1).unwrap();
        assert_eq!(
            recent,
            "- [Project Overview](project-overview)\n- [Getting Started](getting-started)\n\n"
        );
    }

    #[test]
    fn sidebar_recent_list_disabled() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path(), &WikiConfig::default()).unwrap();
        let mut config = WikiConfig::default();
        config.sidebar.recent_limit = 0;
        let sidebar = render_sidebar(&manifest, &all_written(&manifest), &config);
        assert!(!sidebar.contains("Recently Updated"));
    }

    #[test]
    fn custom_page_names() {
        let tmp = setup_fixtures();
        let mut config = WikiConfig::default();
        config.pages.home = "Index".into();
        config.pages.sidebar = "Nav".into();
        let manifest = scan(tmp.path(), &config).unwrap();
        let summary = generate(&manifest, &tmp.path().join("out"), &config).unwrap();

        assert!(summary.home_page.ends_with("Index.md"));
        assert!(tmp.path().join("out/Index.md").is_file());
        let nav = fs::read_to_string(tmp.path().join("out/Nav.md")).unwrap();
        assert!(nav.starts_with("**[Index](Index)**"));
    }

    #[test]
    fn second_run_leaves_pages_unchanged() {
        let tmp = setup_fixtures();
        let config = WikiConfig::default();
        let out = config.output_path(tmp.path());

        let manifest = scan(tmp.path(), &config).unwrap();
        let first = generate(&manifest, &out, &config).unwrap();
        assert_eq!(first.unchanged_count(), 0);
        let home_before = read_output(tmp.path(), "Home.md");

        let manifest = scan(tmp.path(), &config).unwrap();
        let second = generate(&manifest, &out, &config).unwrap();
        assert_eq!(second.unchanged_count(), 5);
        assert_eq!(read_output(tmp.path(), "Home.md"), home_before);
    }

    #[test]
    fn slug_collision_last_document_wins() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "docs/a.md", "# Setup Guide\n\nfrom a\n");
        write_file(tmp.path(), "notes/b.md", "# setup guide!\n\nfrom b\n");

        let config = WikiConfig::default();
        let manifest = scan(tmp.path(), &config).unwrap();
        let summary = generate(&manifest, &config.output_path(tmp.path()), &config).unwrap();

        assert_eq!(summary.collisions.len(), 1);
        assert!(read_output(tmp.path(), "setup-guide.md").contains("from b"));
    }

    #[test]
    fn page_named_like_index_keeps_its_content() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "docs/index.md", "# Index\n\nreal content\n");
        write_file(tmp.path(), "docs/other.md", "# Other\n\n[back](index.md)\n");
        let mut config = WikiConfig::default();
        config.pages.home = "index".into();

        let manifest = scan(tmp.path(), &config).unwrap();
        generate(&manifest, &config.output_path(tmp.path()), &config).unwrap();

        assert_eq!(read_output(tmp.path(), "index-page.md"), "# Index\n\nreal content\n");
        assert!(read_output(tmp.path(), "other.md").contains("[back](index-page)"));
        let home = read_output(tmp.path(), "index.md");
        assert!(home.starts_with("# Wiki Index\n"));
        assert!(home.contains("- [Index](index-page)\n"));
    }

    #[test]
    fn write_if_changed_reports_writes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.md");
        assert!(write_if_changed(&path, "one").unwrap());
        assert!(!write_if_changed(&path, "one").unwrap());
        assert!(write_if_changed(&path, "two").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn unwritable_page_skipped_not_fatal() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "docs/good.md", "# Good");
        write_file(tmp.path(), "docs/blocked.md", "# Blocked");

        let config = WikiConfig::default();
        let out = config.output_path(tmp.path());
        // A directory where the page file should go makes the write fail.
        fs::create_dir_all(out.join("blocked.md")).unwrap();

        let manifest = scan(tmp.path(), &config).unwrap();
        let summary = generate(&manifest, &out, &config).unwrap();
        assert_eq!(summary.pages.len(), 1);
        assert_eq!(summary.skipped.len(), 1);
        let home = read_output(tmp.path(), "Home.md");
        assert!(home.contains("[Good](good)"));
        assert!(!home.contains("[Blocked](blocked)"));
    }
}
