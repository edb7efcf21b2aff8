//! Source discovery.
//!
//! Stage 1 of the build. Finds the documentation directories under the
//! repository root and reads every markdown file below them into a
//! [`Manifest`] that link rewriting and generation consume.
//!
//! ## Directory Structure
//!
//! ```text
//! repo/
//! ├── wiki.toml                  # Optional configuration
//! ├── docs/                      # Source directory → "## Docs" section
//! │   ├── guide.md               # "# Getting Started" → getting-started.md
//! │   ├── _draft.md              # Skipped (prefix)
//! │   └── api/
//! │       └── reference.md       # Nested → indented under **api**
//! ├── notes/                     # Another section
//! │   └── todo.md
//! └── wiki/                      # Output, never scanned
//! ```
//!
//! ## Error Handling
//!
//! Per-file problems (unreadable files, invalid UTF-8, walk errors) are logged
//! and recorded in [`Manifest::skipped`]; they never abort the scan. A root
//! with none of the configured source directories yields an empty manifest,
//! which the CLI treats as a clean early exit.

use crate::config::{PagesConfig, WikiConfig};
use crate::naming;
use crate::types::{Document, Section, SkippedFile};
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Repository root is not a directory: {0}")]
    RootNotFound(PathBuf),
}

/// Output of the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl Manifest {
    /// All documents, section by section, in scan order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.sections.iter().flat_map(|s| s.documents.iter())
    }

    pub fn document_count(&self) -> usize {
        self.sections.iter().map(|s| s.documents.len()).sum()
    }

    /// True when no source directory was found.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Slugs claimed by more than one document, mapped to their source paths.
    ///
    /// The last source path listed is the one whose output survives.
    pub fn slug_collisions(&self) -> BTreeMap<&str, Vec<String>> {
        let mut by_slug: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for doc in self.documents() {
            by_slug
                .entry(doc.slug.as_str())
                .or_default()
                .push(doc.source_path());
        }
        by_slug.retain(|_, sources| sources.len() > 1);
        by_slug
    }
}

/// A configured source directory that exists under the root.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDir {
    pub name: String,
    pub path: PathBuf,
}

/// Find the configured source directories present under `root`, in config order.
///
/// Names that resolve to the same directory (`docs` and `Docs` on a
/// case-insensitive filesystem) are kept once, first name wins.
pub fn find_source_dirs(root: &Path, config: &WikiConfig) -> Vec<SourceDir> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for name in &config.source_dirs {
        let path = root.join(name);
        if !path.is_dir() {
            continue;
        }
        let identity = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if !seen.insert(identity) {
            debug!("{} resolves to an already scanned directory", path.display());
            continue;
        }
        found.push(SourceDir {
            name: name.clone(),
            path,
        });
    }
    found
}

pub fn scan(root: &Path, config: &WikiConfig) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    let output_dir = config.output_path(root);
    let output_identity = fs::canonicalize(&output_dir).ok();

    let mut sections = Vec::new();
    let mut skipped = Vec::new();

    for source in find_source_dirs(root, config) {
        debug!("Scanning {}", source.path.display());
        let documents = scan_section(&source, config, output_identity.as_deref(), &mut skipped);
        sections.push(Section {
            title: naming::section_title(&source.name),
            name: source.name,
            path: source.path,
            documents,
        });
    }

    Ok(Manifest { sections, skipped })
}

fn scan_section(
    source: &SourceDir,
    config: &WikiConfig,
    output_dir: Option<&Path>,
    skipped: &mut Vec<SkippedFile>,
) -> Vec<Document> {
    let walker = WalkDir::new(&source.path)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_output_dir(e, output_dir));

    let mut documents = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source.path.clone());
                warn!("Skipping {}: {}", path.display(), err);
                skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if !is_markdown_candidate(&entry, &config.skip_prefixes) {
            continue;
        }

        match read_document(&entry, source) {
            Ok(mut doc) => {
                avoid_reserved_slug(&mut doc, &config.pages);
                debug!("Found {} → {}", doc.source_path(), doc.slug);
                documents.push(doc);
            }
            Err(err) => {
                warn!("Error processing {}: {}", entry.path().display(), err);
                skipped.push(SkippedFile {
                    path: entry.path().to_path_buf(),
                    reason: err.to_string(),
                });
            }
        }
    }

    documents.sort_by_key(|d| d.source_path());
    documents
}

/// Move a document off the index or sidebar page name by appending `-page`.
fn avoid_reserved_slug(doc: &mut Document, pages: &PagesConfig) {
    if !pages.is_reserved(&doc.slug) {
        return;
    }
    let mut slug = format!("{}-page", doc.slug);
    while pages.is_reserved(&slug) {
        slug.push_str("-page");
    }
    warn!(
        "{}: page name '{}' is taken by the index or sidebar, using '{}'",
        doc.source_path(),
        doc.slug,
        slug
    );
    doc.slug = slug;
}

fn is_output_dir(entry: &DirEntry, output_dir: Option<&Path>) -> bool {
    let Some(output_dir) = output_dir else {
        return false;
    };
    entry.file_type().is_dir()
        && fs::canonicalize(entry.path())
            .map(|p| p == output_dir)
            .unwrap_or(false)
}

/// Regular `.md` files whose name does not start with a skip prefix.
fn is_markdown_candidate(entry: &DirEntry, skip_prefixes: &[String]) -> bool {
    if !entry.file_type().is_file() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.ends_with(".md") && !skip_prefixes.iter().any(|p| name.starts_with(p.as_str()))
}

fn read_document(entry: &DirEntry, source: &SourceDir) -> Result<Document, std::io::Error> {
    let path = entry.path();
    let body = fs::read_to_string(path)?;

    let file_name = entry.file_name().to_string_lossy().to_string();
    let stem = file_name
        .strip_suffix(".md")
        .unwrap_or(&file_name)
        .to_string();
    let rel_dir = path
        .parent()
        .and_then(|p| p.strip_prefix(&source.path).ok())
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();

    let title = naming::extract_title(&body, &stem);
    let slug = naming::page_slug(&title, &stem);
    let modified = entry.metadata().ok().and_then(|m| m.modified().ok());

    Ok(Document {
        section: source.name.clone(),
        rel_dir,
        file_name,
        stem,
        title,
        slug,
        body,
        modified,
    })
}
