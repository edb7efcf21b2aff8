//! Shared types passed from the scan stage to link rewriting and generation.

use serde::Serialize;
use std::path::PathBuf;
use std::time::SystemTime;

/// A markdown document discovered in a source directory.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Source directory name as configured (`docs`, `notes`, ...)
    pub section: String,
    /// Directory relative to the section root, `/`-separated; empty at the root
    pub rel_dir: String,
    /// File name including the `.md` extension
    pub file_name: String,
    /// File name without the `.md` extension
    pub stem: String,
    /// First `# heading`, or a title derived from the stem
    pub title: String,
    /// Wiki page name the document is written under
    pub slug: String,
    /// Raw markdown content
    #[serde(skip)]
    pub body: String,
    /// Filesystem modification time, used only for "recently updated" ordering
    #[serde(skip)]
    pub modified: Option<SystemTime>,
}

impl Document {
    /// Path relative to the section root: `api/reference.md`.
    pub fn rel_path(&self) -> String {
        join_rel(&self.rel_dir, &self.file_name)
    }

    /// [`Document::rel_path`] without the extension: `api/reference`.
    pub fn rel_path_without_ext(&self) -> String {
        join_rel(&self.rel_dir, &self.stem)
    }

    /// Path relative to the repository root: `docs/api/reference.md`.
    pub fn source_path(&self) -> String {
        format!("{}/{}", self.section, self.rel_path())
    }

    /// [`Document::source_path`] without the extension: `docs/api/reference`.
    pub fn source_path_without_ext(&self) -> String {
        format!("{}/{}", self.section, self.rel_path_without_ext())
    }

    /// Directory components below the section root.
    pub fn dir_components(&self) -> impl Iterator<Item = &str> {
        self.rel_dir.split('/').filter(|c| !c.is_empty())
    }
}

fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// One source directory and the documents found under it.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Directory name as configured
    pub name: String,
    /// Heading used in the index and sidebar
    pub title: String,
    /// Absolute or root-relative path that was walked
    pub path: PathBuf,
    /// Documents ordered by source path
    pub documents: Vec<Document>,
}

/// A file that could not be processed. The batch continues without it.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}
