//! Shared test utilities for the docs-wiki test suite.
//!
//! Provides fixture setup, file writers, and lookup helpers that work with
//! scan-stage data (`Manifest`, `Document`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path(), &WikiConfig::default()).unwrap();
//!
//! let guide = find_document(&manifest, "getting-started");
//! assert_eq!(guide.file_name, "guide.md");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::naming;
use crate::scan::Manifest;
use crate::types::Document;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/repo/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/repo");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Read a generated page from the default `wiki/` output directory.
pub fn read_output(root: &Path, name: &str) -> String {
    let path = root.join("wiki").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
}

/// Build an in-memory document with title and slug filled in.
pub fn document(section: &str, rel_dir: &str, stem: &str, title: &str) -> Document {
    Document {
        section: section.to_string(),
        rel_dir: rel_dir.to_string(),
        file_name: format!("{stem}.md"),
        stem: stem.to_string(),
        title: title.to_string(),
        slug: naming::page_slug(title, stem),
        body: format!("# {title}\n"),
        modified: None,
    }
}

// =========================================================================
// Manifest lookups (panic on miss)
// =========================================================================

/// Find a document by slug. Panics if not found.
pub fn find_document<'a>(manifest: &'a Manifest, slug: &str) -> &'a Document {
    manifest
        .documents()
        .find(|d| d.slug == slug)
        .unwrap_or_else(|| {
            let slugs = slugs(manifest);
            panic!("document '{slug}' not found. Available: {slugs:?}")
        })
}

/// All document slugs in scan order.
pub fn slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.documents().map(|d| d.slug.as_str()).collect()
}

/// All section names in scan order.
pub fn section_names(manifest: &Manifest) -> Vec<&str> {
    manifest.sections.iter().map(|s| s.name.as_str()).collect()
}
