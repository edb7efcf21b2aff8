//! # docs-wiki
//!
//! Converts a repository's markdown documentation tree into a flat wiki page
//! set, the layout GitHub wikis expect: one directory of pages, an index
//! page, and a sidebar.
//!
//! # Architecture: Two-Stage Batch
//!
//! ```text
//! 1. Scan      docs/, notes/  →  Manifest          (filesystem → documents)
//! 2. Generate  Manifest       →  wiki/             (pages, Home.md, _Sidebar.md)
//! ```
//!
//! Scanning reads every document and decides its title and slug before
//! anything is written, so link rewriting in the second stage can see every
//! page name at once. Both stages are sequential and deterministic.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: finds source directories, walks them, reads documents |
//! | [`generate`] | Stage 2: writes pages under their slugs, renders index and sidebar |
//! | [`links`] | Link map from original paths to slugs, inline link rewriting |
//! | [`naming`] | Title extraction and the slug algorithm |
//! | [`config`] | `wiki.toml` loading, merging over defaults, validation |
//! | [`types`] | Shared document and section types |
//! | [`output`] | CLI output formatting for both stages |
//!
//! # Design Decisions
//!
//! ## Flat Output Named by Title
//!
//! Wiki pages are addressed by name, not path, so `docs/api/reference.md`
//! and `notes/reference.md` cannot both be `reference`. Naming pages after
//! their `# heading` gives readable page names and makes clashes rarer. The
//! remaining clashes are deterministic: the document scanned last wins, and
//! the clash is reported.
//!
//! ## Best-Effort Links
//!
//! Links are rewritten only when the target can be matched to a scanned
//! document. Anything else, including external URLs and images, is left
//! exactly as written. See [`links`] for the matching rules.
//!
//! ## Per-File Failures Don't Stop the Batch
//!
//! An unreadable source file or an unwritable page is logged, reported, and
//! skipped. Only problems with the configuration, the output directory, or
//! the index and sidebar pages end the run with an error.

pub mod config;
pub mod generate;
pub mod links;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
