//! CLI output formatting for the scan and generate stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every document leads
//! with its positional index and title; the source path and page name are
//! indented context lines. The result reads as a content inventory while
//! still tracing every page back to its file.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Docs (4 pages)
//!     001 Wire Format → wire-format
//!         Source: docs/api/internal/wire-format.md
//!     002 API Reference → api-reference
//!         Source: docs/api/reference.md
//!
//! Skipped
//!     docs/bad.md: stream did not contain valid UTF-8
//!
//! Collisions
//!     setup-guide: docs/a.md, notes/b.md
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Getting Started → getting-started.md
//! 002 Project Overview → project-overview.md (2 links)
//! 003 TODO List → todo-list.md (1 link, 1 unresolved)
//!     Unresolved: missing.md
//!
//! Index → Home.md
//! Sidebar → _Sidebar.md
//!
//! Generated 3 pages from 2 directories
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::generate::{GeneratedPage, Summary};
use crate::scan::Manifest;
use crate::types::SkippedFile;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn skipped_lines(skipped: &[SkippedFile]) -> Vec<String> {
    let mut lines = Vec::new();
    if skipped.is_empty() {
        return lines;
    }
    lines.push(String::new());
    lines.push("Skipped".to_string());
    for file in skipped {
        lines.push(format!("{}{}: {}", indent(1), file.path.display(), file.reason));
    }
    lines
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan output: each section with its documents, then skipped files
/// and slug collisions.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, section) in manifest.sections.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} ({})",
            section.title,
            plural(section.documents.len(), "page", "pages")
        ));
        for (j, doc) in section.documents.iter().enumerate() {
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(j + 1),
                doc.title,
                doc.slug
            ));
            lines.push(format!("{}Source: {}", indent(2), doc.source_path()));
        }
    }

    lines.extend(skipped_lines(&manifest.skipped));

    let collisions = manifest.slug_collisions();
    if !collisions.is_empty() {
        lines.push(String::new());
        lines.push("Collisions".to_string());
        for (slug, sources) in collisions {
            lines.push(format!("{}{}: {}", indent(1), slug, sources.join(", ")));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

fn page_line(index: usize, page: &GeneratedPage) -> String {
    let mut details = Vec::new();
    if page.rewritten_links > 0 {
        details.push(plural(page.rewritten_links, "link", "links"));
    }
    if !page.unresolved_links.is_empty() {
        details.push(format!("{} unresolved", page.unresolved_links.len()));
    }
    if page.unchanged {
        details.push("unchanged".to_string());
    }
    let suffix = if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    };
    format!(
        "{} {} \u{2192} {}.md{}",
        format_index(index),
        page.title,
        page.slug,
        suffix
    )
}

/// Format generate output: one line per page, the generated index and
/// sidebar, and a totals line.
pub fn format_generate_output(summary: &Summary) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in summary.pages.iter().enumerate() {
        lines.push(page_line(i + 1, page));
        if !page.unresolved_links.is_empty() {
            lines.push(format!(
                "{}Unresolved: {}",
                indent(1),
                page.unresolved_links.join(", ")
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("Index \u{2192} {}", file_name(&summary.home_page)));
    lines.push(format!("Sidebar \u{2192} {}", file_name(&summary.sidebar_page)));

    lines.extend(skipped_lines(&summary.skipped));

    if !summary.collisions.is_empty() {
        lines.push(String::new());
        lines.push("Collisions".to_string());
        for (slug, sources) in &summary.collisions {
            lines.push(format!("{}{}: {}", indent(1), slug, sources.join(", ")));
        }
    }

    lines.push(String::new());
    let mut totals = format!(
        "Generated {} from {}",
        plural(summary.pages.len(), "page", "pages"),
        plural(summary.source_dirs, "directory", "directories")
    );
    let mut notes = Vec::new();
    if summary.unchanged_count() > 0 {
        notes.push(format!("{} unchanged", summary.unchanged_count()));
    }
    if !summary.skipped.is_empty() {
        notes.push(format!("{} skipped", summary.skipped.len()));
    }
    if summary.unresolved_count() > 0 {
        notes.push(plural(summary.unresolved_count(), "unresolved link", "unresolved links"));
    }
    if !notes.is_empty() {
        totals.push_str(&format!(" ({})", notes.join(", ")));
    }
    lines.push(totals);

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &Summary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::document;
    use crate::types::Section;
    use std::path::PathBuf;

    fn manifest() -> Manifest {
        Manifest {
            sections: vec![
                Section {
                    name: "docs".into(),
                    title: "Docs".into(),
                    path: PathBuf::from("docs"),
                    documents: vec![
                        document("docs", "", "guide", "Getting Started"),
                        document("docs", "api", "reference", "API Reference"),
                    ],
                },
                Section {
                    name: "notes".into(),
                    title: "Notes".into(),
                    path: PathBuf::from("notes"),
                    documents: vec![document("notes", "", "todo", "TODO List")],
                },
            ],
            skipped: vec![],
        }
    }

    fn page(title: &str, slug: &str, links: usize, unresolved: &[&str]) -> GeneratedPage {
        GeneratedPage {
            title: title.into(),
            slug: slug.into(),
            source_path: format!("docs/{slug}.md"),
            rewritten_links: links,
            unresolved_links: unresolved.iter().map(|s| s.to_string()).collect(),
            unchanged: false,
        }
    }

    fn summary() -> Summary {
        Summary {
            pages: vec![
                page("Getting Started", "getting-started", 0, &[]),
                page("Project Overview", "project-overview", 2, &[]),
                page("TODO List", "todo-list", 1, &["missing.md"]),
            ],
            home_page: PathBuf::from("wiki/Home.md"),
            sidebar_page: PathBuf::from("wiki/_Sidebar.md"),
            source_dirs: 2,
            ..Summary::default()
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "page", "pages"), "1 page");
        assert_eq!(plural(0, "page", "pages"), "0 pages");
        assert_eq!(plural(2, "directory", "directories"), "2 directories");
    }

    #[test]
    fn scan_output_lists_sections_and_documents() {
        let lines = format_scan_output(&manifest());
        assert_eq!(
            lines,
            vec![
                "Docs (2 pages)",
                "    001 Getting Started \u{2192} getting-started",
                "        Source: docs/guide.md",
                "    002 API Reference \u{2192} api-reference",
                "        Source: docs/api/reference.md",
                "",
                "Notes (1 page)",
                "    001 TODO List \u{2192} todo-list",
                "        Source: notes/todo.md",
            ]
        );
    }

    #[test]
    fn scan_output_shows_skipped_and_collisions() {
        let mut m = manifest();
        m.sections[1]
            .documents
            .push(document("notes", "", "start", "Getting Started"));
        m.skipped.push(SkippedFile {
            path: PathBuf::from("docs/bad.md"),
            reason: "invalid UTF-8".into(),
        });

        let lines = format_scan_output(&m);
        assert!(lines.contains(&"Skipped".to_string()));
        assert!(lines.contains(&"    docs/bad.md: invalid UTF-8".to_string()));
        assert!(lines.contains(&"Collisions".to_string()));
        assert!(lines.contains(&"    getting-started: docs/guide.md, notes/start.md".to_string()));
    }

    #[test]
    fn generate_output_lines() {
        let lines = format_generate_output(&summary());
        assert_eq!(
            lines,
            vec![
                "001 Getting Started \u{2192} getting-started.md",
                "002 Project Overview \u{2192} project-overview.md (2 links)",
                "003 TODO List \u{2192} todo-list.md (1 link, 1 unresolved)",
                "    Unresolved: missing.md",
                "",
                "Index \u{2192} Home.md",
                "Sidebar \u{2192} _Sidebar.md",
                "",
                "Generated 3 pages from 2 directories (1 unresolved link)",
            ]
        );
    }

    #[test]
    fn generate_output_notes_unchanged_and_skipped() {
        let mut s = summary();
        s.pages[0].unchanged = true;
        s.pages[2].unresolved_links.clear();
        s.skipped.push(SkippedFile {
            path: PathBuf::from("wiki/blocked.md"),
            reason: "Is a directory".into(),
        });

        let lines = format_generate_output(&s);
        assert_eq!(lines[0], "001 Getting Started \u{2192} getting-started.md (unchanged)");
        assert_eq!(
            lines.last().unwrap(),
            "Generated 3 pages from 2 directories (1 unchanged, 1 skipped)"
        );
    }
}
