//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every book leads
//! with its positional index and title; author, links and category data
//! follow as indented context lines. Tabs lead with their label and counts,
//! with output paths as secondary context. The result reads as a catalog
//! inventory while still showing where each page lands on disk.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Books
//! 001 The Hobbit
//!     By J.R.R. Tolkien
//!     Category: Fantasy, Classics
//!     Links: Movie 1, Movie 2
//!     Documents: PDF Available
//! 002 The Road
//!     By Cormac McCarthy
//!
//! Tabs
//! 001 All Genre (14 books, 2 pages)
//! 002 Fantasy (3 books, 1 page)
//!
//! Warnings
//!     record 11 (Untitled): category must be text or a list, …
//!
//! Config
//!     config.toml
//!     books.json
//!     welcome.md
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 All Genre (14 books)
//!     Page 1 → all-genre/1.html
//!     Page 2 → all-genre/2.html
//! 002 Fantasy (3 books)
//!     Page 1 → fantasy/1.html
//!
//! Pages: 3 unchanged, 1 written (4 total)
//! Generated 2 tabs, 4 pages
//! ```
//!
//! ## Query
//!
//! ```text
//! Fantasy (page 1 of 1)
//! 001 The Hobbit ★★★★★ (4.7/5)
//!     By J.R.R. Tolkien
//!     Links: Movie 1, Movie 2
//!     Documents: PDF Available
//! Showing 1 to 3 of 3 items in 'Fantasy'
//! ```
//!
//! Page controls print on one line when there is more than one page; the
//! active page is bracketed and disabled controls are parenthesized:
//! `(Previous) [1] 2 3 Next`.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::filter;
use crate::generate::GenerateReport;
use crate::load::{Catalog, WELCOME_FILE};
use crate::paginate::page_count;
use crate::types::Category;
use crate::view::{BookCard, CatalogView, ControlStrip, LinkView, ResultStatus};
use std::path::Path;

/// Longest description shown before truncation.
const DESCRIPTION_PREVIEW: usize = 60;

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

/// `1 book`, `3 books`; `1 page`, `2 pages`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 The Hobbit
/// 001 All Genre (14 books, 2 pages)
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Turn the entity forms produced by [`crate::view::escape_html`] back into
/// plain characters for terminal display.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn category_line(category: &Category) -> Option<String> {
    match category {
        Category::Missing => None,
        Category::Malformed => Some("Category: (unreadable)".to_string()),
        Category::Text(_) | Category::List(_) => {
            Some(format!("Category: {}", category.display_labels().join(", ")))
        }
    }
}

fn link_labels(links: &[LinkView]) -> String {
    links
        .iter()
        .map(|l| decode_entities(l.label.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Indented `Links:` and `Documents:` lines for a card; shared by `check`
/// and `query`.
fn link_lines(card: &BookCard) -> Vec<String> {
    let mut lines = Vec::new();
    if !card.external_links.is_empty() {
        lines.push(format!(
            "{}Links: {}",
            indent(1),
            link_labels(&card.external_links)
        ));
    }
    if !card.secondary_links.is_empty() {
        lines.push(format!(
            "{}Documents: {}",
            indent(1),
            link_labels(&card.secondary_links)
        ));
    }
    lines
}

// ============================================================================
// Check output
// ============================================================================

/// Format `check` output: book inventory, tabs, warnings and source files.
pub fn format_check_output(catalog: &Catalog, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let catalog_config = &catalog.config.catalog;

    // Books section
    lines.push("Books".to_string());
    if catalog.books.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, book) in catalog.books.iter().enumerate() {
        let title = if book.title.trim().is_empty() {
            "(untitled)"
        } else {
            book.title.as_str()
        };
        lines.push(entity_header(i + 1, title, None));
        if !book.author.is_empty() {
            lines.push(format!("{}By {}", indent(1), book.author));
        }
        if let Some(line) = category_line(&book.category) {
            lines.push(format!("{}{}", indent(1), line));
        }
        lines.extend(link_lines(&BookCard::from_book(book)));
        if let Some(desc) = book.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(desc.trim(), DESCRIPTION_PREVIEW)
            ));
        }
    }

    // Tabs section
    lines.push(String::new());
    lines.push("Tabs".to_string());
    let labels = filter::tab_labels(
        &catalog.books,
        &catalog_config.all_label,
        &catalog_config.categories,
    );
    for (i, label) in labels.iter().enumerate() {
        let count = filter::filter(&catalog.books, label, &catalog_config.all_label).len();
        let pages = page_count(count, catalog_config.page_size).max(1);
        let detail = format!("{}, {}", plural(count, "book"), plural(pages, "page"));
        lines.push(entity_header(i + 1, label, Some(&detail)));
    }

    // Warnings section
    if !catalog.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &catalog.warnings {
            lines.push(format!("{}{}", indent(1), warning));
        }
    }

    // Config section
    lines.push(String::new());
    lines.push("Config".to_string());
    for file in ["config.toml", catalog_config.data_file.as_str(), WELCOME_FILE] {
        if source_root.join(file).is_file() {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(catalog: &Catalog, source_root: &Path) {
    for line in format_check_output(catalog, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format build output: every tab with the files its pages went to.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Home \u{2192} index.html".to_string());

    let mut page_total = 1;
    for (i, tab) in report.tabs.iter().enumerate() {
        let count = plural(tab.total_count, "book");
        lines.push(entity_header(i + 1, &tab.label, Some(&count)));
        for (page, path) in tab.paths().iter().enumerate() {
            lines.push(format!("{}Page {} \u{2192} {}", indent(1), page + 1, path));
        }
        page_total += tab.total_pages;
    }

    lines.push(String::new());
    lines.push(format!("Pages: {}", report.cache));
    lines.push(format!(
        "Generated {}, {}",
        plural(report.tabs.len(), "tab"),
        plural(page_total, "page")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Query output
// ============================================================================

fn card_lines(index: usize, card: &BookCard) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} {} {}",
        format_index(index),
        decode_entities(card.title.as_str()),
        card.rating.symbols(),
        card.rating.label()
    )];
    lines.push(format!(
        "{}By {}",
        indent(1),
        decode_entities(card.author.as_str())
    ));

    let mut flags = Vec::new();
    if card.adult {
        flags.push("18+");
    }
    if card.upcoming {
        flags.push("Upcoming Releases");
    }
    if !flags.is_empty() {
        lines.push(format!("{}{}", indent(1), flags.join(" | ")));
    }
    lines.extend(link_lines(card));
    lines
}

/// `(Previous) [1] 2 3 Next`
fn controls_line(strip: &ControlStrip) -> String {
    let nav = |label: &str, disabled: bool| {
        if disabled {
            format!("({label})")
        } else {
            label.to_string()
        }
    };
    let mut parts = vec![nav("Previous", strip.previous.is_disabled())];
    parts.extend(strip.pages.iter().map(|p| {
        if p.active {
            format!("[{}]", p.page)
        } else {
            p.page.to_string()
        }
    }));
    parts.push(nav("Next", strip.next.is_disabled()));
    parts.join(" ")
}

/// Format `query` output: the cards on the page, the result line and the
/// page controls.
pub fn format_query_output(view: &CatalogView) -> Vec<String> {
    let mut lines = vec![format!(
        "{} (page {} of {})",
        decode_entities(view.label.as_str()),
        view.page_index,
        view.total_pages
    )];

    match &view.status {
        ResultStatus::Empty { message } => {
            lines.push(decode_entities(message.as_str()));
        }
        ResultStatus::Showing { start, summary, .. } => {
            for (i, card) in view.cards.iter().enumerate() {
                lines.extend(card_lines(start + i, card));
            }
            lines.push(decode_entities(summary.as_str()));
        }
    }

    if let Some(strip) = &view.controls {
        lines.push(controls_line(strip));
    }
    lines
}

/// Print query output to stdout.
pub fn print_query_output(view: &CatalogView) {
    for line in format_query_output(view) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::config::SiteConfig;
    use crate::generate::TabReport;
    use crate::load::LoadWarning;
    use crate::test_helpers::*;
    use crate::types::{ExternalLink, LinkKind};
    use crate::view::{CatalogQuery, catalog_view};

    fn catalog_of(books: Vec<crate::types::Book>) -> Catalog {
        Catalog {
            books,
            config: SiteConfig::default(),
            welcome: None,
            warnings: Vec::new(),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "book"), "1 book");
        assert_eq!(plural(0, "book"), "0 books");
        assert_eq!(plural(2, "page"), "2 pages");
    }

    #[test]
    fn entity_header_with_detail() {
        assert_eq!(
            entity_header(2, "Drama", Some("3 books, 1 page")),
            "002 Drama (3 books, 1 page)"
        );
        assert_eq!(entity_header(1, "Dune", None), "001 Dune");
    }

    #[test]
    fn decode_entities_reverses_escaping() {
        let raw = r#"<b>"Tom" & 'Jerry'</b>"#;
        assert_eq!(decode_entities(&crate::view::escape_html(raw)), raw);
    }

    #[test]
    fn decode_entities_keeps_literal_ampersand_text() {
        // "&lt;" typed literally escapes to "&amp;lt;" and must come back as-is.
        assert_eq!(decode_entities(&crate::view::escape_html("&lt;")), "&lt;");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "a".repeat(40)));
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("ééééé", 3), "ééé...");
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_lists_books_and_tabs() {
        let mut books = numbered_books(13, crate::types::Category::Text("Drama".into()));
        books[0].links = vec![ExternalLink {
            kind: LinkKind::Movie,
            label: "Movie Available".to_string(),
            url: "https://example.com".to_string(),
        }];
        let lines = format_check_output(&catalog_of(books), Path::new("/nonexistent"));

        assert_eq!(lines[0], "Books");
        assert_eq!(lines[1], "001 Book 1");
        assert_eq!(lines[2], "    By Author of Book 1");
        assert_eq!(lines[3], "    Category: Drama");
        assert_eq!(lines[4], "    Links: Movie Available");
        assert!(lines.contains(&"001 All Genre (13 books, 2 pages)".to_string()));
        assert!(lines.contains(&"002 Drama (13 books, 2 pages)".to_string()));
        assert!(!lines.contains(&"Warnings".to_string()));
    }

    #[test]
    fn check_and_query_print_the_same_link_lines() {
        let mut b = book("Persuasion");
        b.links = vec![
            ExternalLink {
                kind: LinkKind::Movie,
                label: "Film <1995> & \"Remake\"".to_string(),
                url: "https://example.com/film".to_string(),
            },
            ExternalLink {
                kind: LinkKind::Document,
                label: "PDF Available".to_string(),
                url: "https://example.com/pdf".to_string(),
            },
        ];
        let check = format_check_output(&catalog_of(vec![b.clone()]), Path::new("/nonexistent"));
        let view = catalog_view(&[b], &CatalogQuery::category("All Genre"), &catalog());
        let query = format_query_output(&view);

        let expected = vec![
            "    Links: Film <1995> & \"Remake\"".to_string(),
            "    Documents: PDF Available".to_string(),
        ];
        assert_eq!(check[3..5], expected[..]);
        assert_eq!(query[3..5], expected[..]);
    }

    #[test]
    fn check_shows_warnings() {
        let mut catalog = catalog_of(vec![book("A")]);
        catalog.warnings.push(LoadWarning {
            index: 0,
            title: "A".to_string(),
            message: "dropped unsafe link URL 'javascript:x'".to_string(),
        });
        let lines = format_check_output(&catalog, Path::new("/nonexistent"));
        let pos = lines.iter().position(|l| l == "Warnings").unwrap();
        assert_eq!(
            lines[pos + 1],
            "    record 1 (A): dropped unsafe link URL 'javascript:x'"
        );
    }

    #[test]
    fn check_empty_catalog() {
        let lines = format_check_output(&catalog_of(Vec::new()), Path::new("/nonexistent"));
        assert_eq!(lines[1], "    (none)");
        assert!(lines.contains(&"001 All Genre (0 books, 1 page)".to_string()));
    }

    #[test]
    fn check_marks_malformed_category() {
        let books = vec![book_in("Odd", crate::types::Category::Malformed)];
        let lines = format_check_output(&catalog_of(books), Path::new("/nonexistent"));
        assert!(lines.contains(&"    Category: (unreadable)".to_string()));
    }

    #[test]
    fn check_lists_source_files() {
        let tmp = setup_fixtures();
        let catalog = crate::load::load(tmp.path()).unwrap();
        let lines = format_check_output(&catalog, tmp.path());
        let pos = lines.iter().position(|l| l == "Config").unwrap();
        assert_eq!(
            &lines[pos + 1..],
            &["    config.toml", "    books.json", "    welcome.md"]
        );
    }

    // =========================================================================
    // Build output
    // =========================================================================

    #[test]
    fn generate_output_lists_pages() {
        let report = GenerateReport {
            site_title: "Shelf".to_string(),
            tabs: vec![
                TabReport {
                    label: "All Genre".to_string(),
                    slug: "all-genre".to_string(),
                    total_count: 14,
                    total_pages: 2,
                },
                TabReport {
                    label: "Poetry".to_string(),
                    slug: "poetry".to_string(),
                    total_count: 1,
                    total_pages: 1,
                },
            ],
            cache: CacheStats {
                unchanged: 3,
                written: 1,
                removed: 0,
            },
        };
        let lines = format_generate_output(&report);
        assert_eq!(
            lines,
            vec![
                "Home \u{2192} index.html",
                "001 All Genre (14 books)",
                "    Page 1 \u{2192} all-genre/1.html",
                "    Page 2 \u{2192} all-genre/2.html",
                "002 Poetry (1 book)",
                "    Page 1 \u{2192} poetry/1.html",
                "",
                "Pages: 3 unchanged, 1 written (4 total)",
                "Generated 2 tabs, 4 pages",
            ]
        );
    }

    // =========================================================================
    // Query output
    // =========================================================================

    #[test]
    fn query_output_decodes_text() {
        let mut b = book("Pride & Prejudice");
        b.adult = true;
        let view = catalog_view(&[b], &CatalogQuery::category("All Genre"), &catalog());
        let lines = format_query_output(&view);
        assert_eq!(lines[0], "All Genre (page 1 of 1)");
        assert_eq!(lines[1], "001 Pride & Prejudice ★★★★☆ (4/5)");
        assert_eq!(lines[2], "    By Author of Pride & Prejudice");
        assert_eq!(lines[3], "    18+");
        assert_eq!(lines[4], "Showing 1 to 1 of 1 items in 'All Genre'");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn query_output_numbers_from_page_offset() {
        let books = numbered_books(30, crate::types::Category::Missing);
        let view = catalog_view(&books, &CatalogQuery::category("All Genre").page(3), &catalog());
        let lines = format_query_output(&view);
        assert_eq!(lines[0], "All Genre (page 3 of 3)");
        assert!(lines[1].starts_with("025 Book 25 "));
        assert_eq!(lines.last().unwrap(), "Previous 1 2 [3] (Next)");
    }

    #[test]
    fn query_output_empty() {
        let view = catalog_view(&[], &CatalogQuery::category("Poetry"), &catalog());
        assert_eq!(
            format_query_output(&view),
            vec!["Poetry (page 1 of 1)", "No books found."]
        );
    }
}
