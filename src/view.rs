//! Catalog view model.
//!
//! Projects one page of books into display-ready records plus the
//! pagination descriptor. Everything here is plain data: the HTML templates
//! in [`crate::generate`] and the JSON printed by `simple-shelf query` are
//! two consumers of the same [`CatalogView`].
//!
//! ## Escaping
//!
//! Book text comes from an untrusted JSON file. Every piece of it that ends
//! up in the view model is wrapped in [`Escaped`], which can only be built
//! by running [`escape_html`] over the raw text. Templates emit `Escaped`
//! verbatim and let maud escape everything else (URLs, attributes).
//!
//! ## Page controls
//!
//! When there is more than one page the view carries a [`ControlStrip`]:
//! previous / next controls plus a window of at most [`PAGE_WINDOW`]
//! numbered pages centered on the current one, shifted to stay within
//! `[1, total_pages]`.

use crate::config::CatalogConfig;
use crate::filter;
use crate::paginate::{Page, paginate};
use crate::types::{Book, ExternalLink, LinkKind};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Maximum number of numbered page controls shown at once.
pub const PAGE_WINDOW: usize = 5;

/// Width of the rating scale in symbols.
pub const STAR_SCALE: u8 = 5;

const NO_RESULTS: &str = "No books found.";

/// Replace `& < > " '` with their entity forms.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text that is safe to embed in markup as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Escaped(String);

impl Escaped {
    /// Escape raw, untrusted text.
    pub fn new(raw: &str) -> Self {
        Self(escape_html(raw))
    }

    /// Wrap text assembled from already-escaped parts.
    fn assembled(markup: String) -> Self {
        Self(markup)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A rating drawn against a fixed five-symbol scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarRating {
    pub filled: u8,
    pub empty: u8,
    /// Original rating, shown next to the stars.
    pub value: f64,
}

impl StarRating {
    /// Round to the nearest whole star (halves round up), clamped to the
    /// scale. Non-finite ratings draw zero stars.
    pub fn from_rating(value: f64) -> Self {
        let filled = if value.is_finite() {
            value.round().clamp(0.0, f64::from(STAR_SCALE)) as u8
        } else {
            0
        };
        Self {
            filled,
            empty: STAR_SCALE - filled,
            value,
        }
    }

    /// `★` repeated `filled` times followed by `☆` repeated `empty` times.
    pub fn symbols(&self) -> String {
        let mut s = "\u{2605}".repeat(self.filled as usize);
        s.push_str(&"\u{2606}".repeat(self.empty as usize));
        s
    }

    /// Numeric label, e.g. `(4.5/5)`.
    pub fn label(&self) -> String {
        format!("({}/{})", self.value, STAR_SCALE)
    }
}

/// A link ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub kind: LinkKind,
    pub label: Escaped,
    /// Raw URL; templates escape it as an attribute value.
    pub url: String,
}

/// Display record for one book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookCard {
    pub title: Escaped,
    pub author: Escaped,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Escaped>,
    pub pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub rating: StarRating,
    pub adult: bool,
    pub upcoming: bool,
    /// Movie and reference links. Empty means no badge.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_links: Vec<LinkView>,
    /// Secondary-content (document) links. Empty means no badge.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_links: Vec<LinkView>,
}

impl BookCard {
    pub fn from_book(book: &Book) -> Self {
        let (secondary, external): (Vec<_>, Vec<_>) =
            book.links.iter().partition(|l| l.kind.is_secondary());
        let to_view = |links: Vec<&ExternalLink>| {
            links
                .into_iter()
                .map(|l| LinkView {
                    kind: l.kind,
                    label: Escaped::new(&l.label),
                    url: l.url.clone(),
                })
                .collect::<Vec<_>>()
        };

        Self {
            title: Escaped::new(&book.title),
            author: Escaped::new(&book.author),
            description: book
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(Escaped::new),
            pages: book.pages,
            image: book.image.clone(),
            rating: StarRating::from_rating(book.rating),
            adult: book.adult,
            upcoming: book.upcoming,
            external_links: to_view(external),
            secondary_links: to_view(secondary),
        }
    }
}

/// What the result line under the cards says.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultStatus {
    /// Nothing matched.
    Empty { message: Escaped },
    /// A 1-based inclusive range of the filtered list.
    Showing {
        start: usize,
        end: usize,
        total: usize,
        summary: Escaped,
    },
}

/// Previous or next control. `target` is `None` when disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavControl {
    pub target: Option<usize>,
}

impl NavControl {
    pub fn is_disabled(&self) -> bool {
        self.target.is_none()
    }
}

/// A numbered page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageControl {
    pub page: usize,
    pub active: bool,
}

/// Pagination controls, present only when there is more than one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlStrip {
    pub previous: NavControl,
    pub pages: Vec<PageControl>,
    pub next: NavControl,
}

impl ControlStrip {
    pub fn new(current: usize, total_pages: usize) -> Self {
        Self {
            previous: NavControl {
                target: (current > 1).then(|| current - 1),
            },
            pages: page_window(current, total_pages)
                .map(|page| PageControl {
                    page,
                    active: page == current,
                })
                .collect(),
            next: NavControl {
                target: (current < total_pages).then(|| current + 1),
            },
        }
    }
}

/// Numbered pages to show: up to [`PAGE_WINDOW`] pages starting two before
/// `current`, pulled back when the window would run past `total_pages`.
pub fn page_window(current: usize, total_pages: usize) -> RangeInclusive<usize> {
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);
    let span = PAGE_WINDOW - 1;

    let mut start = current.saturating_sub(2).max(1);
    let end = (start + span).min(total_pages);
    if end - start < span {
        start = end.saturating_sub(span).max(1);
    }
    start..=end
}

/// Everything needed to draw one catalog page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    /// Active filter label.
    pub label: Escaped,
    pub cards: Vec<BookCard>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<ControlStrip>,
}

/// Build the view for an already-paginated list.
pub fn build_view(page: &Page<'_, &Book>, label: &str) -> CatalogView {
    let escaped_label = Escaped::new(label);
    let status = match page.item_range() {
        None => ResultStatus::Empty {
            message: Escaped::new(NO_RESULTS),
        },
        Some((start, end)) => ResultStatus::Showing {
            start,
            end,
            total: page.total_count,
            summary: Escaped::assembled(format!(
                "Showing {start} to {end} of {} items in '{}'",
                page.total_count,
                escaped_label.as_str()
            )),
        },
    };
    let controls =
        (page.total_pages > 1).then(|| ControlStrip::new(page.page_index, page.total_pages));

    CatalogView {
        label: escaped_label,
        cards: page.items.iter().map(|b| BookCard::from_book(b)).collect(),
        page_index: page.page_index,
        total_pages: page.total_pages,
        total_count: page.total_count,
        status,
        controls,
    }
}

/// One invocation of the catalog pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Category label; the sentinel shows everything.
    pub label: String,
    /// Requested 1-based page; clamped.
    pub page: usize,
    /// Free-text search. When set and non-blank it replaces the category
    /// filter and the view is reported under the sentinel label.
    pub search: Option<String>,
}

impl CatalogQuery {
    /// First page of `label`.
    pub fn category(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            page: 1,
            search: None,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

/// Filter, paginate and build the view for `query` over the full list.
pub fn catalog_view(books: &[Book], query: &CatalogQuery, catalog: &CatalogConfig) -> CatalogView {
    let all_label = catalog.all_label.as_str();
    let (matched, label) = match query.search.as_deref() {
        Some(term) if !term.trim().is_empty() => (filter::search(books, term), all_label),
        _ => (
            filter::filter(books, &query.label, all_label),
            query.label.as_str(),
        ),
    };
    let page = paginate(&matched, query.page, catalog.page_size);
    build_view(&page, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Category;

    #[test]
    fn escape_covers_all_reserved_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn escaped_title_has_no_raw_markup() {
        let card = BookCard::from_book(&book("O'Brien & <Sons>"));
        let title = card.title.as_str();
        assert_eq!(title, "O&#39;Brien &amp; &lt;Sons&gt;");
        assert!(!title.contains('<'));
        assert!(!title.contains('>'));
        assert!(!title.contains('\''));
        // Every '&' starts an entity.
        assert_eq!(title.matches('&').count(), title.matches(';').count());
    }

    #[test]
    fn rating_rounds_to_nearest_star() {
        let low = StarRating::from_rating(3.4);
        assert_eq!((low.filled, low.empty), (3, 2));
        let high = StarRating::from_rating(3.6);
        assert_eq!((high.filled, high.empty), (4, 1));
        let half = StarRating::from_rating(2.5);
        assert_eq!((half.filled, half.empty), (3, 2));
    }

    #[test]
    fn rating_is_clamped_to_scale() {
        assert_eq!(StarRating::from_rating(7.0).filled, 5);
        assert_eq!(StarRating::from_rating(-1.0).filled, 0);
        assert_eq!(StarRating::from_rating(f64::NAN).filled, 0);
        assert_eq!(StarRating::from_rating(f64::NAN).empty, 5);
    }

    #[test]
    fn rating_symbols_and_label() {
        let r = StarRating::from_rating(4.5);
        assert_eq!(r.symbols(), "★★★★★");
        assert_eq!(r.label(), "(4.5/5)");
        assert_eq!(StarRating::from_rating(2.0).symbols(), "★★☆☆☆");
        assert_eq!(StarRating::from_rating(4.0).label(), "(4/5)");
    }

    #[test]
    fn optional_badges_absent_without_data() {
        let card = BookCard::from_book(&book("Plain"));
        assert!(!card.adult);
        assert!(!card.upcoming);
        assert!(card.external_links.is_empty());
        assert!(card.secondary_links.is_empty());
        assert!(card.description.is_none());
    }

    #[test]
    fn blank_description_is_dropped() {
        let mut b = book("Blank");
        b.description = Some("   ".to_string());
        assert!(BookCard::from_book(&b).description.is_none());
    }

    #[test]
    fn links_split_by_kind() {
        let mut b = book("Linked");
        b.links = vec![
            ExternalLink {
                kind: LinkKind::Movie,
                label: "Movie 1".to_string(),
                url: "https://example.com/m1".to_string(),
            },
            ExternalLink {
                kind: LinkKind::Document,
                label: "PDF Available".to_string(),
                url: "https://t.me/Bot?start=verify_7".to_string(),
            },
            ExternalLink {
                kind: LinkKind::Movie,
                label: "Movie 2".to_string(),
                url: "https://example.com/m2".to_string(),
            },
        ];
        let card = BookCard::from_book(&b);
        let labels: Vec<&str> = card.external_links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Movie 1", "Movie 2"]);
        assert_eq!(card.secondary_links.len(), 1);
        assert_eq!(card.secondary_links[0].kind, LinkKind::Document);
    }

    // =========================================================================
    // Page window
    // =========================================================================

    #[test]
    fn window_at_start() {
        assert_eq!(page_window(1, 10), 1..=5);
        assert_eq!(page_window(2, 10), 1..=5);
    }

    #[test]
    fn window_centered() {
        assert_eq!(page_window(5, 10), 3..=7);
    }

    #[test]
    fn window_shifted_at_end() {
        assert_eq!(page_window(9, 10), 6..=10);
        assert_eq!(page_window(10, 10), 6..=10);
    }

    #[test]
    fn window_smaller_than_five_pages() {
        assert_eq!(page_window(2, 3), 1..=3);
        assert_eq!(page_window(1, 2), 1..=2);
    }

    #[test]
    fn control_strip_disables_edges() {
        let first = ControlStrip::new(1, 3);
        assert!(first.previous.is_disabled());
        assert_eq!(first.next.target, Some(2));

        let last = ControlStrip::new(3, 3);
        assert_eq!(last.previous.target, Some(2));
        assert!(last.next.is_disabled());

        let active: Vec<usize> = last.pages.iter().filter(|p| p.active).map(|p| p.page).collect();
        assert_eq!(active, vec![3]);
    }

    // =========================================================================
    // Full pipeline
    // =========================================================================

    #[test]
    fn summary_reports_range_and_label() {
        let books = numbered_books(25, Category::Text("Drama".into()));
        let view = catalog_view(&books, &CatalogQuery::category("Drama").page(2), &catalog());
        match &view.status {
            ResultStatus::Showing {
                start,
                end,
                total,
                summary,
            } => {
                assert_eq!((*start, *end, *total), (13, 24, 25));
                assert_eq!(summary.as_str(), "Showing 13 to 24 of 25 items in 'Drama'");
            }
            other => panic!("expected a range, got {other:?}"),
        }
        assert_eq!(view.cards.len(), 12);
        assert!(view.controls.is_some());
    }

    #[test]
    fn summary_escapes_label() {
        let books = vec![book_in("A", Category::Text("Sci<Fi>".into()))];
        let view = catalog_view(&books, &CatalogQuery::category("sci<fi>"), &catalog());
        match &view.status {
            ResultStatus::Showing { summary, .. } => {
                assert!(summary.as_str().ends_with("in 'sci&lt;fi&gt;'"));
            }
            other => panic!("expected a range, got {other:?}"),
        }
    }

    #[test]
    fn no_results_state() {
        let books = numbered_books(3, Category::Text("Drama".into()));
        let view = catalog_view(&books, &CatalogQuery::category("Poetry").page(4), &catalog());
        assert!(view.cards.is_empty());
        assert_eq!(view.page_index, 1);
        assert_eq!(view.total_pages, 1);
        assert!(view.controls.is_none());
        assert_eq!(
            view.status,
            ResultStatus::Empty {
                message: Escaped::new("No books found.")
            }
        );
    }

    #[test]
    fn single_page_has_no_controls() {
        let books = numbered_books(12, Category::Missing);
        let view = catalog_view(&books, &CatalogQuery::category("All Genre"), &catalog());
        assert_eq!(view.cards.len(), 12);
        assert!(view.controls.is_none());
    }

    #[test]
    fn clamped_request_returns_last_partial_page() {
        let books = numbered_books(25, Category::Missing);
        let view = catalog_view(&books, &CatalogQuery::category("All Genre").page(10), &catalog());
        assert_eq!(view.page_index, 3);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].title.as_str(), "Book 25");
    }

    #[test]
    fn search_reports_under_sentinel_label() {
        let mut books = numbered_books(3, Category::Text("Drama".into()));
        books[1].title = "The Hobbit".to_string();
        let query = CatalogQuery::category("Drama").page(3).search("hobbit");
        let view = catalog_view(&books, &query, &catalog());
        assert_eq!(view.label.as_str(), "All Genre");
        assert_eq!(view.page_index, 1);
        assert_eq!(view.cards.len(), 1);
    }

    #[test]
    fn blank_search_falls_back_to_category() {
        let books = vec![
            book_in("A", Category::Text("Drama".into())),
            book_in("B", Category::Text("Poetry".into())),
        ];
        let query = CatalogQuery::category("Poetry").search("  ");
        let view = catalog_view(&books, &query, &catalog());
        assert_eq!(view.label.as_str(), "Poetry");
        assert_eq!(view.cards.len(), 1);
    }

    #[test]
    fn view_serializes_to_json() {
        let books = numbered_books(13, Category::Missing);
        let view = catalog_view(&books, &CatalogQuery::category("All Genre"), &catalog());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"]["kind"], "showing");
        assert_eq!(json["controls"]["previous"]["target"], serde_json::Value::Null);
        assert_eq!(json["controls"]["next"]["target"], 2);
        assert_eq!(json["cards"][0]["rating"]["filled"], 4);
    }
}
