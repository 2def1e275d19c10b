//! Category filtering and free-text search.
//!
//! Both narrow the full book list without reordering or mutating it. The
//! result borrows from the input, so a single loaded list backs every
//! category page rendered from it.

use crate::types::Book;

/// Books matching `label`, in input order.
///
/// `all_label` is the sentinel that matches every book, including books with
/// missing or malformed category data. The sentinel comparison is exact; any
/// other label is compared case-insensitively against each book's labels
/// (see [`crate::types::Category::matches`]).
pub fn filter<'a>(books: &'a [Book], label: &str, all_label: &str) -> Vec<&'a Book> {
    if label == all_label {
        return books.iter().collect();
    }
    books.iter().filter(|b| b.category.matches(label)).collect()
}

/// Books whose title, author, or description contains `term`, ignoring case.
///
/// The term is trimmed first; an empty term matches everything.
pub fn search<'a>(books: &'a [Book], term: &str) -> Vec<&'a Book> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return books.iter().collect();
    }
    books
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle)
                || b.author.to_lowercase().contains(&needle)
                || b.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Tab labels for the catalog: the sentinel first, then either the
/// configured categories or, if none are configured, every label found in
/// the data in first-seen order.
///
/// Derived labels are deduplicated case-insensitively and keep the
/// spelling of their first occurrence. Each one matches at least the book
/// it was read from.
pub fn tab_labels(books: &[Book], all_label: &str, configured: &[String]) -> Vec<String> {
    let mut tabs = vec![all_label.to_string()];
    let mut seen = vec![all_label.to_lowercase()];

    let mut push = |label: &str| {
        let key = label.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            tabs.push(label.to_string());
        }
    };

    if configured.is_empty() {
        for book in books {
            for label in book.category.display_labels() {
                if book.category.matches(label) {
                    push(label);
                }
            }
        }
    } else {
        for label in configured {
            let label = label.trim();
            if !label.is_empty() {
                push(label);
            }
        }
    }
    tabs
}
