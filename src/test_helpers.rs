//! Shared test utilities for the simple-shelf test suite.
//!
//! Provides book builders, fixture setup, and extractors that keep
//! assertions short.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let books = numbered_books(25, Category::Text("Drama".into()));
//! let matched = filter(&books, "drama", "All Genre");
//! assert_eq!(titles(&matched)[0], "Book 1");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::CatalogConfig;
use crate::types::{Book, Category};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

// =========================================================================
// Builders
// =========================================================================

/// An uncategorized book with a 4-star rating and no optional data.
pub fn book(title: &str) -> Book {
    Book {
        title: title.to_string(),
        author: format!("Author of {title}"),
        pages: 200,
        rating: 4.0,
        category: Category::Missing,
        image: None,
        description: None,
        adult: false,
        upcoming: false,
        links: Vec::new(),
    }
}

/// [`book`] with category data.
pub fn book_in(title: &str, category: Category) -> Book {
    Book {
        category,
        ..book(title)
    }
}

/// `Book 1` … `Book n`, all sharing `category`.
pub fn numbered_books(n: usize, category: Category) -> Vec<Book> {
    (1..=n)
        .map(|i| book_in(&format!("Book {i}"), category.clone()))
        .collect()
}

/// Stock catalog settings (page size 12, sentinel `All Genre`).
pub fn catalog() -> CatalogConfig {
    CatalogConfig::default()
}

// =========================================================================
// Extractors
// =========================================================================

/// Titles of a filtered list, in order.
pub fn titles<'a>(books: &[&'a Book]) -> Vec<&'a str> {
    books.iter().map(|b| b.title.as_str()).collect()
}

/// Find a book by title. Panics if not found.
pub fn find_book<'a>(books: &'a [Book], title: &str) -> &'a Book {
    books.iter().find(|b| b.title == title).unwrap_or_else(|| {
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        panic!("book '{title}' not found. Available: {titles:?}")
    })
}
