//! Shared catalog types.
//!
//! [`Book`] is the normalized, read-only record every pipeline stage works
//! on. Raw `books.json` records are converted into books by [`crate::load`];
//! after that nothing mutates them.

use serde::{Deserialize, Serialize};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Page count
    pub pages: u32,
    /// Rating on a 0–5 scale. Not clamped here; see [`crate::view::StarRating`].
    pub rating: f64,
    pub category: Category,
    /// Cover image URL
    pub image: Option<String>,
    pub description: Option<String>,
    /// Restricted-audience (18+) flag
    pub adult: bool,
    /// Not yet released
    pub upcoming: bool,
    /// Zero or more named external links, in display order
    pub links: Vec<ExternalLink>,
}

/// Category data as it appeared in the source record.
///
/// The shape matters for matching: text values are comma-delimited lists,
/// list values are matched element by element, and anything else never
/// matches a label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Category {
    /// No category data (absent, null, or an empty string).
    #[default]
    Missing,
    /// Delimited text such as `"Fiction, Drama"`.
    Text(String),
    /// A list of labels.
    List(Vec<String>),
    /// Present but neither text nor a list of scalars.
    Malformed,
}

impl Category {
    /// Lowercased labels used for matching, or `None` when the data can
    /// never match (missing or malformed).
    ///
    /// Text is split on `,` and each token trimmed; list entries are
    /// lowercased as-is.
    pub fn match_labels(&self) -> Option<Vec<String>> {
        match self {
            Category::Text(text) => Some(
                text.split(',')
                    .map(|label| label.trim().to_lowercase())
                    .collect(),
            ),
            Category::List(values) => Some(values.iter().map(|v| v.to_lowercase()).collect()),
            Category::Missing | Category::Malformed => None,
        }
    }

    /// Whether any label equals `label`, ignoring case.
    pub fn matches(&self, label: &str) -> bool {
        let wanted = label.to_lowercase();
        self.match_labels()
            .is_some_and(|labels| labels.iter().any(|l| *l == wanted))
    }

    /// Labels in their original spelling, blank entries skipped.
    ///
    /// Text tokens are trimmed. List entries are kept as-is so every label
    /// returned here also [`matches`](Self::matches) its own category.
    pub fn display_labels(&self) -> Vec<&str> {
        match self {
            Category::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect(),
            Category::List(values) => values
                .iter()
                .map(String::as_str)
                .filter(|l| !l.trim().is_empty())
                .collect(),
            Category::Missing | Category::Malformed => Vec::new(),
        }
    }
}

/// What an [`ExternalLink`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// A film adaptation.
    Movie,
    /// Secondary content such as a gated PDF copy.
    Document,
    /// Any other reference page.
    Reference,
}

impl LinkKind {
    /// Secondary-content links get their own badge, separate from
    /// external references.
    pub fn is_secondary(self) -> bool {
        matches!(self, LinkKind::Document)
    }

    pub fn icon(self) -> &'static str {
        match self {
            LinkKind::Movie => "\u{1F3AC}",
            LinkKind::Document => "\u{1F4C4}",
            LinkKind::Reference => "\u{1F517}",
        }
    }
}

/// A named link attached to a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalLink {
    pub kind: LinkKind,
    pub label: String,
    pub url: String,
}
