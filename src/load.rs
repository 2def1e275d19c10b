//! Catalog loading and record normalization.
//!
//! Stage 1 of the build. Reads the content directory and produces a
//! [`Catalog`]: the normalized book list, the resolved site config, and the
//! optional welcome text. Every later stage works on that value only.
//!
//! ## Content Directory
//!
//! ```text
//! content/
//! ├── config.toml      # Site configuration (optional)
//! ├── books.json       # Book list (name set by catalog.data_file)
//! └── welcome.md       # Welcome section for the index page (optional)
//! ```
//!
//! ## Record Shape
//!
//! `books.json` is an ordered array of camelCase records:
//!
//! ```json
//! {
//!   "title": "The Hobbit",
//!   "author": "J.R.R. Tolkien",
//!   "pages": 310,
//!   "rating": 4.7,
//!   "category": "Fantasy, Classics",
//!   "image": "images/hobbit.jpg",
//!   "description": "…",
//!   "isAdult": false,
//!   "isUpcoming": false,
//!   "hasMovie": true,
//!   "movieLinks": ["https://…", "https://…"],
//!   "hasPdf": true,
//!   "telegramMessageId": 120
//! }
//! ```
//!
//! The movie and PDF fields are folded into [`Book::links`]; a record may
//! also carry a native `links` array of `{ kind, label, url }`.
//!
//! ## Validation
//!
//! Structural problems (unreadable file, invalid JSON, wrong field types)
//! abort the load. Data problems that only affect display (malformed
//! category data, unsafe link URLs, missing titles) are kept as
//! [`LoadWarning`]s and the record is loaded anyway.

use crate::config::{self, LinksConfig, SiteConfig};
use crate::types::{Book, Category, ExternalLink, LinkKind};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Book list not found: {0}")]
    MissingData(PathBuf),
    #[error("Invalid book list {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Name of the optional welcome section file in the content root.
pub const WELCOME_FILE: &str = "welcome.md";

/// Everything the later stages need from the content directory.
#[derive(Debug)]
pub struct Catalog {
    pub books: Vec<Book>,
    pub config: SiteConfig,
    /// Raw markdown of `welcome.md`, if present and non-blank.
    pub welcome: Option<String>,
    pub warnings: Vec<LoadWarning>,
}

/// A non-fatal problem found in one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// 0-based position in the source array.
    pub index: usize,
    pub title: String,
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "record {}: {}", self.index + 1, self.message)
        } else {
            write!(
                f,
                "record {} ({}): {}",
                self.index + 1,
                self.title,
                self.message
            )
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBook {
    title: Option<String>,
    author: Option<String>,
    pages: Option<u32>,
    rating: Option<f64>,
    #[serde(default)]
    category: serde_json::Value,
    image: Option<String>,
    description: Option<String>,
    #[serde(default)]
    is_adult: bool,
    #[serde(default)]
    is_upcoming: bool,
    #[serde(default)]
    has_movie: bool,
    movie_link: Option<String>,
    #[serde(default)]
    movie_links: Vec<String>,
    #[serde(default)]
    has_pdf: bool,
    telegram_message_id: Option<u64>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    url: String,
    label: Option<String>,
    kind: Option<LinkKind>,
}

/// Load the catalog from a content directory.
pub fn load(root: &Path) -> Result<Catalog, LoadError> {
    let config = config::load_config(root)?;

    let data_path = root.join(&config.catalog.data_file);
    if !data_path.is_file() {
        return Err(LoadError::MissingData(data_path));
    }
    let json = fs::read_to_string(&data_path)?;
    let (books, warnings) = parse_books(&json, &config.links).map_err(|source| LoadError::Json {
        path: data_path.clone(),
        source,
    })?;

    let welcome_path = root.join(WELCOME_FILE);
    let welcome = if welcome_path.is_file() {
        Some(fs::read_to_string(&welcome_path)?).filter(|s| !s.trim().is_empty())
    } else {
        None
    };

    Ok(Catalog {
        books,
        config,
        welcome,
        warnings,
    })
}

/// Parse and normalize a `books.json` document.
pub fn parse_books(
    json: &str,
    links: &LinksConfig,
) -> Result<(Vec<Book>, Vec<LoadWarning>), serde_json::Error> {
    let raw: Vec<RawBook> = serde_json::from_str(json)?;
    let mut warnings = Vec::new();
    let mut pdf_without_bot = 0usize;

    let books = raw
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            if record.has_pdf && record.telegram_message_id.is_some() && links.document_bot.is_none()
            {
                pdf_without_bot += 1;
            }
            let mut warn = |message: String| {
                warnings.push(LoadWarning {
                    index,
                    title: record.title.clone().unwrap_or_default(),
                    message,
                });
            };
            normalize(&record, links, &mut warn)
        })
        .collect();

    if pdf_without_bot > 0 {
        warnings.push(LoadWarning {
            index: 0,
            title: String::new(),
            message: format!(
                "{pdf_without_bot} book(s) offer a PDF but links.document_bot is not set; \
                 PDF links are omitted"
            ),
        });
    }

    Ok((books, warnings))
}

fn normalize(record: &RawBook, links: &LinksConfig, warn: &mut impl FnMut(String)) -> Book {
    let title = record.title.clone().unwrap_or_default();
    if title.trim().is_empty() {
        warn("missing title".to_string());
    }

    Book {
        title,
        author: record.author.clone().unwrap_or_default(),
        pages: record.pages.unwrap_or(0),
        rating: record.rating.unwrap_or(0.0),
        category: parse_category(&record.category, warn),
        image: record.image.clone().filter(|url| {
            let ok = is_safe_url(url);
            if !ok {
                warn(format!("dropped unsafe image URL '{url}'"));
            }
            ok
        }),
        description: record.description.clone(),
        adult: record.is_adult,
        upcoming: record.is_upcoming,
        links: collect_links(record, links, warn),
    }
}

/// Map raw category data onto [`Category`].
///
/// Strings become [`Category::Text`] (empty strings count as missing);
/// arrays of strings, numbers or booleans become [`Category::List`];
/// anything else is [`Category::Malformed`] and never matches a filter.
fn parse_category(value: &serde_json::Value, warn: &mut impl FnMut(String)) -> Category {
    use serde_json::Value;
    match value {
        Value::Null => Category::Missing,
        Value::String(s) if s.trim().is_empty() => Category::Missing,
        Value::String(s) => Category::Text(s.clone()),
        Value::Array(values) => {
            let labels: Option<Vec<String>> = values
                .iter()
                .map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect();
            labels.map(Category::List).unwrap_or_else(|| {
                warn("category list contains non-text entries; excluded from category tabs".into());
                Category::Malformed
            })
        }
        other => {
            warn(format!(
                "category must be text or a list, found {other}; excluded from category tabs"
            ));
            Category::Malformed
        }
    }
}

/// Fold the movie, PDF and native link fields into one list.
///
/// Order: movies, then the PDF link, then native links.
fn collect_links(
    record: &RawBook,
    config: &LinksConfig,
    warn: &mut impl FnMut(String),
) -> Vec<ExternalLink> {
    let mut links = Vec::new();

    if record.has_movie {
        if !record.movie_links.is_empty() {
            for (i, url) in record.movie_links.iter().enumerate() {
                links.push(ExternalLink {
                    kind: LinkKind::Movie,
                    label: format!("Movie {}", i + 1),
                    url: url.clone(),
                });
            }
        } else if let Some(url) = &record.movie_link {
            links.push(ExternalLink {
                kind: LinkKind::Movie,
                label: "Movie Available".to_string(),
                url: url.clone(),
            });
        }
    }

    if record.has_pdf
        && let Some(url) = record
            .telegram_message_id
            .and_then(|id| config.document_url(id))
    {
        links.push(ExternalLink {
            kind: LinkKind::Document,
            label: "PDF Available".to_string(),
            url,
        });
    }

    for raw in &record.links {
        let kind = raw.kind.unwrap_or(LinkKind::Reference);
        links.push(ExternalLink {
            kind,
            label: raw.label.clone().unwrap_or_else(|| default_label(kind)),
            url: raw.url.clone(),
        });
    }

    links.retain(|link| {
        let ok = is_safe_url(&link.url);
        if !ok {
            warn(format!("dropped unsafe link URL '{}'", link.url));
        }
        ok
    });
    links
}

fn default_label(kind: LinkKind) -> String {
    match kind {
        LinkKind::Movie => "Movie Available",
        LinkKind::Document => "PDF Available",
        LinkKind::Reference => "Link",
    }
    .to_string()
}

/// `http(s)` URLs and scheme-less relative paths are allowed; every other
/// scheme (`javascript:`, `data:`, …) is not.
pub fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return true;
    }
    let before_path = url.split(['/', '?', '#']).next().unwrap_or("");
    !before_path.contains(':')
}
