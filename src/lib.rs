//! # Simple Shelf
//!
//! A static site generator for paginated book catalogs. A single
//! `books.json` file is the data source: every record becomes a card, every
//! category becomes a tab, and every tab is split into fixed-size pages.
//!
//! # Architecture: Load, Then Render
//!
//! ```text
//! 1. Load      content/  →  Catalog        (books.json + config.toml → normalized books)
//! 2. Generate  Catalog   →  dist/          (one HTML file per tab and page)
//! ```
//!
//! Between the two stages sits the catalog pipeline, three pure functions
//! that run once per page:
//!
//! ```text
//! filter(books, label) → paginate(matches, page) → build_view(page) → CatalogView
//! ```
//!
//! The same pipeline backs `simple-shelf query`, which prints a single
//! [`view::CatalogView`] as text or JSON instead of writing a site.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Stage 1: reads `books.json`, normalizes records, collects warnings |
//! | [`filter`] | Category and free-text matching, tab label derivation |
//! | [`paginate`] | Clamped 1-based page windows over a filtered list |
//! | [`view`] | Display-ready view model: escaped text, stars, result line, page controls |
//! | [`generate`] | Stage 2: renders every tab and page with Maud |
//! | [`cache`] | Content-hash manifest so unchanged pages are not rewritten |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared catalog types (`Book`, `Category`, `ExternalLink`) |
//! | [`naming`] | Category slugs and page file paths |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Static Pages Over Client-Side Filtering
//!
//! Every tab and page is a real HTML file. There is no client-side state,
//! so every page is linkable, works without JavaScript, and can be served
//! from any file server. The only script maps the arrow keys to the
//! previous / next links.
//!
//! ## Escaping In The View Model
//!
//! Book text is untrusted. [`view::Escaped`] can only be built by escaping
//! raw text, so a view model that type-checks is safe to emit verbatim.
//! Maud escapes the rest (URLs, tab labels, attributes).
//!
//! ## Lenient Records, Strict Structure
//!
//! A malformed category or an unsafe link URL only affects one card, so it
//! becomes a warning and the record is loaded anyway. A file that is not a
//! JSON array, or a field with the wrong type, stops the build.

pub mod cache;
pub mod config;
pub mod filter;
pub mod generate;
pub mod load;
pub mod naming;
pub mod output;
pub mod paginate;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
