//! HTML site generation.
//!
//! Stage 2 of the simple-shelf build pipeline. Takes the loaded
//! [`Catalog`] and writes one static HTML file per category tab and page.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): first page of the all-books tab, plus
//!   the welcome section when `welcome.md` exists
//! - **Tab pages** (`/{slug}/{n}.html`): page `n` of one category tab
//!
//! ## Features
//!
//! - **Category tabs**: every page links to page 1 of every tab
//! - **Page controls**: previous / next plus a five-page window; disabled
//!   controls render as plain text
//! - **Keyboard navigation**: ArrowLeft / ArrowRight follow previous / next
//! - **Configurable colors**: CSS custom properties generated from config.toml
//! - **Incremental writes**: unchanged pages are not rewritten (see
//!   [`crate::cache`])
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Same as all-genre/1.html, plus welcome
//! ├── .shelf-cache.json          # Output cache manifest
//! ├── all-genre/
//! │   ├── 1.html
//! │   └── 2.html
//! └── fantasy/
//!     └── 1.html
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/catalog.js`: Keyboard navigation between pages
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Book text arrives pre-escaped as [`Escaped`] and is emitted verbatim;
//! everything else goes through maud's escaping.

use crate::cache::{self, CacheStats, OutputCache};
use crate::config;
use crate::filter;
use crate::load::Catalog;
use crate::naming::{assign_slugs, page_path};
use crate::paginate::{page_count, paginate};
use crate::view::{BookCard, CatalogView, ControlStrip, Escaped, LinkView, ResultStatus, build_view};
use maud::{DOCTYPE, Markup, PreEscaped, Render, html};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/catalog.js");

impl Render for Escaped {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(self.as_str());
    }
}

/// A category tab and the directory its pages live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub label: String,
    pub slug: String,
}

/// What one tab produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabReport {
    pub label: String,
    pub slug: String,
    pub total_count: usize,
    pub total_pages: usize,
}

impl TabReport {
    /// Output paths of this tab's pages, in page order.
    pub fn paths(&self) -> Vec<String> {
        (1..=self.total_pages)
            .map(|n| page_path(&self.slug, n))
            .collect()
    }
}

/// Summary of a generate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub site_title: String,
    pub tabs: Vec<TabReport>,
    pub cache: CacheStats,
}

/// Where a page sits relative to the site root. Links are relative so the
/// output can be served from any sub-path or opened from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    Root,
    Tab,
}

impl Depth {
    fn prefix(self) -> &'static str {
        match self {
            Depth::Root => "",
            Depth::Tab => "../",
        }
    }
}

/// Shared, per-site rendering inputs.
struct SiteContext<'a> {
    title: &'a str,
    css: String,
    tabs: Vec<Tab>,
    welcome_html: Option<String>,
}

/// One page to render.
struct PageJob {
    path: String,
    tab: usize,
    page: usize,
    depth: Depth,
    with_welcome: bool,
}

pub fn generate(
    catalog: &Catalog,
    output_dir: &Path,
    use_cache: bool,
) -> Result<GenerateReport, GenerateError> {
    let site_config = &catalog.config;
    let catalog_config = &site_config.catalog;

    let labels = filter::tab_labels(
        &catalog.books,
        &catalog_config.all_label,
        &catalog_config.categories,
    );
    let slugs = assign_slugs(&labels);
    let tabs: Vec<Tab> = labels
        .into_iter()
        .zip(slugs)
        .map(|(label, slug)| Tab { label, slug })
        .collect();

    let color_css = config::generate_color_css(&site_config.colors);
    let ctx = SiteContext {
        title: &site_config.site.title,
        css: format!("{}\n\n{}", color_css, CSS_STATIC),
        tabs,
        welcome_html: catalog.welcome.as_deref().map(markdown_to_html),
    };

    // Page counts per tab decide the job list
    let mut reports = Vec::with_capacity(ctx.tabs.len());
    let mut jobs = vec![PageJob {
        path: "index.html".to_string(),
        tab: 0,
        page: 1,
        depth: Depth::Root,
        with_welcome: true,
    }];
    for (tab_idx, tab) in ctx.tabs.iter().enumerate() {
        let total_count =
            filter::filter(&catalog.books, &tab.label, &catalog_config.all_label).len();
        let total_pages = page_count(total_count, catalog_config.page_size).max(1);
        for page in 1..=total_pages {
            jobs.push(PageJob {
                path: page_path(&tab.slug, page),
                tab: tab_idx,
                page,
                depth: Depth::Tab,
                with_welcome: false,
            });
        }
        reports.push(TabReport {
            label: tab.label.clone(),
            slug: tab.slug.clone(),
            total_count,
            total_pages,
        });
    }

    let rendered: Vec<(String, String)> = jobs
        .par_iter()
        .map(|job| {
            let tab = &ctx.tabs[job.tab];
            let matched = filter::filter(&catalog.books, &tab.label, &catalog_config.all_label);
            let page = paginate(&matched, job.page, catalog_config.page_size);
            let view = build_view(&page, &tab.label);
            let markup = render_catalog_page(&ctx, job, &view);
            (job.path.clone(), markup.into_string())
        })
        .collect();

    fs::create_dir_all(output_dir)?;
    let mut manifest = if use_cache {
        OutputCache::load(output_dir)
    } else {
        OutputCache::empty()
    };
    let mut stats = CacheStats::default();

    for (path, html) in &rendered {
        let hash = cache::hash_bytes(html.as_bytes());
        if manifest.is_fresh(path, &hash, output_dir) {
            stats.unchanged += 1;
            continue;
        }
        let target = output_dir.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, html)?;
        manifest.record(path.clone(), hash);
        stats.written += 1;
    }

    let keep: HashSet<&str> = rendered.iter().map(|(path, _)| path.as_str()).collect();
    for stale in manifest.retain_only(&keep) {
        if !cache::is_output_path(&stale) {
            continue;
        }
        let target = output_dir.join(&stale);
        if target.is_file() {
            fs::remove_file(&target)?;
            stats.removed += 1;
        }
        if let Some(parent) = target.parent()
            && parent != output_dir
            && fs::read_dir(parent).is_ok_and(|mut entries| entries.next().is_none())
        {
            fs::remove_dir(parent)?;
        }
    }
    manifest.save(output_dir)?;

    Ok(GenerateReport {
        site_title: site_config.site.title.clone(),
        tabs: reports,
        cache: stats,
    })
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    body_html
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header: site title plus the category tab strip
fn site_header(title: &str, tabs: &[Tab], active: usize, depth: Depth) -> Markup {
    let prefix = depth.prefix();
    html! {
        header.site-header {
            a.site-title href={ (prefix) "index.html" } { (title) }
            nav.category-tabs aria-label="Categories" {
                ul {
                    @for (idx, tab) in tabs.iter().enumerate() {
                        li {
                            a.tab.active[idx == active]
                                href={ (prefix) (page_path(&tab.slug, 1)) }
                                aria-current=[(idx == active).then_some("page")] {
                                (tab.label)
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders one link group (movies and references, or documents)
fn render_links(class: &str, links: &[LinkView]) -> Markup {
    html! {
        @if let Some(first) = links.first() {
            div class={ "links " (class) } {
                span.link-icon aria-hidden="true" { (first.kind.icon()) }
                " "
                @for (idx, link) in links.iter().enumerate() {
                    @if idx > 0 { " | " }
                    a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.label) }
                }
            }
        }
    }
}

/// Renders a single book card
fn render_card(card: &BookCard) -> Markup {
    let has_cover = card.image.is_some() || card.adult || card.upcoming;
    html! {
        article.book-card {
            @if has_cover {
                figure.cover {
                    @if card.adult {
                        span.badge.adult-badge { "18+" }
                    }
                    @if card.upcoming {
                        span.badge.upcoming-badge { "Upcoming Releases" }
                    }
                    @if let Some(src) = &card.image {
                        img src=(src) alt=(card.title) loading="lazy";
                    }
                }
            }
            div.book-info {
                h3.book-title { (card.title) }
                p.book-author { "By " (card.author) }
                p.book-pages { "Pages: " (card.pages) }
                p.book-rating {
                    span.stars aria-hidden="true" { (card.rating.symbols()) }
                    " "
                    span.rating-value { (card.rating.label()) }
                }
                (render_links("external-links", &card.external_links))
                (render_links("secondary-links", &card.secondary_links))
                @if let Some(desc) = &card.description {
                    p.book-description { (desc) }
                }
            }
        }
    }
}

/// Renders the line under the cards
fn render_status(status: &ResultStatus) -> Markup {
    html! {
        @match status {
            ResultStatus::Empty { message } => {
                p.no-results { (message) }
            }
            ResultStatus::Showing { summary, .. } => {
                p.result-summary { (summary) }
            }
        }
    }
}

/// Renders the pagination control strip. `href` maps a page number to a
/// link target within the current tab.
fn render_controls(strip: &ControlStrip, href: impl Fn(usize) -> String) -> Markup {
    let prev_href = strip.previous.target.map(&href);
    let next_href = strip.next.target.map(&href);
    html! {
        nav.pagination aria-label="Pages" data-prev=[prev_href.as_deref()] data-next=[next_href.as_deref()] {
            ul {
                li.page-item.disabled[strip.previous.is_disabled()] {
                    @if let Some(target) = &prev_href {
                        a.page-link href=(target) rel="prev" { "Previous" }
                    } @else {
                        span.page-link aria-disabled="true" { "Previous" }
                    }
                }
                @for control in &strip.pages {
                    li.page-item.active[control.active] {
                        @if control.active {
                            span.page-link aria-current="page" { (control.page) }
                        } @else {
                            a.page-link href=(href(control.page)) { (control.page) }
                        }
                    }
                }
                li.page-item.disabled[strip.next.is_disabled()] {
                    @if let Some(target) = &next_href {
                        a.page-link href=(target) rel="next" { "Next" }
                    } @else {
                        span.page-link aria-disabled="true" { "Next" }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one catalog page: header, optional welcome, cards, status, controls
fn render_catalog_page(ctx: &SiteContext<'_>, job: &PageJob, view: &CatalogView) -> Markup {
    let tab = &ctx.tabs[job.tab];
    let prefix = job.depth.prefix();
    let page_title = if view.page_index > 1 {
        format!("{} · {} · Page {}", ctx.title, tab.label, view.page_index)
    } else {
        format!("{} · {}", ctx.title, tab.label)
    };
    let href = |page: usize| format!("{}{}", prefix, page_path(&tab.slug, page));

    let content = html! {
        (site_header(ctx.title, &ctx.tabs, job.tab, job.depth))
        main.catalog-page {
            @if job.with_welcome {
                @if let Some(welcome) = &ctx.welcome_html {
                    section.welcome {
                        (PreEscaped(welcome))
                    }
                }
            }
            h1.catalog-heading { (view.label) }
            @if !view.cards.is_empty() {
                div.book-grid {
                    @for card in &view.cards {
                        (render_card(card))
                    }
                }
            }
            (render_status(&view.status))
            @if let Some(strip) = &view.controls {
                (render_controls(strip, href))
            }
        }
        script { (PreEscaped(JS)) }
    };

    base_document(&page_title, &ctx.css, content)
}

// ============================================================================
// Tests
// ============================================================================
