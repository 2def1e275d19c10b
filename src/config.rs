//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The user file in
//! the content root is layered over stock defaults, so it only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Bookshelf"
//!
//! [catalog]
//! page_size = 12              # Books per page
//! all_label = "All Genre"     # Tab label that shows every book
//! categories = []             # Tab order; empty = derive from the data
//! data_file = "books.json"    # Book list, relative to the content root
//!
//! [links]
//! # document_bot = "MyLibraryBot"  # Enables "PDF Available" links
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1d1d1d"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#74642f"
//! star = "#f5a623"
//!
//! [colors.dark]
//! background = "#121212"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#d4c48f"
//! star = "#f5a623"
//!
//! [processing]
//! max_processes = 4           # Max parallel render workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteInfo,
    /// Pagination and category settings for the catalog view.
    pub catalog: CatalogConfig,
    /// Settings for links derived from book records.
    pub links: LinksConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.all_label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.all_label must not be empty".into(),
            ));
        }
        if self.catalog.data_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.data_file must not be empty".into(),
            ));
        }
        if let Some(bot) = &self.links.document_bot
            && !bot.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::Validation(
                "links.document_bot may only contain letters, digits and '_'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Shown in the page `<title>` and header.
    pub title: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Bookshelf".to_string(),
        }
    }
}

/// Catalog view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Number of books on each page. Fixed for the whole site; zero is
    /// rejected at parse time.
    pub page_size: NonZeroUsize,
    /// Sentinel label that matches every book.
    pub all_label: String,
    /// Category tabs in display order. Empty means derive from the data.
    pub categories: Vec<String>,
    /// Book list file, relative to the content root.
    pub data_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(12).unwrap_or(NonZeroUsize::MIN),
            all_label: "All Genre".to_string(),
            categories: Vec::new(),
            data_file: "books.json".to_string(),
        }
    }
}

/// Link derivation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Telegram bot that hands out PDF copies. When unset, books flagged
    /// `hasPdf` get no document link.
    pub document_bot: Option<String>,
}

impl LinksConfig {
    /// Access URL for a gated document, if a bot is configured.
    pub fn document_url(&self, message_id: u64) -> Option<String> {
        self.document_bot
            .as_ref()
            .map(|bot| format!("https://t.me/{bot}?start=verify_{message_id}"))
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Author line, page counts, result summary.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    /// Rating stars.
    pub star: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1d1d1d".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#74642f".to_string(),
            star: "#f5a623".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#d4c48f".to_string(),
            star: "#f5a623".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Shelf Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Shown in the browser tab and the page header.
title = "Bookshelf"

# ---------------------------------------------------------------------------
# Catalog view
# ---------------------------------------------------------------------------
[catalog]
# Books per page. Must be at least 1.
page_size = 12

# Tab label that shows every book regardless of category.
all_label = "All Genre"

# Category tabs, in display order, after the all_label tab.
# Leave empty to derive tabs from the categories found in the data.
categories = []

# Book list, relative to the content root.
data_file = "books.json"

# ---------------------------------------------------------------------------
# Links
# ---------------------------------------------------------------------------
[links]
# Telegram bot that hands out PDF copies. Books with hasPdf and a
# telegramMessageId get a "PDF Available" link when this is set.
# document_bot = "MyLibraryBot"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1d1d1d"
text_muted = "#666666"    # Author line, page counts, result summary
border = "#e0e0e0"
link = "#74642f"
star = "#f5a623"          # Rating stars

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#d4c48f"
star = "#f5a623"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-star: {light_star};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-star: {dark_star};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_star = colors.light.star,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_star = colors.dark.star,
    )
}
