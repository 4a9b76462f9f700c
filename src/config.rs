//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root; every key is optional and is merged on top of the stock
//! defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Comparative Scripture"
//!
//! [translations]
//! supported = ["NIV", "ESV", "KJV", "WEB"]  # Codes the site accepts
//! default = "NIV"                           # Primary text on scripture pages
//! parallel = ["NIV", "ESV", "KJV"]          # Columns in the side-by-side view
//!
//! [source]
//! kind = "local"            # "local" dataset or "remote" web service
//! data_dir = "scripture"    # Dataset directory, relative to the content root
//! base_url = ""             # Web service root (remote only)
//! timeout_secs = 10         # Per-request timeout (remote only)
//!
//! [routes]
//! books = ["Genesis", "John"]  # Books that get scripture pages
//! max_chapter = 3              # Chapters 1..=max_chapter per book
//! max_verse = 0                # Verses 1..=max_verse per chapter (0 = chapter pages only)
//!
//! [processing]
//! max_processes = 4         # Max parallel lookups (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [translations]
//! default = "KJV"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::books;
use serde::{Deserialize, Serialize};
use std::fs;
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
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title shown on the index page and in page titles.
    pub title: String,
    /// Supported translation codes and their roles.
    pub translations: TranslationsConfig,
    /// Where scripture text comes from.
    pub source: SourceConfig,
    /// Scripture pages to pre-render.
    pub routes: RoutesConfig,
    /// Parallel lookup settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Comparative Scripture".to_string(),
            translations: TranslationsConfig::default(),
            source: SourceConfig::default(),
            routes: RoutesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.translations;
        if t.supported.is_empty() {
            return Err(ConfigError::Validation(
                "translations.supported must not be empty".into(),
            ));
        }
        if !t.is_supported(&t.default) {
            return Err(ConfigError::Validation(format!(
                "translations.default '{}' is not in translations.supported",
                t.default
            )));
        }
        if let Some(code) = t.parallel.iter().find(|c| !t.is_supported(c)) {
            return Err(ConfigError::Validation(format!(
                "translations.parallel '{code}' is not in translations.supported"
            )));
        }
        if self.source.kind == SourceKind::Remote && self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source.base_url is required when source.kind = \"remote\"".into(),
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "source.timeout_secs must be greater than 0".into(),
            ));
        }
        if !self.routes.books.is_empty() && self.routes.max_chapter == 0 {
            return Err(ConfigError::Validation(
                "routes.max_chapter must be greater than 0 when routes.books is set".into(),
            ));
        }
        if let Some(book) = self
            .routes
            .books
            .iter()
            .find(|b| books::find_book(b).is_none())
        {
            return Err(ConfigError::Validation(format!(
                "routes.books: unknown book '{book}'"
            )));
        }
        Ok(())
    }
}

/// Translation codes the site accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationsConfig {
    /// Every code a lookup may name. Anything else is rejected.
    pub supported: Vec<String>,
    /// Translation used for primary text.
    pub default: String,
    /// Translations compared side by side on verse pages.
    pub parallel: Vec<String>,
}

impl TranslationsConfig {
    /// Case-insensitive membership check.
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(code.trim()))
    }
}

impl Default for TranslationsConfig {
    fn default() -> Self {
        Self {
            supported: vec![
                "NIV".to_string(),
                "ESV".to_string(),
                "KJV".to_string(),
                "WEB".to_string(),
            ],
            default: "NIV".to_string(),
            parallel: vec!["NIV".to_string(), "ESV".to_string(), "KJV".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Remote,
}

/// Scripture source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Dataset directory for the local source, relative to the content root.
    pub data_dir: String,
    /// Root URL of the scripture web service.
    pub base_url: String,
    /// Per-request timeout for the web service.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Local,
            data_dir: "scripture".to_string(),
            base_url: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Scripture pages to pre-render: each book in `books`, chapters
/// `1..=max_chapter`, and verses `1..=max_verse` when `max_verse > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    pub books: Vec<String>,
    pub max_chapter: u32,
    pub max_verse: u32,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            books: vec!["Genesis".to_string(), "John".to_string()],
            max_chapter: 3,
            max_verse: 0,
        }
    }
}

/// Parallel lookup settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel lookups.
    /// When absent or null, defaults to the number of CPU cores.
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

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values, arrays included, replace base values entirely.
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
/// Returns `Ok(None)` if the directory has no `config.toml`.
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
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lectern Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the content directory.
# Unknown keys will cause an error.

# Site title, shown on the index page and in page titles.
title = "Comparative Scripture"

# ---------------------------------------------------------------------------
# Translations
# ---------------------------------------------------------------------------
[translations]
# Every translation code a lookup may name. Anything else is rejected,
# never silently replaced.
supported = ["NIV", "ESV", "KJV", "WEB"]

# Translation used for the primary text of scripture pages and topic passages.
default = "NIV"

# Translations compared side by side on verse pages.
parallel = ["NIV", "ESV", "KJV"]

# ---------------------------------------------------------------------------
# Scripture source
# ---------------------------------------------------------------------------
[source]
# "local": JSON dataset in data_dir (translations/*.json, commentary.json,
#          cross_references.json).
# "remote": JSON web service at base_url.
kind = "local"

# Dataset directory, relative to the content root.
data_dir = "scripture"

# Root URL of the scripture web service (remote only).
base_url = ""

# Per-request timeout in seconds (remote only).
timeout_secs = 10

# ---------------------------------------------------------------------------
# Scripture routes
# ---------------------------------------------------------------------------
[routes]
# Books that get pre-rendered scripture pages.
books = ["Genesis", "John"]

# Chapters 1..=max_chapter are rendered for each book.
max_chapter = 3

# Verses 1..=max_verse are rendered for each chapter. 0 renders chapter
# pages only.
max_verse = 0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel lookups.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
