//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML value and the user's file is merged on top, so a config
//! file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `config.toml` in the site root (the directory that contains `assets/` and
//! receives `data.json`), or any file passed with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [indexer]
//! images_dir = "assets/images"   # Images root, relative to the site root
//! output = "data.json"           # Manifest path, relative to the site root
//! extensions = ["jpg", "jpeg", "png", "webp"]
//!
//! [gallery]
//! batch_size = 24                # Cards rendered per batch
//!
//! [render]
//! output = "index.html"          # Static page written by `satgal render`
//! title = "Satellite Gallery"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanning and manifest output.
    pub indexer: IndexerConfig,
    /// Filtering and batch rendering.
    pub gallery: GalleryConfig,
    /// Static HTML page output.
    pub render: RenderConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.batch_size == 0 {
            return Err(ConfigError::Validation(
                "gallery.batch_size must be at least 1".into(),
            ));
        }
        if self.indexer.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "indexer.extensions must not be empty".into(),
            ));
        }
        if self.indexer.images_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "indexer.images_dir must not be empty".into(),
            ));
        }
        if self.indexer.output.trim().is_empty() || self.render.output.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output paths must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerConfig {
    /// Images root relative to the site root.
    pub images_dir: String,
    /// Manifest file relative to the site root.
    pub output: String,
    /// Accepted file extensions, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            images_dir: "assets/images".to_string(),
            output: "data.json".to_string(),
            extensions: ["jpg", "jpeg", "png", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Number of records appended per batch.
    pub batch_size: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { batch_size: 24 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// HTML page path relative to the site root.
    pub output: String,
    /// Page `<title>` and heading.
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: "index.html".to_string(),
            title: "Satellite Gallery".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The built-in `[indexer]`, `[gallery]` and `[render]` values as a TOML table.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Lay a sparse user `config.toml` over the stock values.
///
/// Sections merge per key, so `[indexer] extensions = ["png"]` keeps the stock
/// `images_dir` and `output`. Arrays and scalars from the user file replace
/// the stock value outright; an extension list is never concatenated.
pub fn merge_toml(stock: toml::Value, user: toml::Value) -> toml::Value {
    match (stock, user) {
        (toml::Value::Table(mut merged), toml::Value::Table(user)) => {
            for (key, user_value) in user {
                let value = match merged.remove(&key) {
                    Some(stock_value) => merge_toml(stock_value, user_value),
                    None => user_value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, user) => user,
    }
}

/// Read the user's `config.toml` without interpreting it; `None` when the
/// site has no config file.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Stock values, the user's overrides if any, then type checking and
/// [`Config::validate`]. Unknown keys fail here.
pub fn resolve_config(
    stock: toml::Value,
    user: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match user {
        Some(user) => merge_toml(stock, user),
        None => stock,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Config from the file passed with `--config`; stock values when it doesn't exist.
pub fn load_config_file(config_path: &Path) -> Result<Config, ConfigError> {
    let user = load_raw_config(config_path)?;
    resolve_config(stock_defaults_value(), user)
}

/// Load `config.toml` from the site root.
pub fn load_config(site_root: &Path) -> Result<Config, ConfigError> {
    load_config_file(&site_root.join(CONFIG_FILENAME))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# satgal configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Indexer
# ---------------------------------------------------------------------------
[indexer]
# Images root, relative to the site root. Expected layout:
#   {images_dir}/{satellite}/{event}/{file}   (event folder optional)
images_dir = "assets/images"

# Manifest written by `satgal index`, relative to the site root.
output = "data.json"

# File extensions picked up by the indexer (case-insensitive).
extensions = ["jpg", "jpeg", "png", "webp"]

# ---------------------------------------------------------------------------
# Gallery
# ---------------------------------------------------------------------------
[gallery]
# Cards appended per batch when browsing.
batch_size = 24

# ---------------------------------------------------------------------------
# Static page
# ---------------------------------------------------------------------------
[render]
# Page written by `satgal render`, relative to the site root.
output = "index.html"

title = "Satellite Gallery"
"##
}
