//! Export configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's `config.toml` in the source
//! directory is merged on top, and the result is deserialized and validated.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── catalog.json             # Written by the site-rendering pipeline
//! └── projects/
//!     └── h2o-zig/
//!         └── manifest.edn     # Component description source
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = ""                # Empty: use the catalog's site title
//! url = ""                  # Empty: use the catalog's site URL
//!
//! [export]
//! catalog = "catalog.json"
//! skip_paths = []           # Globs matched against page output paths
//! ignore_attribute = "page-llms-ignore"
//! full_ignore_attribute = "page-llms-full-ignore"
//! manifest_file = "manifest.edn"
//! page_exports = true       # Write one .md file per exported page
//!
//! [descriptions]
//! # "ol.client-ip" = "Read client IPs from requests."
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [export]
//! skip_paths = ["**/404.html"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the config file inside the source directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid skip pattern: {0}")]
    Glob(#[from] globset::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Export configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Site title and base URL overrides.
    pub site: SiteOverrides,
    /// Which pages to export and where to read them from.
    pub export: ExportOptions,
    /// Component name → description. Wins over manifests and the catalog.
    pub descriptions: BTreeMap<String, String>,
}

impl ExportConfig {
    /// Validate names are usable and every skip pattern compiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("export.catalog", &self.export.catalog),
            ("export.ignore_attribute", &self.export.ignore_attribute),
            (
                "export.full_ignore_attribute",
                &self.export.full_ignore_attribute,
            ),
            ("export.manifest_file", &self.export.manifest_file),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.descriptions.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "descriptions keys must be component names".into(),
            ));
        }
        self.export.skip_set()?;
        Ok(())
    }
}

/// Values that win over the catalog's own site metadata when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteOverrides {
    pub title: String,
    pub url: String,
}

/// Page selection and output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    /// Catalog file, relative to the source directory.
    pub catalog: String,
    /// Glob patterns; pages whose output path matches any are not exported.
    pub skip_paths: Vec<String>,
    /// Page attribute that removes a page from every export.
    pub ignore_attribute: String,
    /// Page attribute that keeps a page out of the `llms-full.txt` aggregates.
    pub full_ignore_attribute: String,
    /// File name of project manifests carrying component descriptions.
    pub manifest_file: String,
    /// Whether to write a markdown file next to every exported page.
    pub page_exports: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            catalog: "catalog.json".to_string(),
            skip_paths: Vec::new(),
            ignore_attribute: "page-llms-ignore".to_string(),
            full_ignore_attribute: "page-llms-full-ignore".to_string(),
            manifest_file: "manifest.edn".to_string(),
            page_exports: true,
        }
    }
}

impl ExportOptions {
    /// Compile `skip_paths` into one matcher. `*` stays within a path
    /// segment; only `**` crosses directories.
    pub fn skip_set(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.skip_paths {
            builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
        }
        Ok(builder.build()?)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ExportConfig::default()).expect("default config must serialize")
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
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
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
) -> Result<ExportConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ExportConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ExportConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-llms Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the source directory next to catalog.json.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
# Title used as the heading of the site-wide llms.txt and llms-full.txt.
# Empty: use the catalog's site title, then "Documentation".
title = ""

# Base URL prepended to every link, e.g. "https://docs.example.com".
# A trailing slash is stripped. Empty: use the catalog's site URL; when that
# is empty too, links are root-relative ("/lib/llms.txt").
url = ""

# ---------------------------------------------------------------------------
# Export settings
# ---------------------------------------------------------------------------
[export]
# Content catalog written by the site-rendering pipeline, relative to the
# source directory.
catalog = "catalog.json"

# Glob patterns matched against each page's output path (e.g. "lib/0.1/x.html").
# Matching pages are left out of every export. `*` matches within one path
# segment and `**` crosses directories, so "*.html" only covers top-level pages.
# Example: skip_paths = ["**/404.html", "drafts/**"]
skip_paths = []

# Page attribute that removes a page from every export.
ignore_attribute = "page-llms-ignore"

# Page attribute that keeps a page's body out of the llms-full.txt aggregates.
# The page is still linked from the llms.txt indexes.
full_ignore_attribute = "page-llms-full-ignore"

# Project manifest file name. Manifests found under the source directory
# supply component descriptions from their :description field.
manifest_file = "manifest.edn"

# Write a markdown export (<page>.md) next to every exported page.
page_exports = true

# ---------------------------------------------------------------------------
# Component descriptions
# ---------------------------------------------------------------------------
# Component name -> description shown under the component's headings.
# Wins over manifest descriptions and the catalog's own description.
[descriptions]
# "ol.client-ip" = "Read client IPs from requests."
"##
}
