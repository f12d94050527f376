//! Content catalog input.
//!
//! The site-rendering pipeline writes `catalog.json` into the source
//! directory: site metadata, the declared components with their versions (in
//! display order), and every rendered page with its markdown body and page
//! attributes. This module only models and loads that file; deciding which
//! pages get exported is the job of [`crate::collect`].
//!
//! ```json
//! {
//!   "site": { "title": "Docs", "url": "https://docs.example.com" },
//!   "components": [
//!     { "name": "lib", "title": "Lib", "versions": [{ "version": "0.1" }] }
//!   ],
//!   "pages": [
//!     { "component": "lib", "version": "0.1", "title": "Usage",
//!       "out_path": "lib/0.1/usage.html", "markdown": "…",
//!       "attributes": { "page-llms-full-ignore": "" } }
//!   ]
//! }
//! ```

use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Display label for a version whose identifier is empty.
pub const UNVERSIONED_LABEL: &str = "unversioned";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The whole catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub site: SiteInfo,
    pub components: Vec<ComponentInfo>,
    pub pages: Vec<CatalogPage>,
}

/// Site-level metadata as the rendering pipeline knows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub title: Label,
    pub url: Option<String>,
}

/// Declared metadata for one component. List position is its sort rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentInfo {
    pub name: String,
    #[serde(skip_serializing_if = "is_null_label")]
    pub title: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub versions: Vec<VersionInfo>,
}

impl ComponentInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Display title, defaulting to the component name.
    pub fn display_title(&self) -> String {
        self.title.or_default_text(&self.name)
    }
}

/// One declared version of a component. List position is its sort rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    pub version: String,
    #[serde(skip_serializing_if = "is_null_label")]
    pub display_version: Label,
}

impl VersionInfo {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            display_version: Label::Null,
        }
    }

    /// Display label: the declared display version, else the version, else `"unversioned"`.
    pub fn display_label(&self) -> String {
        let fallback = if self.version.is_empty() {
            UNVERSIONED_LABEL
        } else {
            &self.version
        };
        self.display_version.or_default_text(fallback)
    }
}

fn is_null_label(label: &Label) -> bool {
    matches!(label, Label::Null)
}

/// One rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogPage {
    pub component: Option<String>,
    pub version: Option<String>,
    pub title: Label,
    /// Output path of the rendered HTML page, relative to the site root.
    pub out_path: Option<String>,
    /// Source file the page was rendered from, used in diagnostics.
    pub src_path: Option<String>,
    /// Markdown rendition of the page body.
    pub markdown: Option<String>,
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl CatalogPage {
    /// Whether a page attribute is set.
    ///
    /// Attributes declared without a value arrive as `""` and count as set.
    /// Only `false`, `null`, and the string `"false"` count as unset.
    pub fn attribute_set(&self, name: &str) -> bool {
        match self.attributes.get(name) {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
            Some(serde_json::Value::String(s)) => s != "false",
            Some(_) => true,
        }
    }

    /// Best identifier for log lines: source path, else output path.
    pub fn describe(&self) -> &str {
        self.src_path
            .as_deref()
            .or(self.out_path.as_deref())
            .unwrap_or("<unknown page>")
    }
}

/// Load `catalog.json` (or whichever file the config names).
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path)?;
    let catalog = serde_json::from_str(&content)?;
    Ok(catalog)
}
