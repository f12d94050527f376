//! Catalog collection and records manifest generation.
//!
//! Stage 1 of the export pipeline. Reads the content catalog written by the
//! site-rendering pipeline, decides which pages are exported, and produces a
//! [`RecordsManifest`] that the generate stage consumes.
//!
//! ## Page Rules
//!
//! Each catalog page is checked in order; the first rule that applies wins:
//!
//! | Rule | Outcome | Counter |
//! |------|---------|---------|
//! | no `out_path` | dropped | `no_output` |
//! | `out_path` matches `export.skip_paths` | dropped | `skipped_path` |
//! | ignore attribute set | dropped | `ignored` |
//! | empty markdown | dropped | `empty` |
//! | markdown path already taken | dropped | `duplicates` |
//! | full-ignore attribute set | listed, body kept out of aggregates | `index_only` |
//!
//! Surviving pages become [`PageRecord`]s whose `output_path` is the page's
//! HTML path with the suffix swapped to `.md` (see [`markdown_url`]).
//!
//! ## Titles
//!
//! A page's catalog title is flattened with [`Label::to_plain`](crate::label::Label::to_plain).
//! When that is empty the first markdown heading of the body is used, then
//! `"Untitled"`.
//!
//! ## Site Metadata
//!
//! Config values win over catalog values when non-empty. The site title falls
//! back to `"Documentation"` and the base URL to `""` (root-relative links).

use crate::catalog::{self, Catalog, ComponentInfo};
use crate::config::{self, ExportConfig};
use crate::description;
use crate::export::{DEFAULT_SITE_TITLE, PageRecord, UNTITLED};
use crate::links::markdown_url;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name of the records manifest inside the temp directory.
pub const RECORDS_FILENAME: &str = "records.json";

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Catalog error in {path}: {source}")]
    Catalog {
        path: String,
        source: catalog::CatalogError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Manifest output from the collect stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsManifest {
    pub site: SiteMeta,
    pub components: Vec<ComponentInfo>,
    /// Resolved description overrides: config table over discovered manifests.
    pub descriptions: BTreeMap<String, String>,
    pub records: Vec<PageRecord>,
    /// Whether generate writes one markdown file per record.
    pub page_exports: bool,
    pub stats: CollectStats,
}

/// Resolved site title and base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMeta {
    pub title: String,
    pub url: String,
}

/// What happened to each catalog page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectStats {
    /// Pages in the catalog.
    pub pages: usize,
    /// Pages turned into records.
    pub exported: usize,
    pub no_output: usize,
    pub skipped_path: usize,
    pub ignored: usize,
    pub empty: usize,
    pub duplicates: usize,
    /// Exported pages kept out of the aggregates.
    pub index_only: usize,
}

impl CollectStats {
    /// Pages dropped for any reason.
    pub fn dropped(&self) -> usize {
        self.no_output + self.skipped_path + self.ignored + self.empty + self.duplicates
    }
}

/// Records selected from one catalog.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub records: Vec<PageRecord>,
    pub stats: CollectStats,
}

/// Apply the page rules to every catalog page, in catalog order.
pub fn collect(catalog: &Catalog, config: &ExportConfig) -> Result<Collected, CollectError> {
    let skip = config.export.skip_set()?;
    let ignore_attr = config.export.ignore_attribute.as_str();
    let full_ignore_attr = config.export.full_ignore_attribute.as_str();

    let mut stats = CollectStats {
        pages: catalog.pages.len(),
        ..Default::default()
    };
    let mut records = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    for page in &catalog.pages {
        let Some(out_path) = page
            .out_path
            .as_deref()
            .map(|p| p.trim_start_matches('/'))
            .filter(|p| !p.is_empty())
        else {
            debug!(page = page.describe(), "page has no output, skipping");
            stats.no_output += 1;
            continue;
        };

        if skip.is_match(out_path) {
            warn!(path = out_path, "skipping page matching skip pattern");
            stats.skipped_path += 1;
            continue;
        }

        if page.attribute_set(ignore_attr) {
            warn!(page = page.describe(), attribute = ignore_attr, "skipping ignored page");
            stats.ignored += 1;
            continue;
        }

        let body = page.markdown.as_deref().map(str::trim).unwrap_or_default();
        if body.is_empty() {
            warn!(page = page.describe(), "skipping page with empty markdown");
            stats.empty += 1;
            continue;
        }

        let output_path = markdown_url(out_path);
        if !taken.insert(output_path.clone()) {
            warn!(path = %output_path, "skipping duplicate markdown output path");
            stats.duplicates += 1;
            continue;
        }

        let include_in_aggregate = !page.attribute_set(full_ignore_attr);
        if !include_in_aggregate {
            debug!(page = page.describe(), "page kept out of llms-full aggregates");
            stats.index_only += 1;
        }

        let title = match page.title.to_plain() {
            t if !t.is_empty() => t,
            _ => first_heading(body).unwrap_or_else(|| UNTITLED.to_string()),
        };

        records.push(PageRecord {
            component: page.component.clone().unwrap_or_default(),
            version: page.version.clone().unwrap_or_default(),
            title,
            output_path,
            body: body.to_string(),
            include_in_aggregate,
        });
    }

    stats.exported = records.len();
    Ok(Collected { records, stats })
}

/// Text of the first markdown heading, if any heading has text.
pub fn first_heading(markdown: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
                text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                let heading = text.trim();
                if !heading.is_empty() {
                    return Some(heading.to_string());
                }
                in_heading = false;
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }
    None
}

/// Resolve site title and URL: config first, then catalog, then defaults.
pub fn resolve_site(catalog: &Catalog, config: &ExportConfig) -> SiteMeta {
    let title = [
        config.site.title.trim().to_string(),
        catalog.site.title.to_plain(),
    ]
    .into_iter()
    .find(|t| !t.is_empty())
    .unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string());

    let url = [
        config.site.url.trim(),
        catalog.site.url.as_deref().unwrap_or_default().trim(),
    ]
    .into_iter()
    .find(|u| !u.is_empty())
    .unwrap_or_default()
    .to_string();

    SiteMeta { title, url }
}

/// Run the whole collect stage for a source directory.
///
/// Loads the catalog named by the config, selects records, and resolves
/// component descriptions. `skip_dirs` lists directory names (output, temp)
/// that manifest discovery must not enter.
pub fn collect_source(
    source_dir: &Path,
    config: &ExportConfig,
    skip_dirs: &[&str],
) -> Result<RecordsManifest, CollectError> {
    let catalog_path = source_dir.join(&config.export.catalog);
    let catalog =
        catalog::load_catalog(&catalog_path).map_err(|source| CollectError::Catalog {
            path: catalog_path.display().to_string(),
            source,
        })?;
    info!(
        pages = catalog.pages.len(),
        components = catalog.components.len(),
        "loaded catalog"
    );

    let Collected { records, stats } = collect(&catalog, config)?;

    let mut descriptions =
        description::discover(source_dir, &config.export.manifest_file, skip_dirs);
    for (name, text) in &config.descriptions {
        if !text.trim().is_empty() {
            descriptions.insert(name.clone(), text.clone());
        }
    }

    Ok(RecordsManifest {
        site: resolve_site(&catalog, config),
        components: catalog.components,
        descriptions,
        records,
        page_exports: config.export.page_exports,
        stats,
    })
}

/// Write the records manifest as pretty JSON, creating parent directories.
pub fn write_manifest(manifest: &RecordsManifest, path: &Path) -> Result<(), CollectError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json)?;
    Ok(())
}
