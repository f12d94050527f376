//! llms artifact generation.
//!
//! Stage 2 of the export pipeline. Takes the records manifest from the
//! collect stage, runs the hierarchical export builder, and writes the result
//! into the output directory.
//!
//! ## Generated Files
//!
//! - **Site scope**: `llms.txt`, `llms-full.txt` and their `llm.txt` /
//!   `llm-full.txt` aliases
//! - **Component scope**: `<component>/llms.txt`, `<component>/llms-full.txt`
//! - **Version scope**: `<component>/<version>/llms.txt`, `…/llms-full.txt`
//! - **Page exports** (`export.page_exports`): one `<page>.md` per record,
//!   next to the page's HTML
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── llms.txt
//! ├── llms-full.txt
//! ├── llm.txt                    # Same bytes as llms.txt
//! ├── llm-full.txt               # Same bytes as llms-full.txt
//! ├── index.md                   # Page export
//! ├── .llms-cache.json           # Write cache
//! └── ol.client-ip/
//!     ├── llms.txt
//!     ├── llms-full.txt
//!     └── 0.1/
//!         ├── llms.txt
//!         ├── llms-full.txt
//!         └── index.md
//! ```
//!
//! Every file goes through the [write cache](crate::cache): unchanged content
//! is not rewritten and files from earlier runs that are no longer produced
//! are removed.

use crate::cache::{self, CacheManifest, WriteStats};
use crate::collect::RecordsManifest;
use crate::export::{self, ExportStats};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Refusing to write outside the output directory: {0}")]
    UnsafePath(String),
}

/// What a generate run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub site_title: String,
    /// llms index and aggregate paths, sorted.
    pub artifacts: Vec<String>,
    /// Number of per-page markdown exports.
    pub page_exports: usize,
    pub export: ExportStats,
    pub writes: WriteStats,
}

/// Load a records manifest written by the collect stage.
pub fn load_manifest(path: &Path) -> Result<RecordsManifest, GenerateError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn generate(
    manifest_path: &Path,
    output_dir: &Path,
    use_cache: bool,
) -> Result<GenerateReport, GenerateError> {
    let manifest = load_manifest(manifest_path)?;
    info!(records = manifest.records.len(), "loaded records manifest");
    generate_from(&manifest, output_dir, use_cache)
}

/// Build and write every file for an in-memory manifest.
pub fn generate_from(
    manifest: &RecordsManifest,
    output_dir: &Path,
    use_cache: bool,
) -> Result<GenerateReport, GenerateError> {
    let built = export::build(
        &manifest.site.title,
        &manifest.site.url,
        &manifest.components,
        &manifest.descriptions,
        &manifest.records,
    );
    if built.stats.duplicates > 0 {
        warn!(
            duplicates = built.stats.duplicates,
            "dropped records with duplicate output paths"
        );
    }

    let artifacts: Vec<String> = built.artifacts.keys().cloned().collect();
    let mut files = built.artifacts;

    let mut page_exports = 0;
    if manifest.page_exports {
        for record in &manifest.records {
            if record.output_path.is_empty() || files.contains_key(&record.output_path) {
                continue;
            }
            files.insert(record.output_path.clone(), format!("{}\n", record.body));
            page_exports += 1;
        }
    }

    for path in files.keys() {
        check_path(path)?;
    }

    fs::create_dir_all(output_dir)?;
    let previous = if use_cache {
        CacheManifest::load(output_dir)
    } else {
        CacheManifest::empty()
    };
    let writes = write_files(&files, &previous, output_dir)?;
    info!(%writes, "generate finished");

    Ok(GenerateReport {
        site_title: manifest.site.title.clone(),
        artifacts,
        page_exports,
        export: built.stats,
        writes,
    })
}

/// Write `files` through the cache, prune stale paths, and save the new cache.
fn write_files(
    files: &BTreeMap<String, String>,
    previous: &CacheManifest,
    output_dir: &Path,
) -> Result<WriteStats, GenerateError> {
    let mut stats = WriteStats::default();
    let mut next = CacheManifest::empty();

    for (path, text) in files {
        let hash = cache::hash_content(text);
        if previous.is_unchanged(path, &hash, output_dir) {
            debug!(path, "unchanged");
            stats.skip();
        } else {
            let target = output_dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, text)?;
            debug!(path, "written");
            stats.write();
        }
        next.insert(path.clone(), hash);
    }

    let produced: HashSet<&str> = files.keys().map(String::as_str).collect();
    for stale in previous.stale_paths(&produced) {
        if check_path(stale).is_err() {
            warn!(path = stale, "ignoring unsafe path in write cache");
            continue;
        }
        match fs::remove_file(output_dir.join(stale)) {
            Ok(()) => {
                debug!(path = stale, "removed stale file");
                stats.remove();
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }

    next.save(output_dir)?;
    Ok(stats)
}

/// Reject paths that are empty, absolute, or climb out with `..`.
pub fn check_path(path: &str) -> Result<(), GenerateError> {
    let safe = !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(())
    } else {
        Err(GenerateError::UnsafePath(path.to_string()))
    }
}
