//! Shared test utilities for the docs-llms test suite.
//!
//! Provides fixture setup, builders for the catalog and export types, and
//! lookups that panic with the available keys on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = config::load_config(tmp.path()).unwrap();
//! let manifest = collect::collect_source(tmp.path(), &config, &[]).unwrap();
//!
//! let usage = find_record(&manifest, "ol.client-ip/next/usage.md");
//! assert_eq!(usage.title, "Usage Guide");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::catalog::{CatalogPage, ComponentInfo, VersionInfo};
use crate::collect::RecordsManifest;
use crate::export::PageRecord;
use crate::label::Label;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// Declared component with a text title and versions in rank order.
pub fn component(name: &str, title: &str, versions: &[&str]) -> ComponentInfo {
    ComponentInfo {
        name: name.to_string(),
        title: Label::from(title),
        description: None,
        versions: versions.iter().map(|v| VersionInfo::new(v)).collect(),
    }
}

/// Page record that is included in the aggregates.
pub fn record(component: &str, version: &str, title: &str, path: &str, body: &str) -> PageRecord {
    PageRecord {
        component: component.to_string(),
        version: version.to_string(),
        title: title.to_string(),
        output_path: path.to_string(),
        body: body.to_string(),
        include_in_aggregate: true,
    }
}

/// Catalog page with every commonly-used field present and no attributes.
pub fn catalog_page(
    component: &str,
    version: &str,
    title: &str,
    out_path: &str,
    markdown: &str,
) -> CatalogPage {
    CatalogPage {
        component: Some(component.to_string()),
        version: Some(version.to_string()),
        title: Label::from(title),
        out_path: Some(out_path.to_string()),
        src_path: None,
        markdown: Some(markdown.to_string()),
        attributes: Default::default(),
    }
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a record by output path. Panics if not found.
pub fn find_record<'a>(manifest: &'a RecordsManifest, path: &str) -> &'a PageRecord {
    manifest
        .records
        .iter()
        .find(|r| r.output_path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = manifest
                .records
                .iter()
                .map(|r| r.output_path.as_str())
                .collect();
            panic!("record '{path}' not found. Available: {paths:?}")
        })
}
