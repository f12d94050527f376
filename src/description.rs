//! Component descriptions from project manifests.
//!
//! Projects carry a small EDN manifest next to their docs, for example:
//!
//! ```text
//! {:manifest/version 1
//!  :project {:id "h2o-zig"
//!            :description "libh2o packaged for Zig"}
//!  :docs {:component "h2o-zig"}}
//! ```
//!
//! Only two string fields matter here, so instead of a full EDN reader this
//! module locates `:description "…"` and `:component "…"` and decodes the
//! string literal. The decoder is deliberately lossy: escaped quotes and
//! backslashes are restored, escaped and literal line breaks collapse into
//! single spaces, and any other escape keeps its character without the
//! backslash (`\u00e9` reads back as `u00e9`).
//!
//! Discovery never fails the build. A manifest that can't be read or lacks
//! either field is logged and skipped.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

static DESCRIPTION_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":description\s+"((?:[^"\\]|\\.)*)""#).expect("valid regex"));

static COMPONENT_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":component\s+"((?:[^"\\]|\\.)*)""#).expect("valid regex"));

/// Extract the project description from manifest text.
///
/// Returns `None` when the field is missing or decodes to an empty string.
pub fn extract_description(text: &str) -> Option<String> {
    extract_field(&DESCRIPTION_FIELD, text)
}

/// Extract the docs component name from manifest text.
pub fn extract_component(text: &str) -> Option<String> {
    extract_field(&COMPONENT_FIELD, text)
}

fn extract_field(pattern: &Regex, text: &str) -> Option<String> {
    let raw = pattern.captures(text)?.get(1)?.as_str();
    let decoded = collapse_whitespace(&unescape(raw));
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'r' | 't') => out.push(' '),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Walk `root` for files named `manifest_file` and collect component descriptions.
///
/// Hidden directories and any directory listed in `skip_dirs` (matched by
/// file name, e.g. the output and temp directories) are not entered. Walk
/// order is sorted, so when two manifests name the same component the first
/// one in path order wins.
pub fn discover(root: &Path, manifest_file: &str, skip_dirs: &[&str]) -> BTreeMap<String, String> {
    let mut descriptions = BTreeMap::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            let name: &str = &name;
            !name.starts_with('.') && !skip_dirs.contains(&name)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry during manifest discovery");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != manifest_file {
            continue;
        }

        let path = entry.path();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read manifest");
                continue;
            }
        };

        match (extract_component(&text), extract_description(&text)) {
            (Some(component), Some(description)) => {
                if descriptions.contains_key(&component) {
                    debug!(%component, path = %path.display(), "description already found, ignoring");
                    continue;
                }
                debug!(%component, path = %path.display(), "found component description");
                descriptions.insert(component, description);
            }
            _ => {
                warn!(path = %path.display(), "manifest has no component or description, ignoring");
            }
        }
    }

    descriptions
}
