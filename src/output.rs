//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity
//! (component, page, scope) leads with its display title and positional
//! index; identifiers and paths follow as indented context lines. The output
//! reads as a content inventory while still letting users trace each entry
//! back to the catalog and the output directory.
//!
//! # Output Format
//!
//! ## Collect
//!
//! ```text
//! Site
//!     Outskirts Labs Docs
//!     URL: http://localhost:8084
//!
//! Components
//! 001 client-ip (2 versions)
//!     Name: ol.client-ip
//!     Description: Read client IPs from requests.
//!
//! Pages
//! 001 Outskirts Labs Developer Docs
//!     Output: index.md
//! 002 Usage Guide
//!     Scope: ol.client-ip next
//!     Output: ol.client-ip/next/usage.md
//!     Index only
//!
//! Collected 7 of 11 pages (1 without output, 1 skipped by path)
//! ```
//!
//! ## Generate
//!
//! ```text
//! Outskirts Labs Docs → llms.txt, llms-full.txt (+ llm.txt, llm-full.txt)
//!     ol.client-ip → ol.client-ip/llms.txt, ol.client-ip/llms-full.txt
//!         next → ol.client-ip/next/llms.txt, ol.client-ip/next/llms-full.txt
//!
//! Generated 8 llms files, 7 page exports
//! Files: 3 unchanged, 12 written (15 total)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::collect::RecordsManifest;
use crate::export::ROOT_ALIASES;
use crate::generate::GenerateReport;
use crate::links::{FULL_FILE, INDEX_FILE, full_path, index_path};
use crate::ordering::ROOT_COMPONENT;
use std::collections::BTreeSet;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Collect
// ============================================================================

/// Format the collect stage result: site, components, pages, and a summary.
pub fn format_collect_output(manifest: &RecordsManifest) -> Vec<String> {
    let mut lines = vec![
        "Site".to_string(),
        format!("{}{}", indent(1), manifest.site.title),
    ];
    if !manifest.site.url.is_empty() {
        lines.push(format!("{}URL: {}", indent(1), manifest.site.url));
    }

    let declared: BTreeSet<&str> = manifest
        .components
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let undeclared: BTreeSet<&str> = manifest
        .records
        .iter()
        .map(|r| r.component.as_str())
        .filter(|c| !c.is_empty() && *c != ROOT_COMPONENT && !declared.contains(c))
        .collect();

    if !manifest.components.is_empty() || !undeclared.is_empty() {
        lines.push(String::new());
        lines.push("Components".to_string());
    }
    let mut position = 0;
    for component in manifest
        .components
        .iter()
        .filter(|c| c.name != ROOT_COMPONENT)
    {
        position += 1;
        lines.push(format!(
            "{} {} ({})",
            format_index(position),
            component.display_title(),
            plural(component.versions.len(), "version", "versions")
        ));
        lines.push(format!("{}Name: {}", indent(1), component.name));
        let description = manifest
            .descriptions
            .get(&component.name)
            .or(component.description.as_ref())
            .filter(|d| !d.trim().is_empty());
        if let Some(description) = description {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(description, 60)
            ));
        }
    }
    for name in undeclared {
        position += 1;
        lines.push(format!("{} {} (undeclared)", format_index(position), name));
    }

    if !manifest.records.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
    }
    for (i, record) in manifest.records.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), record.title));
        if !record.component.is_empty() && record.component != ROOT_COMPONENT {
            let scope = if record.version.is_empty() {
                record.component.clone()
            } else {
                format!("{} {}", record.component, record.version)
            };
            lines.push(format!("{}Scope: {}", indent(1), scope));
        }
        lines.push(format!("{}Output: {}", indent(1), record.output_path));
        if !record.include_in_aggregate {
            lines.push(format!("{}Index only", indent(1)));
        }
    }

    let stats = &manifest.stats;
    let reasons: Vec<String> = [
        (stats.no_output, "without output"),
        (stats.skipped_path, "skipped by path"),
        (stats.ignored, "ignored"),
        (stats.empty, "empty"),
        (stats.duplicates, "duplicate"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, reason)| format!("{n} {reason}"))
    .collect();

    lines.push(String::new());
    let summary = format!("Collected {} of {} pages", stats.exported, stats.pages);
    if reasons.is_empty() {
        lines.push(summary);
    } else {
        lines.push(format!("{summary} ({})", reasons.join(", ")));
    }

    lines
}

/// Print collect output to stdout.
pub fn print_collect_output(manifest: &RecordsManifest) {
    for line in format_collect_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the generate stage result: one line per scope, then totals.
///
/// Scopes are derived from the index files written, nested by path depth.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let aliases: Vec<&str> = ROOT_ALIASES.iter().map(|(_, alias)| *alias).collect();
    let mut lines = vec![format!(
        "{} \u{2192} {}, {} (+ {})",
        report.site_title,
        INDEX_FILE,
        FULL_FILE,
        aliases.join(", ")
    )];

    let suffix = format!("/{INDEX_FILE}");
    let mut scopes: Vec<&str> = report
        .artifacts
        .iter()
        .filter_map(|path| path.strip_suffix(suffix.as_str()))
        .collect();
    scopes.sort_unstable();

    for scope in scopes {
        let depth = scope.matches('/').count() + 1;
        let name = scope.rsplit('/').next().unwrap_or(scope);
        lines.push(format!(
            "{}{} \u{2192} {}, {}",
            indent(depth),
            name,
            index_path(scope),
            full_path(scope)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(report.artifacts.len(), "llms file", "llms files"),
        plural(report.page_exports, "page export", "page exports")
    ));
    if report.export.duplicates > 0 {
        lines.push(format!(
            "Dropped {}",
            plural(report.export.duplicates, "duplicate record", "duplicate records")
        ));
    }
    lines.push(format!("Files: {}", report.writes));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
