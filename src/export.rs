//! Hierarchical llms export builder.
//!
//! Turns a flat list of [`PageRecord`]s into the `llms.txt` index and
//! `llms-full.txt` aggregate hierarchy. [`build`] is a pure function: no I/O,
//! no logging, fresh lookup tables per call. Callers decide what to do with
//! the returned [`Export`].
//!
//! ## Scopes
//!
//! | Scope | Index | Aggregate |
//! |-------|-------|-----------|
//! | Site | `llms.txt` (+ `llm.txt`) | `llms-full.txt` (+ `llm-full.txt`) |
//! | Component | `<c>/llms.txt` | `<c>/llms-full.txt` |
//! | Version | `<c>/<v>/llms.txt` | `<c>/<v>/llms-full.txt` |
//!
//! Pages of the `ROOT` component are listed only at site scope. Unversioned
//! pages of a real component are listed directly under that component; only
//! non-empty versions get their own scope.
//!
//! ## Text layout
//!
//! ```text
//! # <title>
//!
//! <description, when known>
//!
//! - [Page](https://docs.example.com/c/0.1/page.md)
//!   - [nested](…)
//! ```
//!
//! Aggregates share the heading block and follow it with one
//! `## <page title>\n\n<body>` section per aggregable page, separated by a
//! blank line.

use crate::catalog::{ComponentInfo, UNVERSIONED_LABEL};
use crate::links::{INDEX_FILE, full_path, index_path, normalize_base_url, to_url};
use crate::ordering::{ROOT_COMPONENT, Ranks, compare_components, natural_cmp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const UNTITLED: &str = "Untitled";
pub const DEFAULT_SITE_TITLE: &str = "Documentation";

/// Placeholder list line for an index with nothing to link.
const NO_PAGES: &str = "- (no pages)";

/// Root-scope files and the legacy names they are duplicated under.
pub const ROOT_ALIASES: [(&str, &str); 2] =
    [("llms.txt", "llm.txt"), ("llms-full.txt", "llm-full.txt")];

/// One exported page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Owning component; empty or `ROOT` means site level.
    #[serde(default)]
    pub component: String,
    /// Version identifier; empty means unversioned.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub title: String,
    /// Site-relative path of the page's markdown export.
    pub output_path: String,
    pub body: String,
    #[serde(default = "default_true")]
    pub include_in_aggregate: bool,
}

fn default_true() -> bool {
    true
}

/// Counters from one [`build`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Pages linked from at least one index.
    pub listed: usize,
    /// Pages whose body went into the aggregates.
    pub aggregated: usize,
    /// Records dropped because an earlier record had the same output path.
    pub duplicates: usize,
    /// Records dropped for having no output path.
    pub missing_path: usize,
}

/// Result of [`build`]: artifact path → text, plus counters.
#[derive(Debug, Clone, Default)]
pub struct Export {
    pub artifacts: BTreeMap<String, String>,
    pub stats: ExportStats,
}

/// Build the full llms hierarchy.
///
/// `description_overrides` wins over [`ComponentInfo::description`] whenever
/// the override is non-empty. Output depends only on the inputs' content, not
/// on the order of `page_records`.
pub fn build(
    site_title: &str,
    site_base_url: &str,
    component_infos: &[ComponentInfo],
    description_overrides: &BTreeMap<String, String>,
    page_records: &[PageRecord],
) -> Export {
    let base = normalize_base_url(site_base_url);
    let site_title = match site_title.trim() {
        "" => DEFAULT_SITE_TITLE,
        title => title,
    };
    let lookup = Lookup::new(component_infos, description_overrides);

    let mut stats = ExportStats::default();
    let tree = Tree::assemble(component_infos, page_records, &lookup, &mut stats);
    let render = Renderer { base, lookup: &lookup };

    let mut artifacts = BTreeMap::new();

    let site_index = render.index(site_title, None, &render.site_lines(&tree));
    let site_full = render.full(site_title, None, tree.all_pages());
    for (file, alias) in ROOT_ALIASES {
        let text = if file == INDEX_FILE {
            &site_index
        } else {
            &site_full
        };
        artifacts.insert(file.to_string(), text.clone());
        artifacts.insert(alias.to_string(), text.clone());
    }

    for component in &tree.components {
        let title = lookup.title(component.name);
        let description = lookup.description(component.name);

        artifacts.insert(
            index_path(component.name),
            render.index(title, description, &render.component_lines(component, 0)),
        );
        artifacts.insert(
            full_path(component.name),
            render.full(title, description, component.pages()),
        );

        for version in &component.versions {
            let scope = version_scope(component.name, version.name);
            let heading = format!("{title} {}", version.label);
            artifacts.insert(
                index_path(&scope),
                render.index(&heading, description, &render.page_lines(&version.pages, 0)),
            );
            artifacts.insert(
                full_path(&scope),
                render.full(&heading, description, version.pages.iter()),
            );
        }
    }

    for page in tree.all_pages() {
        stats.listed += 1;
        if page.aggregate {
            stats.aggregated += 1;
        }
    }

    Export { artifacts, stats }
}

fn version_scope(component: &str, version: &str) -> String {
    format!("{component}/{version}")
}

// ============================================================================
// Lookup tables
// ============================================================================

/// Ranks, titles, and descriptions declared by the component list.
struct Lookup {
    component_ranks: Ranks,
    titles: HashMap<String, String>,
    descriptions: HashMap<String, String>,
    version_ranks: HashMap<String, Ranks>,
    version_labels: HashMap<String, HashMap<String, String>>,
}

impl Lookup {
    fn new(infos: &[ComponentInfo], overrides: &BTreeMap<String, String>) -> Self {
        let mut lookup = Lookup {
            component_ranks: Ranks::new(),
            titles: HashMap::new(),
            descriptions: HashMap::new(),
            version_ranks: HashMap::new(),
            version_labels: HashMap::new(),
        };

        for info in infos {
            if lookup.titles.contains_key(&info.name) {
                continue;
            }
            lookup.component_ranks.declare(&info.name);
            lookup
                .titles
                .insert(info.name.clone(), info.display_title());
            if let Some(description) = non_empty(info.description.as_deref()) {
                lookup
                    .descriptions
                    .insert(info.name.clone(), description.to_string());
            }

            let ranks = lookup.version_ranks.entry(info.name.clone()).or_default();
            let labels = lookup.version_labels.entry(info.name.clone()).or_default();
            for version in &info.versions {
                ranks.declare(&version.version);
                labels
                    .entry(version.version.clone())
                    .or_insert_with(|| version.display_label());
            }
        }

        for (name, description) in overrides {
            if let Some(description) = non_empty(Some(description)) {
                lookup
                    .descriptions
                    .insert(name.clone(), description.to_string());
            }
        }

        lookup
    }

    fn title<'a>(&'a self, component: &'a str) -> &'a str {
        self.titles
            .get(component)
            .map(String::as_str)
            .unwrap_or(component)
    }

    fn description(&self, component: &str) -> Option<&str> {
        self.descriptions.get(component).map(String::as_str)
    }

    fn version_label(&self, component: &str, version: &str) -> String {
        self.version_labels
            .get(component)
            .and_then(|labels| labels.get(version))
            .cloned()
            .unwrap_or_else(|| {
                if version.is_empty() {
                    UNVERSIONED_LABEL.to_string()
                } else {
                    version.to_string()
                }
            })
    }

    fn compare_versions(&self, component: &str, a: &str, b: &str) -> Ordering {
        match self.version_ranks.get(component) {
            Some(ranks) => ranks.compare(a, b),
            None => natural_cmp(a, b),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Grouping
// ============================================================================

/// A record after defaults are applied.
#[derive(Debug)]
struct Page<'a> {
    title: &'a str,
    path: &'a str,
    body: &'a str,
    aggregate: bool,
}

impl<'a> Page<'a> {
    fn new(record: &'a PageRecord) -> Self {
        let title = match record.title.trim() {
            "" => UNTITLED,
            title => title,
        };
        Page {
            title,
            path: &record.output_path,
            body: &record.body,
            aggregate: record.include_in_aggregate,
        }
    }
}

struct VersionGroup<'a> {
    name: &'a str,
    label: String,
    pages: Vec<Page<'a>>,
}

struct ComponentGroup<'a> {
    name: &'a str,
    unversioned: Vec<Page<'a>>,
    versions: Vec<VersionGroup<'a>>,
}

impl<'a> ComponentGroup<'a> {
    /// Unversioned pages, then each version's pages in canonical order.
    fn pages(&self) -> impl Iterator<Item = &Page<'a>> {
        self.unversioned
            .iter()
            .chain(self.versions.iter().flat_map(|v| v.pages.iter()))
    }
}

/// Records grouped by scope, every level in canonical order.
struct Tree<'a> {
    root: Vec<Page<'a>>,
    components: Vec<ComponentGroup<'a>>,
}

#[derive(Default)]
struct Bucket<'a> {
    unversioned: Vec<Page<'a>>,
    versions: BTreeMap<&'a str, Vec<Page<'a>>>,
}

impl<'a> Tree<'a> {
    fn assemble(
        infos: &'a [ComponentInfo],
        records: &'a [PageRecord],
        lookup: &Lookup,
        stats: &mut ExportStats,
    ) -> Self {
        let mut root = Vec::new();
        let mut buckets: BTreeMap<&'a str, Bucket<'a>> = BTreeMap::new();

        let mut declared: HashSet<&str> = HashSet::new();
        for info in infos {
            if info.name.is_empty() || info.name == ROOT_COMPONENT {
                continue;
            }
            // Repeated declarations are ignored, as in `Lookup::new`.
            if !declared.insert(info.name.as_str()) {
                continue;
            }
            let bucket = buckets.entry(info.name.as_str()).or_default();
            for version in info.versions.iter().filter(|v| !v.version.is_empty()) {
                bucket.versions.entry(version.version.as_str()).or_default();
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for record in records {
            if record.output_path.is_empty() {
                stats.missing_path += 1;
                continue;
            }
            if !seen.insert(record.output_path.as_str()) {
                stats.duplicates += 1;
                continue;
            }

            let page = Page::new(record);
            let component = record.component.as_str();
            if component.is_empty() || component == ROOT_COMPONENT {
                root.push(page);
                continue;
            }

            let bucket = buckets.entry(component).or_default();
            if record.version.is_empty() {
                bucket.unversioned.push(page);
            } else {
                bucket
                    .versions
                    .entry(record.version.as_str())
                    .or_default()
                    .push(page);
            }
        }

        sort_pages(&mut root);

        let mut components: Vec<ComponentGroup<'a>> = buckets
            .into_iter()
            .map(|(name, bucket)| {
                let mut unversioned = bucket.unversioned;
                sort_pages(&mut unversioned);

                let mut versions: Vec<VersionGroup<'a>> = bucket
                    .versions
                    .into_iter()
                    .map(|(version, mut pages)| {
                        sort_pages(&mut pages);
                        VersionGroup {
                            name: version,
                            label: lookup.version_label(name, version),
                            pages,
                        }
                    })
                    .collect();
                versions.sort_by(|a, b| lookup.compare_versions(name, a.name, b.name));

                ComponentGroup {
                    name,
                    unversioned,
                    versions,
                }
            })
            .collect();
        components.sort_by(|a, b| compare_components(&lookup.component_ranks, a.name, b.name));

        Tree { root, components }
    }

    /// Every page in site order: root pages, then each component's pages.
    fn all_pages(&self) -> impl Iterator<Item = &Page<'a>> {
        self.root
            .iter()
            .chain(self.components.iter().flat_map(ComponentGroup::pages))
    }
}

fn sort_pages(pages: &mut [Page<'_>]) {
    pages.sort_by(|a, b| natural_cmp(a.path, b.path));
}

// ============================================================================
// Rendering
// ============================================================================

struct Renderer<'l> {
    base: &'l str,
    lookup: &'l Lookup,
}

impl Renderer<'_> {
    fn link(&self, depth: usize, label: &str, path: &str) -> String {
        format!("{}- [{label}]({})", "  ".repeat(depth), to_url(self.base, path))
    }

    fn page_lines(&self, pages: &[Page<'_>], depth: usize) -> Vec<String> {
        pages
            .iter()
            .map(|page| self.link(depth, page.title, page.path))
            .collect()
    }

    /// Unversioned pages, then one link per version index with its pages nested below.
    fn component_lines(&self, component: &ComponentGroup<'_>, depth: usize) -> Vec<String> {
        let mut lines = self.page_lines(&component.unversioned, depth);
        for version in &component.versions {
            let scope = version_scope(component.name, version.name);
            lines.push(self.link(depth, &version.label, &index_path(&scope)));
            lines.extend(self.page_lines(&version.pages, depth + 1));
        }
        lines
    }

    fn site_lines(&self, tree: &Tree<'_>) -> Vec<String> {
        let mut lines = self.page_lines(&tree.root, 0);
        for component in &tree.components {
            lines.push(self.link(
                0,
                self.lookup.title(component.name),
                &index_path(component.name),
            ));
            lines.extend(self.component_lines(component, 1));
        }
        lines
    }

    fn index(&self, title: &str, description: Option<&str>, lines: &[String]) -> String {
        let mut out = heading_block(title, description);
        if lines.is_empty() {
            out.push_str(NO_PAGES);
        } else {
            out.push_str(&lines.join("\n"));
        }
        out.push('\n');
        out
    }

    fn full<'p, 'a: 'p>(
        &self,
        title: &str,
        description: Option<&str>,
        pages: impl Iterator<Item = &'p Page<'a>>,
    ) -> String {
        let sections: Vec<String> = pages
            .filter(|page| page.aggregate)
            .map(|page| format!("## {}\n\n{}", page.title, page.body.trim()))
            .collect();

        let mut out = heading_block(title, description);
        if !sections.is_empty() {
            out.push_str(&sections.join("\n\n"));
            out.push('\n');
        }
        out
    }
}

fn heading_block(title: &str, description: Option<&str>) -> String {
    let mut out = format!("# {title}\n\n");
    if let Some(description) = description {
        out.push_str(description);
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VersionInfo;
    use crate::test_helpers::{component, record};

    fn no_overrides() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn artifact<'a>(export: &'a Export, path: &str) -> &'a str {
        export
            .artifacts
            .get(path)
            .unwrap_or_else(|| panic!("missing artifact {path}"))
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("{needle:?} not found in:\n{haystack}"))
    }

    /// The two-component site used across the format tests.
    fn outskirts() -> Export {
        let infos = vec![
            component("ol.client-ip", "client-ip", &["next", "0.1"]),
            component("ol.sfv", "ol.sfv", &["0.1"]),
        ];
        let overrides = BTreeMap::from([(
            "ol.client-ip".to_string(),
            "Read client IPs from requests.".to_string(),
        )]);
        let records = vec![
            record("ROOT", "", "Outskirts Labs Developer Docs", "index.md", "# Home"),
            record("ROOT", "", "Security Policy", "security-policy.md", "# Security"),
            record("ol.client-ip", "next", "client-ip", "ol.client-ip/next/index.md", "# next"),
            record("ol.client-ip", "next", "Usage Guide", "ol.client-ip/next/usage.md", "# usage next"),
            record("ol.client-ip", "0.1", "client-ip", "ol.client-ip/0.1/index.md", "# release"),
            record("ol.sfv", "0.1", "ol.sfv", "ol.sfv/0.1/index.md", "# sfv"),
        ];
        build(
            "Outskirts Labs Docs",
            "http://localhost:8084",
            &infos,
            &overrides,
            &records,
        )
    }

    // =========================================================================
    // Layout
    // =========================================================================

    #[test]
    fn site_index_nests_components_versions_and_pages() {
        let export = outskirts();
        assert_eq!(
            artifact(&export, "llms.txt"),
            "# Outskirts Labs Docs\n\
             \n\
             - [Outskirts Labs Developer Docs](http://localhost:8084/index.md)\n\
             - [Security Policy](http://localhost:8084/security-policy.md)\n\
             - [client-ip](http://localhost:8084/ol.client-ip/llms.txt)\n\
             \x20 - [next](http://localhost:8084/ol.client-ip/next/llms.txt)\n\
             \x20   - [client-ip](http://localhost:8084/ol.client-ip/next/index.md)\n\
             \x20   - [Usage Guide](http://localhost:8084/ol.client-ip/next/usage.md)\n\
             \x20 - [0.1](http://localhost:8084/ol.client-ip/0.1/llms.txt)\n\
             \x20   - [client-ip](http://localhost:8084/ol.client-ip/0.1/index.md)\n\
             - [ol.sfv](http://localhost:8084/ol.sfv/llms.txt)\n\
             \x20 - [0.1](http://localhost:8084/ol.sfv/0.1/llms.txt)\n\
             \x20   - [ol.sfv](http://localhost:8084/ol.sfv/0.1/index.md)\n"
        );
    }

    #[test]
    fn component_index_has_description_and_version_links() {
        let export = outskirts();
        let index = artifact(&export, "ol.client-ip/llms.txt");
        assert!(index.starts_with("# client-ip\n\nRead client IPs from requests.\n\n"));
        assert!(index.contains("- [0.1](http://localhost:8084/ol.client-ip/0.1/llms.txt)"));
        assert!(index.contains("  - [client-ip](http://localhost:8084/ol.client-ip/0.1/index.md)"));
        assert!(index.ends_with('\n'));
    }

    #[test]
    fn version_index_is_flat() {
        let export = outskirts();
        assert_eq!(
            artifact(&export, "ol.client-ip/0.1/llms.txt"),
            "# client-ip 0.1\n\
             \n\
             Read client IPs from requests.\n\
             \n\
             - [client-ip](http://localhost:8084/ol.client-ip/0.1/index.md)\n"
        );
    }

    #[test]
    fn component_without_description_omits_block() {
        let export = outskirts();
        assert!(artifact(&export, "ol.sfv/llms.txt").starts_with("# ol.sfv\n\n- [0.1]"));
    }

    #[test]
    fn full_file_sections() {
        let export = outskirts();
        assert_eq!(
            artifact(&export, "ol.client-ip/next/llms-full.txt"),
            "# client-ip next\n\
             \n\
             Read client IPs from requests.\n\
             \n\
             ## client-ip\n\
             \n\
             # next\n\
             \n\
             ## Usage Guide\n\
             \n\
             # usage next\n"
        );
    }

    #[test]
    fn site_full_orders_root_then_components() {
        let export = outskirts();
        let full = artifact(&export, "llms-full.txt");
        assert!(full.starts_with("# Outskirts Labs Docs\n\n## Outskirts Labs Developer Docs\n\n# Home\n\n"));
        assert!(position(full, "# Security") < position(full, "# next"));
        assert!(position(full, "# usage next") < position(full, "# release"));
        assert!(position(full, "# release") < position(full, "# sfv"));
        assert!(full.ends_with("# sfv\n"));
    }

    #[test]
    fn empty_base_url_gives_root_relative_links() {
        let records = vec![record("ROOT", "", "Home", "index.md", "hi")];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        assert!(artifact(&export, "llms.txt").contains("- [Home](/index.md)"));
    }

    #[test]
    fn trailing_slash_stripped_from_base_url() {
        let records = vec![record("ROOT", "", "Home", "index.md", "hi")];
        let export = build("Docs", "https://x.dev/", &[], &no_overrides(), &records);
        assert!(artifact(&export, "llms.txt").contains("(https://x.dev/index.md)"));
    }

    #[test]
    fn empty_site_has_placeholder_and_heading_only_full() {
        let export = build("Docs", "", &[], &no_overrides(), &[]);
        assert_eq!(artifact(&export, "llms.txt"), "# Docs\n\n- (no pages)\n");
        assert_eq!(artifact(&export, "llms-full.txt"), "# Docs\n\n");
        assert_eq!(export.artifacts.len(), 4);
    }

    #[test]
    fn blank_site_title_defaults() {
        let export = build("  ", "", &[], &no_overrides(), &[]);
        assert!(artifact(&export, "llms.txt").starts_with("# Documentation\n\n"));
    }

    #[test]
    fn missing_title_defaults_to_untitled() {
        let records = vec![record("ROOT", "", "", "a.md", "body")];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        assert!(artifact(&export, "llms.txt").contains("- [Untitled](/a.md)"));
        assert!(artifact(&export, "llms-full.txt").contains("## Untitled\n\nbody"));
    }

    #[test]
    fn bodies_are_trimmed_in_aggregates() {
        let records = vec![record("ROOT", "", "A", "a.md", "\n\n  text  \n\n")];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        assert_eq!(artifact(&export, "llms-full.txt"), "# Docs\n\n## A\n\ntext\n");
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    #[test]
    fn six_artifacts_for_component_lineage() {
        let infos = vec![component("c", "C", &["next", "0.1"])];
        let records = vec![
            record("ROOT", "", "Home", "index.md", "home"),
            record("c", "next", "Next page", "c/next/page.md", "n"),
            record("c", "0.1", "Old page", "c/0.1/page.md", "o"),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &records);

        let paths: Vec<&str> = export.artifacts.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec![
                "c/0.1/llms-full.txt",
                "c/0.1/llms.txt",
                "c/llms-full.txt",
                "c/llms.txt",
                "c/next/llms-full.txt",
                "c/next/llms.txt",
                "llm-full.txt",
                "llm.txt",
                "llms-full.txt",
                "llms.txt",
            ]
        );

        let component_index = artifact(&export, "c/llms.txt");
        assert!(position(component_index, "- [next](/c/next/llms.txt)")
            < position(component_index, "- [0.1](/c/0.1/llms.txt)"));

        let site_index = artifact(&export, "llms.txt");
        assert!(site_index.contains("- [Home](/index.md)\n- [C](/c/llms.txt)\n"));
        assert!(site_index.contains("  - [next](/c/next/llms.txt)\n    - [Next page](/c/next/page.md)"));
    }

    #[test]
    fn declared_component_without_pages_still_exported() {
        let infos = vec![component("empty", "Empty", &[])];
        let export = build("Docs", "", &infos, &no_overrides(), &[]);
        assert_eq!(artifact(&export, "empty/llms.txt"), "# Empty\n\n- (no pages)\n");
        assert_eq!(artifact(&export, "empty/llms-full.txt"), "# Empty\n\n");
    }

    #[test]
    fn declared_version_without_pages_gets_placeholder() {
        let infos = vec![component("c", "C", &["1.0"])];
        let export = build("Docs", "", &infos, &no_overrides(), &[]);
        assert_eq!(artifact(&export, "c/1.0/llms.txt"), "# C 1.0\n\n- (no pages)\n");
        assert_eq!(artifact(&export, "c/llms.txt"), "# C\n\n- [1.0](/c/1.0/llms.txt)\n");
    }

    #[test]
    fn undeclared_component_uses_name_as_title() {
        let records = vec![record("extra", "1.0", "Page", "extra/1.0/p.md", "x")];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        assert!(artifact(&export, "extra/llms.txt").starts_with("# extra\n\n"));
        assert!(artifact(&export, "extra/1.0/llms.txt").starts_with("# extra 1.0\n\n"));
    }

    #[test]
    fn unversioned_component_pages_listed_directly() {
        let infos = vec![component("c", "C", &["1.0"])];
        let records = vec![
            record("c", "", "Overview", "c/index.md", "overview"),
            record("c", "1.0", "Guide", "c/1.0/guide.md", "guide"),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &records);

        assert_eq!(
            artifact(&export, "c/llms.txt"),
            "# C\n\n- [Overview](/c/index.md)\n- [1.0](/c/1.0/llms.txt)\n  - [Guide](/c/1.0/guide.md)\n"
        );
        assert!(artifact(&export, "llms.txt").contains("- [C](/c/llms.txt)\n  - [Overview](/c/index.md)\n"));
        assert!(!export.artifacts.contains_key("c//llms.txt"));
        assert!(artifact(&export, "c/llms-full.txt").contains("overview"));
    }

    #[test]
    fn empty_component_field_means_root() {
        let records = vec![record("", "", "Loose", "loose.md", "x")];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        assert_eq!(export.artifacts.len(), 4);
        assert!(artifact(&export, "llms.txt").contains("- [Loose](/loose.md)"));
    }

    #[test]
    fn declared_root_component_is_not_a_scope() {
        let infos = vec![component("ROOT", "Home", &[""])];
        let export = build("Docs", "", &infos, &no_overrides(), &[]);
        assert!(!export.artifacts.contains_key("ROOT/llms.txt"));
    }

    #[test]
    fn display_version_labels_links_and_headings() {
        let mut info = component("c", "C", &[]);
        info.versions.push(VersionInfo {
            version: "next".into(),
            display_version: "Next (dev)".into(),
        });
        let records = vec![record("c", "next", "P", "c/next/p.md", "x")];
        let export = build("Docs", "", &[info], &no_overrides(), &records);

        assert!(artifact(&export, "c/llms.txt").contains("- [Next (dev)](/c/next/llms.txt)"));
        assert!(artifact(&export, "c/next/llms.txt").starts_with("# C Next (dev)\n\n"));
    }

    #[test]
    fn description_from_component_info() {
        let mut info = component("c", "C", &["1"]);
        info.description = Some("From catalog".into());
        let export = build("Docs", "", &[info], &no_overrides(), &[]);
        assert!(artifact(&export, "c/1/llms-full.txt").starts_with("# C 1\n\nFrom catalog\n\n"));
    }

    #[test]
    fn non_empty_override_wins_over_component_info() {
        let mut a = component("a", "A", &[]);
        a.description = Some("catalog a".into());
        let mut b = component("b", "B", &[]);
        b.description = Some("catalog b".into());
        let overrides = BTreeMap::from([
            ("a".to_string(), "override a".to_string()),
            ("b".to_string(), "   ".to_string()),
        ]);
        let export = build("Docs", "", &[a, b], &overrides, &[]);

        assert!(artifact(&export, "a/llms.txt").contains("override a"));
        assert!(artifact(&export, "b/llms.txt").contains("catalog b"));
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    #[test]
    fn root_links_precede_components_regardless_of_declared_order() {
        let infos = vec![
            component("zeta", "Zeta", &[]),
            component("ROOT", "Root", &[]),
            component("alpha", "Alpha", &[]),
        ];
        let records = vec![
            record("alpha", "", "A", "alpha/a.md", "a"),
            record("ROOT", "", "Home", "index.md", "h"),
            record("zeta", "", "Z", "zeta/z.md", "z"),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &records);
        let index = artifact(&export, "llms.txt");

        let home = position(index, "[Home]");
        assert!(home < position(index, "[Zeta]"));
        assert!(home < position(index, "[Alpha]"));
        assert!(position(index, "[Zeta]") < position(index, "[Alpha]"));
    }

    #[test]
    fn undeclared_versions_sort_numerically() {
        let records = vec![
            record("c", "10", "Ten", "c/10/index.md", "ten"),
            record("c", "2", "Two", "c/2/index.md", "two"),
        ];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        let index = artifact(&export, "c/llms.txt");
        assert!(position(index, "[2](/c/2/llms.txt)") < position(index, "[10](/c/10/llms.txt)"));
    }

    #[test]
    fn declared_versions_before_undeclared() {
        let infos = vec![component("c", "C", &["stable"])];
        let records = vec![
            record("c", "0.9", "Old", "c/0.9/p.md", "o"),
            record("c", "stable", "New", "c/stable/p.md", "n"),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &records);
        let index = artifact(&export, "c/llms.txt");
        assert!(position(index, "[stable]") < position(index, "[0.9]"));
    }

    #[test]
    fn undeclared_components_sort_after_declared() {
        let infos = vec![component("zz", "ZZ", &[])];
        let records = vec![
            record("aa", "", "A", "aa/a.md", "a"),
            record("zz", "", "Z", "zz/z.md", "z"),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &records);
        let index = artifact(&export, "llms.txt");
        assert!(position(index, "[ZZ]") < position(index, "[aa]"));
    }

    #[test]
    fn pages_sorted_by_path_case_insensitively_and_numerically() {
        let records = vec![
            record("ROOT", "", "Ten", "page10.md", "x"),
            record("ROOT", "", "Two", "Page2.md", "x"),
            record("ROOT", "", "One", "page1.md", "x"),
        ];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        assert_eq!(
            artifact(&export, "llms.txt"),
            "# Docs\n\n- [One](/page1.md)\n- [Two](/Page2.md)\n- [Ten](/page10.md)\n"
        );
    }

    // =========================================================================
    // Properties
    // =========================================================================

    #[test]
    fn root_aliases_are_identical() {
        let export = outskirts();
        assert_eq!(artifact(&export, "llms.txt"), artifact(&export, "llm.txt"));
        assert_eq!(artifact(&export, "llms-full.txt"), artifact(&export, "llm-full.txt"));
    }

    #[test]
    fn output_independent_of_record_order() {
        let infos = vec![component("c", "C", &["1.0"])];
        let mut records = vec![
            record("ROOT", "", "Home", "index.md", "h"),
            record("c", "1.0", "B", "c/1.0/b.md", "b"),
            record("c", "1.0", "A", "c/1.0/a.md", "a"),
            record("c", "3", "X", "c/3/x.md", "x"),
            record("c", "", "U", "c/u.md", "u"),
            record("d", "2", "D", "d/2/d.md", "d"),
        ];
        let first = build("Docs", "", &infos, &no_overrides(), &records);
        records.reverse();
        let reversed = build("Docs", "", &infos, &no_overrides(), &records);
        records.rotate_left(2);
        let rotated = build("Docs", "", &infos, &no_overrides(), &records);

        assert_eq!(first.artifacts, reversed.artifacts);
        assert_eq!(first.artifacts, rotated.artifacts);
    }

    #[test]
    fn repeated_builds_are_identical() {
        assert_eq!(outskirts().artifacts, outskirts().artifacts);
    }

    #[test]
    fn hidden_page_listed_but_body_never_aggregated() {
        let infos = vec![component("c", "C", &["1.0"])];
        let mut hidden = record("c", "1.0", "Hidden", "c/1.0/hidden.md", "secret");
        hidden.include_in_aggregate = false;
        let records = vec![
            hidden,
            record("c", "1.0", "Visible", "c/1.0/visible.md", "visible body"),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &records);

        for (path, text) in &export.artifacts {
            if path.ends_with("full.txt") {
                assert!(!text.contains("secret"), "{path} leaks hidden body");
                assert!(!text.contains("## Hidden"), "{path} has hidden section");
                assert!(text.contains("visible body"), "{path} lost visible body");
            } else {
                assert!(text.contains("[Hidden](/c/1.0/hidden.md)"), "{path} lost hidden link");
            }
        }
        assert_eq!(export.stats.listed, 2);
        assert_eq!(export.stats.aggregated, 1);
    }

    #[test]
    fn component_full_is_union_of_version_fulls() {
        let infos = vec![component("c", "C", &["2.0", "1.0"])];
        let records = vec![
            record("c", "1.0", "One A", "c/1.0/a.md", "one a"),
            record("c", "2.0", "Two A", "c/2.0/a.md", "two a"),
            record("c", "1.0", "One B", "c/1.0/b.md", "one b"),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &records);

        let sections = |path: &str, heading: &str| -> String {
            artifact(&export, path)
                .strip_prefix(heading)
                .unwrap_or_else(|| panic!("{path} heading"))
                .to_string()
        };
        let component = sections("c/llms-full.txt", "# C\n\n");
        let v2 = sections("c/2.0/llms-full.txt", "# C 2.0\n\n");
        let v1 = sections("c/1.0/llms-full.txt", "# C 1.0\n\n");
        assert_eq!(component, format!("{}\n\n{}", v2.trim_end(), v1));
    }

    #[test]
    fn duplicate_output_paths_first_wins() {
        let records = vec![
            record("ROOT", "", "First", "same.md", "first body"),
            record("ROOT", "", "Second", "same.md", "second body"),
        ];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        let full = artifact(&export, "llms-full.txt");
        assert!(full.contains("first body"));
        assert!(!full.contains("second body"));
        assert_eq!(export.stats.duplicates, 1);
        assert_eq!(export.stats.listed, 1);
    }

    #[test]
    fn repeated_component_declaration_first_wins() {
        let infos = vec![
            component("c", "C", &["1.0"]),
            component("c", "C again", &["2.0"]),
        ];
        let export = build("Docs", "", &infos, &no_overrides(), &[]);
        assert_eq!(artifact(&export, "c/1.0/llms.txt"), "# C 1.0\n\n- (no pages)\n");
        assert!(!export.artifacts.contains_key("c/2.0/llms.txt"));
        let index = artifact(&export, "c/llms.txt");
        assert!(index.starts_with("# C\n\n"));
        assert!(!index.contains("2.0"));
    }

    #[test]
    fn records_without_output_path_dropped() {
        let records = vec![record("ROOT", "", "Ghost", "", "boo")];
        let export = build("Docs", "", &[], &no_overrides(), &records);
        assert!(!artifact(&export, "llms.txt").contains("Ghost"));
        assert_eq!(export.stats.missing_path, 1);
        assert_eq!(export.stats.listed, 0);
    }
}
