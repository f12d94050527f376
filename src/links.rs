//! URL helpers shared by collection, export, and page templates.
//!
//! - [`markdown_url`] maps a rendered page's path to its markdown export.
//! - [`to_url`] joins the site base URL with a site-relative path.
//! - [`context_links`] lists the llms files that cover a given page, so page
//!   templates can point readers (and agents) at the right index and aggregate.
//!
//! [`context_links`] and its types ([`PageContext`], [`ContextLinks`],
//! [`LinkGroup`], [`FileLink`]) are library API for the site-rendering
//! pipeline's page templates. The `collect` and `generate` stages never call
//! them; the templates link this crate and serialize [`ContextLinks`] into
//! their page model.

use crate::label::Label;
use crate::ordering::ROOT_COMPONENT;
use serde::Serialize;

pub const INDEX_FILE: &str = "llms.txt";
pub const FULL_FILE: &str = "llms-full.txt";

/// Site label used when no site title is available.
const FALLBACK_SITE_LABEL: &str = "docs";

/// Map a page URL or output path to its markdown export.
///
/// Query strings and fragments are carried over untouched:
///
/// - `"a/b.html"` → `"a/b.md"`
/// - `"a/b.md"` → `"a/b.md"`
/// - `"a/"` → `"a/index.md"`
/// - `"a/b"` → `"a/b.md"`
/// - `"/a/b.html?x=1#top"` → `"/a/b.md?x=1#top"`
pub fn markdown_url(url: &str) -> String {
    let split = url.find(['?', '#']).unwrap_or(url.len());
    let (path, suffix) = url.split_at(split);
    if path.is_empty() {
        return url.to_string();
    }

    if path.ends_with(".md") {
        format!("{path}{suffix}")
    } else if let Some(stem) = path.strip_suffix(".html") {
        format!("{stem}.md{suffix}")
    } else if path.ends_with('/') {
        format!("{path}index.md{suffix}")
    } else {
        format!("{path}.md{suffix}")
    }
}

/// Strip one trailing slash from a site base URL.
pub fn normalize_base_url(base: &str) -> &str {
    base.strip_suffix('/').unwrap_or(base)
}

/// Absolute link for a site-relative path. An empty base yields a root-relative link.
pub fn to_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        format!("/{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Site-relative path of the index file for a scope (`""` is the site root).
pub fn index_path(scope: &str) -> String {
    scoped_file(scope, INDEX_FILE)
}

/// Site-relative path of the aggregate file for a scope (`""` is the site root).
pub fn full_path(scope: &str) -> String {
    scoped_file(scope, FULL_FILE)
}

fn scoped_file(scope: &str, file: &str) -> String {
    if scope.is_empty() {
        file.to_string()
    } else {
        format!("{scope}/{file}")
    }
}

/// One llms file link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLink {
    pub href: String,
    pub label: String,
}

/// The index and aggregate links for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkGroup {
    pub label: String,
    pub files: Vec<FileLink>,
}

/// Links to the llms files covering a page, from widest to narrowest scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextLinks {
    pub site: LinkGroup,
    pub component: Option<LinkGroup>,
    pub version: Option<LinkGroup>,
}

/// What a page template knows about the page being rendered.
#[derive(Debug, Clone, Default)]
pub struct PageContext<'a> {
    pub component: Option<&'a str>,
    pub version: Option<&'a str>,
    pub display_version: Option<&'a str>,
    /// Site title carried by the page model, used when no explicit title is given.
    pub site_title: Option<&'a Label>,
}

fn link_group(label: String, base: &str) -> LinkGroup {
    let files = [INDEX_FILE, FULL_FILE]
        .iter()
        .map(|file| {
            let href = format!("{base}/{file}");
            FileLink {
                label: href.clone(),
                href,
            }
        })
        .collect();
    LinkGroup { label, files }
}

/// Resolve the llms links shown alongside a page.
///
/// The site group is always present. A component group is added for pages
/// owned by a component other than `ROOT`, and a version group when the page
/// is versioned (labelled with the display version when one is known).
pub fn context_links(page: &PageContext<'_>, site_title: Option<&Label>) -> ContextLinks {
    let site_label = [site_title, page.site_title]
        .into_iter()
        .flatten()
        .map(Label::to_plain)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_SITE_LABEL.to_string());

    let mut links = ContextLinks {
        site: link_group(site_label, ""),
        component: None,
        version: None,
    };

    let Some(component) = page
        .component
        .filter(|c| !c.is_empty() && *c != ROOT_COMPONENT)
    else {
        return links;
    };

    let component_base = format!("/{component}");
    links.component = Some(link_group(component.to_string(), &component_base));

    let Some(version) = page.version.filter(|v| !v.is_empty()) else {
        return links;
    };

    let version_label = page
        .display_version
        .filter(|v| !v.is_empty())
        .unwrap_or(version);
    links.version = Some(link_group(
        version_label.to_string(),
        &format!("{component_base}/{version}"),
    ));

    links
}
