//! # docs-llms
//!
//! Post-processes a documentation site's content catalog into LLM-readable
//! exports. A site built from many versioned components gets one markdown
//! file per page plus [llms.txt](https://llmstxt.org) indexes and
//! `llms-full.txt` aggregates at three scopes: the whole site, each
//! component, and each component version.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Like a site build, the export runs as independent stages connected by a
//! JSON manifest:
//!
//! ```text
//! 1. Collect   content/  →  records.json   (catalog + config → page records)
//! 2. Generate  records   →  dist/          (llms files + page exports)
//! ```
//!
//! - **Debuggability**: `records.json` is human-readable and shows exactly
//!   which pages made it into the export and with what titles.
//! - **Testability**: the heart of the system, [`export::build`], is a pure
//!   function from records to a map of path → text. Every formatting and
//!   ordering rule is tested without touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collect`] | Stage 1: selects pages from the catalog, resolves titles, site metadata, and descriptions |
//! | [`generate`] | Stage 2: runs the builder and writes artifacts and page exports through the cache |
//! | [`export`] | Pure hierarchical builder for every `llms.txt` / `llms-full.txt` |
//! | [`catalog`] | Catalog JSON model: site, components, versions, pages |
//! | [`label`] | Flattens loosely-typed titles (strings, numbers, lists, objects) to text |
//! | [`links`] | Output paths, markdown URLs, base-URL joins, per-page context links (template API) |
//! | [`ordering`] | Component ranks and natural version ordering |
//! | [`description`] | Component descriptions from EDN project manifests |
//! | [`config`] | `config.toml` loading, validation, and the documented stock config |
//! | [`cache`] | Content-hash write cache and stale file pruning |
//! | [`output`] | CLI output formatting for each stage |
//!
//! # Design Decisions
//!
//! ## Determinism
//!
//! The same records always produce byte-identical files regardless of the
//! order they arrive in. Components sort by declared rank, then naturally by
//! name; versions sort by declared rank, then naturally (`2` before `10`);
//! pages within a listing sort naturally by output path. Deploys diff
//! cleanly and the write cache can skip everything that didn't change.
//!
//! ## Scopes Nest
//!
//! A version's `llms-full.txt` holds exactly the pages of that version. A
//! component's holds its unversioned pages followed by each version in
//! order; the site's holds root pages followed by every component. The same
//! ordering drives the nested link lists in each `llms.txt`.
//!
//! ## Opt-Out Attributes
//!
//! Pages leave the export with `page-llms-ignore`, or stay in the indexes but
//! out of the aggregates with `page-llms-full-ignore`. Both attribute names
//! are configurable in `config.toml`.

pub mod cache;
pub mod catalog;
pub mod collect;
pub mod config;
pub mod description;
pub mod export;
pub mod generate;
pub mod label;
pub mod links;
pub mod ordering;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
