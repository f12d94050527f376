//! Write cache for incremental builds.
//!
//! Most runs regenerate the same text: a docs change touches a handful of
//! pages, but every `llms.txt` and `llms-full.txt` is rebuilt from scratch.
//! This module lets the generate stage leave unchanged files alone (keeping
//! their mtimes stable for rsync-style deploys) and clean up files that are
//! no longer produced.
//!
//! ## Cache keys
//!
//! Entries map an output path (relative to the output directory) to the
//! SHA-256 of the text last written there. A file is left untouched when:
//! 1. Its path has an entry whose hash matches the new content
//! 2. The previously-written file still exists on disk
//!
//! ## Pruning
//!
//! Paths recorded by the previous run but not produced by this one are
//! stale: a page was removed, renamed, or newly ignored. The generate stage
//! deletes them. Only paths the cache knows about are ever deleted, so files
//! placed in the output directory by other tools are safe.
//!
//! ## Storage
//!
//! The cache manifest is a JSON file at `<output_dir>/.llms-cache.json`.
//! It lives alongside the generated files so it travels with the output
//! directory when cached in CI.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `build` or `generate` to start from an empty
//! manifest: every file is rewritten and nothing is pruned.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".llms-cache.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or hash computation changes.
const MANIFEST_VERSION: u32 = 1;

/// On-disk cache manifest mapping output paths to content hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: BTreeMap<String, String>,
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let content = match std::fs::read_to_string(manifest_path(output_dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(output_dir), json)
    }

    /// Whether `path` already holds content with this hash.
    pub fn is_unchanged(&self, path: &str, hash: &str, output_dir: &Path) -> bool {
        self.entries.get(path).is_some_and(|stored| stored == hash)
            && output_dir.join(path).is_file()
    }

    /// Record the hash written to an output path.
    pub fn insert(&mut self, path: String, hash: String) {
        self.entries.insert(path, hash);
    }

    /// Paths recorded here that are not in `produced`, in sorted order.
    pub fn stale_paths<'a>(&'a self, produced: &HashSet<&str>) -> Vec<&'a str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|path| !produced.contains(path))
            .collect()
    }
}

/// SHA-256 of a text, returned as a hex string.
pub fn hash_content(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Summary of what a generate run did to the output directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    pub written: u32,
    pub unchanged: u32,
    pub removed: u32,
}

impl WriteStats {
    pub fn write(&mut self) {
        self.written += 1;
    }

    pub fn skip(&mut self) {
        self.unchanged += 1;
    }

    pub fn remove(&mut self) {
        self.removed += 1;
    }

    /// Files produced by the run, whether rewritten or not.
    pub fn total(&self) -> u32 {
        self.written + self.unchanged
    }
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unchanged > 0 {
            write!(
                f,
                "{} unchanged, {} written ({} total)",
                self.unchanged,
                self.written,
                self.total()
            )?;
        } else {
            write!(f, "{} written", self.written)?;
        }
        if self.removed > 0 {
            write!(f, ", {} removed", self.removed)?;
        }
        Ok(())
    }
}

/// Resolve the cache manifest path for an output directory.
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILENAME)
}
