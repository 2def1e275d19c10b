//! Output cache for incremental builds.
//!
//! A catalog of a few hundred books renders to a few dozen pages, most of
//! which stay byte-identical between builds. This module lets the generate
//! stage skip rewriting those files, so deploy tools that sync by mtime only
//! upload what changed.
//!
//! ## Cache keys
//!
//! Entries map an output path (relative to the output directory) to the
//! SHA-256 of the bytes last written there. A page is skipped when:
//! 1. Its freshly rendered bytes hash to the stored value, and
//! 2. The file still exists on disk.
//!
//! ## Stale pages
//!
//! When a category disappears or shrinks, its old pages are still listed in
//! the manifest. [`OutputCache::retain_only`] drops those entries and
//! returns their paths so the caller can delete the files. Files the cache
//! never recorded are left alone, and so is any key that is not a plain
//! relative path below the output directory (see [`is_output_path`]).
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<output_dir>/.shelf-cache.json`.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `build` to start from an empty manifest; every page
//! is rewritten.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Component, Path};

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".shelf-cache.json";

/// Bump to invalidate every existing cache when the format changes.
const MANIFEST_VERSION: u32 = 1;

/// On-disk map of output paths to content hashes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OutputCache {
    pub version: u32,
    pub entries: BTreeMap<String, String>,
}

impl OutputCache {
    /// Create an empty manifest (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed (version mismatch, corruption).
    ///
    /// Entries whose key is not an [`is_output_path`] are dropped.
    pub fn load(output_dir: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(output_dir.join(MANIFEST_FILENAME)) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(mut manifest) if manifest.version == MANIFEST_VERSION => {
                manifest.entries.retain(|path, _| is_output_path(path));
                manifest
            }
            _ => Self::empty(),
        }
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(MANIFEST_FILENAME), json)
    }

    /// Whether `path` was last written with content hashing to `hash` and
    /// is still on disk.
    pub fn is_fresh(&self, path: &str, hash: &str, output_dir: &Path) -> bool {
        self.entries.get(path).is_some_and(|stored| stored == hash)
            && output_dir.join(path).is_file()
    }

    pub fn record(&mut self, path: String, hash: String) {
        self.entries.insert(path, hash);
    }

    /// Drop entries whose path is not in `keep`; returns the dropped paths.
    pub fn retain_only(&mut self, keep: &HashSet<&str>) -> Vec<String> {
        let stale: Vec<String> = self
            .entries
            .keys()
            .filter(|path| !keep.contains(path.as_str()))
            .cloned()
            .collect();
        for path in &stale {
            self.entries.remove(path);
        }
        stale
    }
}

/// Whether `path` names a file below the output directory: relative, non-empty,
/// and made only of normal components (no `..`, `.`, root, or drive prefix).
pub fn is_output_path(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// SHA-256 of `bytes`, as a hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Summary of cache behaviour for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub unchanged: u32,
    pub written: u32,
    pub removed: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.unchanged + self.written
    }
}

impl fmt::Display for CacheStats {
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
