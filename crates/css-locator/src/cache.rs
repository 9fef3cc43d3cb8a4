//! Per-file result cache.

use crate::token::LoadResult;
use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashMap;

/// A cached load, valid while the file keeps its recorded mtime.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    /// Modification time in milliseconds since the Unix epoch.
    pub mtime_ms: i64,
    /// The result of the load that observed that mtime.
    pub result: LoadResult,
}

/// Load results keyed by absolute path.
///
/// Entries are never evicted; the cache lives as long as its locator.
/// Staleness is judged by the load engine, which owns the filesystem access:
/// an entry is stale when its file's mtime changed or any listed dependency
/// is itself stale one level deep; this is transitive in effect, since every
/// cached dependency was loaded under the same rule.
#[derive(Debug, Default)]
pub(crate) struct Cache {
    entries: FxHashMap<Utf8PathBuf, CacheEntry>,
}

impl Cache {
    pub fn get(&self, path: &Utf8Path) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    pub fn insert(&mut self, path: Utf8PathBuf, entry: CacheEntry) {
        self.entries.insert(path, entry);
    }

    pub fn remove(&mut self, path: &Utf8Path) {
        self.entries.remove(path);
    }
}
