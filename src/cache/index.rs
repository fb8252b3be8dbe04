//! Metadata Index Module
//!
//! In-memory mirror of the keys the engine has written to its backend
//! namespace, with the per-item metadata the eviction policy orders on
//! and running totals for capacity decisions.
//!
//! Invariant: the index keys equal the backend keys under the engine's
//! namespace. When they drift (a key in storage but not indexed, or the
//! reverse) the engine treats the key as a miss and self-heals on the
//! next full scan.

use std::collections::HashMap;

use crate::cache::item::{CacheItem, Priority};

// == Item Meta ==
/// Eviction-relevant metadata mirrored from a persisted [`CacheItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMeta {
    pub size_bytes: u64,
    pub expires_at: u64,
    pub priority: Priority,
    pub access_count: u64,
    pub last_accessed: u64,
}

impl From<&CacheItem> for ItemMeta {
    fn from(item: &CacheItem) -> Self {
        Self {
            size_bytes: item.size_bytes,
            expires_at: item.expires_at,
            priority: item.priority,
            access_count: item.access_count,
            last_accessed: item.last_accessed,
        }
    }
}

// == Metadata Index ==
/// Key-to-metadata mirror with maintained totals.
#[derive(Debug, Default)]
pub struct MetadataIndex {
    entries: HashMap<String, ItemMeta>,
    total_bytes: u64,
}

impl MetadataIndex {
    // == Constructor ==
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Upsert ==
    /// Inserts or replaces the metadata for a key, keeping totals current.
    pub fn upsert(&mut self, key: &str, meta: ItemMeta) {
        if let Some(previous) = self.entries.insert(key.to_string(), meta) {
            self.total_bytes = self.total_bytes.saturating_sub(previous.size_bytes);
        }
        self.total_bytes = self.total_bytes.saturating_add(meta.size_bytes);
    }

    // == Remove ==
    /// Removes a key. Removing an unknown key is a no-op.
    pub fn remove(&mut self, key: &str) -> Option<ItemMeta> {
        let removed = self.entries.remove(key);
        if let Some(meta) = removed {
            self.total_bytes = self.total_bytes.saturating_sub(meta.size_bytes);
        }
        removed
    }

    // == Lookup ==
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ItemMeta> {
        self.entries.get(key)
    }

    // == Totals ==
    /// Current number of indexed items.
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of `size_bytes` over all indexed items.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Snapshots ==
    /// Snapshot of every `(key, meta)` pair, in no particular order.
    pub fn snapshot(&self) -> Vec<(String, ItemMeta)> {
        self.entries
            .iter()
            .map(|(key, meta)| (key.clone(), *meta))
            .collect()
    }

    /// Keys whose name contains the given substring.
    pub fn keys_matching(&self, pattern: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|key| key.contains(pattern))
            .cloned()
            .collect()
    }

    // == Rebuild ==
    /// Replaces the whole index with a freshly scanned mirror.
    ///
    /// Used by the self-healing scan after enumerating the backend.
    pub fn replace_all(&mut self, entries: HashMap<String, ItemMeta>) {
        self.total_bytes = entries.values().map(|meta| meta.size_bytes).sum();
        self.entries = entries;
    }
}
