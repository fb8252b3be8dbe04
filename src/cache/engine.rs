//! Cache Engine Module
//!
//! Core store/retrieve/remove/scan operations over an injected backend,
//! with lazy TTL expiry, capacity enforcement through the eviction policy,
//! and a metadata index kept consistent with the backend namespace.
//!
//! The engine is fail-open: only `initialize` surfaces an error (the whole
//! subsystem is then unavailable and callers bypass it). Every other
//! operation catches failures internally, logs them, and degrades to
//! cache-miss behavior.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock as StdRwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::eviction::{plan_sweep, SweepPlan};
use crate::cache::index::{ItemMeta, MetadataIndex};
use crate::cache::item::{current_timestamp_ms, CacheItem, Priority};
use crate::cache::stats::{CacheStats, EngineMetrics, MetricsSnapshot};
use crate::cache::KEY_NAMESPACE;
use crate::config::{CacheConfiguration, ConfigSource, PlatformProfileSource};
use crate::error::{CacheError, Result};
use crate::platform::PlatformContextProvider;
use crate::storage::CacheBackend;

// == Store Options ==
/// Per-call options for [`CacheEngine::store`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// TTL override; the configured default applies when `None`
    pub ttl: Option<Duration>,
    /// Eviction priority tier
    pub priority: Priority,
}

impl StoreOptions {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    pub fn with_priority(priority: Priority) -> Self {
        Self {
            priority,
            ..Self::default()
        }
    }

    pub fn new(ttl: Duration, priority: Priority) -> Self {
        Self {
            ttl: Some(ttl),
            priority,
        }
    }
}

// == Cache Engine ==
/// Adaptive cache engine over an injected [`CacheBackend`].
///
/// Constructed explicitly by the composition root and shared as
/// `Arc<CacheEngine<B>>`; lifecycle is `initialize()` once, operations,
/// then `dispose()` (plus aborting the cleanup task handle).
pub struct CacheEngine<B: CacheBackend> {
    backend: B,
    profiles: Arc<dyn ConfigSource>,
    /// Active configuration, re-resolved pull-based at decision points
    config: StdRwLock<CacheConfiguration>,
    /// Mirror of the backend namespace
    index: Mutex<MetadataIndex>,
    /// Per-key serialization of read-modify-write operations
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Per-key operations hold `read`; sweeps and scans hold `write`
    sweep_gate: RwLock<()>,
    metrics: EngineMetrics,
    initialized: AtomicBool,
}

impl<B: CacheBackend> CacheEngine<B> {
    // == Constructor ==
    /// Creates an engine over the given backend and configuration source.
    ///
    /// No I/O happens here; call [`initialize`](Self::initialize) before
    /// use.
    pub fn new(backend: B, profiles: Arc<dyn ConfigSource>) -> Self {
        Self {
            backend,
            profiles,
            config: StdRwLock::new(CacheConfiguration::default()),
            index: Mutex::new(MetadataIndex::new()),
            key_locks: Mutex::new(HashMap::new()),
            sweep_gate: RwLock::new(()),
            metrics: EngineMetrics::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Convenience constructor sizing the cache from a platform
    /// classification provider.
    pub fn with_platform(backend: B, provider: Arc<dyn PlatformContextProvider>) -> Self {
        Self::new(backend, Arc::new(PlatformProfileSource::new(provider)))
    }

    // == Initialize ==
    /// Opens the backend and resolves the initial configuration.
    ///
    /// Idempotent. Failure is fatal to the subsystem: callers must treat
    /// the cache as unavailable and bypass it.
    pub async fn initialize(&self) -> Result<()> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        let config = self.refresh_config();
        info!(
            max_bytes = config.max_bytes,
            max_items = config.max_item_count,
            "Initializing cache engine"
        );

        // Probe the backend and mirror whatever the namespace already
        // holds, dropping anything unreadable.
        let _gate = self.sweep_gate.write().await;
        let (entries, healed) = self.scan_namespace().await?;
        if healed > 0 {
            warn!(removed = healed, "Dropped corrupted entries during initialization");
        }

        let mut index = self.index.lock().await;
        let count = entries.len();
        index.replace_all(entries);
        drop(index);

        self.initialized.store(true, Ordering::Release);
        info!(items = count, "Cache engine initialized");
        Ok(())
    }

    /// Marks the engine unavailable. Subsequent operations degrade to
    /// misses; the owner also aborts the cleanup task handle.
    pub fn dispose(&self) {
        self.initialized.store(false, Ordering::Release);
        info!("Cache engine disposed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    // == Configuration ==
    /// Pulls the current profile from the configuration source. Existing
    /// items keep the expiry computed at store time.
    pub fn refresh_config(&self) -> CacheConfiguration {
        let resolved = self.profiles.current();
        let mut config = self.config.write().expect("config lock poisoned");
        if *config != resolved {
            info!(
                max_bytes = resolved.max_bytes,
                max_items = resolved.max_item_count,
                "Cache configuration changed"
            );
            *config = resolved.clone();
        }
        resolved
    }

    /// The currently active configuration.
    pub fn current_config(&self) -> CacheConfiguration {
        self.config.read().expect("config lock poisoned").clone()
    }

    // == Store ==
    /// Serializes and stores a value. Returns `false` if the write was
    /// degraded (engine unavailable or backend failure); the error is
    /// logged, never propagated. A successful store may evict unrelated
    /// keys as a side effect of capacity enforcement.
    pub async fn store<T: Serialize>(&self, key: &str, value: &T, options: StoreOptions) -> bool {
        let payload = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key, error = %err, "Failed to encode payload; skipping store");
                return false;
            }
        };
        self.store_bytes(key, payload, options).await
    }

    /// Stores caller-encoded bytes. Same degradation contract as
    /// [`store`](Self::store).
    pub async fn store_bytes(&self, key: &str, payload: Vec<u8>, options: StoreOptions) -> bool {
        match self.store_bytes_inner(key, payload, options).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "Store failed; caller proceeds uncached");
                false
            }
        }
    }

    async fn store_bytes_inner(
        &self,
        key: &str,
        payload: Vec<u8>,
        options: StoreOptions,
    ) -> Result<()> {
        self.ensure_initialized()?;
        let config = self.refresh_config();

        let ttl = options.ttl.unwrap_or(config.default_ttl);
        let item = CacheItem::new(payload, ttl, options.priority);
        let meta = ItemMeta::from(&item);
        let envelope = serde_json::to_vec(&item)?;

        {
            let _gate = self.sweep_gate.read().await;
            let lock = self.key_lock(key).await;
            let _guard = lock.lock().await;

            self.backend.set(&storage_key(key), envelope).await?;
            let mut index = self.index.lock().await;
            index.upsert(key, meta);
        }
        debug!(key, size = meta.size_bytes, "Stored item");

        // Capacity check on the totals the write produced; the sweep
        // protects the key just written.
        let (item_count, total_bytes) = {
            let index = self.index.lock().await;
            (index.item_count(), index.total_bytes())
        };
        if item_count > config.max_item_count || total_bytes > config.max_bytes {
            self.capacity_sweep(&config, key).await;
        }

        Ok(())
    }

    // == Retrieve ==
    /// Retrieves and decodes a value. Misses (absent, expired, corrupt)
    /// and internal failures all surface as `None`.
    pub async fn retrieve<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = self.retrieve_bytes(key).await?;
        match serde_json::from_slice(&payload) {
            Ok(value) => Some(value),
            Err(err) => {
                // Payload does not decode as the requested type: treat as
                // corruption, self-heal, miss.
                warn!(key, error = %err, "Payload failed to decode; removing entry");
                self.remove(key).await;
                None
            }
        }
    }

    /// Raw-bytes retrieval for caller-supplied encodings.
    pub async fn retrieve_bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.retrieve_bytes_inner(key).await {
            Ok(payload) => Some(payload),
            Err(err) if err.is_miss() => None,
            Err(err) => {
                warn!(key, error = %err, "Retrieve failed; treating as miss");
                None
            }
        }
    }

    async fn retrieve_bytes_inner(&self, key: &str) -> Result<Vec<u8>> {
        self.ensure_initialized()?;

        let _gate = self.sweep_gate.read().await;
        let lock = self.key_lock(key).await;
        let _guard = lock.lock().await;

        // A key the index does not know is a miss even if bytes exist in
        // storage; the next scan reconciles.
        {
            let index = self.index.lock().await;
            if !index.contains(key) {
                self.metrics.record_miss();
                return Err(CacheError::NotFound(key.to_string()));
            }
        }

        let skey = storage_key(key);
        let raw = match self.backend.get(&skey).await? {
            Some(raw) => raw,
            None => {
                // Indexed but gone from storage: heal the mirror.
                let mut index = self.index.lock().await;
                index.remove(key);
                self.metrics.record_miss();
                return Err(CacheError::NotFound(key.to_string()));
            }
        };

        let mut item: CacheItem = match serde_json::from_slice(&raw) {
            Ok(item) => item,
            Err(err) => {
                warn!(key, error = %err, "Corrupted entry; removing");
                self.backend.delete(&skey).await?;
                let mut index = self.index.lock().await;
                index.remove(key);
                self.metrics.record_miss();
                return Err(CacheError::Serialization(err.to_string()));
            }
        };

        if item.is_expired() {
            // Lazy expiry: the periodic sweep need not have run yet.
            self.backend.delete(&skey).await?;
            let mut index = self.index.lock().await;
            index.remove(key);
            self.metrics.record_expiration();
            self.metrics.record_miss();
            debug!(key, "Lazily expired on read");
            return Err(CacheError::NotFound(key.to_string()));
        }

        // Access metadata is written back before the value is returned.
        // The per-key lock serializes this read-modify-write; under a
        // race one increment may be lost, never a corrupt record.
        item.touch();
        let envelope = serde_json::to_vec(&item)?;
        self.backend.set(&skey, envelope).await?;
        {
            let mut index = self.index.lock().await;
            index.upsert(key, ItemMeta::from(&item));
        }

        self.metrics.record_hit();
        Ok(item.payload)
    }

    // == Remove ==
    /// Removes a key. Idempotent: removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) {
        if let Err(err) = self.remove_inner(key).await {
            warn!(key, error = %err, "Remove failed");
        }
    }

    async fn remove_inner(&self, key: &str) -> Result<()> {
        self.ensure_initialized()?;

        let _gate = self.sweep_gate.read().await;
        let lock = self.key_lock(key).await;
        let _guard = lock.lock().await;

        self.backend.delete(&storage_key(key)).await?;
        let mut index = self.index.lock().await;
        index.remove(key);
        Ok(())
    }

    // == Clear By Pattern ==
    /// Deletes every key containing `pattern`. Atomic per key, not across
    /// the batch. Returns the number of keys removed.
    pub async fn clear_by_pattern(&self, pattern: &str) -> usize {
        if self.ensure_initialized().is_err() {
            return 0;
        }

        let matching = {
            let index = self.index.lock().await;
            index.keys_matching(pattern)
        };

        let mut removed = 0;
        for key in &matching {
            match self.remove_inner(key).await {
                Ok(()) => removed += 1,
                Err(err) => warn!(key, error = %err, "Pattern clear skipped key"),
            }
        }
        info!(pattern, removed, "Cleared keys by pattern");
        removed
    }

    // == Stats ==
    /// Scans the namespace and returns aggregate stats. Entries that fail
    /// to deserialize are deleted and excluded (self-healing read); the
    /// index is rebuilt from what the scan finds.
    pub async fn get_stats(&self) -> CacheStats {
        match self.get_stats_inner().await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "Stats scan failed; reporting empty");
                CacheStats::default()
            }
        }
    }

    async fn get_stats_inner(&self) -> Result<CacheStats> {
        self.ensure_initialized()?;

        let _gate = self.sweep_gate.write().await;
        let (entries, healed) = self.scan_namespace().await?;
        if healed > 0 {
            warn!(removed = healed, "Dropped corrupted entries during stats scan");
        }

        let now = current_timestamp_ms();
        let stats = CacheStats {
            total_items: entries.len(),
            total_size_bytes: entries.values().map(|meta| meta.size_bytes).sum(),
            expired_items: entries
                .values()
                .filter(|meta| now >= meta.expires_at)
                .count(),
        };

        let mut index = self.index.lock().await;
        index.replace_all(entries);
        Ok(stats)
    }

    /// Current operation counters. Always available, even degraded.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // == Cleanup ==
    /// One full eviction-policy pass: re-resolves the configuration,
    /// expires dead items, then evicts into the hysteresis band if totals
    /// exceed the limits. Returns the number of removed items.
    pub async fn run_cleanup(&self) -> usize {
        if self.ensure_initialized().is_err() {
            return 0;
        }
        let config = self.refresh_config();

        let _gate = self.sweep_gate.write().await;
        let snapshot = {
            let index = self.index.lock().await;
            index.snapshot()
        };
        let plan = plan_sweep(
            &snapshot,
            &config,
            current_timestamp_ms(),
            None,
            config.aggressive_cleanup,
        );
        let removed = self.apply_plan(&plan).await;

        self.prune_key_locks().await;

        if removed > 0 {
            info!(
                expired = plan.expired.len(),
                evicted = plan.evicted.len(),
                "Cleanup pass removed items"
            );
        } else {
            debug!("Cleanup pass: nothing to remove");
        }
        removed
    }

    /// Store-triggered capacity pass, protecting the key just written.
    async fn capacity_sweep(&self, config: &CacheConfiguration, protect: &str) {
        let _gate = self.sweep_gate.write().await;
        let snapshot = {
            let index = self.index.lock().await;
            index.snapshot()
        };
        let plan = plan_sweep(
            &snapshot,
            config,
            current_timestamp_ms(),
            Some(protect),
            false,
        );
        let removed = self.apply_plan(&plan).await;
        if removed > 0 {
            info!(
                trigger = protect,
                expired = plan.expired.len(),
                evicted = plan.evicted.len(),
                "Capacity sweep removed items"
            );
        }
    }

    /// Deletes every key in the plan from backend and index. Each key is
    /// removed from both before the pass completes; a backend failure on
    /// one key is logged and does not stop the pass.
    async fn apply_plan(&self, plan: &SweepPlan) -> usize {
        let mut removed = 0;

        for (keys, expired) in [(&plan.expired, true), (&plan.evicted, false)] {
            for key in keys {
                if let Err(err) = self.backend.delete(&storage_key(key)).await {
                    warn!(key, error = %err, "Sweep failed to delete key");
                    continue;
                }
                let mut index = self.index.lock().await;
                index.remove(key);
                drop(index);

                if expired {
                    self.metrics.record_expiration();
                } else {
                    self.metrics.record_eviction();
                    debug!(key, "Evicted for capacity");
                }
                removed += 1;
            }
        }
        removed
    }

    // == Internals ==
    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(CacheError::Storage("engine not initialized".to_string()))
        }
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops lock registry entries for keys no longer indexed. Runs under
    /// the sweep gate, so no per-key operation is in flight.
    async fn prune_key_locks(&self) {
        let index = self.index.lock().await;
        let mut locks = self.key_locks.lock().await;
        locks.retain(|key, _| index.contains(key));
    }

    /// Enumerates the engine's namespace, decoding every entry. Corrupted
    /// entries are deleted and counted; keys outside the namespace are
    /// never touched.
    async fn scan_namespace(&self) -> Result<(HashMap<String, ItemMeta>, usize)> {
        let mut entries = HashMap::new();
        let mut healed = 0;

        for skey in self.backend.list_keys().await? {
            let Some(key) = skey.strip_prefix(KEY_NAMESPACE) else {
                continue;
            };
            let raw = match self.backend.get(&skey).await? {
                Some(raw) => raw,
                None => continue,
            };
            match serde_json::from_slice::<CacheItem>(&raw) {
                Ok(item) => {
                    entries.insert(key.to_string(), ItemMeta::from(&item));
                }
                Err(err) => {
                    warn!(key, error = %err, "Corrupted entry found by scan; removing");
                    self.backend.delete(&skey).await?;
                    healed += 1;
                }
            }
        }
        Ok((entries, healed))
    }
}

/// Backend key for a caller key, inside the engine's reserved namespace.
fn storage_key(key: &str) -> String {
    format!("{}{}", KEY_NAMESPACE, key)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FixedPlatform, PlatformClass};
    use crate::storage::MemoryBackend;

    fn engine() -> CacheEngine<MemoryBackend> {
        CacheEngine::with_platform(
            MemoryBackend::new(),
            Arc::new(FixedPlatform::new(PlatformClass::Large)),
        )
    }

    fn tiny_config(max_items: usize, max_bytes: u64) -> Arc<CacheConfiguration> {
        Arc::new(CacheConfiguration {
            max_bytes,
            max_item_count: max_items,
            ..CacheConfiguration::default()
        })
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let engine = engine();
        engine.initialize().await.unwrap();
        engine.initialize().await.unwrap();
        assert!(engine.is_initialized());
    }

    #[tokio::test]
    async fn test_store_and_retrieve_roundtrip() {
        let engine = engine();
        engine.initialize().await.unwrap();

        assert!(engine.store("k1", &"hello", StoreOptions::default()).await);
        let value: Option<String> = engine.retrieve("k1").await;

        assert_eq!(value, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_retrieve_absent_is_miss() {
        let engine = engine();
        engine.initialize().await.unwrap();

        let value: Option<String> = engine.retrieve("missing").await;
        assert_eq!(value, None);
        assert_eq!(engine.metrics().misses, 1);
    }

    #[tokio::test]
    async fn test_operations_before_initialize_degrade() {
        let engine = engine();

        assert!(!engine.store("k", &1u32, StoreOptions::default()).await);
        let value: Option<u32> = engine.retrieve("k").await;
        assert_eq!(value, None);
        assert_eq!(engine.clear_by_pattern("k").await, 0);
        assert_eq!(engine.run_cleanup().await, 0);
    }

    #[tokio::test]
    async fn test_dispose_makes_engine_unavailable() {
        let engine = engine();
        engine.initialize().await.unwrap();
        engine.store("k", &1u32, StoreOptions::default()).await;

        engine.dispose();

        let value: Option<u32> = engine.retrieve("k").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_immediate_miss() {
        let engine = engine();
        engine.initialize().await.unwrap();

        engine
            .store("x", &"payload", StoreOptions::with_ttl(Duration::ZERO))
            .await;

        let value: Option<String> = engine.retrieve("x").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let engine = engine();
        engine.initialize().await.unwrap();

        engine.store("k", &"v", StoreOptions::default()).await;
        engine.remove("k").await;
        engine.remove("k").await;

        let stats = engine.get_stats().await;
        assert_eq!(stats.total_items, 0);
    }

    #[tokio::test]
    async fn test_access_count_is_monotonic() {
        let engine = engine();
        engine.initialize().await.unwrap();

        engine.store("k", &"v", StoreOptions::default()).await;
        for _ in 0..3 {
            let _: Option<String> = engine.retrieve("k").await;
        }

        let index = engine.index.lock().await;
        assert_eq!(index.get("k").unwrap().access_count, 3);
    }

    #[tokio::test]
    async fn test_corrupted_entry_self_heals_on_read() {
        let engine = engine();
        engine.initialize().await.unwrap();

        engine.store("good", &"v", StoreOptions::default()).await;
        // Smash the stored envelope behind the engine's back.
        engine
            .backend
            .set(&storage_key("good"), b"not json".to_vec())
            .await
            .unwrap();

        let value: Option<String> = engine.retrieve("good").await;
        assert_eq!(value, None);
        assert_eq!(engine.backend.get(&storage_key("good")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_typed_decode_failure_removes_entry() {
        let engine = engine();
        engine.initialize().await.unwrap();

        engine.store("k", &"not a number", StoreOptions::default()).await;
        let value: Option<u64> = engine.retrieve("k").await;

        assert_eq!(value, None);
        let stats = engine.get_stats().await;
        assert_eq!(stats.total_items, 0);
    }

    #[tokio::test]
    async fn test_scan_heals_unindexed_keys() {
        let engine = engine();
        engine.initialize().await.unwrap();

        // A well-formed entry written around the index: invisible until
        // the next scan picks it up.
        let item = CacheItem::new(
            serde_json::to_vec(&"v").unwrap(),
            Duration::from_secs(60),
            Priority::Normal,
        );
        engine
            .backend
            .set(&storage_key("stray"), serde_json::to_vec(&item).unwrap())
            .await
            .unwrap();

        let miss: Option<String> = engine.retrieve("stray").await;
        assert_eq!(miss, None, "Unindexed key must read as a miss");

        let stats = engine.get_stats().await;
        assert_eq!(stats.total_items, 1);
        let hit: Option<String> = engine.retrieve("stray").await;
        assert_eq!(hit, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_stats_ignore_foreign_namespace() {
        let engine = engine();
        engine.initialize().await.unwrap();

        engine
            .backend
            .set("other_subsystem_key", b"whatever".to_vec())
            .await
            .unwrap();
        engine.store("ours", &"v", StoreOptions::default()).await;

        let stats = engine.get_stats().await;
        assert_eq!(stats.total_items, 1);
        // The foreign key is never deleted, even though it is unreadable.
        assert!(engine
            .backend
            .get("other_subsystem_key")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_clear_by_pattern_counts_matches() {
        let engine = engine();
        engine.initialize().await.unwrap();

        engine.store("shifts_mon", &1u32, StoreOptions::default()).await;
        engine.store("shifts_tue", &2u32, StoreOptions::default()).await;
        engine.store("profile_1", &3u32, StoreOptions::default()).await;

        assert_eq!(engine.clear_by_pattern("shifts_").await, 2);

        let stats = engine.get_stats().await;
        assert_eq!(stats.total_items, 1);
        let kept: Option<u32> = engine.retrieve("profile_1").await;
        assert_eq!(kept, Some(3));
    }

    #[tokio::test]
    async fn test_eviction_prefers_low_priority_then_oldest() {
        let engine = CacheEngine::new(MemoryBackend::new(), tiny_config(2, 10 * 1024));
        engine.initialize().await.unwrap();

        let payload = vec![b'x'; 4096];
        engine
            .store_bytes("a", payload.clone(), StoreOptions::with_priority(Priority::Normal))
            .await;
        engine
            .store_bytes("b", payload.clone(), StoreOptions::with_priority(Priority::Normal))
            .await;
        engine
            .store_bytes("c", payload, StoreOptions::with_priority(Priority::High))
            .await;

        assert_eq!(engine.retrieve_bytes("a").await, None, "a should be evicted");
        assert!(engine.retrieve_bytes("b").await.is_some());
        assert!(engine.retrieve_bytes("c").await.is_some());
        assert_eq!(engine.get_stats().await.total_items, 2);
        assert_eq!(engine.metrics().evictions, 1);
    }

    #[tokio::test]
    async fn test_oversized_item_still_stores() {
        let engine = CacheEngine::new(MemoryBackend::new(), tiny_config(10, 1000));
        engine.initialize().await.unwrap();

        engine
            .store_bytes("small", vec![b'x'; 10], StoreOptions::default())
            .await;
        // Larger than max_bytes on its own: inserted anyway, everything
        // else evictable goes instead.
        assert!(
            engine
                .store_bytes("big", vec![b'y'; 5000], StoreOptions::default())
                .await
        );

        assert_eq!(engine.retrieve_bytes("small").await, None);
        assert!(engine.retrieve_bytes("big").await.is_some());
    }

    #[tokio::test]
    async fn test_store_failure_returns_false_not_error() {
        let engine = engine();
        engine.initialize().await.unwrap();

        // JSON object keys must be strings; a byte-vector key cannot be
        // encoded, so the store degrades instead of erroring.
        let mut unencodable = HashMap::new();
        unencodable.insert(vec![1u8, 2u8], "v");
        assert!(!engine.store("k", &unencodable, StoreOptions::default()).await);
    }
}
