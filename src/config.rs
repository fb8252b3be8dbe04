//! Configuration Module
//!
//! Capacity and TTL profiles resolved from the host platform class.

use std::sync::Arc;
use std::time::Duration;

use crate::platform::{PlatformClass, PlatformContextProvider};

// == Cache Configuration ==
/// Capacity and timing parameters for one engine instance.
///
/// Immutable value object. A new instance is resolved whenever the engine
/// re-reads the platform classification (at initialization and at each
/// cleanup/write decision point); existing items are never rescaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfiguration {
    /// Maximum total payload bytes the cache may hold
    pub max_bytes: u64,
    /// TTL applied when a store call does not supply one
    pub default_ttl: Duration,
    /// Cadence of the periodic cleanup sweep
    pub cleanup_interval: Duration,
    /// Maximum number of items the cache may hold
    pub max_item_count: usize,
    /// When set, the periodic sweep evicts down to the hysteresis targets
    /// even before the hard maximums are exceeded
    pub aggressive_cleanup: bool,
}

/// Resolves the configuration profile for a platform class.
///
/// Pure lookup. An unavailable classification maps to the compact profile,
/// the most conservative choice.
pub fn resolve(class: Option<PlatformClass>) -> CacheConfiguration {
    match class.unwrap_or(PlatformClass::Compact) {
        PlatformClass::Compact => CacheConfiguration {
            max_bytes: 8 * 1024 * 1024,
            default_ttl: Duration::from_secs(15 * 60),
            cleanup_interval: Duration::from_secs(10 * 60),
            max_item_count: 200,
            aggressive_cleanup: true,
        },
        PlatformClass::Medium => CacheConfiguration {
            max_bytes: 16 * 1024 * 1024,
            default_ttl: Duration::from_secs(30 * 60),
            cleanup_interval: Duration::from_secs(15 * 60),
            max_item_count: 500,
            aggressive_cleanup: false,
        },
        PlatformClass::Large => CacheConfiguration {
            max_bytes: 32 * 1024 * 1024,
            default_ttl: Duration::from_secs(60 * 60),
            cleanup_interval: Duration::from_secs(20 * 60),
            max_item_count: 1000,
            aggressive_cleanup: false,
        },
        PlatformClass::ExtraLarge => CacheConfiguration {
            max_bytes: 64 * 1024 * 1024,
            default_ttl: Duration::from_secs(120 * 60),
            cleanup_interval: Duration::from_secs(30 * 60),
            max_item_count: 2000,
            aggressive_cleanup: false,
        },
    }
}

impl Default for CacheConfiguration {
    fn default() -> Self {
        resolve(None)
    }
}

// == Config Source ==
/// Pull-based source of the active configuration.
///
/// The engine re-pulls at initialization and at each cleanup/write
/// decision point; there are no push notifications.
pub trait ConfigSource: Send + Sync + 'static {
    fn current(&self) -> CacheConfiguration;
}

/// Production source: re-resolves the platform classification on every
/// pull, so a class change is picked up at the next decision point.
pub struct PlatformProfileSource {
    provider: Arc<dyn PlatformContextProvider>,
}

impl PlatformProfileSource {
    pub fn new(provider: Arc<dyn PlatformContextProvider>) -> Self {
        Self { provider }
    }
}

impl ConfigSource for PlatformProfileSource {
    fn current(&self) -> CacheConfiguration {
        resolve(self.provider.classification())
    }
}

/// A fixed configuration is its own source, for hosts that size the
/// cache themselves.
impl ConfigSource for CacheConfiguration {
    fn current(&self) -> CacheConfiguration {
        self.clone()
    }
}
