//! Adaptive Cache - a self-sizing local cache engine
//!
//! Sizes itself from the host platform's resource class, enforces TTL
//! expiry, and evicts under capacity pressure in deterministic
//! priority/recency order. The cache is strictly an optimization: apart
//! from a failed `initialize`, every failure degrades to a miss.

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod platform;
pub mod storage;
pub mod tasks;

pub use cache::{CacheEngine, CacheStats, MetricsSnapshot, Priority, StoreOptions};
pub use config::{resolve, CacheConfiguration};
pub use domain::{ContentCategory, DomainCache};
pub use error::{CacheError, Result};
pub use platform::{FixedPlatform, PlatformClass, PlatformContextProvider};
pub use storage::{CacheBackend, MemoryBackend};
pub use tasks::spawn_cleanup_task;
