//! Cache Module
//!
//! The core engine: TTL expiry, priority-aware eviction, and the metadata
//! index mirroring the backend namespace.

pub mod engine;
pub mod eviction;
pub mod index;
pub mod item;
pub mod stats;


// Re-export public types
pub use engine::{CacheEngine, StoreOptions};
pub use index::{ItemMeta, MetadataIndex};
pub use item::{CacheItem, Priority};
pub use stats::{CacheStats, MetricsSnapshot};

// == Public Constants ==
/// Reserved backend key prefix. Everything the engine writes lives under
/// this namespace; keys outside it are never enumerated or deleted.
pub const KEY_NAMESPACE: &str = "cache:v1:";
