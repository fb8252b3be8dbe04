//! Cache Item Module
//!
//! Defines the persisted envelope for individual cache items, with TTL
//! and eviction metadata.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Priority ==
/// Caller-assigned importance tier influencing eviction order.
///
/// Derives `Ord`: lower priorities sort first, so the eviction comparator
/// can use the natural ordering directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

// == Cache Item ==
/// A single cache item as persisted in the backend.
///
/// Exactly one live item exists per key. Created by `store`, its access
/// metadata is mutated by `retrieve`, and it is destroyed by `remove`,
/// lazy expiry on read, or eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheItem {
    /// Opaque serialized payload
    pub payload: Vec<u8>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Eviction priority tier
    pub priority: Priority,
    /// Number of successful retrievals, monotonic
    pub access_count: u64,
    /// Timestamp of the most recent retrieval (Unix milliseconds)
    pub last_accessed: u64,
    /// Payload length in bytes at write time
    pub size_bytes: u64,
}

impl CacheItem {
    // == Constructor ==
    /// Creates a new item expiring `ttl` from now.
    pub fn new(payload: Vec<u8>, ttl: Duration, priority: Priority) -> Self {
        let now = current_timestamp_ms();
        let size_bytes = payload.len() as u64;

        Self {
            payload,
            created_at: now,
            expires_at: now.saturating_add(ttl.as_millis() as u64),
            priority,
            access_count: 0,
            last_accessed: now,
            size_bytes,
        }
    }

    // == Is Expired ==
    /// Checks whether the item has expired.
    ///
    /// Boundary condition: an item is expired once the current time is
    /// greater than or equal to `expires_at`, so a zero TTL expires
    /// immediately.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Touch ==
    /// Records a successful retrieval: bumps the access count and
    /// refreshes the last-accessed timestamp.
    pub fn touch(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_accessed = current_timestamp_ms();
    }

    /// Returns remaining TTL, or zero if the item has expired.
    pub fn ttl_remaining(&self) -> Duration {
        let now = current_timestamp_ms();
        Duration::from_millis(self.expires_at.saturating_sub(now))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
