//! Domain Adapter Module
//!
//! Thin policy layer over the generic engine: each content category maps
//! to a TTL and priority tier, and per-category access counts rank
//! advisory prefetch candidates. Prefetch is log-only and never
//! load-bearing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheEngine, Priority, StoreOptions};
use crate::storage::CacheBackend;

// == Content Category ==
/// Coarse freshness class of cached domain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    /// Currently in-use data; short-lived but important to keep
    Active,
    /// Near-future data, refreshed on a normal cadence
    Upcoming,
    /// Past data; cheap to keep around for a long time
    Historical,
    /// Rarely-changing lookup data
    Reference,
}

/// TTL and priority assigned per category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryProfile {
    pub ttl: Duration,
    pub priority: Priority,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 4] = [
        ContentCategory::Active,
        ContentCategory::Upcoming,
        ContentCategory::Historical,
        ContentCategory::Reference,
    ];

    /// Active data expires fast but survives eviction pressure;
    /// historical data is the opposite.
    pub fn profile(self) -> CategoryProfile {
        match self {
            ContentCategory::Active => CategoryProfile {
                ttl: Duration::from_secs(5 * 60),
                priority: Priority::High,
            },
            ContentCategory::Upcoming => CategoryProfile {
                ttl: Duration::from_secs(30 * 60),
                priority: Priority::Normal,
            },
            ContentCategory::Historical => CategoryProfile {
                ttl: Duration::from_secs(24 * 60 * 60),
                priority: Priority::Normal,
            },
            ContentCategory::Reference => CategoryProfile {
                ttl: Duration::from_secs(3 * 24 * 60 * 60),
                priority: Priority::Low,
            },
        }
    }

    /// Key prefix separating categories inside the engine namespace.
    pub fn key_prefix(self) -> &'static str {
        match self {
            ContentCategory::Active => "active_",
            ContentCategory::Upcoming => "upcoming_",
            ContentCategory::Historical => "historical_",
            ContentCategory::Reference => "reference_",
        }
    }
}

// == Domain Cache ==
/// Category-aware facade over a shared [`CacheEngine`].
pub struct DomainCache<B: CacheBackend> {
    engine: Arc<CacheEngine<B>>,
    access_counts: Mutex<HashMap<ContentCategory, u64>>,
}

impl<B: CacheBackend> DomainCache<B> {
    pub fn new(engine: Arc<CacheEngine<B>>) -> Self {
        Self {
            engine,
            access_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Stores under the category's TTL and priority.
    pub async fn store<T: Serialize>(&self, category: ContentCategory, key: &str, value: &T) -> bool {
        let profile = category.profile();
        self.engine
            .store(
                &self.category_key(category, key),
                value,
                StoreOptions::new(profile.ttl, profile.priority),
            )
            .await
    }

    /// Retrieves and counts the access against the category.
    pub async fn retrieve<T: DeserializeOwned>(
        &self,
        category: ContentCategory,
        key: &str,
    ) -> Option<T> {
        self.record_access(category);
        self.engine.retrieve(&self.category_key(category, key)).await
    }

    pub async fn remove(&self, category: ContentCategory, key: &str) {
        self.engine.remove(&self.category_key(category, key)).await;
    }

    /// Drops every cached entry of one category.
    pub async fn clear_category(&self, category: ContentCategory) -> usize {
        self.engine.clear_by_pattern(category.key_prefix()).await
    }

    /// Categories ranked by observed access count, busiest first.
    ///
    /// Advisory only: the ranking is logged for prefetch tuning and has
    /// no other effect.
    pub fn prefetch_candidates(&self) -> Vec<ContentCategory> {
        let counts = self.access_counts.lock().expect("access counts poisoned");
        let mut ranked: Vec<(ContentCategory, u64)> = ContentCategory::ALL
            .iter()
            .map(|category| (*category, counts.get(category).copied().unwrap_or(0)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        debug!(?ranked, "Prefetch candidate ranking");
        ranked.into_iter().map(|(category, _)| category).collect()
    }

    /// Accesses observed for one category.
    pub fn access_count(&self, category: ContentCategory) -> u64 {
        let counts = self.access_counts.lock().expect("access counts poisoned");
        counts.get(&category).copied().unwrap_or(0)
    }

    fn record_access(&self, category: ContentCategory) {
        let mut counts = self.access_counts.lock().expect("access counts poisoned");
        *counts.entry(category).or_insert(0) += 1;
    }

    fn category_key(&self, category: ContentCategory, key: &str) -> String {
        format!("{}{}", category.key_prefix(), key)
    }
}
