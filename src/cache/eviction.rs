//! Eviction Policy Module
//!
//! Pure planning for the cleanup sweep: expire, then order survivors by
//! a deterministic comparator and evict down into the hysteresis band.
//! The engine applies the resulting plan against the backend and index.

use std::cmp::Ordering;

use crate::cache::index::ItemMeta;
use crate::config::CacheConfiguration;

// == Hysteresis ==
/// Target utilization after an eviction pass, as a fraction of the
/// configured maximums. Evicting down to 80% rather than exactly to the
/// limit keeps the next few inserts from each triggering a sweep.
pub const HYSTERESIS_RATIO: f64 = 0.8;

/// Post-sweep targets, rounded up so small `max_item_count` values keep
/// their nearest whole-item band.
pub fn hysteresis_targets(config: &CacheConfiguration) -> (usize, u64) {
    let item_target = (config.max_item_count as f64 * HYSTERESIS_RATIO).ceil() as usize;
    let byte_target = (config.max_bytes as f64 * HYSTERESIS_RATIO).ceil() as u64;
    (item_target, byte_target)
}

// == Eviction Order ==
/// Three-level deterministic comparator: priority ascending (lowest
/// evicted first), then access count ascending, then last-accessed
/// ascending (oldest first). Key name breaks any remaining tie so the
/// order is total.
pub fn eviction_order(a: &(String, ItemMeta), b: &(String, ItemMeta)) -> Ordering {
    a.1.priority
        .cmp(&b.1.priority)
        .then(a.1.access_count.cmp(&b.1.access_count))
        .then(a.1.last_accessed.cmp(&b.1.last_accessed))
        .then(a.0.cmp(&b.0))
}

// == Sweep Plan ==
/// Outcome of one planning pass: keys to drop as expired and keys to
/// evict for capacity, in eviction order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepPlan {
    pub expired: Vec<String>,
    pub evicted: Vec<String>,
}

impl SweepPlan {
    pub fn removal_count(&self) -> usize {
        self.expired.len() + self.evicted.len()
    }
}

/// Plans one sweep over a snapshot of the index.
///
/// `protected` exempts a freshly written key from the capacity pass of
/// its own store call; an oversized single item therefore succeeds and
/// everything else evictable goes instead. `aggressive` (compact
/// profiles) triggers the capacity pass already above the hysteresis
/// targets; otherwise only above the hard maximums.
pub fn plan_sweep(
    entries: &[(String, ItemMeta)],
    config: &CacheConfiguration,
    now_ms: u64,
    protected: Option<&str>,
    aggressive: bool,
) -> SweepPlan {
    let mut plan = SweepPlan::default();

    // Phase 1: expire.
    let mut live: Vec<(String, ItemMeta)> = Vec::with_capacity(entries.len());
    for (key, meta) in entries {
        if now_ms >= meta.expires_at {
            plan.expired.push(key.clone());
        } else {
            live.push((key.clone(), *meta));
        }
    }

    let mut item_count = live.len();
    let mut total_bytes: u64 = live.iter().map(|(_, meta)| meta.size_bytes).sum();

    let (item_target, byte_target) = hysteresis_targets(config);
    let (item_limit, byte_limit) = if aggressive {
        (item_target, byte_target)
    } else {
        (config.max_item_count, config.max_bytes)
    };

    // Phase 2: stop if expiry alone brought us within limits.
    if item_count <= item_limit && total_bytes <= byte_limit {
        return plan;
    }

    // Phase 3: deterministic ordering over evictable candidates.
    let mut candidates: Vec<(String, ItemMeta)> = live
        .into_iter()
        .filter(|(key, _)| protected != Some(key.as_str()))
        .collect();
    candidates.sort_by(eviction_order);

    // Phase 4: evict into the hysteresis band, or until nothing is left
    // to evict (an oversized protected item can keep totals above target).
    for (key, meta) in candidates {
        if item_count <= item_target && total_bytes <= byte_target {
            break;
        }
        item_count -= 1;
        total_bytes = total_bytes.saturating_sub(meta.size_bytes);
        plan.evicted.push(key);
    }

    plan
}
