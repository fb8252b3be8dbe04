//! Periodic Cleanup Task
//!
//! Background task driving the eviction policy on the configured cadence.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::CacheEngine;
use crate::storage::CacheBackend;

/// Spawns the periodic cleanup sweep for an engine.
///
/// The loop re-reads `cleanup_interval` from the engine's current
/// configuration on every iteration, so a platform-class change takes
/// effect at the next tick without restarting the task. The returned
/// handle is aborted on disposal.
///
/// # Example
/// ```ignore
/// let engine = Arc::new(CacheEngine::new(backend, platform));
/// engine.initialize().await?;
/// let cleanup_handle = spawn_cleanup_task(engine.clone());
/// // Later, during shutdown:
/// engine.dispose();
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<B: CacheBackend>(engine: Arc<CacheEngine<B>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = engine.current_config().cleanup_interval.as_secs(),
            "Starting periodic cache cleanup task"
        );

        loop {
            let interval = engine.current_config().cleanup_interval;
            tokio::time::sleep(interval).await;

            let removed = engine.run_cleanup().await;
            if removed > 0 {
                info!(removed, "Periodic cleanup removed items");
            }
        }
    })
}
