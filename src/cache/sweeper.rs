use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::CacheStore;

/// Periodically drop expired entries until `shutdown` is cancelled.
///
/// Expired entries are already invisible to readers; this only reclaims their
/// slots so they stop competing with fresh entries for capacity.
pub fn spawn_sweeper<K, V>(
    store: Arc<CacheStore<K, V>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("Cache sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let purged = store.purge_expired();
                    if purged > 0 {
                        info!(purged, remaining = store.len(), "Purged expired cache entries");
                    } else {
                        debug!(remaining = store.len(), "Cache sweep found no expired entries");
                    }
                }
            }
        }
    })
}
