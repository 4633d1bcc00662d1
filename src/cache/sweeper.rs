//! Background expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::store::CacheStore;

/// Default period between sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Handle to a task that calls [`CacheStore::cleanup_expired()`] on a
/// fixed period until cancelled.
///
/// Dropping the handle cancels the task without waiting for it;
/// [`shutdown()`](Self::shutdown) cancels and joins.
#[derive(Debug)]
pub struct Sweeper {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn the sweep on the current Tokio runtime.
    ///
    /// The first sweep runs one `period` after spawning.
    pub fn spawn<V>(cache: Arc<CacheStore<V>>, period: Duration) -> Self
    where
        V: Clone + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "cache sweeper started");
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.cleanup_expired();
                        debug!(removed, "cache sweep finished");
                    }
                }
            }
            debug!("cache sweeper stopped");
        });
        Self {
            token,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the task and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheCategory, CacheTtls};

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_period_and_stops_on_shutdown() {
        let ttls = CacheTtls::default().with(CacheCategory::Standings, Duration::from_secs(10));
        let cache = Arc::new(CacheStore::new(10, ttls));
        cache.set("standings:a", 1u32, CacheCategory::Standings);
        cache.set("teams:b", 2u32, CacheCategory::Teams);

        let sweeper = Sweeper::spawn(Arc::clone(&cache), Duration::from_secs(60));
        assert!(sweeper.is_running());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(!cache.contains("standings:a"));
        assert!(cache.contains("teams:b"));

        sweeper.shutdown().await;
    }
}
