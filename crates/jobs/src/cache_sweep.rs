use phantom_dns_application::ports::ResponseCachePort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Sweeps expired cache entries so memory isn't held hostage by keys that
/// are never read again (lazy expiry only fires on lookup).
pub struct CacheSweepJob {
    cache: Arc<dyn ResponseCachePort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheSweepJob {
    pub fn new(cache: Arc<dyn ResponseCachePort>) -> Self {
        Self {
            cache,
            interval_secs: 300,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting cache sweep job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheSweepJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.cache.purge_expired();
                        if removed > 0 {
                            info!(removed = removed, "CacheSweepJob: purged expired entries");
                        } else {
                            debug!("CacheSweepJob: nothing to purge");
                        }
                    }
                }
            }
        });
    }
}
