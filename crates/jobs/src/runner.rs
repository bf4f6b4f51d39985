use crate::{BlocklistSyncJob, CacheSweepJob};
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Register jobs with the builder methods, then call `.start()` once.
pub struct JobRunner {
    blocklist_sync: Option<BlocklistSyncJob>,
    cache_sweep: Option<CacheSweepJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            blocklist_sync: None,
            cache_sweep: None,
        }
    }

    pub fn with_blocklist_sync(mut self, job: BlocklistSyncJob) -> Self {
        self.blocklist_sync = Some(job);
        self
    }

    pub fn with_cache_sweep(mut self, job: CacheSweepJob) -> Self {
        self.cache_sweep = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.blocklist_sync {
            Arc::new(job).start().await;
        }

        if let Some(job) = self.cache_sweep {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
