use super::fetch::{fetch_source, parse_blocklist};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use phantom_dns_application::ports::BlockFilterEnginePort;
use phantom_dns_domain::validators::normalize_domain;
use phantom_dns_domain::{config::BlockingConfig, DomainError};
use rustc_hash::FxBuildHasher;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type DomainSet = HashSet<String, FxBuildHasher>;

/// Immutable blocklist snapshot. Built off the hot path, swapped in whole.
struct BlockSnapshot {
    domains: DomainSet,
}

impl BlockSnapshot {
    fn empty() -> Self {
        Self {
            domains: DomainSet::default(),
        }
    }
}

/// The block filter engine.
///
/// All filtering state lives in memory. Lookups read the current snapshot
/// through an atomic pointer load; `reload()` builds a fresh snapshot from
/// the configured sources and swaps it in without blocking readers. When
/// every source fails the reload errors out and the previous snapshot stays
/// in place.
pub struct BlockFilterEngine {
    snapshot: ArcSwap<BlockSnapshot>,
    enabled: bool,
    sources: Vec<String>,
    custom_blocked: Vec<String>,
    allowlist: DomainSet,
    /// Persistent HTTP client, reused across reloads.
    http_client: reqwest::Client,
}

impl BlockFilterEngine {
    pub fn new(config: &BlockingConfig) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .user_agent("phantom-dns/0.3 (blocklist-sync)")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::BlocklistSource(e.to_string()))?;

        let allowlist: DomainSet = config
            .allowlist
            .iter()
            .map(|d| normalize_domain(d))
            .collect();

        let engine = Self {
            snapshot: ArcSwap::from_pointee(BlockSnapshot::empty()),
            enabled: config.enabled,
            sources: config.sources.clone(),
            custom_blocked: config.custom_blocked.clone(),
            allowlist,
            http_client,
        };

        // Custom entries are available immediately; remote sources arrive
        // with the first reload.
        engine.swap_in(DomainSet::default());

        Ok(engine)
    }

    fn swap_in(&self, mut fetched: DomainSet) {
        for domain in &self.custom_blocked {
            fetched.insert(normalize_domain(domain));
        }
        for allowed in &self.allowlist {
            fetched.remove(allowed);
        }
        self.snapshot
            .store(Arc::new(BlockSnapshot { domains: fetched }));
    }
}

#[async_trait]
impl BlockFilterEnginePort for BlockFilterEngine {
    fn is_blocked(&self, domain: &str) -> bool {
        if !self.enabled {
            return false;
        }
        self.snapshot.load().domains.contains(domain)
    }

    fn blocked_count(&self) -> usize {
        self.snapshot.load().domains.len()
    }

    async fn reload(&self) -> Result<usize, DomainError> {
        let mut fetched = DomainSet::default();
        let mut failures = 0usize;

        for url in &self.sources {
            match fetch_source(&self.http_client, url).await {
                Ok(body) => {
                    let domains = parse_blocklist(&body);
                    info!(source = %url, domains = domains.len(), "Blocklist source fetched");
                    fetched.extend(domains);
                }
                Err(e) => {
                    warn!(source = %url, error = %e, "Blocklist source failed");
                    failures += 1;
                }
            }
        }

        // Keep the old snapshot when nothing could be fetched at all.
        if failures > 0 && failures == self.sources.len() && !self.sources.is_empty() {
            return Err(DomainError::BlocklistSource(format!(
                "all {} sources failed",
                failures
            )));
        }

        self.swap_in(fetched);
        let count = self.blocked_count();
        info!(blocked_domains = count, "Blocklist snapshot swapped");
        Ok(count)
    }
}
