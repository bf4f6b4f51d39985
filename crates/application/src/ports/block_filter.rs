use async_trait::async_trait;
use phantom_dns_domain::DomainError;

/// Application-layer port for the blocklist engine.
///
/// `is_blocked` is synchronous and lock-free on the hot path — the snapshot
/// lives in memory behind an atomic pointer. Only `reload` is async because
/// it fetches sources over the network.
#[async_trait]
pub trait BlockFilterEnginePort: Send + Sync {
    /// Check a canonicalized (lowercase, trailing-dot) domain against the
    /// current snapshot.
    fn is_blocked(&self, domain: &str) -> bool;

    /// Number of domains in the current snapshot.
    fn blocked_count(&self) -> usize;

    /// Re-fetch all configured sources and atomically swap the snapshot.
    /// Returns the new snapshot size.
    async fn reload(&self) -> Result<usize, DomainError>;
}
