use async_trait::async_trait;
use hickory_proto::op::Message;
use phantom_dns_domain::{DnsQuery, DomainError};

/// Application-layer port for upstream forwarding.
///
/// One request/response exchange per call, bounded by the configured timeout.
/// Implementations never synthesize DNS semantics: any transport failure
/// surfaces as a `DomainError` and the caller decides what the client sees.
#[async_trait]
pub trait UpstreamResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery) -> Result<Message, DomainError>;
}
