use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Upstream query timed out after {0}ms")]
    UpstreamTimeout(u64),

    #[error("Upstream I/O error: {0}")]
    UpstreamIo(String),

    #[error("Invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    #[error("Blocklist source error: {0}")]
    BlocklistSource(String),
}

impl DomainError {
    /// True for the failure classes that a resolver surfaces as SERVFAIL.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout(_) | Self::UpstreamIo(_) | Self::InvalidUpstreamResponse(_)
        )
    }
}
