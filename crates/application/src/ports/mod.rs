pub mod block_filter;
pub mod response_cache;
pub mod upstream_resolver;

pub use block_filter::BlockFilterEnginePort;
pub use response_cache::ResponseCachePort;
pub use upstream_resolver::UpstreamResolver;
