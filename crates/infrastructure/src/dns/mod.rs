pub mod block_filter;
pub mod cache;
pub mod forwarding;
pub mod resolver;
pub mod transport;

pub use block_filter::BlockFilterEngine;
pub use cache::ResponseCache;
pub use resolver::ForwardingResolver;
