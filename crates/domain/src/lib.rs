//! PhantomDNS Domain Layer
pub mod cache_key;
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod validators;

pub use cache_key::CacheKey;
pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::DnsQuery;
pub use dns_record::{RecordClass, RecordType};
pub use errors::DomainError;
