//! Configuration for PhantomDNS, organized by concern:
//! - `root`: top-level config, file loading and CLI overrides
//! - `server`: bind address and listener ports
//! - `dns`: upstream, timeout and cache tuning
//! - `blocking`: blocklist sources and manual entries
//! - `tls`: certificate material for DoT/DoH
//! - `logging`: log level
//! - `errors`: configuration errors

pub mod blocking;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod tls;

pub use blocking::BlockingConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use tls::TlsConfig;
