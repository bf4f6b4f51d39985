use super::{BlockingConfig, ConfigError, DnsConfig, LoggingConfig, ServerConfig, TlsConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Top-level configuration, loaded from a TOML file with CLI overrides
/// applied afterwards. Every section falls back to its defaults when absent,
/// so an empty file (or no file at all) yields a runnable server.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub blocking: BlockingConfig,

    #[serde(default)]
    pub tls: TlsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values passed on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub udp_port: Option<u16>,
    pub upstream: Option<String>,
}

impl Config {
    /// Load configuration from `path` (defaults when `None` or missing) and
    /// apply CLI overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if Path::new(path).exists() => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.to_string(),
                        source,
                    })?;
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_string(),
                    source,
                })?
            }
            _ => Self::default(),
        };

        if let Some(bind) = overrides.bind_address {
            config.server.bind_address = bind;
        }
        if let Some(port) = overrides.udp_port {
            config.server.udp_port = port;
        }
        if let Some(upstream) = overrides.upstream {
            config.dns.upstream = upstream;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upstream_addr()?;

        if self.dns.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "dns.query_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.dns.cache_max_cost == 0 {
            return Err(ConfigError::Invalid(
                "dns.cache_max_cost must be greater than zero".to_string(),
            ));
        }
        if self.dns.cache_min_ttl_secs > self.dns.cache_max_ttl_secs {
            return Err(ConfigError::Invalid(format!(
                "dns.cache_min_ttl_secs ({}) exceeds dns.cache_max_ttl_secs ({})",
                self.dns.cache_min_ttl_secs, self.dns.cache_max_ttl_secs
            )));
        }

        for source in &self.blocking.sources {
            if !source.starts_with("http://") && !source.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "blocklist source must be an http(s) URL: {source}"
                )));
            }
        }

        Ok(())
    }

    /// The upstream address as a parsed socket address.
    pub fn upstream_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.dns.upstream.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "dns.upstream is not a valid host:port address: {}",
                self.dns.upstream
            ))
        })
    }
}
