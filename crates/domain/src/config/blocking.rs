use serde::{Deserialize, Serialize};

/// Blocklist configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    /// Enable blocklist enforcement (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// HTTP(S) URLs of blocklist sources (hosts-file or plain-domain format).
    #[serde(default)]
    pub sources: Vec<String>,

    /// User-defined domains to block in addition to the sources.
    #[serde(default)]
    pub custom_blocked: Vec<String>,

    /// Domains to allow even when a source lists them.
    #[serde(default)]
    pub allowlist: Vec<String>,

    /// Interval between background source refreshes, in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            sources: vec![],
            custom_blocked: vec![],
            allowlist: vec![],
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_refresh_interval_secs() -> u64 {
    86_400
}
