use serde::{Deserialize, Serialize};

/// Listener binding configuration. All three transports share the bind
/// address and differ only in port.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Plain DNS over UDP.
    #[serde(default = "default_udp_port")]
    pub udp_port: u16,

    /// DNS-over-TLS (RFC 7858).
    #[serde(default = "default_dot_port")]
    pub dot_port: u16,

    /// DNS-over-HTTPS (RFC 8484).
    #[serde(default = "default_doh_port")]
    pub doh_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            udp_port: default_udp_port(),
            dot_port: default_dot_port(),
            doh_port: default_doh_port(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_udp_port() -> u16 {
    53
}

fn default_dot_port() -> u16 {
    853
}

fn default_doh_port() -> u16 {
    443
}
