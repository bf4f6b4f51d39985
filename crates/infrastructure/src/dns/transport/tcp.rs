use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use phantom_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP client transport (RFC 1035 §4.2.2 two-byte length framing).
///
/// Used as the fallback path when a UDP response comes back truncated.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        if message_bytes.len() > u16::MAX as usize {
            return Err(DomainError::MalformedQuery(
                "query exceeds TCP frame limit".to_string(),
            ));
        }

        let exchange = async {
            let mut stream = TcpStream::connect(self.server_addr).await.map_err(|e| {
                DomainError::UpstreamIo(format!(
                    "Failed to connect to {}: {}",
                    self.server_addr, e
                ))
            })?;

            let mut framed = Vec::with_capacity(2 + message_bytes.len());
            framed.extend_from_slice(&(message_bytes.len() as u16).to_be_bytes());
            framed.extend_from_slice(message_bytes);

            stream.write_all(&framed).await.map_err(|e| {
                DomainError::UpstreamIo(format!("Failed to send TCP query: {}", e))
            })?;

            let mut len_buf = [0u8; 2];
            stream.read_exact(&mut len_buf).await.map_err(|e| {
                DomainError::UpstreamIo(format!("Failed to read TCP response length: {}", e))
            })?;
            let response_len = u16::from_be_bytes(len_buf) as usize;

            let mut response = vec![0u8; response_len];
            stream.read_exact(&mut response).await.map_err(|e| {
                DomainError::UpstreamIo(format!("Failed to read TCP response: {}", e))
            })?;

            Ok::<Vec<u8>, DomainError>(response)
        };

        let bytes = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| DomainError::UpstreamTimeout(timeout.as_millis() as u64))??;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse {
            bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}
