//! The upstream forwarding resolver.
//!
//! One exchange per call: build a wire query with a fresh transaction ID,
//! send it over UDP, fall back to TCP only when the UDP answer comes back
//! truncated. Responses whose ID doesn't match the query are rejected.
//! Retry policy belongs to the client; there is none here.

use super::forwarding::MessageBuilder;
use super::transport::{DnsTransport, TcpTransport, UdpTransport};
use async_trait::async_trait;
use hickory_proto::op::Message;
use phantom_dns_application::ports::UpstreamResolver;
use phantom_dns_domain::{DnsQuery, DomainError};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ForwardingResolver {
    udp: UdpTransport,
    tcp: TcpTransport,
    timeout: Duration,
}

impl ForwardingResolver {
    pub fn new(upstream: SocketAddr, timeout: Duration) -> Self {
        Self {
            udp: UdpTransport::new(upstream),
            tcp: TcpTransport::new(upstream),
            timeout,
        }
    }

    fn parse_and_validate(
        bytes: &[u8],
        expected_id: u16,
        protocol: &'static str,
    ) -> Result<Message, DomainError> {
        let message = Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidUpstreamResponse(format!(
                "undecodable {} response: {}",
                protocol, e
            ))
        })?;

        if message.id() != expected_id {
            return Err(DomainError::InvalidUpstreamResponse(format!(
                "transaction ID mismatch: expected {}, got {}",
                expected_id,
                message.id()
            )));
        }

        Ok(message)
    }
}

#[async_trait]
impl UpstreamResolver for ForwardingResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<Message, DomainError> {
        let (id, wire) = MessageBuilder::build_query(query)?;

        let udp_response = self.udp.send(&wire, self.timeout).await?;
        let message = Self::parse_and_validate(&udp_response.bytes, id, "UDP")?;

        if !message.truncated() {
            debug!(
                domain = %query.domain,
                record_type = %query.record_type,
                answers = message.answers().len(),
                "Upstream answered over UDP"
            );
            return Ok(message);
        }

        // Truncated UDP answer: repeat the same exchange over TCP.
        warn!(domain = %query.domain, "UDP response truncated, retrying over TCP");
        let tcp_response = self.tcp.send(&wire, self.timeout).await?;
        let message = Self::parse_and_validate(&tcp_response.bytes, id, "TCP")?;

        debug!(
            domain = %query.domain,
            record_type = %query.record_type,
            answers = message.answers().len(),
            "Upstream answered over TCP"
        );
        Ok(message)
    }
}
