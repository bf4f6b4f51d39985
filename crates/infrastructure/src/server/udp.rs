use super::handle_wire_query;
use phantom_dns_application::QueryPipeline;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Largest request payload a listener accepts (EDNS0-sized).
const MAX_QUERY_SIZE: usize = 4096;

/// Plain DNS-over-UDP listener. One task per datagram.
pub struct UdpServer {
    socket: Arc<UdpSocket>,
    pipeline: Arc<QueryPipeline>,
}

impl UdpServer {
    pub async fn bind(
        addr: SocketAddr,
        pipeline: Arc<QueryPipeline>,
    ) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(addr).await?;
        info!(bind_address = %addr, protocol = "UDP", "DNS listener bound");
        Ok(Self {
            socket: Arc::new(socket),
            pipeline,
        })
    }

    /// Actual bound address, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut buf = vec![0u8; MAX_QUERY_SIZE];

        loop {
            let (len, peer) = tokio::select! {
                result = self.socket.recv_from(&mut buf) => match result {
                    Ok(received) => received,
                    Err(e) => {
                        warn!(error = %e, "UDP receive failed");
                        continue;
                    }
                },
                _ = shutdown.cancelled() => {
                    info!(protocol = "UDP", "Listener shutting down");
                    return;
                }
            };

            let query = buf[..len].to_vec();
            let socket = Arc::clone(&self.socket);
            let pipeline = Arc::clone(&self.pipeline);

            tokio::spawn(async move {
                let Some(response) = handle_wire_query(&pipeline, &query).await else {
                    return;
                };
                if let Err(e) = socket.send_to(&response, peer).await {
                    error!(peer = %peer, error = %e, "Failed to send UDP response");
                } else {
                    debug!(peer = %peer, bytes = response.len(), "UDP response sent");
                }
            });
        }
    }
}
