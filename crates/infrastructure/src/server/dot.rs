use super::handle_wire_query;
use phantom_dns_application::QueryPipeline;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// RFC 7858 recommends closing idle connections; 10s matches common servers.
const IDLE_TIMEOUT: Duration = Duration::from_secs(10);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_FRAME_SIZE: usize = 4096;

/// DNS-over-TLS listener (RFC 7858). Each connection carries a stream of
/// two-byte length-prefixed DNS messages, same framing as plain TCP.
pub struct DotServer {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    pipeline: Arc<QueryPipeline>,
}

impl DotServer {
    pub async fn bind(
        addr: SocketAddr,
        tls_config: Arc<rustls::ServerConfig>,
        pipeline: Arc<QueryPipeline>,
    ) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        info!(bind_address = %addr, protocol = "DoT", "DNS listener bound");
        Ok(Self {
            listener,
            acceptor: TlsAcceptor::from(tls_config),
            pipeline,
        })
    }

    /// Actual bound address, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            let (stream, peer) = tokio::select! {
                result = self.listener.accept() => match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "DoT accept failed");
                        continue;
                    }
                },
                _ = shutdown.cancelled() => {
                    info!(protocol = "DoT", "Listener shutting down");
                    return;
                }
            };

            let acceptor = self.acceptor.clone();
            let pipeline = Arc::clone(&self.pipeline);
            let conn_shutdown = shutdown.clone();

            tokio::spawn(async move {
                let tls_stream =
                    match tokio::time::timeout(HANDSHAKE_TIMEOUT, acceptor.accept(stream)).await {
                        Ok(Ok(tls_stream)) => tls_stream,
                        Ok(Err(e)) => {
                            debug!(peer = %peer, error = %e, "TLS handshake failed");
                            return;
                        }
                        Err(_) => {
                            debug!(peer = %peer, "TLS handshake timed out");
                            return;
                        }
                    };

                if let Err(e) =
                    serve_connection(tls_stream, peer, &pipeline, conn_shutdown).await
                {
                    debug!(peer = %peer, error = %e, "DoT connection closed");
                }
            });
        }
    }
}

async fn serve_connection(
    mut stream: tokio_rustls::server::TlsStream<TcpStream>,
    peer: SocketAddr,
    pipeline: &QueryPipeline,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    loop {
        let mut len_buf = [0u8; 2];
        let read = tokio::select! {
            result = tokio::time::timeout(IDLE_TIMEOUT, stream.read_exact(&mut len_buf)) => result,
            _ = shutdown.cancelled() => return Ok(()),
        };

        match read {
            Ok(Ok(_)) => {}
            // EOF between frames is a normal close.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(()),
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                debug!(peer = %peer, "Closing idle DoT connection");
                return Ok(());
            }
        }

        let frame_len = u16::from_be_bytes(len_buf) as usize;
        if frame_len == 0 || frame_len > MAX_FRAME_SIZE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid DoT frame length {}", frame_len),
            ));
        }

        let mut query = vec![0u8; frame_len];
        stream.read_exact(&mut query).await?;

        let Some(response) = handle_wire_query(pipeline, &query).await else {
            continue;
        };

        let mut framed = Vec::with_capacity(2 + response.len());
        framed.extend_from_slice(&(response.len() as u16).to_be_bytes());
        framed.extend_from_slice(&response);
        stream.write_all(&framed).await?;
        debug!(peer = %peer, bytes = response.len(), "DoT response sent");
    }
}
