//! Shared fixtures: a scripted upstream server and a fully wired pipeline.

use hickory_proto::op::{Header, Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use phantom_dns_application::ports::{BlockFilterEnginePort, ResponseCachePort, UpstreamResolver};
use phantom_dns_application::QueryPipeline;
use phantom_dns_domain::config::BlockingConfig;
use phantom_dns_infrastructure::dns::{BlockFilterEngine, ForwardingResolver, ResponseCache};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// In-process upstream DNS server answering every A query with a fixed
/// address and the configured TTL. Counts the queries it serves.
pub struct MockUpstream {
    pub addr: SocketAddr,
    queries: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub async fn start(ttl: u32) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                let Ok(request) = Message::from_vec(&buf[..len]) else {
                    continue;
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut header = Header::new();
                header.set_id(request.id());
                header.set_message_type(MessageType::Response);
                header.set_op_code(OpCode::Query);
                header.set_response_code(ResponseCode::NoError);
                header.set_recursion_available(true);

                let mut response = Message::new();
                response.set_header(header);
                if let Some(q) = request.queries().first() {
                    response.add_query(q.clone());
                    response.add_answer(Record::from_rdata(
                        q.name().clone(),
                        ttl,
                        RData::A(A::new(192, 0, 2, 53)),
                    ));
                }

                if let Ok(bytes) = response.to_vec() {
                    let _ = socket.send_to(&bytes, peer).await;
                }
            }
        });

        Self { addr, queries }
    }

    pub fn queries_served(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

/// Build a recursive A query as a client would send it.
pub fn a_query(id: u16, domain: &str) -> Message {
    use hickory_proto::op::Query;
    use hickory_proto::rr::{Name, RecordType};

    let mut message = Message::new();
    message.set_id(id);
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(
        Name::from_ascii(domain).unwrap(),
        RecordType::A,
    ));
    message
}

/// Wire the real adapters into a pipeline pointed at `upstream`, with a
/// short cache TTL floor so expiry is testable.
pub fn build_pipeline(
    upstream: SocketAddr,
    blocked: &[&str],
    ttl_floor: Duration,
) -> Arc<QueryPipeline> {
    let blocking = BlockingConfig {
        enabled: true,
        sources: vec![],
        custom_blocked: blocked.iter().map(|d| d.to_string()).collect(),
        allowlist: vec![],
        refresh_interval_secs: 86_400,
    };

    let block_filter: Arc<dyn BlockFilterEnginePort> =
        Arc::new(BlockFilterEngine::new(&blocking).unwrap());
    let cache: Arc<dyn ResponseCachePort> = Arc::new(ResponseCache::new(
        1000,
        ttl_floor,
        Duration::from_secs(3600),
    ));
    let resolver: Arc<dyn UpstreamResolver> = Arc::new(ForwardingResolver::new(
        upstream,
        Duration::from_millis(500),
    ));

    Arc::new(QueryPipeline::new(block_filter, cache, resolver))
}
