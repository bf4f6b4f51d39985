//! The query-resolution pipeline shared by all transports.
//!
//! Every listener decodes wire bytes into a `Message`, hands it here, and
//! encodes whatever comes back. The pipeline walks a fixed sequence —
//! block check, cache check, upstream forward — and never touches a
//! transport itself.

use crate::ports::{BlockFilterEnginePort, ResponseCachePort, UpstreamResolver};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use phantom_dns_domain::{CacheKey, DnsQuery, RecordClass, RecordType};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a query was answered. Only `Forwarded` writes through to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Blocked,
    CacheHit,
    Forwarded,
    UpstreamFailure,
    Malformed,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::CacheHit => "cache_hit",
            Self::Forwarded => "forwarded",
            Self::UpstreamFailure => "upstream_failure",
            Self::Malformed => "malformed",
        }
    }
}

/// A fully-formed response message plus the outcome that produced it.
#[derive(Debug)]
pub struct Resolution {
    pub message: Message,
    pub outcome: ResolutionOutcome,
}

pub struct QueryPipeline {
    block_filter: Arc<dyn BlockFilterEnginePort>,
    cache: Arc<dyn ResponseCachePort>,
    upstream: Arc<dyn UpstreamResolver>,
}

impl QueryPipeline {
    pub fn new(
        block_filter: Arc<dyn BlockFilterEnginePort>,
        cache: Arc<dyn ResponseCachePort>,
        upstream: Arc<dyn UpstreamResolver>,
    ) -> Self {
        Self {
            block_filter,
            cache,
            upstream,
        }
    }

    /// Resolve one decoded request into a response message.
    ///
    /// The returned message always carries the request's transaction ID; the
    /// caller only re-encodes and writes it.
    pub async fn resolve(&self, request: &Message) -> Resolution {
        // A request without a question is a protocol error; it never reaches
        // the blocklist, cache or upstream.
        let Some(question) = request.queries().first() else {
            debug!(id = request.id(), "Request has no question section");
            return Resolution {
                message: error_response(request, ResponseCode::FormErr),
                outcome: ResolutionOutcome::Malformed,
            };
        };

        let query = DnsQuery::new(
            &question.name().to_string(),
            RecordType::from_u16(u16::from(question.query_type())),
            RecordClass::from_u16(u16::from(question.query_class())),
        );

        if self.block_filter.is_blocked(&query.domain) {
            debug!(domain = %query.domain, "Query blocked");
            return Resolution {
                message: error_response(request, ResponseCode::NXDomain),
                outcome: ResolutionOutcome::Blocked,
            };
        }

        let key = CacheKey::from(&query);
        if let Some(mut cached) = self.cache.get(&key) {
            debug!(
                domain = %query.domain,
                record_type = %query.record_type,
                "Cache HIT"
            );
            cached.set_id(request.id());
            return Resolution {
                message: cached,
                outcome: ResolutionOutcome::CacheHit,
            };
        }

        debug!(
            domain = %query.domain,
            record_type = %query.record_type,
            "Cache MISS, forwarding upstream"
        );

        match self.upstream.resolve(&query).await {
            Ok(answer) => {
                // Entry-count cost, mirroring the admission weight the cache
                // bound is configured in.
                self.cache.put(key, &answer, 1);

                let mut message = answer;
                message.set_id(request.id());
                Resolution {
                    message,
                    outcome: ResolutionOutcome::Forwarded,
                }
            }
            Err(e) => {
                warn!(domain = %query.domain, error = %e, "Upstream query failed");
                Resolution {
                    message: error_response(request, ResponseCode::ServFail),
                    outcome: ResolutionOutcome::UpstreamFailure,
                }
            }
        }
    }
}

/// Build a header-plus-question response carrying `code`.
fn error_response(request: &Message, code: ResponseCode) -> Message {
    let mut response = Message::new();
    response.set_id(request.id());
    response.set_message_type(MessageType::Response);
    response.set_op_code(OpCode::Query);
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    response.set_response_code(code);
    for question in request.queries() {
        response.add_query(question.clone());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{BlockFilterEnginePort, ResponseCachePort, UpstreamResolver};
    use async_trait::async_trait;
    use hickory_proto::op::Query;
    use hickory_proto::rr::rdata::A;
    use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType as WireType};
    use phantom_dns_domain::{validators::normalize_domain, DomainError};
    use std::collections::HashMap;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn request(id: u16, domain: &str, record_type: WireType) -> Message {
        let mut message = Message::new();
        message.set_id(id);
        message.set_message_type(MessageType::Query);
        message.set_op_code(OpCode::Query);
        message.set_recursion_desired(true);
        let mut question = Query::query(Name::from_ascii(domain).unwrap(), record_type);
        question.set_query_class(DNSClass::IN);
        message.add_query(question);
        message
    }

    fn answer(domain: &str, ttl: u32, octets: [u8; 4]) -> Message {
        let name = Name::from_ascii(domain).unwrap();
        let mut message = Message::new();
        message.set_message_type(MessageType::Response);
        message.set_recursion_available(true);
        message.add_query(Query::query(name.clone(), WireType::A));
        message.add_answer(Record::from_rdata(
            name,
            ttl,
            RData::A(A::new(octets[0], octets[1], octets[2], octets[3])),
        ));
        message
    }

    struct SetFilter {
        domains: HashSet<String>,
        checks: AtomicUsize,
    }

    impl SetFilter {
        fn new(domains: &[&str]) -> Self {
            Self {
                domains: domains.iter().map(|d| normalize_domain(d)).collect(),
                checks: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BlockFilterEnginePort for SetFilter {
        fn is_blocked(&self, domain: &str) -> bool {
            self.checks.fetch_add(1, Ordering::Relaxed);
            self.domains.contains(domain)
        }

        fn blocked_count(&self) -> usize {
            self.domains.len()
        }

        async fn reload(&self) -> Result<usize, DomainError> {
            Ok(self.domains.len())
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<CacheKey, Message>>,
        gets: AtomicUsize,
        puts: AtomicUsize,
    }

    impl ResponseCachePort for MemoryCache {
        fn get(&self, key: &CacheKey) -> Option<Message> {
            self.gets.fetch_add(1, Ordering::Relaxed);
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn put(&self, key: CacheKey, response: &Message, _cost_hint: usize) {
            self.puts.fetch_add(1, Ordering::Relaxed);
            self.entries.lock().unwrap().insert(key, response.clone());
        }

        fn purge_expired(&self) -> usize {
            0
        }

        fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }
    }

    struct StaticUpstream {
        response: Option<Message>,
        calls: AtomicUsize,
    }

    impl StaticUpstream {
        fn answering(message: Message) -> Self {
            Self {
                response: Some(message),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UpstreamResolver for StaticUpstream {
        async fn resolve(&self, query: &DnsQuery) -> Result<Message, DomainError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.response
                .clone()
                .ok_or_else(|| DomainError::UpstreamIo(format!("no route to {}", query.domain)))
        }
    }

    fn pipeline(
        filter: SetFilter,
        cache: MemoryCache,
        upstream: StaticUpstream,
    ) -> (
        QueryPipeline,
        Arc<SetFilter>,
        Arc<MemoryCache>,
        Arc<StaticUpstream>,
    ) {
        let filter = Arc::new(filter);
        let cache = Arc::new(cache);
        let upstream = Arc::new(upstream);
        (
            QueryPipeline::new(filter.clone(), cache.clone(), upstream.clone()),
            filter,
            cache,
            upstream,
        )
    }

    #[tokio::test]
    async fn blocked_query_returns_nxdomain_without_upstream_or_cache() {
        let (pipeline, _, cache, upstream) = pipeline(
            SetFilter::new(&["ads.example.com"]),
            MemoryCache::default(),
            StaticUpstream::answering(answer("ads.example.com.", 300, [1, 2, 3, 4])),
        );

        let resolution = pipeline
            .resolve(&request(0x1234, "ads.example.com.", WireType::A))
            .await;

        assert_eq!(resolution.outcome, ResolutionOutcome::Blocked);
        assert_eq!(resolution.message.response_code(), ResponseCode::NXDomain);
        assert_eq!(resolution.message.id(), 0x1234);
        assert_eq!(upstream.calls.load(Ordering::Relaxed), 0);
        assert_eq!(cache.gets.load(Ordering::Relaxed), 0);
        assert_eq!(cache.puts.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn blocking_is_case_insensitive() {
        let (pipeline, _, _, upstream) = pipeline(
            SetFilter::new(&["ads.example.com"]),
            MemoryCache::default(),
            StaticUpstream::answering(answer("ads.example.com.", 300, [1, 2, 3, 4])),
        );

        let resolution = pipeline
            .resolve(&request(7, "ADS.Example.Com.", WireType::A))
            .await;

        assert_eq!(resolution.outcome, ResolutionOutcome::Blocked);
        assert_eq!(upstream.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn zero_question_request_is_a_format_error() {
        let (pipeline, filter, cache, upstream) = pipeline(
            SetFilter::new(&[]),
            MemoryCache::default(),
            StaticUpstream::answering(answer("example.com.", 300, [1, 2, 3, 4])),
        );

        let mut empty = Message::new();
        empty.set_id(9);
        empty.set_message_type(MessageType::Query);

        let resolution = pipeline.resolve(&empty).await;

        assert_eq!(resolution.outcome, ResolutionOutcome::Malformed);
        assert_eq!(resolution.message.response_code(), ResponseCode::FormErr);
        assert_eq!(resolution.message.id(), 9);
        assert_eq!(filter.checks.load(Ordering::Relaxed), 0);
        assert_eq!(cache.gets.load(Ordering::Relaxed), 0);
        assert_eq!(upstream.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn forwarded_answer_is_cached_and_reused() {
        let (pipeline, _, cache, upstream) = pipeline(
            SetFilter::new(&[]),
            MemoryCache::default(),
            StaticUpstream::answering(answer("example.com.", 300, [93, 184, 216, 34])),
        );

        let first = pipeline
            .resolve(&request(0x0a0a, "example.com.", WireType::A))
            .await;
        assert_eq!(first.outcome, ResolutionOutcome::Forwarded);
        assert_eq!(first.message.id(), 0x0a0a);
        assert_eq!(cache.puts.load(Ordering::Relaxed), 1);

        let second = pipeline
            .resolve(&request(0x0b0b, "example.com.", WireType::A))
            .await;
        assert_eq!(second.outcome, ResolutionOutcome::CacheHit);
        // Same answer data, only the transaction ID substituted.
        assert_eq!(second.message.id(), 0x0b0b);
        assert_eq!(second.message.answers(), first.message.answers());
        assert_eq!(upstream.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn cache_entries_are_keyed_by_record_type() {
        let (pipeline, _, _, upstream) = pipeline(
            SetFilter::new(&[]),
            MemoryCache::default(),
            StaticUpstream::answering(answer("example.com.", 300, [93, 184, 216, 34])),
        );

        pipeline
            .resolve(&request(1, "example.com.", WireType::A))
            .await;
        let aaaa = pipeline
            .resolve(&request(2, "example.com.", WireType::AAAA))
            .await;

        // The AAAA query must not be served from the A entry.
        assert_eq!(aaaa.outcome, ResolutionOutcome::Forwarded);
        assert_eq!(upstream.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn transports_share_cache_entries() {
        let (pipeline, _, _, upstream) = pipeline(
            SetFilter::new(&[]),
            MemoryCache::default(),
            StaticUpstream::answering(answer("example.com.", 300, [93, 184, 216, 34])),
        );

        // Same question from "different transports" differs only in ID.
        for id in [10, 20, 30] {
            pipeline
                .resolve(&request(id, "example.com.", WireType::A))
                .await;
        }

        assert_eq!(upstream.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn upstream_failure_returns_servfail_and_skips_cache() {
        let (pipeline, _, cache, upstream) = pipeline(
            SetFilter::new(&[]),
            MemoryCache::default(),
            StaticUpstream::failing(),
        );

        let resolution = pipeline
            .resolve(&request(0xffff, "example.com.", WireType::A))
            .await;

        assert_eq!(resolution.outcome, ResolutionOutcome::UpstreamFailure);
        assert_eq!(resolution.message.response_code(), ResponseCode::ServFail);
        assert_eq!(resolution.message.id(), 0xffff);
        assert_eq!(cache.puts.load(Ordering::Relaxed), 0);
        // Exactly one attempt, no internal retry.
        assert_eq!(upstream.calls.load(Ordering::Relaxed), 1);
    }
}
