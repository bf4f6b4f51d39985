//! End-to-end resolution behavior against a live in-process upstream:
//! blocking, caching, expiry and upstream accounting.

#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{a_query, build_pipeline, MockUpstream};
use hickory_proto::op::ResponseCode;
use phantom_dns_application::ResolutionOutcome;
use std::time::Duration;

#[tokio::test]
async fn blocked_domain_gets_nxdomain_and_upstream_stays_quiet() {
    let upstream = MockUpstream::start(300).await;
    let pipeline = build_pipeline(
        upstream.addr,
        &["ads.example.com"],
        Duration::from_millis(100),
    );

    let resolution = pipeline.resolve(&a_query(1, "ads.example.com.")).await;

    assert_eq!(resolution.outcome, ResolutionOutcome::Blocked);
    assert_eq!(resolution.message.response_code(), ResponseCode::NXDomain);
    assert_eq!(upstream.queries_served(), 0);
}

#[tokio::test]
async fn repeat_queries_within_ttl_hit_the_cache() {
    let upstream = MockUpstream::start(300).await;
    let pipeline = build_pipeline(upstream.addr, &[], Duration::from_millis(100));

    let first = pipeline.resolve(&a_query(10, "example.com.")).await;
    assert_eq!(first.outcome, ResolutionOutcome::Forwarded);
    assert_eq!(first.message.answers().len(), 1);

    for id in 11..15 {
        let repeat = pipeline.resolve(&a_query(id, "example.com.")).await;
        assert_eq!(repeat.outcome, ResolutionOutcome::CacheHit);
        assert_eq!(repeat.message.id(), id);
    }

    assert_eq!(upstream.queries_served(), 1);
}

#[tokio::test]
async fn expired_entries_trigger_exactly_one_refetch() {
    // TTL 0 clamps to the 100ms cache floor.
    let upstream = MockUpstream::start(0).await;
    let pipeline = build_pipeline(upstream.addr, &[], Duration::from_millis(100));

    let first = pipeline.resolve(&a_query(1, "example.com.")).await;
    assert_eq!(first.outcome, ResolutionOutcome::Forwarded);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let second = pipeline.resolve(&a_query(2, "example.com.")).await;
    assert_eq!(second.outcome, ResolutionOutcome::Forwarded);
    assert_eq!(upstream.queries_served(), 2);
}

#[tokio::test]
async fn concurrent_identical_queries_never_exceed_one_upstream_call_each() {
    let upstream = MockUpstream::start(300).await;
    let pipeline = build_pipeline(upstream.addr, &[], Duration::from_millis(100));

    let mut handles = Vec::new();
    for id in 0..16u16 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            pipeline.resolve(&a_query(id, "example.com.")).await
        }));
    }

    for handle in handles {
        let resolution = handle.await.unwrap();
        assert_eq!(resolution.message.answers().len(), 1);
    }

    // Racing misses may each go upstream, but never more than one per query.
    let served = upstream.queries_served();
    assert!(served >= 1 && served <= 16, "served {}", served);
}

#[tokio::test]
async fn unreachable_upstream_yields_servfail() {
    // Reserve a port with no server behind it.
    let dead = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();

    let pipeline = build_pipeline(dead_addr, &[], Duration::from_millis(100));
    let resolution = pipeline.resolve(&a_query(7, "example.com.")).await;

    assert_eq!(resolution.outcome, ResolutionOutcome::UpstreamFailure);
    assert_eq!(resolution.message.response_code(), ResponseCode::ServFail);
}
