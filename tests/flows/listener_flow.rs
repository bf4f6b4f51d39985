//! Wire-level flow through the UDP listener: a real client socket sends
//! wire-format queries and reads wire-format answers back.

#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{a_query, build_pipeline, MockUpstream};
use hickory_proto::op::{Message, ResponseCode};
use phantom_dns_infrastructure::server::udp::UdpServer;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

async fn start_listener(
    upstream_addr: std::net::SocketAddr,
    blocked: &[&str],
) -> (std::net::SocketAddr, CancellationToken) {
    let pipeline = build_pipeline(upstream_addr, blocked, Duration::from_millis(100));
    let server = UdpServer::bind("127.0.0.1:0".parse().unwrap(), pipeline)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    tokio::spawn(server.run(shutdown.clone()));
    (addr, shutdown)
}

async fn exchange(server: std::net::SocketAddr, request: &Message) -> Message {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket
        .send_to(&request.to_vec().unwrap(), server)
        .await
        .unwrap();

    let mut buf = vec![0u8; 4096];
    let (len, _) = tokio::time::timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
        .await
        .expect("listener did not answer")
        .unwrap();
    Message::from_vec(&buf[..len]).unwrap()
}

#[tokio::test]
async fn resolves_over_the_udp_listener() {
    let upstream = MockUpstream::start(300).await;
    let (server, shutdown) = start_listener(upstream.addr, &[]).await;

    let response = exchange(server, &a_query(0x1111, "example.com.")).await;
    assert_eq!(response.id(), 0x1111);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 1);

    shutdown.cancel();
}

#[tokio::test]
async fn blocks_over_the_udp_listener() {
    let upstream = MockUpstream::start(300).await;
    let (server, shutdown) = start_listener(upstream.addr, &["ads.example.com"]).await;

    let response = exchange(server, &a_query(0x2222, "ads.example.com.")).await;
    assert_eq!(response.id(), 0x2222);
    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());
    assert_eq!(upstream.queries_served(), 0);

    shutdown.cancel();
}

#[tokio::test]
async fn garbage_payload_gets_a_formerr_with_the_same_id() {
    let upstream = MockUpstream::start(300).await;
    let (server, shutdown) = start_listener(upstream.addr, &[]).await;

    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    // Valid header ID, hopeless remainder.
    socket
        .send_to(&[0xde, 0xad, 0xff, 0xff, 0xff, 0xff], server)
        .await
        .unwrap();

    let mut buf = vec![0u8; 512];
    let (len, _) = tokio::time::timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
        .await
        .expect("listener did not answer")
        .unwrap();

    let response = Message::from_vec(&buf[..len]).unwrap();
    assert_eq!(response.id(), 0xdead);
    assert_eq!(response.response_code(), ResponseCode::FormErr);

    shutdown.cancel();
}

#[tokio::test]
async fn listener_shares_one_cache_across_clients() {
    let upstream = MockUpstream::start(300).await;
    let (server, shutdown) = start_listener(upstream.addr, &[]).await;

    for id in 1..=3u16 {
        let response = exchange(server, &a_query(id, "shared.example.com.")).await;
        assert_eq!(response.id(), id);
        assert_eq!(response.answers().len(), 1);
    }

    assert_eq!(upstream.queries_served(), 1);
    shutdown.cancel();
}
