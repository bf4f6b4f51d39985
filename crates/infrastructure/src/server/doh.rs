//! DNS-over-HTTPS endpoint (RFC 8484).
//!
//! `GET /dns-query?dns=<base64url>` and `POST /dns-query` with an
//! `application/dns-message` body both funnel into the same pipeline as the
//! UDP and DoT listeners.

use super::handle_wire_query;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use phantom_dns_application::QueryPipeline;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

#[derive(Deserialize)]
pub struct DnsQueryParams {
    /// Base64url-encoded (unpadded) wire-format DNS query.
    dns: String,
}

pub fn router(pipeline: Arc<QueryPipeline>) -> Router {
    Router::new()
        .route("/dns-query", get(handle_get).post(handle_post))
        .with_state(pipeline)
}

/// Serve the router over HTTPS until `shutdown` fires.
pub async fn serve(
    addr: SocketAddr,
    cert_file: &str,
    key_file: &str,
    pipeline: Arc<QueryPipeline>,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_file, key_file).await?;
    info!(bind_address = %addr, protocol = "DoH", "DNS listener bound");

    let handle = axum_server::Handle::new();
    let drain = handle.clone();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        info!(protocol = "DoH", "Listener shutting down");
        drain.graceful_shutdown(Some(Duration::from_secs(5)));
    });

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(router(pipeline).into_make_service())
        .await
}

async fn handle_get(
    State(pipeline): State<Arc<QueryPipeline>>,
    Query(params): Query<DnsQueryParams>,
) -> Response {
    let query = match URL_SAFE_NO_PAD.decode(params.dns.as_bytes()) {
        Ok(query) => query,
        Err(e) => {
            debug!(error = %e, "Rejecting DoH GET with undecodable dns parameter");
            return (StatusCode::BAD_REQUEST, "invalid dns parameter").into_response();
        }
    };

    respond(&pipeline, &query).await
}

async fn handle_post(
    State(pipeline): State<Arc<QueryPipeline>>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type != DNS_MESSAGE_CONTENT_TYPE {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("expected {}", DNS_MESSAGE_CONTENT_TYPE),
        )
            .into_response();
    }

    respond(&pipeline, &body).await
}

async fn respond(pipeline: &QueryPipeline, query: &[u8]) -> Response {
    match handle_wire_query(pipeline, query).await {
        Some(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)],
            bytes,
        )
            .into_response(),
        None => (StatusCode::BAD_REQUEST, "invalid DNS message").into_response(),
    }
}
