//! Blocklist source fetching and parsing.
//!
//! Sources come in two common shapes: hosts files (`0.0.0.0 ads.example.com`)
//! and plain domain-per-line lists. Both are accepted; comments and the
//! hosts-file self entries (`localhost` etc.) are dropped.

use phantom_dns_domain::validators::{is_plausible_domain, normalize_domain};
use phantom_dns_domain::DomainError;
use tracing::debug;

/// Multi-label hostnames every hosts file carries that must never be blocked.
/// Single-label entries (localhost, broadcasthost, ip6-*) are already dropped
/// by the FQDN filter below.
const HOSTS_BOILERPLATE: &[&str] = &["localhost.localdomain."];

/// Download one source over HTTP(S) and return its raw body.
pub async fn fetch_source(client: &reqwest::Client, url: &str) -> Result<String, DomainError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DomainError::BlocklistSource(format!("{}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(DomainError::BlocklistSource(format!(
            "{}: HTTP {}",
            url,
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| DomainError::BlocklistSource(format!("{}: {}", url, e)))
}

/// Extract canonicalized domains from a source body.
///
/// For a hosts-file line the domain is the second field; for a plain list it
/// is the first. Anything that does not look like a domain is skipped rather
/// than failing the whole source.
pub fn parse_blocklist(body: &str) -> Vec<String> {
    let mut domains = Vec::new();

    for line in body.lines() {
        let line = match line.split_once('#') {
            Some((before, _)) => before.trim(),
            None => line.trim(),
        };
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let first = match fields.next() {
            Some(f) => f,
            None => continue,
        };

        // Hosts-file lines start with an address field.
        let candidate = if first.parse::<std::net::IpAddr>().is_ok() {
            match fields.next() {
                Some(f) => f,
                None => continue,
            }
        } else {
            first
        };

        let domain = normalize_domain(candidate);
        if !is_plausible_domain(&domain) {
            continue;
        }
        // Single-label hostnames are hosts-file noise, not blockable FQDNs.
        if !domain.trim_end_matches('.').contains('.') {
            continue;
        }
        if HOSTS_BOILERPLATE.contains(&domain.as_str()) {
            continue;
        }

        domains.push(domain);
    }

    debug!(parsed = domains.len(), "Parsed blocklist body");
    domains
}
