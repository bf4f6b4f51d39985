/// Canonical form for domain names used across the query path and the
/// blocklist: ASCII lowercase with a trailing dot.
///
/// Wire-format names arrive fully qualified (`example.com.`) while blocklist
/// sources usually omit the dot; both sides go through here so lookups agree.
pub fn normalize_domain(domain: &str) -> String {
    let trimmed = domain.trim().trim_start_matches('.');
    let mut normalized = trimmed.to_ascii_lowercase();
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}

/// Cheap sanity check for names coming from blocklist sources.
pub fn is_plausible_domain(domain: &str) -> bool {
    let name = domain.trim_end_matches('.');
    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}
