//! Self-signed certificate provisioning for the encrypted listeners.
//!
//! When the configured certificate or key file is missing, a fresh
//! self-signed pair is generated and written out so DoT/DoH can come up on
//! a bare host. Operators with real certificates just point the config at
//! them and this module never writes anything.

use std::path::Path;
use tracing::{info, warn};

/// Make sure `cert_file` and `key_file` exist, generating a self-signed
/// pair when either is missing. Returns true when a new pair was written.
pub fn ensure_certificate(cert_file: &str, key_file: &str) -> Result<bool, std::io::Error> {
    if Path::new(cert_file).exists() && Path::new(key_file).exists() {
        return Ok(false);
    }

    warn!(
        cert_file = %cert_file,
        key_file = %key_file,
        "TLS material missing, generating self-signed certificate"
    );

    let certified = rcgen::generate_simple_self_signed(vec![
        "localhost".to_string(),
        "phantom-dns.local".to_string(),
    ])
    .map_err(|e| std::io::Error::other(format!("certificate generation failed: {}", e)))?;

    std::fs::write(cert_file, certified.cert.pem())?;
    std::fs::write(key_file, certified.key_pair.serialize_pem())?;

    info!(cert_file = %cert_file, "Self-signed certificate written");
    Ok(true)
}
