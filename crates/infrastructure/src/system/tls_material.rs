use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::io::BufReader;

/// Load a PEM certificate chain and private key into a rustls server config
/// suitable for the DoT acceptor.
pub fn load_server_config(
    cert_file: &str,
    key_file: &str,
) -> Result<rustls::ServerConfig, std::io::Error> {
    let certs: Vec<CertificateDer<'static>> = {
        let mut reader = BufReader::new(std::fs::File::open(cert_file)?);
        rustls_pemfile::certs(&mut reader).collect::<Result<Vec<_>, _>>()?
    };
    if certs.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("no certificates found in {}", cert_file),
        ));
    }

    let key: PrivateKeyDer<'static> = {
        let mut reader = BufReader::new(std::fs::File::open(key_file)?);
        rustls_pemfile::private_key(&mut reader)?.ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("no private key found in {}", key_file),
            )
        })?
    };

    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
}
