pub mod self_signed;
pub mod tls_material;

pub use self_signed::ensure_certificate;
pub use tls_material::load_server_config;
