//! Listener startup. Each transport is spawned independently: a listener
//! that cannot bind logs the failure and the others keep serving.

use phantom_dns_application::QueryPipeline;
use phantom_dns_domain::Config;
use phantom_dns_infrastructure::server::{doh, dot::DotServer, udp::UdpServer};
use phantom_dns_infrastructure::system::{ensure_certificate, load_server_config};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub async fn start_listeners(
    config: &Config,
    pipeline: Arc<QueryPipeline>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let udp_addr = listen_addr(config, config.server.udp_port)?;
    let dot_addr = listen_addr(config, config.server.dot_port)?;
    let doh_addr = listen_addr(config, config.server.doh_port)?;

    match UdpServer::bind(udp_addr, Arc::clone(&pipeline)).await {
        Ok(server) => {
            tokio::spawn(server.run(shutdown.clone()));
        }
        Err(e) => error!(bind_address = %udp_addr, error = %e, "UDP listener failed to bind"),
    }

    // DoT and DoH share the same certificate material, generated on first
    // run when the operator hasn't provided any.
    let tls_ready = match ensure_certificate(&config.tls.cert_file, &config.tls.key_file) {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "TLS provisioning failed, encrypted listeners disabled");
            false
        }
    };

    if tls_ready {
        match load_server_config(&config.tls.cert_file, &config.tls.key_file) {
            Ok(tls_config) => {
                let tls_config = Arc::new(tls_config);
                match DotServer::bind(dot_addr, tls_config, Arc::clone(&pipeline)).await {
                    Ok(server) => {
                        tokio::spawn(server.run(shutdown.clone()));
                    }
                    Err(e) => {
                        error!(bind_address = %dot_addr, error = %e, "DoT listener failed to bind")
                    }
                }
            }
            Err(e) => error!(error = %e, "Failed to load TLS material, DoT disabled"),
        }

        let cert_file = config.tls.cert_file.clone();
        let key_file = config.tls.key_file.clone();
        let doh_shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) =
                doh::serve(doh_addr, &cert_file, &key_file, pipeline, doh_shutdown).await
            {
                error!(bind_address = %doh_addr, error = %e, "DoH listener failed");
            }
        });
    }

    info!("Listeners started");
    Ok(())
}

fn listen_addr(config: &Config, port: u16) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", config.server.bind_address, port)
        .parse()
        .map_err(|_| {
            anyhow::anyhow!(
                "invalid bind address: {}:{}",
                config.server.bind_address,
                port
            )
        })
}
