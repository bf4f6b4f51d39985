use phantom_dns_domain::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_env_filter(filter)
        .init();

    info!(level = %config.logging.level, "Logging initialized");
}
