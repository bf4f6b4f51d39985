//! PhantomDNS: a filtering, caching DNS forwarder.
//!
//! Queries arrive over UDP, DoT or DoH, get checked against the blocklist,
//! served from the response cache when possible and forwarded to a single
//! upstream otherwise.

mod bootstrap;
mod di;
mod server;

use clap::Parser;
use phantom_dns_domain::CliOverrides;
use phantom_dns_jobs::{BlocklistSyncJob, CacheSweepJob, JobRunner};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "phantom-dns")]
#[command(version)]
#[command(about = "Filtering, caching DNS forwarder with UDP, DoT and DoH listeners")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Bind address for all listeners
    #[arg(short, long)]
    bind: Option<String>,

    /// UDP listener port
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream DNS server as host:port
    #[arg(short, long)]
    upstream: Option<String>,

    /// Fetch blocklist sources once, report the count, and exit
    #[arg(long)]
    update_blocklists: bool,

    /// Print the resolved configuration and blocklist count, then exit
    #[arg(long)]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::config::load_config(
        cli.config.as_deref(),
        CliOverrides {
            bind_address: cli.bind,
            udp_port: cli.port,
            upstream: cli.upstream,
        },
    )?;

    bootstrap::logging::init_logging(&config);

    let services = di::Services::build(&config)?;

    if cli.update_blocklists {
        let count = services.block_filter.reload().await?;
        info!(blocked_domains = count, "Blocklist update complete");
        return Ok(());
    }

    if cli.status {
        print_status(&config, services.block_filter.as_ref()).await;
        return Ok(());
    }

    info!(
        upstream = %config.dns.upstream,
        blocking_enabled = config.blocking.enabled,
        "Starting PhantomDNS"
    );

    let shutdown = CancellationToken::new();

    JobRunner::new()
        .with_blocklist_sync(
            BlocklistSyncJob::new(services.block_filter.clone())
                .with_interval(config.blocking.refresh_interval_secs)
                .with_cancellation(shutdown.clone()),
        )
        .with_cache_sweep(
            CacheSweepJob::new(services.cache.clone())
                .with_interval(config.dns.cache_sweep_interval_secs)
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    server::start_listeners(&config, services.pipeline.clone(), shutdown.clone()).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    shutdown.cancel();

    Ok(())
}

/// One-shot status report: the resolved configuration plus the blocklist
/// count after fetching the configured sources.
async fn print_status(
    config: &phantom_dns_domain::Config,
    block_filter: &dyn phantom_dns_application::ports::BlockFilterEnginePort,
) {
    if let Err(e) = block_filter.reload().await {
        tracing::warn!(error = %e, "Blocklist fetch failed, count reflects manual entries only");
    }

    println!("bind_address        {}", config.server.bind_address);
    println!("udp_port            {}", config.server.udp_port);
    println!("dot_port            {}", config.server.dot_port);
    println!("doh_port            {}", config.server.doh_port);
    println!("upstream            {}", config.dns.upstream);
    println!("query_timeout_ms    {}", config.dns.query_timeout_ms);
    println!("cache_max_cost      {}", config.dns.cache_max_cost);
    println!("blocking_enabled    {}", config.blocking.enabled);
    println!("blocklist_sources   {}", config.blocking.sources.len());
    println!("blocked_domains     {}", block_filter.blocked_count());
}
