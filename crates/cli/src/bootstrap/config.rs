use anyhow::Context;
use phantom_dns_domain::{CliOverrides, Config};

/// Load and validate the configuration, applying CLI overrides.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
