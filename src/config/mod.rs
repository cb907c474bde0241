//! Configuration system for kubedeps
//!
//! Settings are layered: built-in defaults, then the root config file, then
//! `KUBEDEPS_*` environment variables.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, DiscoveryConfig, LoggerConfig, OutputConfig};

/// Keys accepted by `config get` and `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "defaultNamespace",
    "output.format",
    "discovery.concurrency",
    "discovery.skipUnsupported",
    "logger.level",
    "logger.file",
];

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "output.format" => Ok(config.output.format.to_string()),
        "discovery.concurrency" => Ok(config.discovery.concurrency.to_string()),
        "discovery.skipUnsupported" => Ok(config.discovery.skip_unsupported.to_string()),
        "logger.level" => Ok(config.logger.level.clone()),
        "logger.file" => Ok(config
            .logger
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "defaultNamespace" => {
            if value.is_empty() {
                anyhow::bail!("defaultNamespace must not be empty");
            }
            config.default_namespace = value.to_string();
        }
        "output.format" => {
            config.output.format = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        "discovery.concurrency" => {
            let concurrency: usize = value
                .parse()
                .context("discovery.concurrency must be a number")?;
            if concurrency == 0 {
                anyhow::bail!("discovery.concurrency must be at least 1");
            }
            config.discovery.concurrency = concurrency;
        }
        "discovery.skipUnsupported" => {
            config.discovery.skip_unsupported = value
                .parse()
                .context("discovery.skipUnsupported must be 'true' or 'false'")?;
        }
        "logger.level" => {
            tracing_subscriber::EnvFilter::try_new(value)
                .with_context(|| format!("Invalid log filter: {}", value))?;
            config.logger.level = value.to_string();
        }
        "logger.file" => {
            config.logger.file = if value.is_empty() {
                None
            } else {
                Some(value.into())
            };
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
