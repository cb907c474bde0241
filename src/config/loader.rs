//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{defaults, paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    pub fn load() -> Result<Config> {
        Self::load_from(&paths::root_config_path())
    }

    /// Load configuration using `path` as the root config file
    pub fn load_from(path: &Path) -> Result<Config> {
        // Keys missing from the file take their serde defaults
        let config = if path.exists() {
            Self::load_file(path)?
        } else {
            Self::load_defaults()
        };

        let config = Self::apply_env_overrides(config, |key| std::env::var(key).ok());
        Self::check(&config)?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration by loading and checking for errors
    pub fn validate() -> Result<()> {
        let root_path = paths::root_config_path();
        if root_path.exists() {
            let config = Self::load_file(&root_path)?;
            Self::check(&config)
                .with_context(|| format!("Invalid config file: {}", root_path.display()))?;
        }

        let _ = Self::load().context("Failed to load merged configuration")?;
        Ok(())
    }

    /// Semantic checks serde cannot express
    fn check(config: &Config) -> Result<()> {
        if config.discovery.concurrency == 0 {
            anyhow::bail!("discovery.concurrency must be at least 1");
        }
        if config.default_namespace.is_empty() {
            anyhow::bail!("defaultNamespace must not be empty");
        }
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Apply environment variable overrides
    ///
    /// `lookup` resolves a variable name to its value.
    fn apply_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
        // KUBEDEPS_DEFAULT_NAMESPACE override
        if let Some(namespace) = lookup("KUBEDEPS_DEFAULT_NAMESPACE") {
            config.default_namespace = namespace;
        }

        // KUBEDEPS_OUTPUT override
        if let Some(format) = lookup("KUBEDEPS_OUTPUT") {
            match format.parse() {
                Ok(format) => config.output.format = format,
                Err(e) => tracing::warn!("Ignoring KUBEDEPS_OUTPUT: {}", e),
            }
        }

        // KUBEDEPS_CONCURRENCY override
        if let Some(concurrency) = lookup("KUBEDEPS_CONCURRENCY") {
            match concurrency.parse() {
                Ok(val) => config.discovery.concurrency = val,
                Err(e) => tracing::warn!("Ignoring KUBEDEPS_CONCURRENCY: {}", e),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
