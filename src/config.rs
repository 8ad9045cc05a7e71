//! Configuration loading and schema definitions for tierpack.
//!
//! Configuration lives in a TOML file (`tierpack.toml` by default). Every
//! field has a default, so an empty file is a valid configuration.

pub mod schema;

pub use schema::*;

use std::path::Path;

use anyhow::{Context, Result};

/// Loads tierpack configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (e.g., doesn't exist or permission denied)
/// - The file contains invalid TOML syntax
/// - The configuration doesn't match the expected schema
///
/// # Example
///
/// ```no_run
/// use tierpack::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Path::new("tierpack.toml"))?;
/// println!("Max workers: {}", config.scheduler.max_workers);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// Loads tierpack configuration from a TOML string.
///
/// # Example
///
/// ```
/// use tierpack::config::load_config_str;
/// use tierpack::strategy::Strategy;
///
/// let config = load_config_str(r#"
///     [scheduler]
///     max_workers = 8
///     strategy = "fast-fail"
/// "#)?;
///
/// assert_eq!(config.scheduler.max_workers, 8);
/// assert_eq!(config.scheduler.strategy, Strategy::FastFail);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;

    Ok(config)
}
