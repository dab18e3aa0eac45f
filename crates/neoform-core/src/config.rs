//! Layered configuration for neoform services and tools.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`NEOFORM__` prefix, `__` between sections)
//! 2. Config file (`neoform.toml` by default)
//! 3. Defaults supplied by each section type

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Environment variable prefix for all neoform settings.
pub const ENV_PREFIX: &str = "NEOFORM";

/// Load the layered settings for a config file prefix (e.g. `neoform`).
///
/// A missing file is not an error.
pub fn load_settings(file_prefix: &str) -> Result<config::Config> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    Ok(cfg)
}

/// Read one section, falling back to its defaults when absent or invalid.
pub fn section<T: DeserializeOwned + Default>(cfg: &config::Config, name: &str) -> T {
    match cfg.get::<T>(name) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(section = name, error = %e, "Using default configuration");
            T::default()
        }
    }
}
