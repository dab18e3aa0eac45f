//! Configuration for the neoform command-line tool.

use serde::Deserialize;

use neoform_graph::GraphConfig;

/// Settings from the `[cli]` section or `NEOFORM__CLI__` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Default schema file used when `--schema` is not given.
    #[serde(default)]
    pub schema: Option<String>,

    /// Default node label for `create` and `find`.
    #[serde(default = "default_label")]
    pub label: String,

    /// Maximum rows returned by `find`.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_label() -> String {
    "Node".to_string()
}

fn default_limit() -> u32 {
    100
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema: None,
            label: default_label(),
            limit: default_limit(),
        }
    }
}

/// Load both sections the tool needs from one config file prefix.
pub fn load(file_prefix: &str) -> neoform_core::Result<(CliConfig, GraphConfig)> {
    let cfg = neoform_core::config::load_settings(file_prefix)?;
    let cli = neoform_core::config::section::<CliConfig>(&cfg, "cli");
    let graph = neoform_core::config::section::<GraphConfig>(&cfg, "neo4j");
    Ok((cli, graph))
}
