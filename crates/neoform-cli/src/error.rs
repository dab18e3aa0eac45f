//! Error types for the neoform-cli crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Schema error: {0}")]
    Schema(#[from] neoform_core::NeoformError),

    #[error("Graph error: {0}")]
    Graph(#[from] neoform_graph::GraphError),

    #[error("No schema given: pass --schema or set cli.schema in config")]
    NoSchema,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode output: {0}")]
    Output(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
