use thiserror::Error;

/// Errors raised while validating, marshalling, or decoding properties.
#[derive(Error, Debug)]
pub enum NeoformError {
    #[error("Type mismatch: expected {key} to be {expected} but received {actual}.")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Malformed record: {keys} keys but {fields} fields")]
    MalformedRecord { keys: usize, fields: usize },

    #[error("Missing required property: {key}")]
    MissingRequired { key: String },

    #[error("Unknown property: {key} is not declared in the schema")]
    UnknownProperty { key: String },

    #[error("Invalid value for {key}: {value} is not one of the allowed values")]
    NotInEnum { key: String, value: String },

    #[error("Invalid value for {key}: does not match pattern {pattern}")]
    PatternMismatch { key: String, pattern: String },

    #[error("Invalid pattern for {key}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown schema type: {0}")]
    UnknownType(String),

    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for NeoformError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NeoformError>;
