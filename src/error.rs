use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL errors: {}", messages.join(", "))]
    GraphQL { messages: Vec<String> },

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed GraphQL response: {0}")]
    MalformedResponse(String),

    #[error("Failed to deserialize results of operation '{operation}': {source}")]
    Deserialize {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Operation not found in response data: {0}")]
    OperationNotFound(String),

    #[error("Operation index {index} out of range ({len} operations in response)")]
    OperationIndexOutOfRange { index: usize, len: usize },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No endpoint configured. Set GQLR_ENDPOINT env var or add endpoint to ~/.config/gqlr/config.toml"
    )]
    MissingEndpoint,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid variable '{0}': expected name=value with a GraphQL name")]
    InvalidVariable(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
