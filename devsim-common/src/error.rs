use thiserror::Error;

/// Common error type for the device simulator building blocks.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid connection string: {0}")]
    ConnectionString(String),

    #[error("Zenoh error: {0}")]
    Zenoh(#[from] zenoh::Error),

    #[error("Timed out after {0} ms waiting for Zenoh session")]
    Timeout(u64),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key expression: {0}")]
    KeyExpr(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
