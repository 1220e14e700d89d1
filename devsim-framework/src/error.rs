//! Error types for the simulator.

use thiserror::Error;

/// Result type alias using [`SimulatorError`].
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Category of a [`SimulatorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or missing configuration; nothing was attempted.
    Configuration,
    /// The session to the ingestion endpoint could not be established.
    Connection,
    /// A single telemetry message could not be delivered.
    Send,
}

/// Errors that can occur while running the simulator.
#[derive(Error, Debug)]
pub enum SimulatorError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Send error for one message.
    #[error("Telemetry send error (message {message_id}): {reason}")]
    Send { message_id: String, reason: String },
}

impl SimulatorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a send error for a message.
    pub fn send(message_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::Send {
            message_id: message_id.into(),
            reason: reason.to_string(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Send { .. } => ErrorKind::Send,
        }
    }
}
