//! Error types for the question gateway

use thiserror::Error;

/// Gateway error
///
/// Cloneable so one failed fetch can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The API could not be reached (connect failure, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("Server returned status {status}: {message}")]
    Server { status: u16, message: String },

    /// The payload did not have the expected shape
    #[error("Invalid response: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Whether the failure happened before any server response arrived
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
