//! Error types for the LLM crate

/// Errors that can occur during generation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Worker was cancelled
    #[error("Task cancelled: {0}")]
    Cancelled(String),

    /// A message is still waiting for its reply
    #[error("A request is already in flight for this conversation")]
    RequestInFlight,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel send/receive error
    #[error("Channel error: {0}")]
    Channel(String),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid configuration or generation parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The backend returned an unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio::sync::oneshot::error::RecvError> for Error {
    fn from(err: tokio::sync::oneshot::error::RecvError) -> Self {
        Error::Channel(format!("Receive error: {}", err))
    }
}

#[cfg(feature = "ollama")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::UnexpectedFormat(err.to_string())
        } else {
            Error::Backend(err.to_string())
        }
    }
}
