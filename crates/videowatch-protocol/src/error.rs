//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors produced while addressing the endpoint or decoding frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Inbound frame exceeds the maximum allowed size.
    #[error("snapshot too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// Inbound frame is not valid JSON.
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// Empty text frame received.
    #[error("empty frame")]
    EmptyMessage,

    /// Host and port do not form a valid WebSocket URL.
    #[error("invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}
