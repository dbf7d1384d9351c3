//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Connection to the server failed.
    Connection(String),
    /// Connection attempt timed out.
    Timeout(String),
    /// Protocol/decoding error.
    Protocol(String),
    /// Rendering failed.
    Render(String),
    /// Retry attempts exhausted while reconnecting.
    ConnectionLost { attempts: u32 },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Connection(msg) => write!(f, "connection error: {}", msg),
            Self::Timeout(msg) => write!(f, "timeout: {}", msg),
            Self::Protocol(msg) => write!(f, "protocol error: {}", msg),
            Self::Render(msg) => write!(f, "render error: {}", msg),
            Self::ConnectionLost { attempts } => write!(
                f,
                "server unreachable after {} consecutive attempts, giving up",
                attempts
            ),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<videowatch_protocol::ProtocolError> for ClientError {
    fn from(err: videowatch_protocol::ProtocolError) -> Self {
        Self::Protocol(err.to_string())
    }
}

impl From<videowatch_core::RenderError> for ClientError {
    fn from(err: videowatch_core::RenderError) -> Self {
        Self::Render(err.to_string())
    }
}
