//! Status endpoint addressing.

use url::Url;

use crate::STATUS_PATH;
use crate::error::{ProtocolError, ProtocolResult};

/// Network location of a status endpoint.
///
/// Host and port are fixed at construction and stay immutable for the life
/// of the client holding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Default status port (the server exposes the status endpoint on 80).
    pub const DEFAULT_PORT: u16 = 80;

    /// Creates an endpoint for the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Builds the WebSocket URL of the status endpoint.
    ///
    /// Bare IPv6 hosts are bracketed before URL assembly.
    pub fn url(&self) -> ProtocolResult<Url> {
        let authority = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let raw = format!("ws://{}:{}{}", authority, self.port, STATUS_PATH);
        Url::parse(&raw).map_err(|source| ProtocolError::InvalidEndpoint {
            endpoint: raw,
            source,
        })
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
