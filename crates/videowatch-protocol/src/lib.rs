//! Wire protocol for the videowatch status endpoint.
//!
//! The status endpoint speaks a deliberately small protocol over a single
//! WebSocket connection:
//!
//! - The client connects to `ws://{host}:{port}/ts3video-websocket`.
//! - The only outbound payload is the literal text command `"/status"`.
//! - Every inbound text frame carries one JSON-encoded status snapshot.
//!
//! There is no envelope, no versioning and no request correlation; the
//! WebSocket frame boundaries are the framing.
//!
//! # Example
//!
//! ```rust
//! use videowatch_protocol::{Command, Endpoint, decode_snapshot};
//!
//! let endpoint = Endpoint::new("127.0.0.1", 8080);
//! let url = endpoint.url().unwrap();
//! assert_eq!(url.as_str(), "ws://127.0.0.1:8080/ts3video-websocket");
//!
//! assert_eq!(Command::Status.as_str(), "/status");
//!
//! let snapshot = decode_snapshot(r#"{"clientsInfo":{"count":3}}"#).unwrap();
//! assert!(snapshot.get("clientsInfo").is_some());
//! ```

mod command;
mod endpoint;
mod error;
mod frame;

pub use command::Command;
pub use endpoint::Endpoint;
pub use error::{ProtocolError, ProtocolResult};
pub use frame::decode_snapshot;

/// WebSocket path of the status endpoint.
pub const STATUS_PATH: &str = "/ts3video-websocket";

/// Maximum accepted snapshot frame size (1 MB).
pub const MAX_SNAPSHOT_SIZE: usize = 1024 * 1024;
