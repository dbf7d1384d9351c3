//! CLI, connection lifecycle, watch loop
//!
//! This crate provides the `videowatch` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod watch;

pub use cli::Cli;
pub use config::ClientConfig;
pub use connection::StatusClient;
pub use error::{ClientError, ClientResult};
pub use watch::{CONNECTION_LOST_NOTICE, ReconnectPolicy, WatchOptions, Watcher};
