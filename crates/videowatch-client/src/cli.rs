//! Command-line interface definition.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::Level;

use videowatch_core::{RenderFormat, RenderOptions, TracingConfig};
use videowatch_protocol::Endpoint;

use crate::config::ClientConfig;
use crate::watch::WatchOptions;

/// videowatch - Live status dashboard for a video server
#[derive(Debug, Parser)]
#[command(name = "videowatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server host name or address
    #[arg(env = "VIDEOWATCH_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', env = "VIDEOWATCH_PORT")]
    pub port: Option<u16>,

    /// Path to configuration file
    #[arg(long, short, env = "VIDEOWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Output options ---
    /// Output snapshots as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Clear the screen before each update
    #[arg(long)]
    pub clear_screen: bool,

    // --- Watch options ---
    /// Exit after the first rendered snapshot
    #[arg(long)]
    pub once: bool,

    /// Delay between snapshot updates in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Give up after this many consecutive connection failures (0 = retry forever)
    #[arg(long)]
    pub max_reconnects: Option<u32>,

    /// Connection timeout in seconds
    #[arg(long)]
    pub connect_timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the endpoint to watch, flags taking precedence over config.
    pub fn endpoint(&self, config: &ClientConfig) -> Endpoint {
        let host = self
            .host
            .clone()
            .unwrap_or_else(|| config.connection.host.clone());
        let port = self.port.unwrap_or(config.connection.port);
        Endpoint::new(host, port)
    }

    /// Returns the output format based on CLI flags and config.
    pub fn render_format(&self, config: &ClientConfig) -> RenderFormat {
        if self.json {
            RenderFormat::Json
        } else {
            config.display.format
        }
    }

    /// Returns the render options, flags taking precedence over config.
    pub fn render_options(&self, config: &ClientConfig) -> RenderOptions {
        RenderOptions {
            clear_screen: self.clear_screen || config.display.clear_screen,
            timestamps: config.display.timestamps,
        }
    }

    /// Returns the watch options, flags taking precedence over config.
    pub fn watch_options(&self, config: &ClientConfig) -> WatchOptions {
        let poll_interval = self
            .poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(config.watch.poll_interval_ms));
        let connect_timeout = self
            .connect_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(config.connection.connect_timeout_secs));

        let mut policy = config.watch.to_policy();
        if let Some(max) = self.max_reconnects {
            policy = policy.with_max_failures(max);
        }

        WatchOptions::default()
            .with_poll_interval(poll_interval)
            .with_connect_timeout(connect_timeout)
            .with_reconnect(policy)
            .with_once(self.once)
    }

    /// Returns whether debug output is enabled by flag or config.
    pub fn debug_enabled(&self, config: &ClientConfig) -> bool {
        self.debug || config.debug
    }

    /// Returns the tracing configuration, honoring debug from flag or config.
    pub fn tracing_config(&self, config: &ClientConfig) -> TracingConfig {
        if self.debug_enabled(config) {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::default().with_level(Level::WARN)
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults_resolve_from_config() {
        let cli = parse(&["videowatch"]);
        let config = ClientConfig::default();

        let endpoint = cli.endpoint(&config);
        assert_eq!(endpoint.host(), "127.0.0.1");
        assert_eq!(endpoint.port(), 80);
        assert_eq!(cli.render_format(&config), RenderFormat::Text);

        let options = cli.watch_options(&config);
        assert_eq!(options.poll_interval, Duration::from_millis(1500));
        assert_eq!(options.connect_timeout, Duration::from_secs(5));
        assert_eq!(options.reconnect.max_consecutive_failures, 0);
        assert!(!options.once);
    }

    #[test]
    fn file_values_override_defaults() {
        let cli = parse(&["videowatch"]);
        let mut config = ClientConfig::default();
        config.connection.host = "filehost".to_string();
        config.connection.port = 8443;
        config.display.format = RenderFormat::Json;

        let endpoint = cli.endpoint(&config);
        assert_eq!(endpoint.host(), "filehost");
        assert_eq!(endpoint.port(), 8443);
        assert_eq!(cli.render_format(&config), RenderFormat::Json);
    }

    #[test]
    fn flags_override_file_values() {
        let cli = parse(&[
            "videowatch",
            "video.example.com",
            "--port",
            "9000",
            "--json",
            "--poll-interval-ms",
            "250",
            "--max-reconnects",
            "3",
            "--connect-timeout-secs",
            "1",
            "--once",
        ]);
        let mut config = ClientConfig::default();
        config.connection.host = "filehost".to_string();
        config.connection.port = 1234;
        config.watch.poll_interval_ms = 9999;

        let endpoint = cli.endpoint(&config);
        assert_eq!(endpoint.host(), "video.example.com");
        assert_eq!(endpoint.port(), 9000);
        assert_eq!(cli.render_format(&config), RenderFormat::Json);

        let options = cli.watch_options(&config);
        assert_eq!(options.poll_interval, Duration::from_millis(250));
        assert_eq!(options.connect_timeout, Duration::from_secs(1));
        assert_eq!(options.reconnect.max_consecutive_failures, 3);
        assert!(options.once);
    }

    #[test]
    fn debug_comes_from_flag_or_config() {
        let config = ClientConfig::default();
        assert!(!parse(&["videowatch"]).debug_enabled(&config));
        assert!(parse(&["videowatch", "--debug"]).debug_enabled(&config));

        let mut config = ClientConfig::default();
        config.debug = true;
        assert!(parse(&["videowatch"]).debug_enabled(&config));
    }

    #[test]
    fn debug_in_config_selects_debug_tracing() {
        let config = ClientConfig::default();
        let tracing = parse(&["videowatch"]).tracing_config(&config);
        assert_eq!(tracing.default_level, Level::WARN);

        let tracing = parse(&["videowatch", "--debug"]).tracing_config(&config);
        assert_eq!(tracing.default_level, Level::DEBUG);
        assert!(tracing.include_location);

        let mut config = ClientConfig::default();
        config.debug = true;
        let tracing = parse(&["videowatch"]).tracing_config(&config);
        assert_eq!(tracing.default_level, Level::DEBUG);
    }

    #[test]
    fn clear_screen_comes_from_flag_or_config() {
        let config = ClientConfig::default();
        assert!(!parse(&["videowatch"]).render_options(&config).clear_screen);
        assert!(
            parse(&["videowatch", "--clear-screen"])
                .render_options(&config)
                .clear_screen
        );

        let mut config = ClientConfig::default();
        config.display.clear_screen = true;
        assert!(parse(&["videowatch"]).render_options(&config).clear_screen);
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = parse(&["videowatch", "config", "path"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));

        let cli = parse(&["videowatch", "config", "dump"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Dump
            })
        ));
    }

    #[test]
    fn host_positional_is_optional() {
        let cli = parse(&["videowatch", "10.0.0.5"]);
        assert_eq!(cli.host.as_deref(), Some("10.0.0.5"));

        let cli = parse(&["videowatch"]);
        assert!(cli.host.is_none());
    }
}
