//! videowatch CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use videowatch_client::cli::{Cli, Command, ConfigAction};
use videowatch_client::config::ClientConfig;
use videowatch_client::error::{ClientError, ClientResult};
use videowatch_client::{StatusClient, Watcher};
use videowatch_core::{JsonRenderer, RenderFormat, TextRenderer, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first; debug mode can come from the file as well
    // as the flag.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    if let Err(e) = init_tracing(cli.tracing_config(&config)) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    // Run the command
    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config),
        None => ClientConfig::load().map_err(ClientError::Config),
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    // Handle subcommands
    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => {
                let path = cli
                    .config
                    .clone()
                    .unwrap_or_else(ClientConfig::default_path);
                videowatch_client::commands::config::dump(&config, &path)
            }
            ConfigAction::Validate => videowatch_client::commands::config::validate(&config),
            ConfigAction::Path => videowatch_client::commands::config::path(cli.config.as_ref()),
        },
        None => watch(&cli, &config).await,
    }
}

/// Runs the watch loop against the resolved endpoint.
async fn watch(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let endpoint = cli.endpoint(config);
    let options = cli.watch_options(config);
    let client = StatusClient::new(endpoint, options.connect_timeout);

    match cli.render_format(config) {
        RenderFormat::Text => {
            let renderer = TextRenderer::stdout(cli.render_options(config));
            Watcher::new(client, renderer, options).run().await
        }
        RenderFormat::Json => {
            let renderer = JsonRenderer::stdout();
            Watcher::new(client, renderer, options).run().await
        }
    }
}
