//! chansweep CLI - Close Lightning channels with no recent activity.

use chansweep_cli::cli::LndArgs;
use chansweep_cli::commands;
use chansweep_cli::{Cli, Command, Config, Formatter};
use chansweep_domain::traits::NodeClient;
use chansweep_lnd::LndRestClient;
use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so table and JSON output on stdout stay clean
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("chansweep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chansweep=info"))
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> chansweep_cli::Result<()> {
    // Load or create config
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if !config.path()?.exists() {
        config.save().ok();
    }

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &formatter)?;
        }
        Command::Info => {
            let client = connect(&config, &cli.lnd)?;
            commands::execute_info(client.as_ref(), &formatter).await?;
        }
        Command::Inspect(args) => {
            let client = connect(&config, &cli.lnd)?;
            log_node(client.as_ref()).await;
            commands::execute_inspect(args, config.janitor.clone(), client, &formatter).await?;
        }
        Command::Close(args) => {
            let client = connect(&config, &cli.lnd)?;
            log_node(client.as_ref()).await;
            let mut input = io::stdin().lock();
            commands::execute_close(args, config.janitor.clone(), client, &formatter, &mut input)
                .await?;
        }
    }

    Ok(())
}

fn connect(config: &Config, overrides: &LndArgs) -> chansweep_cli::Result<Arc<LndRestClient>> {
    let lnd = config.resolve_lnd(overrides)?;
    let client = LndRestClient::from_config(&lnd)?;
    tracing::debug!("Using LND REST endpoint {}", client.base_url());
    Ok(Arc::new(client))
}

/// Identify the node before acting on it; a failure here is left to the real requests
async fn log_node(client: &LndRestClient) {
    match client.get_info().await {
        Ok(info) => tracing::info!(
            "Connected to {} ({}) at block {}",
            info.alias,
            info.identity_pubkey,
            info.block_height
        ),
        Err(e) => tracing::debug!("get_info failed: {}", e),
    }
}
