//! Testnet Bridger CLI
//!
//! Loads keys from `keys.txt`, asks for any batch parameter not given as a
//! flag, then bridges each account in turn.

use clap::Parser;
use tracing::info;

use testnet_bridger::cli::Cli;
use testnet_bridger::keys::load_private_keys;
use testnet_bridger::{run_batch, Config, Orchestrator};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> eyre::Result<()> {
    init_logging();

    let cli = Cli::parse();

    let config = match &cli.env_file {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    info!(networks = ?config.networks.keys().collect::<Vec<_>>(), "Configuration loaded");

    let keys = load_private_keys(&cli.keys)?;
    info!(count = keys.len(), path = %cli.keys.display(), "Loaded private keys");

    let params = cli.resolve_params_interactive()?;
    let orchestrator = Orchestrator::connect(config)?;

    let summary = run_batch(&orchestrator, &keys, &params).await?;
    info!(
        confirmed = summary.confirmed,
        reverted = summary.reverted,
        submitted = summary.submitted,
        failed = summary.failed,
        "Testnet Bridger finished"
    );
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,testnet_bridger=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}
