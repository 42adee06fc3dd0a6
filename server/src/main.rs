//! Main entry point for the planet session server.

use planet_server::{cli, config, server};

use anyhow::Context;
use clap::Parser;
use config::Config;
use server::AppState;
use std::path::PathBuf;

/// Minimal server entrypoint: parse CLI args and run the server.
///
/// Usage:
///   planet-server [--config PATH] [--port N] [--public-dir DIR] [--persist] [--debug]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::ServerCli::parse();

    // If debug is on: show everything at DEBUG level
    // If debug is off: our crates at INFO, everything else at WARN
    let log_filter = if cli.debug {
        "debug".to_string()
    } else {
        "planet_server=info,planet_shared=info,warn".to_string()
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(cli.debug)
        .with_thread_ids(cli.debug)
        .with_file(cli.debug)
        .with_line_number(cli.debug)
        .init();

    let config_path: PathBuf = cli.config.clone();

    // Load or create config file (creates file if missing).
    let mut cfg = Config::load_or_create(&config_path)
        .with_context(|| format!("loading or creating config '{}'", config_path.display()))?;

    // Apply CLI overrides in-memory (non-persistent by default)
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    if let Some(dir) = cli.public_dir {
        cfg.public_dir = dir;
    }

    if cli.persist {
        cfg.save(&config_path)
            .with_context(|| format!("saving updated config '{}'", config_path.display()))?;
    }

    tracing::info!(config = %config_path.display(), port = cfg.port);

    let addr = cfg.socket_addr()?;
    let state = AppState::new(cfg);
    server::run_server(addr, state).await?;
    Ok(())
}
