mod accessor;
mod api_client;
mod cli;
mod config;
mod errors;
mod export;
mod handlers;
mod input;
mod models;
mod relay_flow;
mod render;
mod state;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::errors::AppError;
use crate::handlers::{notify_error, run, wants_json};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries command output only.
    let filter = if cli.verbose {
        EnvFilter::new(format!("{}=debug", env!("CARGO_CRATE_NAME")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        })
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-client v{}", env!("CARGO_PKG_VERSION"));

    let as_json = wants_json(&cli.command);

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            notify_error(&AppError::from(e), as_json);
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(
        "Backend base: {} ({:?})",
        state.client.resolver().base(),
        state.config.mode
    );

    match run(&state, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            notify_error(&e, as_json);
            Ok(ExitCode::FAILURE)
        }
    }
}
