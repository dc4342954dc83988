//! modam command-line client
//!
//! Thin front end over the authenticated request pipeline:
//! 1. Loads configuration and opens the credential file
//! 2. Registers the session-expired handler
//! 3. Runs one command (`login`, `logout`, `status`, `get`)

mod cli;
mod commands;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use auth_pipeline::{AuthClient, AuthFailureNotifier, HttpTransport};
use credential_store::FileStore;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // JSON logs on stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match cli::parse(&args) {
        Ok(invocation) => invocation,
        Err(msg) => {
            eprintln!("{msg}\n\n{}", cli::USAGE);
            return Ok(ExitCode::from(64));
        }
    };
    if invocation.command == cli::Command::Help {
        println!("{}", cli::USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let config_path = Config::resolve_path(invocation.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout_secs,
        store = %config.store.path.display(),
        "configuration loaded"
    );

    let store = FileStore::load(config.store.path.clone())
        .await
        .with_context(|| format!("failed to open credential file {}", config.store.path.display()))?;

    let http = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let transport = HttpTransport::new(http, config.api.base_url.clone(), config.timeout());

    let notifier = AuthFailureNotifier::new();
    let expired = commands::watch_session(&notifier);
    let client = AuthClient::new(Arc::new(transport), Arc::new(store), notifier);

    let code = commands::run(
        &client,
        invocation.command,
        &config.api.login_path,
        config::password_from_env,
        &expired,
    )
    .await;
    Ok(ExitCode::from(code))
}
