//! # Postwall terminal client
//!
//! Wires the shared controllers to a real server: settings from
//! `postwall.toml` and `POSTWALL_*` variables, a session persisted under the
//! platform data directory, and one subcommand per user action.

mod args;
mod commands;
mod settings;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use args::{Cli, Parser};
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Settings::load(cli.config.as_deref()).context("loading settings")?;
    tracing::debug!("Using API at {}", config.api.base_url);

    let backend = ui::session_backend(cli.profile.as_deref());
    let context = ui::AppContext::new(config, backend).context("building HTTP client")?;

    commands::run(cli.command, &context).await
}
