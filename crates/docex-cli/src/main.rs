//! docex CLI - export a hosted documentation project to local markdown
//!
//! This is the main entry point for the docex command-line interface.

use anyhow::{Context, Result};
use clap::Parser;
use docex_core::{ApiClient, ClientConfig, Config, ExportOptions, Exporter};
use std::time::Duration;

mod cli;
mod logging;
mod output;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::initialize_logging(&cli)?;

    let config = resolve_config(&cli)?;

    let client = ApiClient::new(ClientConfig {
        base_url: config.api.base_url.clone(),
        token: cli.token.clone(),
        timeout: Duration::from_secs(config.api.timeout_secs),
    })
    .context("Failed to create API client")?;

    let options = ExportOptions::from_config(&cli.path, &config);
    let summary = Exporter::new(&client, options)
        .run()
        .await
        .with_context(|| format!("Export into '{}' failed", cli.path.display()))?;

    if !cli.quiet {
        output::print_summary(&summary, &cli.path);
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
