//! Logging initialization and configuration.
//!
//! Sets up the tracing subscriber and color control from CLI flags and
//! environment variables. Progress lines are INFO events, so they show by
//! default and disappear with `--quiet`.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Initialize the logging subsystem based on CLI flags.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(!colors_disabled(cli))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if colors_disabled(cli) {
        color_control::set_override(false);
    }
    Ok(())
}

fn colors_disabled(cli: &Cli) -> bool {
    cli.no_color || std::env::var_os("NO_COLOR").is_some()
}
