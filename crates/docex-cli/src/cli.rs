//! # CLI Structure and Argument Parsing
//!
//! `docex` has no subcommands: one invocation is one export run.
//!
//! ```bash
//! # Export into ./docs
//! docex --token rdme_xxx
//!
//! # Export elsewhere, linking images remotely, stopping on the first API error
//! DOCEX_TOKEN=rdme_xxx docex --path out/handbook --no-images --fail-fast
//! ```
//!
//! Flags override values from the config file (see `docex_core::config`).

use clap::Parser;
use docex_core::Config;
use std::path::PathBuf;

/// Main CLI structure for the `docex` command
#[derive(Parser, Clone, Debug)]
#[command(name = "docex")]
#[command(version)]
#[command(
    about = "Export a hosted documentation project to local markdown files",
    long_about = None,
    after_help = "Progress, warnings and failed image downloads are logged to stderr; \
                  the end-of-run summary is printed to stdout."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Parent directory the markdown files are written to
    #[arg(long, value_name = "DIR", default_value = "docs")]
    pub path: PathBuf,

    /// API token of the documentation project. Also via `DOCEX_TOKEN`.
    #[arg(long, env = "DOCEX_TOKEN", hide_env_values = true)]
    pub token: String,

    /// API root URL. Also via `DOCEX_BASE_URL`.
    #[arg(long = "base-url", value_name = "URL", env = "DOCEX_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to configuration file (overrides autodiscovery). Also via `DOCEX_CONFIG`.
    #[arg(long, value_name = "FILE", env = "DOCEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip documents nested deeper than this
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// Keep remote URLs for all images instead of downloading hosted ones
    #[arg(long = "no-images")]
    pub no_images: bool,

    /// Stop on the first failed API request
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Enable verbose output (debug logging)
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    /// Apply flag values on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.api.base_url.clone_from(base_url);
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_secs = timeout;
        }
        if let Some(max_depth) = self.max_depth {
            config.export.max_depth = max_depth;
        }
        if self.no_images {
            config.images.download = false;
        }
        if self.fail_fast {
            config.export.fail_fast = true;
        }
    }
}
