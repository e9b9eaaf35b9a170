//! # docex-core
//!
//! Core functionality for docex - exports a hosted documentation project
//! (categories and their document trees) into plain markdown files.
//!
//! ## Architecture
//!
//! - **Client**: authenticated, paginated access to the platform's REST API
//! - **Image rewriting**: `[block:image]` blocks become markdown image tags,
//!   with platform-hosted images downloaded next to the document
//! - **Link normalization**: `doc:` links and extensionless relative links
//!   become `slug.md` links
//! - **Export**: the tree walk that ties it together and writes files
//! - **Configuration** and **Error Handling** shared by all of the above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docex_core::{ApiClient, ClientConfig, Config, ExportOptions, Exporter};
//! use std::time::Duration;
//!
//! # async fn run() -> docex_core::Result<()> {
//! let config = Config::load(None)?;
//! let client = ApiClient::new(ClientConfig {
//!     base_url: config.api.base_url.clone(),
//!     token: "rdme_xxx".to_string(),
//!     timeout: Duration::from_secs(config.api.timeout_secs),
//! })?;
//!
//! let summary = Exporter::new(&client, ExportOptions::from_config("docs", &config))
//!     .run()
//!     .await?;
//! println!("Wrote {} documents", summary.documents);
//! # Ok(())
//! # }
//! ```

/// REST API client
pub mod client;
/// Configuration file and defaults
pub mod config;
/// Error types and result aliases
pub mod error;
/// Category and document tree export
pub mod export;
/// Image block rewriting and downloads
pub mod image;
/// Markdown link normalization
pub mod links;
/// API data types
pub mod types;

// Re-export commonly used types
pub use client::{ApiClient, ClientConfig, Paginated};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{ExportOptions, ExportSummary, Exporter, FailurePolicy};
pub use image::{HttpImageDownloader, ImageDownloader, ImageRewriter, ImageStats};
pub use types::*;
