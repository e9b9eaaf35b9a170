//! Error types and handling for docex-core operations.
//!
//! This module provides a single error type covering every failure an export
//! run can hit. Errors are categorized for logging and carry a recoverability
//! hint so callers can tell a flaky endpoint from a permanent failure.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: creating directories, writing markdown and image files
//! - **Network Errors**: transport failures and timeouts from `reqwest`
//! - **API Errors**: non-2xx responses from the documentation platform
//! - **Serialization Errors**: JSON or TOML payloads that do not match the expected shape
//! - **Configuration Errors**: unreadable or invalid configuration files
//! - **Path Errors**: slugs or asset names that cannot be used as file names
//!
//! ## Example
//!
//! ```rust
//! use docex_core::Error;
//!
//! let err = Error::Api { status: 503, url: "https://example.com/docs/intro".into() };
//! assert_eq!(err.category(), "api");
//! assert!(err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for docex-core operations.
///
/// All fallible public functions in docex-core return `Result<T, Error>`.
/// The full source chain is preserved through `source()` for the variants that
/// wrap another error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers directory creation and file writes under the output root. These
    /// always end the run.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Connection failures, TLS errors and request timeouts. The underlying
    /// `reqwest::Error` is preserved.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API request to '{url}' failed with HTTP status {status}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// A payload could not be decoded.
    ///
    /// Used for JSON API responses, embedded image block JSON and TOML
    /// configuration files.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL is malformed or has no usable file name.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A slug cannot be used as a single path component.
    #[error("Invalid slug '{0}': must be a single path component")]
    InvalidSlug(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might go away on a later attempt.
    ///
    /// docex never retries on its own; this is used to word log messages and
    /// lets embedding code build its own retry loop.
    ///
    /// - `true` for timeouts, connection failures, HTTP 429 and 5xx
    /// - `false` for everything else
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a static string identifier.
    ///
    /// Used as a structured field in log lines.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Api { .. } => "api",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::InvalidSlug(_) => "invalid_slug",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
