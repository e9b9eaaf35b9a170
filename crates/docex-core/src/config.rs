//! Configuration management for docex.
//!
//! Settings come from three layers, lowest priority first:
//!
//! 1. **Built-in defaults** (see [`Config::default`])
//! 2. **Config file**: an explicit path, or `config.toml` in the platform config
//!    directory when it exists
//! 3. **Command-line flags and environment variables**, applied by the CLI on
//!    top of the loaded [`Config`]
//!
//! The API token is never read from a file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! base_url = "https://dash.readme.com/api/v1"
//! timeout_secs = 10
//!
//! [images]
//! download = true
//! host_prefix = "https://files.readme.io/"
//!
//! [export]
//! max_depth = 32
//! fail_fast = false
//! ```
//!
//! Every section and key is optional:
//!
//! ```rust
//! use docex_core::Config;
//!
//! let config = Config::from_toml_str("[api]\ntimeout_secs = 30\n")?;
//! assert_eq!(config.api.timeout_secs, 30);
//! assert_eq!(config.images.host_prefix, "https://files.readme.io/");
//! # Ok::<(), docex_core::Error>(())
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default API root of the documentation platform.
pub const DEFAULT_BASE_URL: &str = "https://dash.readme.com/api/v1";

/// Images under this prefix are hosted by the platform and get downloaded.
pub const DEFAULT_ASSET_PREFIX: &str = "https://files.readme.io/";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Maximum document nesting followed by the tree walk.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Complete docex configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings
    pub api: ApiConfig,
    /// Image download settings
    pub images: ImagesConfig,
    /// Tree walk settings
    pub export: ExportConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Timeout applied to every request, API and image alike.
    pub timeout_secs: u64,
}

/// Image download settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// When false, every image keeps its remote URL.
    pub download: bool,
    /// URL prefix marking platform-hosted images.
    pub host_prefix: String,
}

/// Tree walk settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Documents nested deeper than this are skipped.
    pub max_depth: usize,
    /// Abort on the first API failure instead of treating it as empty data.
    pub fail_fast: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            download: true,
            host_prefix: DEFAULT_ASSET_PREFIX.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            fail_fast: false,
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or from the default location.
    ///
    /// An explicit path must exist. The default location is optional: when no
    /// file is there, built-in defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds invalid values.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be at least 1".into()));
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.export.max_depth == 0 {
            return Err(Error::Config("export.max_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Platform config file location:
    /// - Linux: `~/.config/docex/config.toml`
    /// - macOS: `~/Library/Application Support/dev.docex.docex/config.toml`
    /// - Windows: `%APPDATA%\docex\docex\config\config.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "docex", "docex")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.images.download);
        assert_eq!(config.images.host_prefix, "https://files.readme.io/");
        assert_eq!(config.export.max_depth, 32);
        assert!(!config.export.fail_fast);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str("[images]\ndownload = false\n").unwrap();
        assert!(!config.images.download);
        assert_eq!(config.images.host_prefix, DEFAULT_ASSET_PREFIX);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml_str("[api]\ntimeout_secs = 0\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[api]\nbase_url = \"ftp://example.com\"\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[export]\nmax_depth = 0\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unparseable_file_is_a_serialization_error() {
        assert!(matches!(
            Config::from_toml_str("not = [valid"),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[api]\ntimeout_secs = \"ten\"\n"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:9000/api\"\n\n[export]\nfail_fast = true"
        )?;

        let config = Config::load(Some(file.path()))?;
        assert_eq!(config.api.base_url, "http://localhost:9000/api");
        assert!(config.export.fail_fast);
        Ok(())
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
