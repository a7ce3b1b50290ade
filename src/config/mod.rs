//
//  redmine-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module resolves the connection settings needed to talk to a Redmine
//! instance: the base URL, the API key and the request timeout.
//!
//! ## Sources
//!
//! Settings are resolved in order of precedence:
//!
//! 1. Command-line flags (`--url`, `--api-key`, `--timeout`)
//! 2. Environment variables (`REDMINE_URL`, `REDMINE_API_KEY`, `REDMINE_TIMEOUT`)
//! 3. The config file (see [`ConfigFile`])
//! 4. Built-in defaults (timeout only)
//!
//! Flags and environment variables are merged by clap before they reach
//! [`RedmineConfig::resolve`].
//!
//! ## Example Configuration File
//!
//! ```toml
//! url = "https://redmine.example.com"
//! api_key = "0123456789abcdef"
//! timeout = 30
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Config file location, loading and saving

mod file;

pub use file::*;

use std::time::Duration;

use url::Url;

use crate::api::ApiError;

/// Environment variable holding the Redmine base URL.
pub const URL_ENV: &str = "REDMINE_URL";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "REDMINE_API_KEY";

/// Environment variable holding the timeout in seconds.
pub const TIMEOUT_ENV: &str = "REDMINE_TIMEOUT";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable connection settings for one Redmine instance.
///
/// The base URL is validated and stored without trailing slashes so that
/// endpoint paths such as `/issues.json` can be appended directly.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use redmine_cli::config::RedmineConfig;
///
/// let config = RedmineConfig::new("https://redmine.example.com/", "key")?
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.base_url(), "https://redmine.example.com");
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// # Ok::<(), redmine_cli::api::ApiError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedmineConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl RedmineConfig {
    /// Creates a configuration with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the URL or key is blank, or if the URL
    /// is not an absolute `http`/`https` URL.
    pub fn new(url: &str, api_key: &str) -> Result<Self, ApiError> {
        let base_url = url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(missing_url());
        }
        if api_key.trim().is_empty() {
            return Err(missing_api_key());
        }

        let parsed = Url::parse(base_url).map_err(|e| {
            ApiError::Config(format!("{URL_ENV} is not a valid URL ({base_url}): {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "{URL_ENV} must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.trim().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Replaces the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Merges explicit values with the config file.
    ///
    /// Explicit values win; the file fills in whatever is missing; the
    /// timeout finally falls back to [`DEFAULT_TIMEOUT_SECS`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] naming the missing setting when the URL or
    /// API key cannot be found anywhere, or when the timeout is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redmine_cli::config::{ConfigFile, RedmineConfig};
    ///
    /// let file = ConfigFile {
    ///     url: Some("https://from-file.example.com".into()),
    ///     api_key: Some("file-key".into()),
    ///     timeout: None,
    /// };
    /// let config = RedmineConfig::resolve(Some("https://flag.example.com"), None, None, &file)?;
    /// assert_eq!(config.base_url(), "https://flag.example.com");
    /// assert_eq!(config.api_key(), "file-key");
    /// # Ok::<(), redmine_cli::api::ApiError>(())
    /// ```
    pub fn resolve(
        url: Option<&str>,
        api_key: Option<&str>,
        timeout_secs: Option<u64>,
        file: &ConfigFile,
    ) -> Result<Self, ApiError> {
        let url = non_blank(url)
            .or_else(|| non_blank(file.url.as_deref()))
            .ok_or_else(missing_url)?;
        let api_key = non_blank(api_key)
            .or_else(|| non_blank(file.api_key.as_deref()))
            .ok_or_else(missing_api_key)?;
        let timeout_secs = timeout_secs
            .or(file.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ApiError::Config(
                "Timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self::new(url, api_key)?.with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// The base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing_url() -> ApiError {
    ApiError::Config(format!(
        "{URL_ENV} environment variable is not set. Please set it to your Redmine instance URL."
    ))
}

fn missing_api_key() -> ApiError {
    ApiError::Config(format!(
        "{API_KEY_ENV} environment variable is not set. Please set it to your Redmine API key."
    ))
}

/// Masks all but the last four characters of a secret for display.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_stripped() {
        let config = RedmineConfig::new("https://redmine.example.com///", "key").unwrap();
        assert_eq!(config.base_url(), "https://redmine.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_sub_path_is_kept() {
        let config = RedmineConfig::new("https://example.com/redmine/", "key").unwrap();
        assert_eq!(config.base_url(), "https://example.com/redmine");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = RedmineConfig::new("not a url", "key").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let err = RedmineConfig::new("ftp://example.com", "key").unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_missing_settings_named() {
        let err = RedmineConfig::resolve(None, Some("key"), None, &ConfigFile::default())
            .unwrap_err();
        assert!(err.to_string().contains(URL_ENV));

        let err = RedmineConfig::resolve(
            Some("https://example.com"),
            Some("   "),
            None,
            &ConfigFile::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_file_fills_gaps() {
        let file = ConfigFile {
            url: Some("https://file.example.com".into()),
            api_key: Some("file-key".into()),
            timeout: Some(5),
        };
        let config = RedmineConfig::resolve(None, Some("flag-key"), None, &file).unwrap();
        assert_eq!(config.base_url(), "https://file.example.com");
        assert_eq!(config.api_key(), "flag-key");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = RedmineConfig::resolve(
            Some("https://example.com"),
            Some("key"),
            Some(0),
            &ConfigFile::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdefgh"), "****efgh");
        assert_eq!(mask_secret("abc"), "***");
    }
}
