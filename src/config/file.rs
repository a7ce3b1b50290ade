//
//  redmine-cli
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File
//!
//! The optional TOML file that supplies connection settings when neither a
//! flag nor an environment variable does.
//!
//! ## Location
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/redmine/config.toml` |
//! | macOS | `~/Library/Application Support/redmine/config.toml` |
//! | Windows | `C:\Users\<User>\AppData\Roaming\redmine\config.toml` |
//!
//! Setting `REDMINE_CONFIG` to a path overrides the location.
//!
//! ## Notes
//!
//! - A missing file is not an error; every field is optional
//! - Writing creates parent directories as needed

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "REDMINE_CONFIG";

/// Keys accepted by [`ConfigFile::get`] and [`ConfigFile::set`].
pub const VALID_KEYS: &[&str] = &["url", "api_key", "timeout"];

/// Contents of the config file.
///
/// # Example
///
/// ```rust
/// use redmine_cli::config::ConfigFile;
///
/// let mut file = ConfigFile::default();
/// assert!(file.set("timeout", "15").unwrap());
/// assert_eq!(file.get("timeout"), Some("15".to_string()));
/// assert!(!file.set("editor", "vim").unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Redmine base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Redmine API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl ConfigFile {
    /// Returns the path of the config file.
    ///
    /// Honors `REDMINE_CONFIG`, otherwise uses the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Loads the config file from its default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Loads the config file at `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the config file to its default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Writes the config file to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Gets a value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "url" => self.url.clone(),
            "api_key" => self.api_key.clone(),
            "timeout" => self.timeout.map(|t| t.to_string()),
            _ => None,
        }
    }

    /// Sets a value by key.
    ///
    /// Returns `Ok(false)` for unknown keys.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a whole number of seconds.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "url" => self.url = Some(value.trim_end_matches('/').to_string()),
            "api_key" => self.api_key = Some(value.to_string()),
            "timeout" => {
                let secs = value
                    .parse::<u64>()
                    .with_context(|| format!("timeout must be a number of seconds, got '{value}'"))?;
                self.timeout = Some(secs);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Removes a value by key. Returns `false` for unknown keys.
    pub fn unset(&mut self, key: &str) -> bool {
        match key {
            "url" => self.url = None,
            "api_key" => self.api_key = None,
            "timeout" => self.timeout = None,
            _ => return false,
        }
        true
    }
}
