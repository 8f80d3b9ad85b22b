//! Persisted CLI configuration.
//!
//! The API key lives in `~/.config/truelist/config.yaml`. When the file has no
//! key, `TRUELIST_API_KEY` is used instead.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when the config file has no API key.
pub const API_KEY_ENV: &str = "TRUELIST_API_KEY";

/// Keys accepted by `config set`.
pub const SUPPORTED_KEYS: &[&str] = &["api-key"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
}

impl Config {
    /// Set a value by its command-line key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api-key" => {
                self.api_key = value.trim().to_string();
                Ok(())
            }
            other => Err(Error::configuration_with_context(
                format!(
                    "unknown config key: {} (supported: {})",
                    other,
                    SUPPORTED_KEYS.join(", ")
                ),
                ErrorContext::new().with_field_path(other),
            )),
        }
    }

    /// Resolve the API key: config file first, then the environment value.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.trim().to_string());
        }
        env_value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    format!(
                        "no API key configured: run `truelist config set api-key <key>` or set {}",
                        API_KEY_ENV
                    ),
                    ErrorContext::new().with_field_path("api_key"),
                )
            })
    }
}

/// Reads and writes [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/truelist/config.yaml`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::configuration_with_context(
                "could not determine home directory",
                ErrorContext::new().with_source("config_file"),
            )
        })?;
        Ok(Self::new(
            home.join(".config").join("truelist").join("config.yaml"),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config. A missing or malformed file yields the default config.
    pub fn load(&self) -> Result<Config> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        match serde_yaml::from_str(&data) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config file");
                Ok(Config::default())
            }
        }
    }

    /// Write the config, creating the directory if needed. The file is owner-only on Unix.
    pub fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
            restrict_permissions(dir, 0o700)?;
        }

        let data = serde_yaml::to_string(cfg).map_err(|e| {
            Error::configuration_with_context(
                "could not serialize config",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_file"),
            )
        })?;
        fs::write(&self.path, data)?;
        restrict_permissions(&self.path, 0o600)?;
        Ok(())
    }

    /// Load the config and resolve the API key against the process environment.
    pub fn api_key(&self) -> Result<String> {
        self.load()?
            .resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
