//
//  bitbucket-v1
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loading, saving and accessing settings stored as TOML in the
//! platform-specific config directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bbv1/config.toml`
//! - **macOS**: `~/Library/Application Support/bbv1/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bbv1\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! host = "api.bitbucket.org"
//!
//! [auth]
//! username = "jdoe"
//! method = "basic"
//!
//! [cache]
//! enabled = true
//!
//! [defaults]
//! owner = "jdoe"
//! repo = "tools"
//! ```
//!
//! Set `BBV1_CONFIG` to use a different file.
//!
//! Passwords and tokens are never written here; they live in the system
//! keyring (see [`crate::auth::KeyringStore`]).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_v1::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("owner", "jdoe".to_string())?;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`hosts`]: API host constants and normalization

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::AuthMethod;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "BBV1_CONFIG";

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "host",
    "base_url",
    "username",
    "auth_method",
    "cache",
    "owner",
    "repo",
];

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Where requests go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// API host, `api.bitbucket.org` unless pointed elsewhere.
    #[serde(default = "default_host")]
    pub host: String,

    /// Full API root. Overrides `host` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    DEFAULT_API_HOST.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            base_url: None,
        }
    }
}

/// Which account to authenticate as. Secrets are kept in the keyring.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default)]
    pub method: AuthMethod,
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheConfig {
    /// Cache GET responses for the lifetime of a client.
    #[serde(default)]
    pub enabled: bool,
}

/// Repository used when a command is not given one.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, defaulting when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Path of the default configuration file.
    ///
    /// `BBV1_CONFIG` overrides the platform location.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API root derived from `api.base_url` or `api.host`.
    pub fn api_base_url(&self) -> String {
        match &self.api.base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => api_base_url(&self.api.host),
        }
    }

    /// Host requests actually go to: taken from `api.base_url` when it is
    /// set (with its port, if any), otherwise `api.host`.
    pub fn api_host(&self) -> String {
        let parsed = self
            .api
            .base_url
            .as_deref()
            .and_then(|url| url::Url::parse(url.trim()).ok());
        match parsed.as_ref().and_then(|url| url.host_str().map(|h| (h, url.port()))) {
            Some((host, Some(port))) => format!("{}:{}", host.to_lowercase(), port),
            Some((host, None)) => host.to_lowercase(),
            None => normalize_host(&self.api.host),
        }
    }

    /// Host name used to key stored credentials.
    pub fn credential_host(&self) -> String {
        self.api_host()
    }

    /// Gets a configuration value by key name.
    ///
    /// Returns `None` for unknown keys and unset values.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "host" => Some(self.api.host.clone()),
            "base_url" => self.api.base_url.clone(),
            "username" => self.auth.username.clone(),
            "auth_method" => Some(self.auth.method.to_string()),
            "cache" => Some(self.cache.enabled.to_string()),
            "owner" => self.defaults.owner.clone(),
            "repo" => self.defaults.repo.clone(),
            _ => None,
        }
    }

    /// Sets a configuration value by key name.
    ///
    /// # Errors
    ///
    /// Fails for unknown keys and for values that do not parse
    /// (`cache` takes `true`/`false`, `auth_method` takes `basic`/`token`).
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "host" => self.api.host = normalize_host(&value),
            "base_url" => {
                self.api.base_url = (!value.trim().is_empty()).then_some(value);
            }
            "username" => self.auth.username = Some(value),
            "auth_method" => self.auth.method = value.parse()?,
            "cache" => {
                self.cache.enabled = parse_bool(&value)
                    .ok_or_else(|| anyhow::anyhow!("Invalid value for cache: '{}'", value))?;
            }
            "owner" => self.defaults.owner = Some(value),
            "repo" => self.defaults.repo = Some(value),
            _ => anyhow::bail!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Resets a key to its default value.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        let defaults = Config::default();
        match key {
            "host" => self.api.host = defaults.api.host,
            "base_url" => self.api.base_url = None,
            "username" => self.auth.username = None,
            "auth_method" => self.auth.method = defaults.auth.method,
            "cache" => self.cache.enabled = defaults.cache.enabled,
            "owner" => self.defaults.owner = None,
            "repo" => self.defaults.repo = None,
            _ => anyhow::bail!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.host, "api.bitbucket.org");
        assert_eq!(config.api_base_url(), "https://api.bitbucket.org/1.0");
        assert!(!config.cache.enabled);
        assert_eq!(config.auth.method, AuthMethod::Basic);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[auth]\nusername = \"jdoe\"\n").unwrap();
        assert_eq!(config.auth.username.as_deref(), Some("jdoe"));
        assert_eq!(config.api.host, DEFAULT_API_HOST);
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::default();
        config.set("base_url", "http://localhost:8080/1.0/".to_string()).unwrap();
        assert_eq!(config.api_base_url(), "http://localhost:8080/1.0");

        config.set("base_url", "".to_string()).unwrap();
        assert_eq!(config.api.base_url, None);
    }

    #[test]
    fn test_api_host_follows_base_url() {
        let mut config = Config::default();
        assert_eq!(config.api_host(), DEFAULT_API_HOST);
        assert_eq!(config.credential_host(), DEFAULT_API_HOST);

        config.set("host", "bitbucket.example.com".to_string()).unwrap();
        config
            .set("base_url", "https://BB.internal:8443/1.0".to_string())
            .unwrap();
        assert_eq!(config.api_host(), "bb.internal:8443");
        assert_eq!(config.credential_host(), "bb.internal:8443");

        config.set("base_url", "https://api.bitbucket.org/1.0".to_string()).unwrap();
        assert_eq!(config.api_host(), "api.bitbucket.org");
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("host", "HTTPS://Bitbucket.Example.com/".to_string()).unwrap();
        config.set("cache", "yes".to_string()).unwrap();
        config.set("auth_method", "token".to_string()).unwrap();
        config.set("owner", "jdoe".to_string()).unwrap();

        assert_eq!(config.get("host").as_deref(), Some("bitbucket.example.com"));
        assert_eq!(config.get("cache").as_deref(), Some("true"));
        assert_eq!(config.get("auth_method").as_deref(), Some("token"));
        assert_eq!(config.get("owner").as_deref(), Some("jdoe"));
        assert_eq!(config.get("repo"), None);
        assert_eq!(config.get("nope"), None);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("nope", "x".to_string()).is_err());
        assert!(config.set("cache", "maybe".to_string()).is_err());
        assert!(config.set("auth_method", "oauth".to_string()).is_err());
    }

    #[test]
    fn test_unset_restores_defaults() {
        let mut config = Config::default();
        config.set("host", "bitbucket.example.com".to_string()).unwrap();
        config.set("owner", "team".to_string()).unwrap();

        config.unset("host").unwrap();
        config.unset("owner").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.unset("nope").is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("username", "jdoe".to_string()).unwrap();
        config.set("repo", "tools".to_string()).unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
