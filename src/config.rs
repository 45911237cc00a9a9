//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/faasctl/faasctl.toml`
//! 3. Environment variables: `FAASCTL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// Platform endpoint used unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://dashboard.metacall.io";

/// Request timeout for platform calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Unified configuration for faasctl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Platform endpoint
    pub base_url: String,
    /// Saved API token (written after a successful login)
    pub token: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, keep base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Get the XDG config directory for faasctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "faasctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("faasctl.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_url: overlay
                .base_url
                .clone()
                .unwrap_or_else(|| self.base_url.clone()),
            token: overlay.token.clone().or_else(|| self.token.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
        }
    }

    /// Load settings from the global config file and environment.
    pub fn load() -> ApplicationResult<Self> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence, reading the config file at `path`.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load_from(path: Option<&Path>) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        if let Some(path) = path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply FAASCTL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FAASCTL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_url") {
            settings.base_url = val;
        }
        if let Ok(val) = config.get_string("token") {
            settings.token = Some(val);
        }
        if let Ok(val) = config.get_string("timeout_secs") {
            settings.timeout_secs = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("FAASCTL_TIMEOUT_SECS: {e}"),
            })?;
        }

        Ok(settings)
    }
}

/// Store `token` in the config file at `path`, keeping its other keys.
pub fn persist_token(fs: &dyn FileSystem, path: &Path, token: &str) -> ApplicationResult<()> {
    let mut table = if fs.exists(path) {
        let content = fs
            .read_to_string(path)
            .with_path_context("read config", path)?;
        content
            .parse::<toml::Table>()
            .map_err(|e| ApplicationError::Config {
                message: format!("parse {}: {}", path.display(), e),
            })?
    } else {
        toml::Table::new()
    };
    table.insert("token".to_string(), toml::Value::String(token.to_string()));

    let content = toml::to_string_pretty(&table).map_err(|e| ApplicationError::Config {
        message: format!("serialize config: {e}"),
    })?;
    fs.ensure_parent(path)
        .with_path_context("create config directory", path)?;
    fs.write(path, &content).with_path_context("write config", path)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
