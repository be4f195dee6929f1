// ABOUTME: Configuration parsing from TOML file with environment variable overrides
// ABOUTME: Validates the homeserver, bot identity, and target room before the bot starts
use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "INDER_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matrix: MatrixConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    #[serde(default)]
    pub home_server: String,
    /// Bot's own user ID; events from it are never acted on
    #[serde(default)]
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// The one room the bot listens and replies in
    #[serde(default)]
    pub room_id: String,
    /// Matrix SDK sqlite store; defaults to the XDG data dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            home_server: String::new(),
            user_id: String::new(),
            password: None,
            access_token: None,
            device_name: default_device_name(),
            room_id: String::new(),
            store_path: None,
        }
    }
}

// Custom Debug impl to redact sensitive fields
impl std::fmt::Debug for MatrixConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixConfig")
            .field("home_server", &self.home_server)
            .field("user_id", &self.user_id)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("device_name", &self.device_name)
            .field("room_id", &self.room_id)
            .field("store_path", &self.store_path)
            .finish()
    }
}

impl MatrixConfig {
    /// Resolved store directory, with `~` expanded
    pub fn store_dir(&self) -> PathBuf {
        self.store_path
            .as_deref()
            .map(|p| PathBuf::from(expand_tilde(p)))
            .unwrap_or_else(paths::matrix_store_dir)
    }
}

fn default_device_name() -> String {
    "inder-bot".to_string()
}

/// Expand tilde (~) to home directory in paths
/// Logs a warning if expansion fails and falls back to the original path
fn expand_tilde(path: &str) -> String {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(base_dirs) = directories::BaseDirs::new() {
            return base_dirs
                .home_dir()
                .join(stripped)
                .to_string_lossy()
                .to_string();
        }
        tracing::warn!(
            path = %path,
            "Failed to expand tilde in path: could not determine home directory"
        );
    } else if path == "~" {
        if let Some(base_dirs) = directories::BaseDirs::new() {
            return base_dirs.home_dir().to_string_lossy().to_string();
        }
        tracing::warn!("Failed to expand tilde: could not determine home directory");
    }
    path.to_string()
}

/// `@localpart:server` / `!opaque:server` shape check
fn has_matrix_id_shape(id: &str, sigil: char) -> bool {
    id.strip_prefix(sigil)
        .and_then(|rest| rest.split_once(':'))
        .is_some_and(|(local, server)| !local.is_empty() && !server.is_empty())
}

impl Config {
    /// Find the config file, checking multiple locations in order:
    /// 1. INDER_CONFIG_PATH env var (if set)
    /// 2. ./config.toml (current directory - for development)
    /// 3. ~/.config/inder/config.toml (XDG config dir)
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Some(path);
            }
        }

        let local_config = PathBuf::from("config.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        let xdg_config = paths::config_file();
        if xdg_config.exists() {
            return Some(xdg_config);
        }

        None
    }

    /// Load configuration using the default search order
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from `path` if given, otherwise search the default
    /// locations. Environment variables override file values, then the result
    /// is validated.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Config file not found: {}", p.display());
                }
                Some(p.to_path_buf())
            }
            None => Self::find_config_file(),
        };

        let mut config = if let Some(config_path) = config_path {
            tracing::info!(
                path = %config_path.display(),
                "Loading configuration from file"
            );
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            tracing::info!("No config file found, using environment variables and defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        let matrix = &mut self.matrix;
        if let Ok(val) = std::env::var("MATRIX_HOMESERVER") {
            matrix.home_server = val;
        }
        if let Ok(val) = std::env::var("MATRIX_USER") {
            matrix.user_id = val;
        }
        if let Ok(val) = std::env::var("MATRIX_PASSWORD") {
            matrix.password = Some(val);
        }
        if let Ok(val) = std::env::var("MATRIX_ACCESS_TOKEN") {
            matrix.access_token = Some(val);
        }
        if let Ok(val) = std::env::var("MATRIX_DEVICE_NAME") {
            matrix.device_name = val;
        }
        if let Ok(val) = std::env::var("MATRIX_ROOM_ID") {
            matrix.room_id = val;
        }
        if let Ok(val) = std::env::var("MATRIX_STORE_PATH") {
            matrix.store_path = Some(val);
        }
    }

    /// Check required fields; any failure is fatal at startup
    pub fn validate(&self) -> Result<()> {
        let matrix = &self.matrix;
        if matrix.home_server.trim().is_empty() {
            anyhow::bail!(
                "matrix.home_server is required (set in config.toml or MATRIX_HOMESERVER env var)"
            );
        }
        if matrix.user_id.trim().is_empty() {
            anyhow::bail!("matrix.user_id is required (set in config.toml or MATRIX_USER env var)");
        }
        if !has_matrix_id_shape(&matrix.user_id, '@') {
            anyhow::bail!("Invalid Matrix user ID: {}", matrix.user_id);
        }
        if matrix.room_id.trim().is_empty() {
            anyhow::bail!(
                "matrix.room_id is required (set in config.toml or MATRIX_ROOM_ID env var)"
            );
        }
        if !has_matrix_id_shape(&matrix.room_id, '!') {
            anyhow::bail!("Invalid Matrix room ID: {}", matrix.room_id);
        }
        if matrix.password.is_none() && matrix.access_token.is_none() {
            anyhow::bail!("Either matrix.password or matrix.access_token is required");
        }
        Ok(())
    }
}
