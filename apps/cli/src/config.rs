//! Client configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/spa-deploy/client.toml`
//! - Windows: `%APPDATA%/spa-deploy/client.toml`
//!
//! `SPA_SERVER_ADDRESS`, `SPA_SERVER_AUTH_TOKEN`, `SPA_UPLOAD_PARALLEL` and
//! `SPA_UPLOAD_RETRY` override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use spa_deploy::{DEFAULT_PARALLEL, DEFAULT_RETRY, UploadOptions};

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "SPA_CLIENT_CONFIG";

/// Client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

/// Admin server connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL, e.g. `http://127.0.0.1:9000`.
    #[serde(default)]
    pub address: String,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub auth_token: String,

    /// Per-request timeout in seconds (0 = none).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Upload tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_parallel")]
    pub parallel: usize,

    #[serde(default = "default_retry")]
    pub retry: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_parallel() -> usize {
    DEFAULT_PARALLEL
}

fn default_retry() -> u32 {
    DEFAULT_RETRY
}

fn default_retry_delay_ms() -> u64 {
    200
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            auth_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            retry: default_retry(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Config {
    /// Loads configuration and applies environment overrides.
    ///
    /// `explicit` (from `--config-dir`) wins over `SPA_CLIENT_CONFIG`, which
    /// wins over the platform default. Only the default file may be absent.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::read(&path)?,
            None => {
                let path = config_path()?;
                if path.exists() {
                    Self::read(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Config::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies overrides looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = var("SPA_SERVER_ADDRESS") {
            self.server.address = address;
        }
        if let Some(token) = var("SPA_SERVER_AUTH_TOKEN") {
            self.server.auth_token = token;
        }
        if let Some(parallel) = var("SPA_UPLOAD_PARALLEL") {
            self.upload.parallel = parallel
                .parse()
                .with_context(|| format!("SPA_UPLOAD_PARALLEL is not a number: {parallel}"))?;
        }
        if let Some(retry) = var("SPA_UPLOAD_RETRY") {
            self.upload.retry = retry
                .parse()
                .with_context(|| format!("SPA_UPLOAD_RETRY is not a number: {retry}"))?;
        }
        Ok(())
    }

    /// Checks required fields and clamps upload bounds to at least 1.
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.server.address.trim().is_empty() {
            bail!("server address is not set (config `server.address` or SPA_SERVER_ADDRESS)");
        }
        self.upload.parallel = self.upload.parallel.max(1);
        self.upload.retry = self.upload.retry.max(1);
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.server.timeout_secs > 0).then(|| Duration::from_secs(self.server.timeout_secs))
    }

    /// Upload options, with command-line overrides taking precedence.
    pub fn upload_options(&self, parallel: Option<usize>, retry: Option<u32>) -> UploadOptions {
        UploadOptions {
            parallel: parallel.unwrap_or(self.upload.parallel).max(1),
            retry: retry.unwrap_or(self.upload.retry).max(1),
            retry_delay: Duration::from_millis(self.upload.retry_delay_ms),
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("spa-deploy")
            .join("client.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("spa-deploy").join("client.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/spa-deploy/client.toml"))
    }
}
