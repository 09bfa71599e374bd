//! Configuration module for dirserve.

use serde::Deserialize;
use std::path::Path;

use crate::{FileBrowserError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Served tree configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Root folder exposed over HTTP.
    #[serde(default = "default_root")]
    pub root: String,
    /// Number of entries per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_page_size() -> usize {
    crate::file::DEFAULT_PAGE_SIZE
}

fn default_max_upload_size() -> u64 {
    2048
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            page_size: default_page_size(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DisplayConfig {
    /// Timezone for listing timestamps (e.g., "Asia/Tokyo", "UTC").
    ///
    /// Empty means the local time zone of the serving process.
    #[serde(default)]
    pub timezone: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/dirserve.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web layer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve a static front-end.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Rate limit per client IP (requests per minute, 0 disables).
    #[serde(default = "default_api_rate_limit")]
    pub api_rate_limit: u32,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP`.
    ///
    /// Only enable behind a reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_static_path() -> String {
    "web/dist".to_string()
}

fn default_api_rate_limit() -> u32 {
    600
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
            api_rate_limit: default_api_rate_limit(),
            trust_proxy_headers: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Served tree configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web layer configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FileBrowserError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FileBrowserError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DIRSERVE_ROOT`: Override the served root folder
    /// - `DIRSERVE_PORT`: Override the listen port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("DIRSERVE_ROOT") {
            if !root.is_empty() {
                self.files.root = root;
            }
        }

        if let Ok(port) = std::env::var("DIRSERVE_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid DIRSERVE_PORT value: {}", port),
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - `files.page_size` is zero
    /// - `files.max_upload_size_mb` is zero
    /// - `display.timezone` is set but not a known IANA name
    pub fn validate(&self) -> Result<()> {
        if self.files.page_size == 0 {
            return Err(FileBrowserError::Config(
                "files.page_size must be greater than zero".to_string(),
            ));
        }
        if self.files.max_upload_size_mb == 0 {
            return Err(FileBrowserError::Config(
                "files.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if !self.display.timezone.is_empty()
            && self.display.timezone.parse::<chrono_tz::Tz>().is_err()
        {
            return Err(FileBrowserError::Config(format!(
                "unknown timezone: {}",
                self.display.timezone
            )));
        }
        Ok(())
    }

    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.files.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}
