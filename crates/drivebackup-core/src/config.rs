//! Configuration module for drivebackup.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default Drive v2 metadata endpoint
pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v2";

/// Default Drive v2 media upload endpoint
pub const DEFAULT_DRIVE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v2";

/// Default environment variable holding the OAuth access token
pub const DEFAULT_TOKEN_ENV: &str = "DRIVEBACKUP_ACCESS_TOKEN";

/// Upper bound for `backup.workers`
pub const MAX_WORKERS: usize = 32;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for drivebackup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backup: BackupConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub drive: DriveConfig,
}

/// What to back up and where.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Directory whose top-level files are backed up.
    pub local_dir: PathBuf,
    /// Title of the destination folder. Empty means the drive root.
    pub remote_folder: String,
    /// Create the destination folder under the root when it does not exist.
    pub create_remote: bool,
    /// Number of concurrent upload workers.
    pub workers: usize,
}

/// Rate-limit retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per remote call, including the first.
    pub max_attempts: u32,
    /// Backoff unit in milliseconds.
    pub base_delay_ms: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

/// Where to find the access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Environment variable holding a bearer token for the Drive API.
    pub token_env: String,
}

/// Drive API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub base_url: String,
    pub upload_base_url: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/drivebackup/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("drivebackup")
            .join("config.yaml")
    }

    /// Serialize the configuration back to YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from("."),
            remote_folder: String::new(),
            create_remote: true,
            workers: 1,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: DEFAULT_TOKEN_ENV.to_string(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
            upload_base_url: DEFAULT_DRIVE_UPLOAD_BASE_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"backup.workers"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- backup ---
        // Paths starting with `~` are expanded at runtime.
        let dir_str = self.backup.local_dir.to_string_lossy();
        if dir_str.is_empty() {
            errors.push(ValidationError {
                field: "backup.local_dir".into(),
                message: "must not be empty".into(),
            });
        } else if !dir_str.starts_with('~') && !self.backup.local_dir.is_dir() {
            errors.push(ValidationError {
                field: "backup.local_dir".into(),
                message: format!(
                    "directory does not exist: {}",
                    self.backup.local_dir.display()
                ),
            });
        }
        if self.backup.workers == 0 || self.backup.workers > MAX_WORKERS {
            errors.push(ValidationError {
                field: "backup.workers".into(),
                message: format!("must be in range 1..={MAX_WORKERS}"),
            });
        }

        // --- retry ---
        if self.retry.max_attempts == 0 {
            errors.push(ValidationError {
                field: "retry.max_attempts".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.retry.base_delay_ms == 0 {
            errors.push(ValidationError {
                field: "retry.base_delay_ms".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        // --- auth ---
        if self.auth.token_env.trim().is_empty() {
            errors.push(ValidationError {
                field: "auth.token_env".into(),
                message: "must not be empty".into(),
            });
        }

        // --- drive ---
        if !is_http_url(&self.drive.base_url) {
            errors.push(ValidationError {
                field: "drive.base_url".into(),
                message: format!("not an http(s) URL: {}", self.drive.base_url),
            });
        }
        if !is_http_url(&self.drive.upload_base_url) {
            errors.push(ValidationError {
                field: "drive.upload_base_url".into(),
                message: format!("not an http(s) URL: {}", self.drive.upload_base_url),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use drivebackup_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .backup_local_dir(PathBuf::from("/home/user/Documents"))
///     .backup_remote_folder("Documents backup")
///     .backup_workers(4)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from disk.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    // --- backup ---

    pub fn backup_local_dir(mut self, dir: PathBuf) -> Self {
        self.config.backup.local_dir = dir;
        self
    }

    pub fn backup_remote_folder(mut self, name: impl Into<String>) -> Self {
        self.config.backup.remote_folder = name.into();
        self
    }

    pub fn backup_create_remote(mut self, create: bool) -> Self {
        self.config.backup.create_remote = create;
        self
    }

    pub fn backup_workers(mut self, workers: usize) -> Self {
        self.config.backup.workers = workers;
        self
    }

    // --- retry ---

    pub fn retry_max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    pub fn retry_base_delay_ms(mut self, ms: u64) -> Self {
        self.config.retry.base_delay_ms = ms;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- auth ---

    pub fn auth_token_env(mut self, var: impl Into<String>) -> Self {
        self.config.auth.token_env = var.into();
        self
    }

    // --- drive ---

    pub fn drive_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive.base_url = url.into();
        self
    }

    pub fn drive_upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive.upload_base_url = url.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
