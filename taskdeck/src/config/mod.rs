//! Configuration system for the `TaskDeck` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskdeck/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use taskdeck_proto::task::MAX_TASKS_PER_USER;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The task store URL is not a valid URL.
    #[error("invalid task store url {url:?}: {source}")]
    InvalidApiUrl {
        /// The rejected value.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    session: SessionFileConfig,
    ui: UiFileConfig,
    tasks: TasksFileConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// `[session]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    email: Option<String>,
    guest_name: Option<String>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
}

/// `[tasks]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TasksFileConfig {
    max_per_user: Option<usize>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the `TaskDeck` client.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "TaskDeck — terminal task organizer")]
pub struct CliArgs {
    /// Base URL of the task store.
    #[arg(long, env = "TASKDECK_API")]
    pub api_url: Option<String>,

    /// Sign in as this email address. Without it, a guest session is used.
    #[arg(long, env = "TASKDECK_EMAIL")]
    pub email: Option<String>,

    /// Display name for guest sessions.
    #[arg(long)]
    pub guest_name: Option<String>,

    /// Path to config file (default: `~/.config/taskdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,

    /// Log file path (default: system temp dir).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the task store.
    pub api_url: Url,
    /// Per-request timeout against the task store.
    pub request_timeout: Duration,
    /// Authenticated owner email, if any.
    pub email: Option<String>,
    /// Display name used when falling back to a guest session.
    pub guest_name: String,
    /// Terminal event poll timeout per frame.
    pub poll_timeout: Duration,
    /// Maximum number of tasks per owner.
    pub max_tasks_per_user: usize,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout: Duration::from_secs(10),
            email: None,
            guest_name: crate::identity::DEFAULT_GUEST_NAME.to_string(),
            poll_timeout: Duration::from_millis(150),
            max_tasks_per_user: MAX_TASKS_PER_USER,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit config file cannot be read or
    /// parsed, or if the resolved task store URL is invalid.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match cli.api_url.clone().or_else(|| file.api.url.clone()) {
            Some(raw) => Url::parse(&raw).map_err(|source| ConfigError::InvalidApiUrl {
                url: raw,
                source,
            })?,
            None => defaults.api_url,
        };

        Ok(Self {
            api_url,
            request_timeout: file
                .api
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            email: cli.email.clone().or_else(|| file.session.email.clone()),
            guest_name: cli
                .guest_name
                .clone()
                .or_else(|| file.session.guest_name.clone())
                .unwrap_or(defaults.guest_name),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            max_tasks_per_user: file
                .tasks
                .max_per_user
                .unwrap_or(defaults.max_tasks_per_user),
            log_level: cli.log_level.clone(),
        })
    }
}

/// The compiled-in task store URL.
fn default_api_url() -> Url {
    // Static string, always parses.
    #[allow(clippy::unwrap_used)]
    Url::parse("http://127.0.0.1:9000").unwrap()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file for the client.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
