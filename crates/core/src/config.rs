//! Configuration management
//!
//! This module handles loading, saving, and migrating the rcw configuration file.
//! The configuration file is stored in TOML format at ~/.config/rcw/config.toml,
//! or under `$RCW_CONFIG_DIR` when that variable is set.
//!
//! The file holds remote credentials and is written with owner-only permissions.

use std::cmp::Ordering;
use std::io::Write as _;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::remote::{DEFAULT_ENV_PREFIX, RemoteProfile};
use crate::traits::FailurePolicy;

/// Current configuration schema version
///
/// Bumping this version requires a migration step in `ConfigManager::migrate`.
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "RCW_CONFIG_DIR";

/// Default rclone executable, resolved through PATH
const DEFAULT_BINARY: &str = "rclone";

/// Default output format
const DEFAULT_OUTPUT: &str = "human";


/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Configured remotes
    #[serde(default)]
    pub remotes: Vec<RemoteProfile>,
}

/// When to color human-readable output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when the stream is a terminal that wants it
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Default settings for rclone invocation and CLI behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// rclone executable name or path
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Prefix of the credential environment variables
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,

    /// How a failed rclone run is detected
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Output format: "human" or "json"
    #[serde(default = "default_output")]
    pub output: String,

    /// When human-readable output is colored
    #[serde(default)]
    pub color: ColorMode,

    /// Show a spinner while rclone runs
    #[serde(default = "default_true")]
    pub progress: bool,
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

fn default_env_prefix() -> String {
    DEFAULT_ENV_PREFIX.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            env_prefix: default_env_prefix(),
            failure_policy: FailurePolicy::default(),
            output: default_output(),
            color: ColorMode::default(),
            progress: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            remotes: Vec::new(),
        }
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    ///
    /// `$RCW_CONFIG_DIR` takes precedence over the platform config directory.
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("rcw"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// A missing file yields the defaults. Older schemas are migrated; newer
    /// ones are rejected.
    pub fn load(&self) -> Result<Config> {
        let content = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Config = toml::from_str(&content)?;
        match config.schema_version.cmp(&SCHEMA_VERSION) {
            Ordering::Equal => Ok(config),
            Ordering::Less => Ok(Self::migrate(config)),
            Ordering::Greater => Err(Error::Config(format!(
                "{} uses schema version {}, this rcw understands up to {}",
                self.config_path.display(),
                config.schema_version,
                SCHEMA_VERSION
            ))),
        }
    }

    /// Save configuration to disk
    ///
    /// The file holds secrets, so on Unix it is created owner-only before
    /// anything is written to it.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.config_path)?;

        // An existing file keeps its mode on open; tighten it as well
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn migrate(mut config: Config) -> Config {
        tracing::info!(
            from = config.schema_version,
            to = SCHEMA_VERSION,
            "migrating configuration"
        );
        config.schema_version = SCHEMA_VERSION;
        config
    }
}
