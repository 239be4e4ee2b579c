//! Configuration loading and typed config structures.
//!
//! The configuration lives in `rtsmod-config.yaml` next to the server
//! binary. Every field has a serde default, so a partial file (or no file at
//! all) yields a complete [`GameConfig`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable that overrides `storage.world_root`.
pub const WORLD_ROOT_ENV: &str = "RTSMOD_WORLD_ROOT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration. Mirrors `rtsmod-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Where city records live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tick loop timing and periodic jobs.
    #[serde(default)]
    pub tick: TickConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `RTSMOD_WORLD_ROOT` overrides `storage.world_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config
            .storage
            .apply_world_root_override(std::env::var(WORLD_ROOT_ENV).ok());
        Ok(config)
    }

    /// Parse configuration from a YAML string exactly as written.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Self> = serde_yml::from_str(yaml)?;
        Ok(config.unwrap_or_default())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// World root directory. City records go under `<world_root>/rtsmod/cities/`.
    #[serde(default = "default_world_root")]
    pub world_root: PathBuf,
}

impl StorageConfig {
    /// Replace `world_root` with `value` when it is set and non-empty.
    pub fn apply_world_root_override(&mut self, value: Option<String>) {
        if let Some(root) = value.filter(|v| !v.trim().is_empty()) {
            self.world_root = PathBuf::from(root);
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            world_root: default_world_root(),
        }
    }
}

/// Tick loop configuration. Intervals are counted in ticks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickConfig {
    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Ticks between sync snapshots to online players.
    #[serde(default = "default_sync_interval_ticks")]
    pub sync_interval_ticks: u64,

    /// Ticks between full saves (0 = only on shutdown).
    #[serde(default = "default_autosave_interval_ticks")]
    pub autosave_interval_ticks: u64,

    /// Ticks between resource production rounds (0 = disabled).
    #[serde(default = "default_production_interval_ticks")]
    pub production_interval_ticks: u64,

    /// WOOD and STONE each resource building yields per round.
    #[serde(default = "default_production_per_building")]
    pub production_per_building: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            sync_interval_ticks: default_sync_interval_ticks(),
            autosave_interval_ticks: default_autosave_interval_ticks(),
            production_interval_ticks: default_production_interval_ticks(),
            production_per_building: default_production_per_building(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_root() -> PathBuf {
    PathBuf::from("world")
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_sync_interval_ticks() -> u64 {
    100
}

const fn default_autosave_interval_ticks() -> u64 {
    6_000
}

const fn default_production_interval_ticks() -> u64 {
    20
}

const fn default_production_per_building() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_owned()
}
