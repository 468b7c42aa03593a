//! Configuration for MachineWatch
//!
//! Supports JSON and TOML files; the format follows the file extension.
//!
//! Configuration is organized into sections:
//! - Polling intervals for the status and pin timers
//! - Jog defaults
//! - Status reporting options
//! - Logging

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Largest joint count the status feed reports
pub const MAX_JOINTS: usize = 32;

/// Poll timer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Milliseconds between status cycles
    pub status_interval_ms: u64,
    /// Milliseconds between pin registry passes
    pub pin_interval_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            status_interval_ms: 100,
            pin_interval_ms: 100,
        }
    }
}

impl PollingSettings {
    /// Status cycle interval
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    /// Pin pass interval
    pub fn pin_interval(&self) -> Duration {
        Duration::from_millis(self.pin_interval_ms)
    }
}

/// Jog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JogSettings {
    /// Initial jog rate in units per minute
    pub default_rate: f64,
}

impl Default for JogSettings {
    fn default() -> Self {
        Self { default_rate: 15.0 }
    }
}

/// Status reporting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    /// Joints whose override-limit flags are reported
    pub override_limit_joints: usize,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            override_limit_joints: 8,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    #[default]
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level; `RUST_LOG` takes precedence
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Complete MachineWatch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    /// Poll timers
    pub polling: PollingSettings,
    /// Jog defaults
    pub jog: JogSettings,
    /// Status reporting
    pub status: StatusSettings,
    /// Logging
    pub logging: LoggingSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl WatchConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/machinewatch/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("machinewatch").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    ///
    /// Missing parent directories are created.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.polling.status_interval_ms == 0 {
            return Err(out_of_range("polling.status_interval_ms", 0));
        }

        if self.polling.pin_interval_ms == 0 {
            return Err(out_of_range("polling.pin_interval_ms", 0));
        }

        if !self.jog.default_rate.is_finite() || self.jog.default_rate <= 0.0 {
            return Err(out_of_range("jog.default_rate", self.jog.default_rate));
        }

        let joints = self.status.override_limit_joints;
        if joints == 0 || joints > MAX_JOINTS {
            return Err(out_of_range("status.override_limit_joints", joints));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::UnknownLogLevel(self.logging.level.clone()));
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
