//! MachineWatch Settings Crate
//!
//! Loads, validates and saves the watcher configuration.

pub mod config;
pub mod error;

pub use config::{
    JogSettings, LogFormat, LoggingSettings, PollingSettings, StatusSettings, WatchConfig,
    MAX_JOINTS,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
