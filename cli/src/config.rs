use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::monitor::MonitorConfig;

pub const DEFAULT_BATTERY_THRESHOLD: f32 = 40.03;
pub const DEFAULT_CHARGE_THRESHOLD: f32 = 78.5;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 180;
pub const DEFAULT_FAST_POLL_INTERVAL_SECS: u64 = 5;

const LOG_FILE_NAME: &str = "battery_monitor.log";
const AUDIO_FILE_NAME: &str = "alarm.wav";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" => LogLevel::Off,
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    pub fn as_tracing_level(&self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be between 0 and 100, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub battery_threshold: f32,
    pub charge_threshold: f32,
    pub poll_interval_secs: u64,
    pub fast_poll_interval_secs: u64,
    pub audio_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LogLevel,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            battery_threshold: DEFAULT_BATTERY_THRESHOLD,
            charge_threshold: DEFAULT_CHARGE_THRESHOLD,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            fast_poll_interval_secs: DEFAULT_FAST_POLL_INTERVAL_SECS,
            audio_path: data_dir().join(AUDIO_FILE_NAME),
            log_file: data_dir().join(LOG_FILE_NAME),
            log_level: LogLevel::Info,
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("batwatch")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("batwatch")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn ensure_dirs() -> std::io::Result<()> {
    fs::create_dir_all(config_dir())?;
    fs::create_dir_all(data_dir())?;
    Ok(())
}

impl UserConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self) -> std::io::Result<()> {
        let _ = ensure_dirs();
        let path = config_path();
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(path, content)
    }

    pub fn merge_with_args(
        &mut self,
        battery_threshold: Option<f32>,
        charge_threshold: Option<f32>,
        poll_interval_secs: Option<u64>,
        audio_path: Option<PathBuf>,
    ) {
        if let Some(threshold) = battery_threshold {
            self.battery_threshold = threshold;
        }
        if let Some(threshold) = charge_threshold {
            self.charge_threshold = threshold;
        }
        if let Some(secs) = poll_interval_secs {
            self.poll_interval_secs = secs;
        }
        if let Some(path) = audio_path {
            self.audio_path = path;
        }
    }

    /// Resolve the file settings into the monitor's immutable configuration.
    pub fn monitor_config(&self) -> std::result::Result<MonitorConfig, ConfigError> {
        check_percent("battery_threshold", self.battery_threshold)?;
        check_percent("charge_threshold", self.charge_threshold)?;
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("poll_interval_secs"));
        }
        if self.fast_poll_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("fast_poll_interval_secs"));
        }

        Ok(MonitorConfig {
            battery_threshold: self.battery_threshold,
            charge_threshold: self.charge_threshold,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            fast_poll_interval: Duration::from_secs(self.fast_poll_interval_secs),
        })
    }
}

fn check_percent(name: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}
