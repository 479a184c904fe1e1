//! Configuration management module
//!
//! Handles loading, saving, and validation of application preferences and
//! resolves which screen catalog the app runs with.

use crate::{LinguaError, Result, APP_NAME, CONFIG_FILE, LOG_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub mod catalog;

pub use catalog::{ScreenCatalog, ScreenKind, ScreenSpec};

/// Application preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Event poll timeout of the UI loop
    #[serde(with = "duration_str")]
    pub tick_rate: Duration,
    /// Whether screens play their intro transition on mount
    pub play_intro: bool,
    /// Length of the intro transition
    #[serde(with = "duration_str")]
    pub intro_duration: Duration,
    /// Optional TOML catalog replacing the built-in screens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    /// Log file for the interactive UI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Default log level, overridden by RUST_LOG
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
            play_intro: true,
            intro_duration: Duration::from_millis(400),
            catalog_path: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        const MIN_TICK: Duration = Duration::from_millis(10);
        const MAX_TICK: Duration = Duration::from_secs(2);
        if self.tick_rate < MIN_TICK || self.tick_rate > MAX_TICK {
            return Err(LinguaError::ConfigError(format!(
                "Tick rate must be between {} and {}",
                humantime::format_duration(MIN_TICK),
                humantime::format_duration(MAX_TICK)
            )));
        }

        if self.play_intro && self.intro_duration.is_zero() {
            return Err(LinguaError::ConfigError(
                "Intro duration must be greater than zero".to_string(),
            ));
        }

        const MAX_INTRO: Duration = Duration::from_secs(5);
        if self.intro_duration > MAX_INTRO {
            return Err(LinguaError::ConfigError(format!(
                "Intro duration too long: {} (max: {})",
                humantime::format_duration(self.intro_duration),
                humantime::format_duration(MAX_INTRO)
            )));
        }

        if tracing::Level::from_str(&self.log_level).is_err() {
            return Err(LinguaError::ConfigError(format!(
                "Unknown log level '{}'",
                self.log_level
            )));
        }

        if let Some(path) = &self.catalog_path {
            if !path.is_file() {
                return Err(LinguaError::ConfigError(format!(
                    "Catalog file does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_play_intro(mut self, play: bool) -> Self {
        self.play_intro = play;
        self
    }

    pub fn with_intro_duration(mut self, duration: Duration) -> Self {
        self.intro_duration = duration;
        self
    }

    pub fn with_catalog_path(mut self, path: PathBuf) -> Self {
        self.catalog_path = Some(path);
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            LinguaError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            LinguaError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LinguaError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| {
            LinguaError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/linguaflow/linguaflow.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            LinguaError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Log file used by the interactive UI
    /// Defaults to $DATA_HOME/linguaflow/linguaflow.log
    pub fn log_file_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().ok_or_else(|| {
            LinguaError::ConfigError("Unable to determine data directory".to_string())
        })?;

        Ok(data_dir.join(APP_NAME).join(LOG_FILE))
    }

    /// Screen catalog to run with: the configured file or the built-in one
    pub fn load_catalog(&self) -> Result<ScreenCatalog> {
        match &self.catalog_path {
            Some(path) => ScreenCatalog::load(path),
            None => Ok(ScreenCatalog::builtin()),
        }
    }
}

/// Durations written as human-readable strings such as "250ms"
mod duration_str {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::new()
            .with_tick_rate(Duration::from_millis(250))
            .with_play_intro(false);
        let toml_str = toml::to_string(&config).expect("Failed to serialize to TOML");
        assert!(toml_str.contains("tick_rate = \"250ms\""));
        let deserialized: AppConfig =
            toml::from_str(&toml_str).expect("Failed to deserialize from TOML");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("intro_duration = \"1s 200ms\"").unwrap();
        assert_eq!(config.intro_duration, Duration::from_millis(1200));
        assert_eq!(config.tick_rate, AppConfig::default().tick_rate);
        assert!(config.play_intro);
    }

    #[test]
    fn test_bad_duration_rejected() {
        assert!(toml::from_str::<AppConfig>("tick_rate = \"soon\"").is_err());
    }

    #[test]
    fn test_validation_limits() {
        assert!(AppConfig::new()
            .with_tick_rate(Duration::from_millis(1))
            .validate()
            .is_err());
        assert!(AppConfig::new()
            .with_intro_duration(Duration::from_secs(10))
            .validate()
            .is_err());
        assert!(AppConfig::new()
            .with_intro_duration(Duration::ZERO)
            .validate()
            .is_err());
        // a zero duration is harmless when the intro never plays
        AppConfig::new()
            .with_play_intro(false)
            .with_intro_duration(Duration::ZERO)
            .validate()
            .unwrap();
        assert!(AppConfig::new().with_log_level("loud").validate().is_err());
        assert!(AppConfig::new()
            .with_catalog_path(PathBuf::from("/definitely/not/here.toml"))
            .validate()
            .is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = AppConfig::new().with_log_level("debug");
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_config_file_path() {
        match dirs::config_dir() {
            Some(dir) => assert_eq!(
                AppConfig::config_file_path().unwrap(),
                dir.join(APP_NAME).join(CONFIG_FILE)
            ),
            None => assert!(AppConfig::config_file_path().is_err()),
        }
    }

    #[test]
    fn test_builtin_catalog_without_path() {
        let catalog = AppConfig::default().load_catalog().unwrap();
        assert_eq!(catalog, ScreenCatalog::builtin());
    }
}
