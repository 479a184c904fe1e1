//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The interactive UI owns stdout, so it logs to a file. Batch commands log
//! to stderr. `RUST_LOG` always wins over the configured level.

use crate::{LinguaError, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub target: LogTarget,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            target: LogTarget::Stderr,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Map a `-v` count onto a level, starting from `base`
    pub fn from_verbosity(base: Level, verbosity: u8) -> Self {
        let level = if verbosity == 0 {
            base
        } else if verbosity == 1 && base < Level::DEBUG {
            Level::DEBUG
        } else {
            Level::TRACE
        };
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.with_ansi = matches!(target, LogTarget::Stderr);
        self.target = target;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "linguaflow={}",
                self.level.as_str().to_ascii_lowercase()
            ))
        })
    }
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed or the log file cannot be
/// opened.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(false)
        .with_ansi(config.with_ansi);

    let installed = match &config.target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
    };

    installed.map_err(|e| LinguaError::LoggingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(Level::INFO, 0).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(Level::INFO, 1).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(Level::INFO, 3).level, Level::TRACE);
        assert_eq!(LogConfig::from_verbosity(Level::DEBUG, 1).level, Level::TRACE);
    }

    #[test]
    fn test_file_target_disables_ansi() {
        let config = LogConfig::default().with_target(LogTarget::File(PathBuf::from("x.log")));
        assert!(!config.with_ansi);
    }
}
