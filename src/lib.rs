//! linguaflow - language-learning screen flow
//!
//! A terminal rendition of a language-learning client: onboarding, login and
//! registration forms, level and module selection, all driven by a generic
//! selection-and-navigation flow controller. Also ships the offline rewriter
//! used to patch screen source files in bulk.

use std::fmt;

pub mod app;
pub mod config;
pub mod flow;
pub mod logging;
pub mod models;
pub mod rewrite;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum LinguaError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Screen catalog is malformed or references unknown screens
    CatalogError(String),
    /// TUI rendering or interaction error
    TuiError(String),
    /// Rewrite rule could not be parsed or compiled
    RuleError(String),
    /// A file could not be rewritten
    RewriteError(String),
    /// Permission denied for file operations
    PermissionDenied(String),
    /// Logging subscriber could not be installed
    LoggingError(String),
}

impl fmt::Display for LinguaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinguaError::IoError(err) => write!(f, "I/O error: {}", err),
            LinguaError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            LinguaError::CatalogError(msg) => write!(f, "Screen catalog error: {}", msg),
            LinguaError::TuiError(msg) => write!(f, "TUI error: {}", msg),
            LinguaError::RuleError(msg) => write!(f, "Rewrite rule error: {}", msg),
            LinguaError::RewriteError(msg) => write!(f, "Rewrite error: {}", msg),
            LinguaError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            LinguaError::LoggingError(msg) => write!(f, "Logging error: {}", msg),
        }
    }
}

impl std::error::Error for LinguaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinguaError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LinguaError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                LinguaError::PermissionDenied(format!("Access denied: {}", err))
            }
            _ => LinguaError::IoError(err),
        }
    }
}

impl From<serde_json::Error> for LinguaError {
    fn from(err: serde_json::Error) -> Self {
        LinguaError::CatalogError(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for LinguaError {
    fn from(err: toml::de::Error) -> Self {
        LinguaError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for LinguaError {
    fn from(err: toml::ser::Error) -> Self {
        LinguaError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

impl From<regex::Error> for LinguaError {
    fn from(err: regex::Error) -> Self {
        LinguaError::RuleError(format!("invalid regex: {}", err))
    }
}

impl From<glob::PatternError> for LinguaError {
    fn from(err: glob::PatternError) -> Self {
        LinguaError::RuleError(format!("invalid file pattern: {}", err))
    }
}

/// Result type alias for linguaflow operations
pub type Result<T> = std::result::Result<T, LinguaError>;

/// Error handling utilities
pub mod error {
    use super::LinguaError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &LinguaError) -> String {
        match error {
            LinguaError::PermissionDenied(_) => {
                "Permission denied. Check file permissions for the target directory.".to_string()
            }
            LinguaError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings file.", msg)
            }
            LinguaError::CatalogError(msg) => {
                format!("Screen catalog is invalid: {}", msg)
            }
            LinguaError::RuleError(msg) => {
                format!("Rewrite rules could not be loaded: {}", msg)
            }
            LinguaError::TuiError(_) => {
                "The terminal could not be initialised. Try a larger terminal window.".to_string()
            }
            _ => error.to_string(),
        }
    }

    /// Whether the error is worth retrying on the next file of a batch run
    pub fn is_per_file_error(error: &LinguaError) -> bool {
        matches!(
            error,
            LinguaError::IoError(_)
                | LinguaError::PermissionDenied(_)
                | LinguaError::RewriteError(_)
        )
    }
}

// Common types and constants
pub const APP_NAME: &str = "linguaflow";
pub const CONFIG_FILE: &str = "linguaflow.toml";
pub const LOG_FILE: &str = "linguaflow.log";
pub const BACKUP_SUFFIX: &str = "backup";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_mapped() {
        let err: LinguaError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, LinguaError::PermissionDenied(_)));
        assert!(error::user_friendly_message(&err).contains("Permission denied"));
        assert!(error::is_per_file_error(&err));
    }

    #[test]
    fn test_rule_errors_abort_batches() {
        let err: LinguaError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, LinguaError::RuleError(_)));
        assert!(!error::is_per_file_error(&err));
    }
}
