/*!
 * Error types for Replenish
 */

use std::fmt;
use std::io;
use std::path::PathBuf;

use replenish_core_pool::PoolError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplenishError>;

#[derive(Debug, Error)]
pub enum ReplenishError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Settings file is not valid TOML for this schema
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Error raised by a pool
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl ReplenishError {
    /// Check if this error is fatal (should not retry)
    pub fn is_fatal(&self) -> bool {
        match self {
            ReplenishError::Pool(e) => !e.is_transient(),
            ReplenishError::Config(_)
            | ReplenishError::Io { .. }
            | ReplenishError::Parse(_)
            | ReplenishError::Serialize(_) => true,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReplenishError::Config(_)
            | ReplenishError::Parse(_)
            | ReplenishError::Serialize(_) => ErrorCategory::Configuration,
            ReplenishError::Io { .. } => ErrorCategory::IoError,
            ReplenishError::Pool(PoolError::InvalidConfig(_)) => ErrorCategory::Configuration,
            ReplenishError::Pool(PoolError::Factory(_)) => ErrorCategory::Factory,
            ReplenishError::Pool(PoolError::Closing(_)) => ErrorCategory::Disposal,
            ReplenishError::Pool(_) => ErrorCategory::Availability,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration errors
    Configuration,
    /// I/O operation errors
    IoError,
    /// Resource creation failed
    Factory,
    /// Resource failed to close
    Disposal,
    /// No resource could be handed out (closed, exhausted, all invalid)
    Availability,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Factory => write!(f, "factory"),
            ErrorCategory::Disposal => write!(f, "disposal"),
            ErrorCategory::Availability => write!(f, "availability"),
        }
    }
}
