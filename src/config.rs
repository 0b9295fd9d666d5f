/*!
 * Configuration types for Replenish
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use replenish_core_pool::PoolConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ReplenishError, Result};

/// Top-level settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplenishConfig {
    /// Pool sizing and refill behaviour
    #[serde(default)]
    pub pool: PoolSettings,

    /// Diagnostic output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pool settings as written in the settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Number of resources kept by the pool
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Delay between refill attempts in milliseconds
    #[serde(default = "default_refill_interval_ms")]
    pub refill_interval_ms: u64,

    /// Name used in log events
    #[serde(default = "default_pool_name")]
    pub name: String,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            refill_interval_ms: default_refill_interval_ms(),
            name: default_pool_name(),
        }
    }
}

impl PoolSettings {
    /// Delay between refill attempts
    pub fn refill_interval(&self) -> Duration {
        Duration::from_millis(self.refill_interval_ms)
    }

    /// Convert into a validated pool configuration
    pub fn to_pool_config(&self) -> Result<PoolConfig> {
        let config = PoolConfig::with_capacity(self.capacity)
            .with_refill_interval(self.refill_interval())
            .with_name(self.name.clone());
        config.validate()?;
        Ok(config)
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level emitted when `RUST_LOG` is not set
    #[serde(default)]
    pub level: LogLevel,

    /// Write JSON logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Shorthand for `level = "debug"`
    #[serde(default)]
    pub verbose: bool,
}

impl LoggingConfig {
    /// Level after applying `verbose`
    pub fn effective_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            self.level.to_tracing_level()
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above (includes refill retries)
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn default_capacity() -> usize {
    10
}

fn default_refill_interval_ms() -> u64 {
    1000
}

fn default_pool_name() -> String {
    "pool".to_string()
}

impl ReplenishConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ReplenishError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ReplenishConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml_string()?;
        std::fs::write(path, contents).map_err(|source| ReplenishError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the settings describe a usable pool
    pub fn validate(&self) -> Result<()> {
        self.pool.to_pool_config().map(|_| ()).map_err(|e| match e {
            ReplenishError::Pool(pool_err) => ReplenishError::Config(pool_err.to_string()),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replenish_core_pool::PoolError;

    #[test]
    fn test_default_config() {
        let config = ReplenishConfig::default();
        assert_eq!(config.pool.capacity, 10);
        assert_eq!(config.pool.refill_interval(), Duration::from_secs(1));
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_pool_config() {
        let settings = PoolSettings {
            capacity: 3,
            refill_interval_ms: 250,
            name: "mailer".to_string(),
        };
        let config = settings.to_pool_config().unwrap();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.refill_interval, Duration::from_millis(250));
        assert_eq!(config.name, "mailer");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let settings = PoolSettings {
            capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.to_pool_config(),
            Err(ReplenishError::Pool(PoolError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_parse_partial_file_uses_defaults() {
        let config = ReplenishConfig::from_toml_str(
            r#"
[pool]
capacity = 4
"#,
        )
        .unwrap();
        assert_eq!(config.pool.capacity, 4);
        assert_eq!(config.pool.refill_interval_ms, 1000);
        assert_eq!(config.pool.name, "pool");
        assert!(!config.logging.verbose);
    }

    #[test]
    fn test_parse_full_file() {
        let toml_str = r#"
[pool]
capacity = 2
refill_interval_ms = 50
name = "publisher"

[logging]
level = "debug"
log_file = "/var/log/replenish.json"
verbose = false
"#;

        let config = ReplenishConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.pool.capacity, 2);
        assert_eq!(config.pool.refill_interval(), Duration::from_millis(50));
        assert_eq!(config.pool.name, "publisher");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.logging.log_file,
            Some(PathBuf::from("/var/log/replenish.json"))
        );
    }

    #[test]
    fn test_invalid_settings_rejected_on_parse() {
        let result = ReplenishConfig::from_toml_str("[pool]\nrefill_interval_ms = 0\n");
        assert!(matches!(result, Err(ReplenishError::Config(_))));

        let result = ReplenishConfig::from_toml_str("[pool]\ncapacity = \"many\"\n");
        assert!(matches!(result, Err(ReplenishError::Parse(_))));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = ReplenishConfig::default();
        let toml = config.to_toml_string().unwrap();
        let deserialized = ReplenishConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_verbose_overrides_level() {
        let logging = LoggingConfig {
            level: LogLevel::Error,
            log_file: None,
            verbose: true,
        };
        assert_eq!(logging.effective_level(), tracing::Level::DEBUG);
    }
}
