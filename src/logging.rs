/*!
 * Logging and tracing initialization
 */

use std::fs::File;
use std::path::Path;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::error::{ReplenishError, Result};

/// Crates whose events are enabled by the default filter
const LOG_TARGETS: [&str; 2] = ["replenish", "replenish_core_pool"];

/// Build the default filter directive for a level, e.g.
/// `replenish=info,replenish_core_pool=info`
pub fn default_directive(level: tracing::Level) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Output layer type shared by the stderr and file destinations
pub type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize structured logging based on configuration
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config.effective_level())))
        .map_err(|e| ReplenishError::Config(format!("Failed to create log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(output_layer(config.log_file.as_deref())?)
        .with(env_filter)
        .try_init()
        .map_err(|e| ReplenishError::Config(format!("Failed to install logger: {}", e)))
}

/// Pick the output layer: JSON lines into `log_file`, or compact text on stderr
pub fn output_layer(log_file: Option<&Path>) -> Result<OutputLayer> {
    let Some(log_path) = log_file else {
        return Ok(fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
            .boxed());
    };

    let file = File::create(log_path).map_err(|source| ReplenishError::Io {
        path: log_path.to_path_buf(),
        source,
    })?;

    Ok(fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .json()
        .boxed())
}

/// Initialize logging with custom format for testing
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(tracing::Level::DEBUG)));

        let fmt_layer = fmt::layer().with_test_writer().with_target(false).compact();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .ok(); // Ignore error if already initialized
    });
}
