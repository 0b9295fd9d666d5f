/*!
 * Replenish - self-healing resource pools
 *
 * Bounded pools of reusable resources with:
 * - Up-front fill of a fixed capacity
 * - Cancellation-aware acquisition
 * - Background refill of resources found invalid
 * - Idempotent close that disposes every idle resource exactly once
 * - TOML settings and structured logging
 *
 * The pool itself lives in `replenish-core-pool`; this crate adds settings
 * files and logging setup on top of it.
 */

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{LogLevel, LoggingConfig, PoolSettings, ReplenishConfig};
pub use error::{ErrorCategory, ReplenishError, Result};
pub use replenish_core_pool::{
    AtomicValidity, BoxError, CancellationToken, Disposal, Factory, Lease, Pool, PoolConfig,
    PoolError, PoolStats, Poolable,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build and fill a pool from file settings
pub async fn build_pool<R, F>(settings: &PoolSettings, factory: F) -> Result<Pool<R>>
where
    R: Poolable,
    F: Factory<R> + 'static,
{
    let config = settings.to_pool_config()?;
    tracing::debug!(
        pool = %config.name,
        capacity = config.capacity,
        refill_interval_ms = settings.refill_interval_ms,
        "Building pool from settings"
    );
    Ok(Pool::new(config, factory).await?)
}
