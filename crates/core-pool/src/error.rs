//! Error types for the resource pool

use thiserror::Error;

/// Boxed error produced by factories and closing resources
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the pool crate
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur in pool operations
#[derive(Debug, Error)]
pub enum PoolError {
    /// Pool configuration is unusable (zero capacity, zero refill interval)
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// Factory failed while filling the pool
    #[error("Factory is not able to fill the pool: {0}")]
    Factory(#[source] BoxError),

    /// Pool is closed and no idle resources remain
    #[error("Pool is closed")]
    Closed,

    /// Acquisition was cancelled before a valid resource became available
    #[error("No resources were found in time")]
    OutOfResources,

    /// Every resource the pool knows about is invalid
    #[error("All resources are in an invalid state")]
    AllResourcesInvalid,

    /// `put` was called without a resource
    #[error("Rejecting <none> resource")]
    NilResource,

    /// Resource failed to close while being disposed of
    #[error("Failed to close resource: {0}")]
    Closing(#[source] BoxError),

    /// Idle buffer already holds `capacity` resources
    #[error("Idle buffer is full ({capacity} resources), surplus resource disposed")]
    Overflow { capacity: usize },
}

impl PoolError {
    /// Check if retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, PoolError::OutOfResources | PoolError::Overflow { .. })
    }

    /// Check if this error means the pool will never hand out resources again
    pub fn is_closed(&self) -> bool {
        matches!(self, PoolError::Closed)
    }
}
