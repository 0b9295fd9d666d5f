//! Replenish Core Pool: a bounded, self-healing resource pool
//!
//! # Overview
//!
//! This crate provides a generic pool of reusable resources (connections,
//! sessions, handles) that:
//!
//! - **Fills up front**: `capacity` resources are created when the pool is built
//! - **Blocks, not rejects**: `get` waits for an idle resource, honoring a
//!   cancellation token
//! - **Heals itself**: resources marked invalid are discarded on the way out and
//!   replaced by a background refill worker
//! - **Closes cleanly**: `close` drains and closes idle resources exactly once;
//!   resources returned afterwards are closed instead of pooled
//!
//! # Key Principles
//!
//! This crate is **pure logic** with zero knowledge of what is pooled. A
//! resource only has to report whether it is valid and, optionally, how to
//! close itself (see [`Poolable`] and [`Disposal`]).
//!
//! # Architecture
//!
//! ```text
//!   get(cancel) ──────────────┐            ┌────────────── put(resource)
//!                             ▼            │
//!                ┌──────────────────────┐  │  read lock: open? enqueue
//!                │  idle buffer (FIFO,  │◄─┘             closed? dispose
//!                │  bounded, capacity C)│
//!                └──────────┬───────────┘◄──── close(): write lock, drain
//!                           │
//!                 invalid?  ▼
//!                ┌──────────────────────┐
//!                │   refill worker      │  healthy -= n, then factory()
//!                │  (detached task)     │  + put() every refill_interval
//!                └──────────────────────┘  until replaced or closed
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use replenish_core_pool::prelude::*;
//! use std::time::Duration;
//!
//! struct Conn {
//!     validity: AtomicValidity,
//! }
//!
//! impl Conn {
//!     fn publish(&self, _msg: &str) -> std::io::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! impl Poolable for Conn {
//!     fn is_valid(&self) -> bool { self.validity.is_valid() }
//!     fn invalidate(&self) { self.validity.invalidate() }
//!     fn validate(&self) { self.validity.validate() }
//! }
//!
//! # async fn example() -> Result<(), PoolError> {
//! let config = PoolConfig::with_capacity(8)
//!     .with_refill_interval(Duration::from_millis(500))
//!     .with_name("publisher");
//! let factory = || Ok::<_, std::io::Error>(Conn { validity: AtomicValidity::new(true) });
//! let pool = Pool::new(config, factory).await?;
//!
//! let conn = pool.lease(&CancellationToken::new()).await?;
//! if conn.publish("hello").is_err() {
//!     // Broken connection: the pool replaces it in the background
//!     conn.invalidate();
//! }
//! drop(conn);
//!
//! pool.close().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod factory;
pub mod lease;
pub mod pool;
mod refill;
pub mod resource;
pub mod validity;

// Re-export main types for convenience
pub use error::{BoxError, PoolError, Result};
pub use factory::Factory;
pub use lease::Lease;
pub use pool::{Pool, PoolConfig, PoolStats};
pub use resource::{Disposal, Poolable};
pub use tokio_util::sync::CancellationToken;
pub use validity::AtomicValidity;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use replenish_core_pool::prelude::*;
/// ```
pub mod prelude {
    pub use super::error::{BoxError, PoolError};
    pub use super::factory::Factory;
    pub use super::lease::Lease;
    pub use super::pool::{Pool, PoolConfig, PoolStats};
    pub use super::resource::{Disposal, Poolable};
    pub use super::validity::AtomicValidity;
    pub use tokio_util::sync::CancellationToken;
}
