//! Bounded pool of reusable resources with background refill
//!
//! The pool is filled with `capacity` resources up front. Callers borrow one
//! with [`Pool::get`] and hand it back with [`Pool::put`]. Resources that are
//! found invalid on the way out are discarded and replaced by a background
//! refill worker, so a pool heals itself after transient failures.
//!
//! Idle resources live in a bounded tokio channel. The receiving half sits
//! behind an async mutex so that any number of tasks can wait in `get`; the
//! sending half sits behind a read/write lock whose exclusive side is only
//! taken by [`Pool::close`].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{PoolError, Result};
use crate::factory::Factory;
use crate::lease::Lease;
use crate::refill;
use crate::resource::{dispose, Poolable};

/// Configuration for pool behavior
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of resources the pool creates and keeps
    pub capacity: usize,
    /// Delay between refill attempts
    pub refill_interval: Duration,
    /// Name attached to every log event of this pool
    pub name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            refill_interval: Duration::from_secs(1),
            name: "pool".to_string(),
        }
    }
}

impl PoolConfig {
    /// Default configuration with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Set the delay between refill attempts
    pub fn with_refill_interval(mut self, refill_interval: Duration) -> Self {
        self.refill_interval = refill_interval;
        self
    }

    /// Set the name used in log events
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validate pool configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidConfig(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if self.refill_interval.is_zero() {
            return Err(PoolError::InvalidConfig(
                "refill_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Point-in-time view of a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Configured capacity
    pub capacity: usize,
    /// Resources currently waiting in the idle buffer
    pub idle: usize,
    /// Resources believed valid (idle + checked out - lost awaiting refill)
    pub healthy: usize,
    /// Whether the pool has been closed
    pub closed: bool,
}

impl PoolStats {
    /// Resources lost and not yet replaced by refill
    pub fn missing(&self) -> usize {
        self.capacity.saturating_sub(self.healthy)
    }

    /// True while refill still owes the pool at least one resource
    pub fn is_degraded(&self) -> bool {
        self.missing() > 0
    }
}

/// Shared state behind every [`Pool`] handle and refill worker
pub(crate) struct PoolInner<R> {
    pub(crate) config: PoolConfig,
    pub(crate) factory: Arc<dyn Factory<R>>,
    /// `None` once the pool is closed; guards the enqueue-or-dispose decision
    sender: RwLock<Option<mpsc::Sender<R>>>,
    receiver: Mutex<mpsc::Receiver<R>>,
    closed: AtomicBool,
    healthy: AtomicUsize,
}

impl<R: Poolable> PoolInner<R> {
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Return a resource to the idle buffer, or dispose of it when closed
    pub(crate) fn put(&self, resource: R) -> Result<()> {
        let sender = self.sender.read();
        let Some(tx) = sender.as_ref() else {
            return dispose(resource).map_err(PoolError::Closing);
        };

        match tx.try_send(resource) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(resource)) => {
                warn!(
                    pool = %self.config.name,
                    capacity = self.config.capacity,
                    "Idle buffer full, disposing surplus resource"
                );
                if let Err(e) = dispose(resource) {
                    debug!(pool = %self.config.name, error = %e, "Error closing surplus resource");
                }
                Err(PoolError::Overflow {
                    capacity: self.config.capacity,
                })
            }
            // Receiver is only closed after the sender has been taken
            Err(mpsc::error::TrySendError::Closed(resource)) => {
                dispose(resource).map_err(PoolError::Closing)
            }
        }
    }

    /// Record `lost` resources as no longer healthy
    pub(crate) fn mark_lost(&self, lost: usize) {
        let _ = self
            .healthy
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |healthy| {
                Some(healthy.saturating_sub(lost))
            });
    }

    /// Record one replacement produced by refill
    pub(crate) fn mark_restored(&self) {
        let capacity = self.config.capacity;
        let _ = self
            .healthy
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |healthy| {
                Some((healthy + 1).min(capacity))
            });
    }

    fn idle(&self) -> usize {
        match self.sender.read().as_ref() {
            Some(tx) => tx.max_capacity() - tx.capacity(),
            None => 0,
        }
    }
}

/// A bounded, self-healing resource pool
///
/// `Pool` is a cheap handle: clones share the same resources.
///
/// # Example
/// ```no_run
/// use replenish_core_pool::{AtomicValidity, Pool, PoolConfig, Poolable, PoolError};
/// use tokio_util::sync::CancellationToken;
///
/// struct Conn {
///     validity: AtomicValidity,
/// }
///
/// impl Poolable for Conn {
///     fn is_valid(&self) -> bool { self.validity.is_valid() }
///     fn invalidate(&self) { self.validity.invalidate() }
///     fn validate(&self) { self.validity.validate() }
/// }
///
/// # async fn example() -> Result<(), PoolError> {
/// let factory = || Ok::<_, std::io::Error>(Conn { validity: AtomicValidity::new(true) });
/// let pool = Pool::new(PoolConfig::with_capacity(4), factory).await?;
///
/// let conn = pool.get(&CancellationToken::new()).await?;
/// // Use connection, invalidate it on a broken pipe...
/// pool.put(conn)?;
///
/// pool.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Pool<R> {
    pub(crate) inner: Arc<PoolInner<R>>,
}

impl<R> Clone for Pool<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Poolable> Pool<R> {
    /// Create a pool and fill it with `config.capacity` resources.
    ///
    /// Fails if the configuration is invalid or if any factory call fails; in
    /// the latter case every resource created so far is disposed of.
    pub async fn new<F>(config: PoolConfig, factory: F) -> Result<Self>
    where
        F: Factory<R> + 'static,
    {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.capacity);
        let pool = Self {
            inner: Arc::new(PoolInner {
                healthy: AtomicUsize::new(config.capacity),
                config,
                factory: Arc::new(factory),
                sender: RwLock::new(Some(tx)),
                receiver: Mutex::new(rx),
                closed: AtomicBool::new(false),
            }),
        };

        for created in 0..pool.inner.config.capacity {
            let resource = match pool.inner.factory.create().await {
                Ok(resource) => resource,
                Err(e) => {
                    debug!(
                        pool = %pool.inner.config.name,
                        created,
                        error = %e,
                        "Factory failed during initial fill, tearing pool down"
                    );
                    pool.close().await;
                    return Err(PoolError::Factory(e));
                }
            };
            pool.inner.put(resource)?;
        }

        info!(
            pool = %pool.inner.config.name,
            capacity = pool.inner.config.capacity,
            "Pool filled"
        );

        Ok(pool)
    }

    /// Create a pool with default settings and the given capacity
    pub async fn with_capacity<F>(capacity: usize, factory: F) -> Result<Self>
    where
        F: Factory<R> + 'static,
    {
        Self::new(PoolConfig::with_capacity(capacity), factory).await
    }

    /// Take a valid resource out of the pool.
    ///
    /// Waits until a valid resource is idle, the pool is closed and drained,
    /// or `cancel` fires. Invalid resources met on the way are discarded and
    /// handed to a refill worker. Fails fast with
    /// [`PoolError::AllResourcesInvalid`] when no healthy resource is left.
    pub async fn get(&self, cancel: &CancellationToken) -> Result<R> {
        if self.inner.healthy.load(Ordering::Acquire) == 0 {
            return Err(PoolError::AllResourcesInvalid);
        }

        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PoolError::OutOfResources),
                received = self.recv() => received,
            };

            let Some(resource) = received else {
                return Err(PoolError::Closed);
            };

            if resource.is_valid() {
                return Ok(resource);
            }

            debug!(pool = %self.inner.config.name, "Discarding invalid resource");
            if let Err(e) = dispose(resource) {
                debug!(pool = %self.inner.config.name, error = %e, "Error closing invalid resource");
            }
            refill::spawn(Arc::downgrade(&self.inner), 1);
        }
    }

    /// Like [`get`](Self::get), giving up after `timeout`
    pub async fn get_timeout(&self, timeout: Duration) -> Result<R> {
        tokio::time::timeout(timeout, self.get(&CancellationToken::new()))
            .await
            .unwrap_or(Err(PoolError::OutOfResources))
    }

    /// Take a resource wrapped in a [`Lease`] that returns it on drop
    pub async fn lease(&self, cancel: &CancellationToken) -> Result<Lease<R>> {
        let resource = self.get(cancel).await?;
        Ok(Lease::new(self.clone(), resource))
    }

    /// Hand a resource back.
    ///
    /// While the pool is open the resource goes back to the idle buffer. Once
    /// closed, the resource is closed instead and any close error is returned.
    pub fn put(&self, resource: impl Into<Option<R>>) -> Result<()> {
        let resource = resource.into().ok_or(PoolError::NilResource)?;
        self.inner.put(resource)
    }

    /// Close the pool and every idle resource in it.
    ///
    /// Every call returns only once the idle buffer has been drained and
    /// each drained resource closed. Concurrent callers wait for the drain
    /// in progress; a drain abandoned by a dropped `close` future is picked
    /// up by the next call. Close errors of individual resources are logged
    /// and do not stop the drain.
    pub async fn close(&self) {
        let sender = {
            let mut sender = self.inner.sender.write();
            self.inner.closed.store(true, Ordering::Release);
            sender.take()
        };
        let first = sender.is_some();
        // Dropping the only sender wakes every waiting `get`
        drop(sender);

        // Held for the whole drain so later callers wait on it
        let mut receiver = self.inner.receiver.lock().await;
        receiver.close();

        let mut drained = 0usize;
        while let Ok(resource) = receiver.try_recv() {
            drained += 1;
            if let Err(e) = dispose(resource) {
                warn!(pool = %self.inner.config.name, error = %e, "Error closing resource");
            }
        }

        if first || drained > 0 {
            info!(pool = %self.inner.config.name, drained, "Pool closed");
        }
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.inner.config.capacity
    }

    /// Number of resources currently believed valid
    pub fn healthy(&self) -> usize {
        self.inner.healthy.load(Ordering::Acquire)
    }

    /// Snapshot of the pool state
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            idle: self.inner.idle(),
            healthy: self.healthy(),
            closed: self.is_closed(),
        }
    }

    async fn recv(&self) -> Option<R> {
        let mut receiver = self.inner.receiver.lock().await;
        // Idle resources left after close belong to the drain
        if self.inner.is_closed() {
            return None;
        }
        receiver.recv().await
    }
}

impl<R> std::fmt::Debug for Pool<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.inner.config.name)
            .field("capacity", &self.inner.config.capacity)
            .field("healthy", &self.inner.healthy.load(Ordering::Relaxed))
            .field("closed", &self.inner.closed.load(Ordering::Relaxed))
            .finish()
    }
}
