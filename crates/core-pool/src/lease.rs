//! Lease: a checked-out resource that goes back to its pool on drop
//!
//! The usual way to use a pooled connection is: take it, use it, invalidate
//! it if the use failed because the connection broke, and hand it back no
//! matter what. [`Lease`] does the last step in `Drop`, so early returns and
//! `?` cannot leak a resource out of the pool.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::pool::Pool;
use crate::resource::Poolable;

/// A resource borrowed from a [`Pool`]
pub struct Lease<R: Poolable> {
    resource: Option<R>,
    pool: Pool<R>,
}

impl<R: Poolable> Lease<R> {
    pub(crate) fn new(pool: Pool<R>, resource: R) -> Self {
        Self {
            resource: Some(resource),
            pool,
        }
    }

    /// Take the resource out of the lease; it will not be returned on drop
    pub fn detach(mut self) -> R {
        // Only `Drop` and `detach` take the resource, and both consume the lease
        match self.resource.take() {
            Some(resource) => resource,
            None => unreachable!("lease resource taken twice"),
        }
    }

    /// Mark the resource invalid; the pool discards and replaces it on the next `get`
    pub fn invalidate(&self) {
        if let Some(resource) = &self.resource {
            resource.invalidate();
        }
    }
}

impl<R: Poolable> Deref for Lease<R> {
    type Target = R;

    fn deref(&self) -> &R {
        match &self.resource {
            Some(resource) => resource,
            None => unreachable!("lease used after release"),
        }
    }
}

impl<R: Poolable> DerefMut for Lease<R> {
    fn deref_mut(&mut self) -> &mut R {
        match &mut self.resource {
            Some(resource) => resource,
            None => unreachable!("lease used after release"),
        }
    }
}

impl<R: Poolable> Drop for Lease<R> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            if let Err(e) = self.pool.put(resource) {
                warn!(error = %e, "Cannot put resource back into the pool");
            }
        }
    }
}

impl<R: Poolable + std::fmt::Debug> std::fmt::Debug for Lease<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lease")
            .field("resource", &self.resource)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::pool::PoolConfig;
    use crate::validity::AtomicValidity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug)]
    struct Conn {
        id: usize,
        validity: AtomicValidity,
    }

    impl Poolable for Conn {
        fn is_valid(&self) -> bool {
            self.validity.is_valid()
        }

        fn invalidate(&self) {
            self.validity.invalidate()
        }

        fn validate(&self) {
            self.validity.validate()
        }
    }

    async fn pool(capacity: usize) -> (Pool<Conn>, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let factory = {
            let created = Arc::clone(&created);
            move || {
                Ok::<_, BoxError>(Conn {
                    id: created.fetch_add(1, Ordering::SeqCst) + 1,
                    validity: AtomicValidity::new(true),
                })
            }
        };
        let config =
            PoolConfig::with_capacity(capacity).with_refill_interval(Duration::from_millis(1));
        (Pool::new(config, factory).await.unwrap(), created)
    }

    #[tokio::test]
    async fn test_lease_returns_on_drop() {
        let (pool, _) = pool(1).await;
        let cancel = CancellationToken::new();

        {
            let lease = pool.lease(&cancel).await.unwrap();
            assert_eq!(lease.id, 1);
            assert_eq!(pool.stats().idle, 0);
        }

        assert_eq!(pool.stats().idle, 1);
    }

    #[tokio::test]
    async fn test_detach_keeps_resource_out() {
        let (pool, _) = pool(1).await;
        let lease = pool.lease(&CancellationToken::new()).await.unwrap();

        let conn = lease.detach();
        assert_eq!(conn.id, 1);
        assert_eq!(pool.stats().idle, 0);
    }

    #[tokio::test]
    async fn test_invalidated_lease_is_replaced() {
        let (pool, created) = pool(1).await;
        let cancel = CancellationToken::new();

        let lease = pool.lease(&cancel).await.unwrap();
        lease.invalidate();
        drop(lease);

        // The invalid one is discarded and the refill worker supplies a new one
        let fresh = pool.get_timeout(Duration::from_secs(5)).await.unwrap();
        assert_eq!(fresh.id, 2);
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lease_after_close_disposes() {
        let (pool, _) = pool(1).await;
        let lease = pool.lease(&CancellationToken::new()).await.unwrap();

        pool.close().await;
        drop(lease);

        assert_eq!(pool.stats().idle, 0);
        assert!(pool.stats().closed);
    }
}
