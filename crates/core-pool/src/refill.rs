//! Refill: background replacement of lost resources
//!
//! When `get` discards an invalid resource the pool shrinks by one. A refill
//! worker is spawned for the loss: it lowers the healthy count right away and
//! then calls the factory until it has produced a replacement and returned it
//! to the pool.
//!
//! Failures never reach a caller. The worker logs them at debug level and tries
//! again after the pool's refill interval, indefinitely, until it succeeds or
//! the pool is closed or dropped. The only outside sign of a failing factory is
//! a healthy count that stays below capacity.

use std::sync::Weak;

use tracing::debug;

use crate::pool::PoolInner;
use crate::resource::Poolable;

/// Spawn a detached worker replacing `lost` resources
pub(crate) fn spawn<R: Poolable>(pool: Weak<PoolInner<R>>, lost: usize) {
    if lost == 0 {
        return;
    }
    tokio::spawn(refill(pool, lost));
}

/// Replace `lost` resources, retrying every refill interval.
///
/// Holds only a weak reference between attempts so that an abandoned pool is
/// not kept alive by its own workers.
pub(crate) async fn refill<R: Poolable>(pool: Weak<PoolInner<R>>, lost: usize) -> usize {
    let Some(inner) = pool.upgrade() else {
        return 0;
    };
    inner.mark_lost(lost);
    drop(inner);

    let mut replaced = 0;
    while replaced < lost {
        let Some(inner) = pool.upgrade() else {
            return replaced;
        };
        if inner.is_closed() {
            return replaced;
        }

        match inner.factory.create().await {
            Ok(resource) => match inner.put(resource) {
                Ok(()) => {
                    replaced += 1;
                    inner.mark_restored();
                }
                Err(e) => {
                    debug!(pool = %inner.config.name, error = %e, retry = true, "Unable to refill pool");
                }
            },
            Err(e) => {
                debug!(pool = %inner.config.name, error = %e, retry = true, "Unable to refill pool");
            }
        }

        if replaced < lost {
            let interval = inner.config.refill_interval;
            drop(inner);
            tokio::time::sleep(interval).await;
        }
    }

    replaced
}
