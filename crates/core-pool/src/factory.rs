//! Resource factories
//!
//! The pool calls its factory `capacity` times while being built and again
//! from the refill worker whenever a resource is lost. Any
//! `Fn() -> Result<R, E>` closure is a factory; types that need to await
//! (dialing a socket, a handshake) implement [`Factory`] directly.

use async_trait::async_trait;

use crate::error::BoxError;

/// Factory trait for creating pooled resources
#[async_trait]
pub trait Factory<R>: Send + Sync {
    /// Create a new resource
    async fn create(&self) -> Result<R, BoxError>;
}

#[async_trait]
impl<R, E, F> Factory<R> for F
where
    R: Send + 'static,
    E: Into<BoxError>,
    F: Fn() -> Result<R, E> + Send + Sync,
{
    async fn create(&self) -> Result<R, BoxError> {
        (self)().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        created: AtomicUsize,
    }

    #[async_trait]
    impl Factory<usize> for Counting {
        async fn create(&self) -> Result<usize, BoxError> {
            tokio::task::yield_now().await;
            Ok(self.created.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[tokio::test]
    async fn test_closure_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let factory = {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, io::Error>("conn")
            }
        };

        assert_eq!(factory.create().await.unwrap(), "conn");
        assert_eq!(factory.create().await.unwrap(), "conn");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_closure_factory_error_is_boxed() {
        let factory = || Err::<u8, _>(io::Error::other("boom"));
        let err = factory.create().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_async_factory() {
        let factory = Counting {
            created: AtomicUsize::new(0),
        };
        assert_eq!(factory.create().await.unwrap(), 1);
        assert_eq!(factory.create().await.unwrap(), 2);
    }
}
