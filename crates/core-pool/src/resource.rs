//! The pooled resource contract
//!
//! A resource is opaque to the pool. The pool only needs to know whether it
//! is still usable and, when the pool disposes of it, how to close it.
//!
//! Closing comes in three shapes, resolved once per resource through
//! [`Poolable::disposal`]:
//!
//! - [`Disposal::Drop`]: nothing to release beyond dropping the value
//! - [`Disposal::Close`]: an infallible close action
//! - [`Disposal::TryClose`]: a close action that can fail
//!
//! # Example
//!
//! ```
//! use replenish_core_pool::{AtomicValidity, Disposal, Poolable};
//!
//! struct Session {
//!     validity: AtomicValidity,
//! }
//!
//! impl Session {
//!     fn shutdown(self) -> std::io::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! impl Poolable for Session {
//!     fn is_valid(&self) -> bool {
//!         self.validity.is_valid()
//!     }
//!
//!     fn invalidate(&self) {
//!         self.validity.invalidate()
//!     }
//!
//!     fn validate(&self) {
//!         self.validity.validate()
//!     }
//!
//!     fn disposal(self) -> Disposal {
//!         Disposal::try_close(move || self.shutdown())
//!     }
//! }
//!
//! let session = Session { validity: AtomicValidity::new(true) };
//! assert!(session.disposal().run().is_ok());
//! ```

use std::fmt;

use crate::error::BoxError;

/// A reusable resource that can live in a [`Pool`](crate::Pool)
pub trait Poolable: Send + 'static {
    /// Whether the resource may still be handed out. Invalid resources are
    /// discarded by the pool and replaced in the background.
    fn is_valid(&self) -> bool;

    /// Mark the resource as unusable
    fn invalidate(&self);

    /// Mark the resource as usable
    fn validate(&self);

    /// Resolve how this resource is released when the pool disposes of it.
    ///
    /// The default has no close action: the resource is simply dropped.
    fn disposal(self) -> Disposal
    where
        Self: Sized,
    {
        Disposal::Drop
    }
}

/// Close action of a resource that is leaving the pool for good
pub enum Disposal {
    /// No close action
    Drop,
    /// Close action that cannot fail
    Close(Box<dyn FnOnce() + Send>),
    /// Close action that reports failure
    TryClose(Box<dyn FnOnce() -> Result<(), BoxError> + Send>),
}

impl Disposal {
    /// Wrap an infallible close action
    pub fn close<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Disposal::Close(Box::new(f))
    }

    /// Wrap a fallible close action
    pub fn try_close<F, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Disposal::TryClose(Box::new(move || f().map_err(Into::into)))
    }

    /// Run the close action, if any
    pub fn run(self) -> Result<(), BoxError> {
        match self {
            Disposal::Drop => Ok(()),
            Disposal::Close(close) => {
                close();
                Ok(())
            }
            Disposal::TryClose(close) => close(),
        }
    }
}

impl fmt::Debug for Disposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Disposal::Drop => "Drop",
            Disposal::Close(_) => "Close",
            Disposal::TryClose(_) => "TryClose",
        };
        f.debug_tuple("Disposal").field(&kind).finish()
    }
}

/// Dispose of a resource through its close action
pub(crate) fn dispose<R: Poolable>(resource: R) -> Result<(), BoxError> {
    resource.disposal().run()
}
