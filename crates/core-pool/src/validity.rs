//! Atomic validity flag for pooled resources
//!
//! Resources embed an [`AtomicValidity`] and forward the validity half of
//! [`Poolable`](crate::Poolable) to it. The flag is a plain atomic boolean, so
//! a caller holding the resource and the pool inspecting it never need a lock.
//!
//! # Example
//!
//! ```
//! use replenish_core_pool::AtomicValidity;
//!
//! let validity = AtomicValidity::new(true);
//! assert!(validity.is_valid());
//!
//! validity.invalidate();
//! assert!(!validity.is_valid());
//!
//! validity.validate();
//! assert!(validity.is_valid());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

/// Validity state backed by an [`AtomicBool`]
#[derive(Debug)]
pub struct AtomicValidity {
    valid: AtomicBool,
}

impl AtomicValidity {
    /// Create a flag with the given initial state
    pub const fn new(valid: bool) -> Self {
        Self {
            valid: AtomicBool::new(valid),
        }
    }

    /// Current state of the flag
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Mark the resource as unusable; the pool will discard and replace it
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    /// Mark the resource as usable again
    pub fn validate(&self) {
        self.valid.store(true, Ordering::Release);
    }
}

impl Default for AtomicValidity {
    fn default() -> Self {
        Self::new(true)
    }
}
