//! Atomic and lock primitives used for the cross-context state.
//!
//! `head`, `tail`, the record slots and the message lock go through this module so
//! the same code runs on `core` atomics, on `portable-atomic` (targets without native
//! 64-bit atomics), or under the `loom` model checker.

#[cfg(all(not(feature = "loom"), not(feature = "portable-atomic")))]
pub(crate) use core::sync::atomic::{AtomicI32, AtomicU64, AtomicUsize, Ordering};

#[cfg(all(not(feature = "loom"), feature = "portable-atomic"))]
pub(crate) use portable_atomic::{AtomicI32, AtomicU64, AtomicUsize, Ordering};

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicI32, AtomicU64, AtomicUsize, Ordering};

#[cfg(not(feature = "loom"))]
pub(crate) use spinning_top::Spinlock;

/// Stand-in for the spin lock that loom can schedule around.
#[cfg(feature = "loom")]
pub(crate) struct Spinlock<T> {
    inner: loom::sync::Mutex<T>,
}

#[cfg(feature = "loom")]
impl<T> Spinlock<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            inner: loom::sync::Mutex::new(value),
        }
    }

    pub(crate) fn lock(&self) -> impl core::ops::DerefMut<Target = T> + '_ {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(feature = "loom")]
impl<T> core::fmt::Debug for Spinlock<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Spinlock").finish_non_exhaustive()
    }
}
