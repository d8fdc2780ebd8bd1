//! Tick sources for timestamping edges.

use crate::sync::{AtomicU64, Ordering};

/// Monotonic tick counter read from interrupt context.
///
/// Implementations must be wait-free: no locks, no allocation.
pub trait TickSource {
    fn now(&self) -> u64;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    #[inline]
    fn now(&self) -> u64 {
        (**self).now()
    }
}

impl<T: TickSource + ?Sized> TickSource for alloc::sync::Arc<T> {
    #[inline]
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Tick counter advanced by an external timer, like a jiffies counter.
#[derive(Debug)]
pub struct ManualTicks {
    ticks: AtomicU64,
}

impl ManualTicks {
    pub fn new(start: u64) -> Self {
        Self {
            ticks: AtomicU64::new(start),
        }
    }

    #[inline]
    pub fn set(&self, ticks: u64) {
        self.ticks.store(ticks, Ordering::Release);
    }

    /// Advance by `delta` ticks and return the new count.
    #[inline]
    pub fn tick(&self, delta: u64) -> u64 {
        self.ticks.fetch_add(delta, Ordering::AcqRel).wrapping_add(delta)
    }
}

impl Default for ManualTicks {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TickSource for ManualTicks {
    #[inline]
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }
}

/// Milliseconds since creation, from the host monotonic clock.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTicks {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTicks {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTicks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TickSource for MonotonicTicks {
    #[inline]
    fn now(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn manual_ticks_advance() {
        let ticks = ManualTicks::new(100);
        assert_eq!(ticks.now(), 100);
        assert_eq!(ticks.tick(10), 110);
        ticks.set(5);
        assert_eq!((&ticks).now(), 5);
    }
}
