//! Readers parked until the capture handler publishes data.
//!
//! A reader first registers in the [`WaitSet`], then re-checks its condition, and
//! only then parks. The handler publishes `head` before it walks the set, so either
//! the reader sees the new data on its re-check or the handler sees the reader and
//! unparks it. Unpark tokens are sticky, so a wakeup that lands between the re-check
//! and the park is not lost.
//!
//! The set is guarded by a critical section rather than a lock, so the interrupt
//! side never spins on a holder it has preempted.

use core::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Thread};
use std::time::Instant;
use std::vec::Vec;

use crate::error::{CaptureError, Result};

pub struct WaitSet {
    waiters: critical_section::Mutex<RefCell<Vec<Thread>>>,
}

impl core::fmt::Debug for WaitSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WaitSet").field("waiting", &self.len()).finish()
    }
}

impl Default for WaitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitSet {
    pub const fn new() -> Self {
        Self {
            waiters: critical_section::Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Number of parked readers.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.waiters.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unpark every registered reader. Safe to call from interrupt context.
    pub fn wake_all(&self) {
        critical_section::with(|cs| {
            for waiter in self.waiters.borrow_ref(cs).iter() {
                waiter.unpark();
            }
        });
    }

    fn register(&self) -> Registration<'_> {
        let current = thread::current();
        critical_section::with(|cs| self.waiters.borrow_ref_mut(cs).push(current));
        Registration { set: self }
    }

    /// Block until `ready` holds.
    ///
    /// Returns [`CaptureError::Interrupted`] as soon as `cancel` is signalled, and
    /// [`CaptureError::TimedOut`] once `deadline` passes. Without a deadline the wait
    /// is unbounded. A successful wait clears any pending signal.
    pub fn wait_until(
        &self,
        mut ready: impl FnMut() -> bool,
        cancel: &Cancel,
        deadline: Option<Instant>,
    ) -> Result<()> {
        while !ready() {
            let registration = self.register();
            if !ready() && !cancel.is_pending() {
                match deadline {
                    None => thread::park(),
                    Some(deadline) => {
                        let now = Instant::now();
                        if now >= deadline {
                            drop(registration);
                            return Err(CaptureError::TimedOut);
                        }
                        thread::park_timeout(deadline - now);
                    }
                }
            }
            drop(registration);

            if cancel.take() {
                return Err(CaptureError::Interrupted);
            }
        }
        // A signal that raced with the data is dropped along with the wait.
        cancel.take();
        Ok(())
    }
}

/// Membership of the current thread in a [`WaitSet`]; leaves the set on drop.
struct Registration<'a> {
    set: &'a WaitSet,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let id = thread::current().id();
        critical_section::with(|cs| {
            let mut waiters = self.set.waiters.borrow_ref_mut(cs);
            if let Some(pos) = waiters.iter().position(|t| t.id() == id) {
                waiters.swap_remove(pos);
            }
        });
    }
}

/// Interrupts a blocked read, like a signal delivered to the reading task.
///
/// A signal stays pending until the next wait. If that wait has to block, it fails
/// with [`CaptureError::Interrupted`]; if data is already there, it succeeds and the
/// signal is discarded. Either way the signal is consumed.
#[derive(Clone, Debug)]
pub struct Cancel {
    pending: Arc<AtomicBool>,
    waiters: Arc<WaitSet>,
}

impl Cancel {
    pub fn new(waiters: Arc<WaitSet>) -> Self {
        Self {
            pending: Arc::new(AtomicBool::new(false)),
            waiters,
        }
    }

    pub fn signal(&self) {
        self.pending.store(true, Ordering::SeqCst);
        self.waiters.wake_all();
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Consume a pending signal.
    #[inline]
    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}
