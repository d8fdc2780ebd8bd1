//! Interrupt-context producer.
//!
//! [`CaptureHandler::on_edge`] is what the platform calls on every rising edge. It
//! never blocks and never allocates: a debounce check, one record store, one index
//! publish and a wakeup.

use crate::buffer::EventBuffer;
use crate::clock::TickSource;
use crate::debounce::Debounce;

/// Outcome reported back to the interrupt dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqReturn {
    /// The interrupt was ours and has been serviced.
    Handled,
    /// The interrupt was not raised by this device.
    None,
}

/// Where captured events go: the buffer they are stored in and the readers to wake.
pub trait CaptureSink {
    fn buffer(&self) -> &EventBuffer;

    /// Wake every reader waiting for data. Must not block.
    fn wake_readers(&self);
}

impl<S: CaptureSink + ?Sized> CaptureSink for &S {
    #[inline]
    fn buffer(&self) -> &EventBuffer {
        (**self).buffer()
    }

    #[inline]
    fn wake_readers(&self) {
        (**self).wake_readers()
    }
}

impl<S: CaptureSink + ?Sized> CaptureSink for alloc::sync::Arc<S> {
    #[inline]
    fn buffer(&self) -> &EventBuffer {
        (**self).buffer()
    }

    #[inline]
    fn wake_readers(&self) {
        (**self).wake_readers()
    }
}

/// Counters kept by the handler.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Edges stored in the buffer.
    pub captured: u64,
    /// Edges rejected by the debounce filter.
    pub bounced: u64,
}

pub struct CaptureHandler<S, C> {
    sink: S,
    clock: C,
    debounce: Debounce,
    stats: CaptureStats,
}

impl<S: CaptureSink, C: TickSource> CaptureHandler<S, C> {
    /// `min_interval` of zero disables debouncing.
    pub fn new(sink: S, clock: C, min_interval: u64) -> Self {
        Self {
            sink,
            clock,
            debounce: Debounce::new(min_interval),
            stats: CaptureStats::default(),
        }
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    #[inline]
    pub fn debounce(&self) -> &Debounce {
        &self.debounce
    }

    /// Service one rising edge.
    pub fn on_edge(&mut self) -> IrqReturn {
        let now = self.clock.now();
        if !self.debounce.admit(now) {
            self.stats.bounced += 1;
            return IrqReturn::Handled;
        }

        // Keep the record store and head publish from being split by a nested edge.
        critical_section::with(|_| {
            self.sink.buffer().producer().push(now);
        });
        self.stats.captured += 1;

        self.sink.wake_readers();
        IrqReturn::Handled
    }
}

impl<S, C> core::fmt::Debug for CaptureHandler<S, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CaptureHandler")
            .field("debounce", &self.debounce)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
