//! Fixed-capacity circular buffer of edge timestamps.
//!
//! # Overview
//! - Single producer (the capture handler), single consumer (the reader).
//! - `head` is the next byte offset to write and is stored only by the producer.
//! - `tail` is the next byte offset to read and is stored only by the consumer.
//! - Empty when `head == tail`. There is no full state: a producer that laps the
//!   consumer overwrites pending records and the backlog disappears. Such laps are
//!   counted in [`EventBuffer::overruns`] but are not reported as errors.
//!
//! # Memory ordering
//! The producer stores the record, then publishes the advanced `head` with `Release`.
//! The consumer loads `head` with `Acquire` before touching any record behind it, so
//! a published index is never observed ahead of its data. Every index update is
//! computed in full before a single store, so neither side can see a half-advanced
//! offset. Records are 64-bit atomics, so an overwrite never yields a torn value.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{CaptureError, Resource, Result};
use crate::sync::{AtomicU64, AtomicUsize, Ordering};

/// Size of one event record (a `u64` tick count) in bytes.
pub const RECORD_SIZE: usize = core::mem::size_of::<u64>();

/// A capacity is usable when it is a multiple of [`RECORD_SIZE`] holding at least two
/// records. With a single slot every push would land `head` back on `tail`.
pub fn check_capacity(capacity: usize) -> Result<()> {
    if capacity < 2 * RECORD_SIZE || capacity % RECORD_SIZE != 0 {
        return Err(CaptureError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// Longest line [`RecordLine`] can produce: 20 digits of `u64::MAX` and a newline.
pub const MAX_LINE_LEN: usize = 21;

/// A record rendered for delivery: zero-padded to 16 decimal digits, newline-terminated.
#[derive(Clone, Copy)]
pub struct RecordLine {
    bytes: [u8; MAX_LINE_LEN],
    len: usize,
}

impl RecordLine {
    pub fn new(timestamp: u64) -> Self {
        let mut line = Self {
            bytes: [0; MAX_LINE_LEN],
            len: 0,
        };
        // Cannot fail: the widest value fits in `MAX_LINE_LEN`.
        let _ = core::fmt::write(&mut line, format_args!("{timestamp:016}\n"));
        line
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl core::fmt::Write for RecordLine {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let end = self.len + s.len();
        let dst = self.bytes.get_mut(self.len..end).ok_or(core::fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl core::fmt::Debug for RecordLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RecordLine({:?})", core::str::from_utf8(self.as_bytes()))
    }
}

/// What a consumer drain observed.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Drain {
    /// Newest record, the one immediately behind `head`.
    pub latest: u64,
    /// Bytes the tail moved past, including the skipped backlog.
    pub advanced: usize,
}

impl Drain {
    /// Records passed over without being delivered.
    pub fn skipped(&self) -> usize {
        (self.advanced / RECORD_SIZE).saturating_sub(1)
    }
}

pub struct EventBuffer {
    capacity: usize,
    head: AtomicUsize,
    tail: AtomicUsize,
    overruns: AtomicUsize,
    slots: Box<[AtomicU64]>,
}

impl core::fmt::Debug for EventBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBuffer")
            .field("capacity", &self.capacity)
            .field("head", &self.head())
            .field("tail", &self.tail())
            .field("overruns", &self.overruns())
            .finish()
    }
}

impl EventBuffer {
    /// Allocate a buffer of `capacity` bytes. Allocation failure is reported instead
    /// of aborting, since this runs during device bring-up.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        let records = capacity / RECORD_SIZE;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(records)
            .map_err(|_| CaptureError::ResourceUnavailable(Resource::Buffer))?;
        slots.extend((0..records).map(|_| AtomicU64::new(0)));

        Ok(Self {
            capacity,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overruns: AtomicUsize::new(0),
            slots: slots.into_boxed_slice(),
        })
    }

    /// Capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Next position after moving `delta` bytes from `index`, wrapping to the start of
    /// the buffer once the end is reached.
    #[inline(always)]
    pub fn advance(&self, index: usize, delta: usize) -> usize {
        let next = index + delta;
        if next >= self.capacity { 0 } else { next }
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.head.load(Ordering::Acquire)
    }

    #[inline]
    pub fn tail(&self) -> usize {
        self.tail.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head() == self.tail()
    }

    /// How many times the producer lapped a pending backlog.
    #[inline]
    pub fn overruns(&self) -> usize {
        self.overruns.load(Ordering::Relaxed)
    }

    /// Bytes between `tail` and `head`. When `head` has wrapped behind `tail` only the
    /// stretch up to the end of the buffer counts, so a drain stops at the wrap point.
    pub fn available(&self) -> usize {
        self.distance(self.tail(), self.head())
    }

    #[inline(always)]
    fn distance(&self, tail: usize, head: usize) -> usize {
        if head >= tail {
            head - tail
        } else {
            self.capacity - tail
        }
    }

    /// Create the producer handle. Only one producer may be active.
    #[inline]
    pub fn producer(&self) -> Producer<'_> {
        Producer { buffer: self }
    }

    /// Create the consumer handle. Only one consumer may be active.
    #[inline]
    pub fn consumer(&self) -> Consumer<'_> {
        Consumer { buffer: self }
    }

    #[inline(always)]
    fn slot(&self, offset: usize) -> &AtomicU64 {
        &self.slots[offset / RECORD_SIZE]
    }

    #[inline]
    fn push_inner(&self, value: u64) -> usize {
        // Only this side stores `head`, so a relaxed load sees our own last store.
        let head = self.head.load(Ordering::Relaxed);
        let had_backlog = head != self.tail.load(Ordering::Acquire);

        self.slot(head).store(value, Ordering::Relaxed);

        let next = self.advance(head, RECORD_SIZE);
        if had_backlog && next == self.tail.load(Ordering::Acquire) {
            self.overruns.fetch_add(1, Ordering::Relaxed);
        }
        self.head.store(next, Ordering::Release);
        next
    }

    #[inline(always)]
    fn record_behind(&self, head: usize) -> u64 {
        let offset = if head == 0 {
            self.capacity - RECORD_SIZE
        } else {
            head - RECORD_SIZE
        };
        self.slot(offset).load(Ordering::Relaxed)
    }

    #[inline]
    fn latest_inner(&self) -> Option<u64> {
        let head = self.head();
        if head == self.tail.load(Ordering::Relaxed) {
            return None;
        }
        Some(self.record_behind(head))
    }

    #[inline]
    fn drain_inner(&self) -> Option<Drain> {
        // One snapshot of `head` for both the record and the distance, so the tail
        // never moves past a record newer than the one delivered.
        let head = self.head();
        let tail = self.tail.load(Ordering::Relaxed);
        if head == tail {
            return None;
        }

        let latest = self.record_behind(head);
        let advanced = self.distance(tail, head);
        self.tail
            .store(self.advance(tail, advanced), Ordering::Release);
        Some(Drain { latest, advanced })
    }
}

/// Interrupt-side handle. Never blocks.
pub struct Producer<'a> {
    buffer: &'a EventBuffer,
}

impl<'a> Producer<'a> {
    /// Store `value` at `head` and publish the advanced head. Returns the new head.
    #[inline]
    pub fn push(&self, value: u64) -> usize {
        self.buffer.push_inner(value)
    }
}

/// Reader-side handle.
pub struct Consumer<'a> {
    buffer: &'a EventBuffer,
}

impl<'a> Consumer<'a> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Newest record without moving the tail.
    #[inline]
    pub fn latest(&self) -> Option<u64> {
        self.buffer.latest_inner()
    }

    /// Take the newest record and move the tail past everything currently available.
    /// Older records in the backlog are discarded, never delivered one by one.
    #[inline]
    pub fn drain_latest(&mut self) -> Option<Drain> {
        self.buffer.drain_inner()
    }
}
