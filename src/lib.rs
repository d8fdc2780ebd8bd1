//! Edge-triggered timestamp capture with a blocking reader.
//!
//! # Highlights
//! - Interrupt-context producer: debounce, one record store, one index publish.
//! - Lock-free single-producer/single-consumer event buffer with wraparound indices.
//! - Blocking reader with cancellation and an optional timeout.
//! - A small control channel (`SET`/`GET`/`EXCHANGE`) over a shared integer.
//!
//! # Quick start
//! ```
//! use std::sync::Arc;
//! use edge_capture::{CaptureConfig, CaptureHandler, Device, EventBuffer, ManualTicks};
//!
//! let config = CaptureConfig::default();
//! let buffer = EventBuffer::with_capacity(config.capacity)?;
//! let device = Arc::new(Device::new(&config, buffer));
//!
//! let ticks = ManualTicks::new(100);
//! let mut handler = CaptureHandler::new(device.clone(), &ticks, config.min_interval);
//! handler.on_edge();
//!
//! let file = device.open();
//! let mut line = [0u8; 17];
//! let n = file.read(&mut line, 17)?;
//! assert_eq!(&line[..n], b"0000000000000100\n");
//! # Ok::<(), edge_capture::CaptureError>(())
//! ```
//!
//! # No-std
//! The buffer, debounce filter, capture handler and control channel need only
//! `alloc`. The reader, wait set and driver lifecycle need the `std` feature (on by
//! default).
//!
//! # Semantics
//! - Records are `u64` tick counts; the buffer holds `capacity / 8` of them.
//! - A read delivers only the newest record and consumes the whole pending backlog.
//! - A producer that laps the reader overwrites the backlog. This is counted in
//!   [`EventBuffer::overruns`] but not reported as an error.
#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod buffer;
pub mod capture;
pub mod clock;
pub mod config;
pub mod control;
pub mod debounce;
pub mod error;
pub mod ioctl;
pub(crate) mod sync;
pub mod user;

#[cfg(feature = "std")]
pub mod device;
#[cfg(feature = "std")]
pub mod driver;
#[cfg(feature = "std")]
pub mod platform;
#[cfg(feature = "std")]
pub mod wait;

#[cfg(all(test, feature = "loom"))]
mod loom;

pub use buffer::{Consumer, Drain, EventBuffer, Producer, RECORD_SIZE, RecordLine};
pub use capture::{CaptureHandler, CaptureSink, CaptureStats, IrqReturn};
pub use clock::{ManualTicks, TickSource};
pub use config::CaptureConfig;
pub use control::{ControlChannel, Message};
pub use debounce::Debounce;
pub use error::{CaptureError, Resource};
pub use ioctl::Cmd;
pub use user::{Access, UserBuf};

#[cfg(feature = "std")]
pub use clock::MonotonicTicks;
#[cfg(feature = "std")]
pub use device::{Device, File};
#[cfg(feature = "std")]
pub use driver::Driver;
#[cfg(feature = "std")]
pub use platform::{DeviceNumber, EdgeHandler, IrqLine, Platform};
#[cfg(feature = "std")]
pub use wait::{Cancel, WaitSet};
