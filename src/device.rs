//! The capture device and its open-file surface.
//!
//! [`Device`] owns everything the capture handler and the readers share. Callers
//! reach it through a [`File`], which carries the blocking read, the message write
//! and the control commands.

use std::string::String;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::buffer::{EventBuffer, RecordLine};
use crate::capture::CaptureSink;
use crate::config::CaptureConfig;
use crate::control::ControlChannel;
use crate::error::Result;
use crate::ioctl::Cmd;
use crate::user::UserBuf;
use crate::wait::{Cancel, WaitSet};

#[derive(Debug)]
pub struct Device {
    name: String,
    buffer: EventBuffer,
    control: ControlChannel,
    waiters: Arc<WaitSet>,
    /// Serializes `tail` updates between reader threads.
    drain: Mutex<()>,
}

impl Device {
    pub fn new(config: &CaptureConfig, buffer: EventBuffer) -> Self {
        Self {
            name: config.device_name.clone(),
            buffer,
            control: ControlChannel::new(0, config.message.as_bytes()),
            waiters: Arc::new(WaitSet::new()),
            drain: Mutex::new(()),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    #[inline]
    pub fn control(&self) -> &ControlChannel {
        &self.control
    }

    #[inline]
    pub fn waiters(&self) -> &Arc<WaitSet> {
        &self.waiters
    }

    /// Open a new file on the device.
    pub fn open(self: &Arc<Self>) -> File {
        debug!("{}: open", self.name);
        File {
            device: Arc::clone(self),
            cancel: Cancel::new(Arc::clone(&self.waiters)),
        }
    }
}

impl CaptureSink for Device {
    #[inline]
    fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    #[inline]
    fn wake_readers(&self) {
        self.waiters.wake_all();
    }
}

/// An open handle on a [`Device`].
#[derive(Debug)]
pub struct File {
    device: Arc<Device>,
    cancel: Cancel,
}

impl File {
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Handle that interrupts a read blocked on this file.
    pub fn canceller(&self) -> Cancel {
        self.cancel.clone()
    }

    /// Block until an edge has been captured, then copy the newest timestamp line
    /// (`"{:016}\n"`) into `dst`, truncated to `count` bytes.
    ///
    /// The whole pending backlog is consumed by one call; only the newest record is
    /// delivered. Returns the number of bytes copied. A failed copy reports
    /// [`BadAddress`](crate::CaptureError::BadAddress) after the backlog has been
    /// consumed.
    pub fn read<B: UserBuf + ?Sized>(&self, dst: &mut B, count: usize) -> Result<usize> {
        self.read_inner(dst, count, None)
    }

    /// Like [`File::read`], giving up with
    /// [`TimedOut`](crate::CaptureError::TimedOut) after `timeout`.
    pub fn read_timeout<B: UserBuf + ?Sized>(
        &self,
        dst: &mut B,
        count: usize,
        timeout: Duration,
    ) -> Result<usize> {
        self.read_inner(dst, count, Some(Instant::now() + timeout))
    }

    fn read_inner<B: UserBuf + ?Sized>(
        &self,
        dst: &mut B,
        count: usize,
        deadline: Option<Instant>,
    ) -> Result<usize> {
        let device = &*self.device;
        let drain = loop {
            device
                .waiters
                .wait_until(|| !device.buffer.is_empty(), &self.cancel, deadline)?;

            let _guard = device.drain.lock().unwrap_or_else(|e| e.into_inner());
            // Another reader may have emptied the buffer since we woke.
            if let Some(drain) = device.buffer.consumer().drain_latest() {
                break drain;
            }
        };

        let line = RecordLine::new(drain.latest);
        let len = count.min(line.len());
        trace!(
            "{}: read {} ({} bytes, {} skipped)",
            device.name,
            drain.latest,
            drain.advanced,
            drain.skipped()
        );
        dst.copy_out(&line.as_bytes()[..len])?;
        Ok(len)
    }

    /// Replace the device message with up to 64 bytes of `src`.
    pub fn write<B: UserBuf + ?Sized>(&self, src: &B, count: usize) -> Result<usize> {
        debug!("{}: write", self.device.name);
        self.device.control.write(src, count)
    }

    pub fn ioctl<B: UserBuf + ?Sized>(&self, cmd: Cmd, arg: &mut B) -> Result<()> {
        self.device.control.ioctl(cmd, arg)
    }
}

impl Drop for File {
    fn drop(&mut self) {
        debug!("{}: release", self.device.name);
    }
}
