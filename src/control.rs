//! Side channel for small control values and the display message.
//!
//! The control value is an independent scalar shared by every caller; it has no
//! relation to the event path. Commands are validated in full before any state is
//! touched, and a failed copy never leaves a half-applied command behind.

use log::debug;

use crate::config::MAX_MESSAGE_LEN;
use crate::error::{CaptureError, Result};
use crate::ioctl::{Cmd, Dir, EXCHANGE_NUM, GET_NUM, MAGIC, MAX_NR, SET_NUM};
use crate::sync::{AtomicI32, Ordering, Spinlock};
use crate::user::{Access, UserBuf};

const ARG_LEN: usize = core::mem::size_of::<i32>();

/// Fixed-size display string replaced by the write path.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Message {
    bytes: [u8; MAX_MESSAGE_LEN],
    len: usize,
}

impl Message {
    /// Build a message from `text`, keeping at most [`MAX_MESSAGE_LEN`] bytes.
    pub fn new(text: &[u8]) -> Self {
        let len = text.len().min(MAX_MESSAGE_LEN);
        let mut bytes = [0u8; MAX_MESSAGE_LEN];
        bytes[..len].copy_from_slice(&text[..len]);
        Self { bytes, len }
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

impl core::fmt::Debug for Message {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Message({:?})", core::str::from_utf8(self.as_bytes()))
    }
}

#[derive(Debug)]
pub struct ControlChannel {
    value: AtomicI32,
    message: Spinlock<Message>,
}

impl ControlChannel {
    pub fn new(initial: i32, message: &[u8]) -> Self {
        Self {
            value: AtomicI32::new(initial),
            message: Spinlock::new(Message::new(message)),
        }
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: i32) {
        self.value.store(value, Ordering::Release);
    }

    /// Store `2 * input` and return it. The previous value is discarded.
    #[inline]
    pub fn exchange(&self, input: i32) -> i32 {
        let doubled = input.wrapping_mul(2);
        self.value.store(doubled, Ordering::Release);
        doubled
    }

    /// Run the command `cmd` with its argument in `arg`.
    pub fn ioctl<B: UserBuf + ?Sized>(&self, cmd: Cmd, arg: &mut B) -> Result<()> {
        if cmd.group() != MAGIC {
            return Err(CaptureError::InvalidCommand);
        }
        if cmd.nr() > MAX_NR {
            return Err(CaptureError::InvalidCommand);
        }

        let dir = cmd.dir();
        let accessible = if dir.contains(Dir::READ) {
            arg.access_ok(Access::Write, cmd.size())
        } else if dir.contains(Dir::WRITE) {
            arg.access_ok(Access::Read, cmd.size())
        } else {
            true
        };
        if !accessible {
            return Err(CaptureError::BadAddress);
        }

        match cmd {
            SET_NUM => {
                let value = read_arg(arg)?;
                self.set(value);
                debug!("ioctl: set value to {value}");
            }
            GET_NUM => {
                let value = self.value();
                arg.copy_out(&value.to_ne_bytes())?;
                debug!("ioctl: get value {value}");
            }
            EXCHANGE_NUM => {
                let input = read_arg(arg)?;
                let doubled = input.wrapping_mul(2);
                arg.copy_out(&doubled.to_ne_bytes())?;
                let previous = self.value.swap(doubled, Ordering::AcqRel);
                debug!("ioctl: exchange value {previous} -> {doubled}");
            }
            _ => return Err(CaptureError::InvalidCommand),
        }
        Ok(())
    }

    /// Current display message.
    pub fn message(&self) -> Message {
        *self.message.lock()
    }

    /// Replace the message with up to [`MAX_MESSAGE_LEN`] bytes from `src`.
    ///
    /// Returns `count` even when the input was truncated. A failed copy leaves the
    /// message unchanged.
    pub fn write<B: UserBuf + ?Sized>(&self, src: &B, count: usize) -> Result<usize> {
        let len = count.min(MAX_MESSAGE_LEN);
        let mut staged = [0u8; MAX_MESSAGE_LEN];
        src.copy_in(&mut staged[..len])?;

        *self.message.lock() = Message::new(&staged[..len]);
        debug!("write: stored {len} of {count} bytes");
        Ok(count)
    }
}

fn read_arg<B: UserBuf + ?Sized>(arg: &B) -> Result<i32> {
    let mut raw = [0u8; ARG_LEN];
    arg.copy_in(&mut raw)?;
    Ok(i32::from_ne_bytes(raw))
}
