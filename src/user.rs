//! Caller-supplied buffers.
//!
//! File operations receive memory owned by the caller. Before copying, the device
//! confirms the region is accessible for the required direction; the copy itself may
//! still fault and is reported as [`CaptureError::BadAddress`].

use crate::error::{CaptureError, Result};

/// Direction of a transfer, seen from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The device reads from the caller buffer.
    Read,
    /// The device writes into the caller buffer.
    Write,
}

pub trait UserBuf {
    /// True if `len` bytes can be transferred in the `access` direction.
    fn access_ok(&self, access: Access, len: usize) -> bool;

    /// Fill `dst` from the start of the caller buffer.
    fn copy_in(&self, dst: &mut [u8]) -> Result<()>;

    /// Copy `src` to the start of the caller buffer.
    fn copy_out(&mut self, src: &[u8]) -> Result<()>;
}

impl UserBuf for [u8] {
    #[inline]
    fn access_ok(&self, _access: Access, len: usize) -> bool {
        len <= self.len()
    }

    fn copy_in(&self, dst: &mut [u8]) -> Result<()> {
        let src = self.get(..dst.len()).ok_or(CaptureError::BadAddress)?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn copy_out(&mut self, src: &[u8]) -> Result<()> {
        let dst = self.get_mut(..src.len()).ok_or(CaptureError::BadAddress)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl<const N: usize> UserBuf for [u8; N] {
    #[inline]
    fn access_ok(&self, access: Access, len: usize) -> bool {
        self.as_slice().access_ok(access, len)
    }

    #[inline]
    fn copy_in(&self, dst: &mut [u8]) -> Result<()> {
        self.as_slice().copy_in(dst)
    }

    #[inline]
    fn copy_out(&mut self, src: &[u8]) -> Result<()> {
        self.as_mut_slice().copy_out(src)
    }
}
