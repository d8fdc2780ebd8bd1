//! Error type shared by the capture, control and lifecycle paths.

use thiserror::Error;

/// Kernel-style errno values reported by [`CaptureError::errno`].
pub mod errno {
    pub const EFAULT: i32 = 14;
    pub const EBUSY: i32 = 16;
    pub const ENODEV: i32 = 19;
    pub const EINVAL: i32 = 22;
    pub const ENOTTY: i32 = 25;
    pub const ENOMEM: i32 = 12;
    pub const ETIMEDOUT: i32 = 110;
    pub const ERESTARTSYS: i32 = 512;
}

/// Platform resource that failed to come up during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Device number or device node.
    DeviceNode,
    /// Event buffer memory.
    Buffer,
    /// The input pin (invalid or already claimed).
    Pin,
    /// The interrupt line for the pin.
    Irq,
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Resource::DeviceNode => write!(f, "device node"),
            Resource::Buffer => write!(f, "event buffer"),
            Resource::Pin => write!(f, "input pin"),
            Resource::Irq => write!(f, "interrupt line"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    #[error("no such command")]
    InvalidCommand,

    #[error("bad address")]
    BadAddress,

    #[error("interrupted while waiting for an event")]
    Interrupted,

    #[error("timed out waiting for an event")]
    TimedOut,

    #[error("{0} unavailable")]
    ResourceUnavailable(Resource),

    #[error("no such device (failed to acquire {failed})")]
    NoDevice { failed: Resource },

    #[error("capacity must be a multiple of the record size holding at least two records ({0} bytes)")]
    InvalidCapacity(usize),
}

impl CaptureError {
    /// Negative errno, as a file-operation handler would return it.
    pub fn errno(&self) -> i32 {
        -match self {
            CaptureError::InvalidCommand => errno::ENOTTY,
            CaptureError::BadAddress => errno::EFAULT,
            CaptureError::Interrupted => errno::ERESTARTSYS,
            CaptureError::TimedOut => errno::ETIMEDOUT,
            CaptureError::ResourceUnavailable(Resource::Buffer) => errno::ENOMEM,
            CaptureError::ResourceUnavailable(_) => errno::EBUSY,
            CaptureError::NoDevice { .. } => errno::ENODEV,
            CaptureError::InvalidCapacity(_) => errno::EINVAL,
        }
    }
}

pub type Result<T> = core::result::Result<T, CaptureError>;
