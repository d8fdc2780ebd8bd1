//! Capture device configuration.

use alloc::string::String;

use crate::error::Result;

/// Input pin the edge source is wired to.
pub const DEFAULT_PIN: u32 = 25;

/// Event buffer size in bytes (one page).
pub const DEFAULT_CAPACITY: usize = 4096;

/// Minimum distance in ticks between two admitted edges.
pub const DEFAULT_MIN_INTERVAL: u64 = 20;

/// Largest message accepted by the write path.
pub const MAX_MESSAGE_LEN: usize = 64;

pub const DEFAULT_DEVICE_NAME: &str = "edgecap0";

pub const DEFAULT_MESSAGE: &str = "hello from edgecap!";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaptureConfig {
    /// Name of the device node registered with the platform.
    pub device_name: String,
    pub pin: u32,
    /// Event buffer capacity in bytes; a multiple of
    /// [`RECORD_SIZE`](crate::buffer::RECORD_SIZE) holding at least two records.
    pub capacity: usize,
    /// Software debounce. When false every edge is captured.
    pub debounce: bool,
    pub min_interval: u64,
    /// Initial contents of the message returned by the write path.
    pub message: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_name: String::from(DEFAULT_DEVICE_NAME),
            pin: DEFAULT_PIN,
            capacity: DEFAULT_CAPACITY,
            debounce: true,
            min_interval: DEFAULT_MIN_INTERVAL,
            message: String::from(DEFAULT_MESSAGE),
        }
    }
}

impl CaptureConfig {
    /// Checks the values that cannot be corrected at runtime.
    pub fn validate(&self) -> Result<()> {
        crate::buffer::check_capacity(self.capacity)
    }

    /// Effective debounce interval; zero admits every edge.
    pub fn effective_min_interval(&self) -> u64 {
        if self.debounce { self.min_interval } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;

    #[test]
    fn default_is_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity, 4096);
        assert_eq!(config.effective_min_interval(), 20);
    }

    #[test]
    fn rejects_unaligned_capacity() {
        let config = CaptureConfig {
            capacity: 4095,
            ..CaptureConfig::default()
        };
        assert_eq!(config.validate(), Err(CaptureError::InvalidCapacity(4095)));

        let config = CaptureConfig {
            capacity: 8,
            ..CaptureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn disabled_debounce_has_zero_interval() {
        let config = CaptureConfig {
            debounce: false,
            ..CaptureConfig::default()
        };
        assert_eq!(config.effective_min_interval(), 0);
    }
}
