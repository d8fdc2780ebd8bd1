//! Driver lifecycle.
//!
//! Bring-up acquires, in order: the device node, the event buffer, the input pin and
//! the interrupt line. A failure at any step releases what was already acquired in
//! reverse order and reports [`CaptureError::NoDevice`]. Teardown walks the same
//! list backwards; the buffer goes last, once the driver and every open [`File`]
//! have let go of the device.

use std::sync::Arc;

use log::{info, warn};

use crate::capture::CaptureHandler;
use crate::config::CaptureConfig;
use crate::device::{Device, File};
use crate::error::{CaptureError, Resource, Result};
use crate::platform::{DeviceNumber, IrqLine, Platform};

pub struct Driver<P: Platform> {
    platform: P,
    config: CaptureConfig,
    number: DeviceNumber,
    device: Arc<Device>,
    irq: IrqLine,
}

impl<P: Platform> Driver<P> {
    pub fn init(mut platform: P, config: CaptureConfig) -> Result<Self> {
        config.validate()?;

        let number = platform
            .register_device(&config.device_name)
            .map_err(|e| failed(Resource::DeviceNode, e))?;
        info!("{}: registered device {number}", config.device_name);

        let buffer = match platform.alloc_buffer(config.capacity) {
            Ok(buffer) => buffer,
            Err(e) => {
                platform.unregister_device(number);
                return Err(failed(Resource::Buffer, e));
            }
        };
        let device = Arc::new(Device::new(&config, buffer));

        if let Err(e) = platform.request_pin(config.pin) {
            drop(device);
            platform.unregister_device(number);
            return Err(failed(Resource::Pin, e));
        }

        let handler = CaptureHandler::new(
            Arc::clone(&device),
            platform.clock(),
            config.effective_min_interval(),
        );
        let irq = match platform.request_irq(config.pin, handler) {
            Ok(irq) => irq,
            Err(e) => {
                platform.free_pin(config.pin);
                drop(device);
                platform.unregister_device(number);
                return Err(failed(Resource::Irq, e));
            }
        };
        info!(
            "{}: pin {} bound to irq {}",
            config.device_name, config.pin, irq.0
        );

        Ok(Self {
            platform,
            config,
            number,
            device,
            irq,
        })
    }

    #[inline]
    pub fn number(&self) -> DeviceNumber {
        self.number
    }

    #[inline]
    pub fn irq(&self) -> IrqLine {
        self.irq
    }

    #[inline]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    #[inline]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    #[inline]
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    #[inline]
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn open(&self) -> File {
        self.device().open()
    }

    /// Release every resource. Equivalent to dropping the driver.
    pub fn shutdown(self) {}

    fn teardown(&mut self) {
        drop(self.platform.free_irq(self.irq));
        self.platform.free_pin(self.config.pin);
        self.platform.unregister_device(self.number);
        info!("{}: unregistered device {}", self.config.device_name, self.number);
    }
}

impl<P: Platform> Drop for Driver<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<P: Platform> core::fmt::Debug for Driver<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Driver")
            .field("number", &self.number)
            .field("irq", &self.irq)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

fn failed(resource: Resource, cause: CaptureError) -> CaptureError {
    warn!("initialization failed: {resource} unavailable ({cause})");
    CaptureError::NoDevice { failed: resource }
}
