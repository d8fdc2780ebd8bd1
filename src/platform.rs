//! Services the driver needs from the surrounding system.
//!
//! Device numbering, pin setup and interrupt routing belong to the platform. The
//! driver only sequences them; see [`Driver::init`](crate::Driver::init).

use std::sync::Arc;

use crate::buffer::EventBuffer;
use crate::capture::CaptureHandler;
use crate::clock::TickSource;
use crate::device::Device;
use crate::error::Result;

/// Major/minor pair of a registered device node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceNumber {
    pub major: u32,
    pub minor: u32,
}

impl core::fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// Interrupt line bound to the input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrqLine(pub u32);

/// The handler type the platform dispatches rising edges to.
pub type EdgeHandler<C> = CaptureHandler<Arc<Device>, C>;

pub trait Platform {
    /// Tick source used to timestamp edges.
    type Clock: TickSource + Send + 'static;

    /// Allocate a device number and create the node `name`.
    fn register_device(&mut self, name: &str) -> Result<DeviceNumber>;

    fn unregister_device(&mut self, number: DeviceNumber);

    /// Event buffer memory. The buffer is released when the device is dropped.
    fn alloc_buffer(&mut self, capacity: usize) -> Result<EventBuffer> {
        EventBuffer::with_capacity(capacity)
    }

    /// Check `pin` is valid, claim it and configure it as an input.
    fn request_pin(&mut self, pin: u32) -> Result<()>;

    fn free_pin(&mut self, pin: u32);

    /// Bind `handler` to the rising edge of `pin`. The platform keeps the handler and
    /// runs [`CaptureHandler::on_edge`] from interrupt context. On failure the handler
    /// must be dropped, releasing its hold on the device.
    fn request_irq(&mut self, pin: u32, handler: EdgeHandler<Self::Clock>) -> Result<IrqLine>;

    /// Unbind the interrupt, handing back the handler it held.
    fn free_irq(&mut self, line: IrqLine) -> Option<EdgeHandler<Self::Clock>>;

    fn clock(&self) -> Self::Clock;
}

impl<P: Platform + ?Sized> Platform for &mut P {
    type Clock = P::Clock;

    fn register_device(&mut self, name: &str) -> Result<DeviceNumber> {
        (**self).register_device(name)
    }

    fn unregister_device(&mut self, number: DeviceNumber) {
        (**self).unregister_device(number)
    }

    fn alloc_buffer(&mut self, capacity: usize) -> Result<EventBuffer> {
        (**self).alloc_buffer(capacity)
    }

    fn request_pin(&mut self, pin: u32) -> Result<()> {
        (**self).request_pin(pin)
    }

    fn free_pin(&mut self, pin: u32) {
        (**self).free_pin(pin)
    }

    fn request_irq(&mut self, pin: u32, handler: EdgeHandler<Self::Clock>) -> Result<IrqLine> {
        (**self).request_irq(pin, handler)
    }

    fn free_irq(&mut self, line: IrqLine) -> Option<EdgeHandler<Self::Clock>> {
        (**self).free_irq(line)
    }

    fn clock(&self) -> Self::Clock {
        (**self).clock()
    }
}
