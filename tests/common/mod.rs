#![allow(dead_code)]

use std::sync::{Arc, Weak};

use edge_capture::{
    CaptureError, Device, DeviceNumber, EdgeHandler, EventBuffer, IrqLine, IrqReturn,
    ManualTicks, Platform, Resource,
};

/// Highest pin number the mock accepts.
pub const MAX_PIN: u32 = 53;

/// In-memory platform that records every call and can fail one step on demand.
pub struct MockPlatform {
    pub clock: Arc<ManualTicks>,
    pub fail: Option<Resource>,
    pub devices: Vec<DeviceNumber>,
    pub pins: Vec<u32>,
    pub irqs: Vec<(IrqLine, EdgeHandler<Arc<ManualTicks>>)>,
    pub calls: Vec<&'static str>,
    /// Device held by the last handler offered to `request_irq`.
    pub last_device: Weak<Device>,
    next_minor: u32,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(ManualTicks::new(0)),
            fail: None,
            devices: Vec::new(),
            pins: Vec::new(),
            irqs: Vec::new(),
            calls: Vec::new(),
            last_device: Weak::new(),
            next_minor: 0,
        }
    }

    pub fn failing_at(resource: Resource) -> Self {
        Self {
            fail: Some(resource),
            ..Self::new()
        }
    }

    /// Raise a rising edge at tick `now` on the bound line.
    pub fn fire_at(&mut self, now: u64) -> Option<IrqReturn> {
        self.clock.set(now);
        self.irqs.first_mut().map(|(_, handler)| handler.on_edge())
    }

    pub fn is_clean(&self) -> bool {
        self.devices.is_empty() && self.pins.is_empty() && self.irqs.is_empty()
    }

    fn check(&self, resource: Resource) -> Result<(), CaptureError> {
        if self.fail == Some(resource) {
            return Err(CaptureError::ResourceUnavailable(resource));
        }
        Ok(())
    }
}

impl Platform for MockPlatform {
    type Clock = Arc<ManualTicks>;

    fn register_device(&mut self, _name: &str) -> Result<DeviceNumber, CaptureError> {
        self.calls.push("register_device");
        self.check(Resource::DeviceNode)?;
        let number = DeviceNumber {
            major: 240,
            minor: self.next_minor,
        };
        self.next_minor += 1;
        self.devices.push(number);
        Ok(number)
    }

    fn unregister_device(&mut self, number: DeviceNumber) {
        self.calls.push("unregister_device");
        self.devices.retain(|n| *n != number);
    }

    fn alloc_buffer(&mut self, capacity: usize) -> Result<EventBuffer, CaptureError> {
        self.calls.push("alloc_buffer");
        self.check(Resource::Buffer)?;
        EventBuffer::with_capacity(capacity)
    }

    fn request_pin(&mut self, pin: u32) -> Result<(), CaptureError> {
        self.calls.push("request_pin");
        self.check(Resource::Pin)?;
        if pin > MAX_PIN || self.pins.contains(&pin) {
            return Err(CaptureError::ResourceUnavailable(Resource::Pin));
        }
        self.pins.push(pin);
        Ok(())
    }

    fn free_pin(&mut self, pin: u32) {
        self.calls.push("free_pin");
        self.pins.retain(|p| *p != pin);
    }

    fn request_irq(
        &mut self,
        pin: u32,
        handler: EdgeHandler<Self::Clock>,
    ) -> Result<IrqLine, CaptureError> {
        self.calls.push("request_irq");
        self.last_device = Arc::downgrade(handler.sink());
        self.check(Resource::Irq)?;
        let line = IrqLine(100 + pin);
        self.irqs.push((line, handler));
        Ok(line)
    }

    fn free_irq(&mut self, line: IrqLine) -> Option<EdgeHandler<Self::Clock>> {
        self.calls.push("free_irq");
        let pos = self.irqs.iter().position(|(l, _)| *l == line)?;
        Some(self.irqs.remove(pos).1)
    }

    fn clock(&self) -> Self::Clock {
        Arc::clone(&self.clock)
    }
}
