#![cfg(not(feature = "loom"))]

mod common;

use common::MockPlatform;
use edge_capture::{CaptureConfig, CaptureError, Driver, IrqLine, Resource};
use rstest::rstest;

#[test]
fn init_acquires_in_order() {
    let mut platform = MockPlatform::new();
    let driver = Driver::init(&mut platform, CaptureConfig::default()).unwrap();

    assert_eq!(driver.irq(), IrqLine(125));
    assert_eq!(driver.device().name(), "edgecap0");
    assert_eq!(driver.device().buffer().capacity(), 4096);
    drop(driver);

    assert_eq!(
        platform.calls[..4],
        ["register_device", "alloc_buffer", "request_pin", "request_irq"]
    );
}

#[test]
fn teardown_releases_in_reverse() {
    let mut platform = MockPlatform::new();
    let driver = Driver::init(&mut platform, CaptureConfig::default()).unwrap();
    driver.shutdown();

    assert_eq!(
        platform.calls[4..],
        ["free_irq", "free_pin", "unregister_device"]
    );
    assert!(platform.is_clean());
    assert!(platform.last_device.upgrade().is_none());
}

#[test]
fn open_file_keeps_buffer_until_closed() {
    let mut platform = MockPlatform::new();
    let driver = Driver::init(&mut platform, CaptureConfig::default()).unwrap();
    let file = driver.open();
    drop(driver);

    assert!(platform.is_clean());
    assert!(platform.last_device.upgrade().is_some());
    drop(file);
    assert!(platform.last_device.upgrade().is_none());
}

#[rstest]
#[case(Resource::DeviceNode, &["register_device"])]
#[case(Resource::Buffer, &["register_device", "alloc_buffer", "unregister_device"])]
#[case(
    Resource::Pin,
    &["register_device", "alloc_buffer", "request_pin", "unregister_device"]
)]
#[case(
    Resource::Irq,
    &["register_device", "alloc_buffer", "request_pin", "request_irq", "free_pin", "unregister_device"]
)]
fn failed_step_unwinds_everything(#[case] failing: Resource, #[case] calls: &[&str]) {
    let mut platform = MockPlatform::failing_at(failing);
    let err = Driver::init(&mut platform, CaptureConfig::default()).unwrap_err();

    assert_eq!(err, CaptureError::NoDevice { failed: failing });
    assert_eq!(err.errno(), -19);
    assert_eq!(platform.calls, calls);
    assert!(platform.is_clean());
    assert!(platform.last_device.upgrade().is_none());
}

#[test]
fn claimed_pin_fails_second_driver() {
    let mut platform = MockPlatform::new();
    platform.pins.push(25);

    let err = Driver::init(&mut platform, CaptureConfig::default()).unwrap_err();
    assert_eq!(err, CaptureError::NoDevice { failed: Resource::Pin });
    assert_eq!(platform.pins, [25]);
    assert!(platform.devices.is_empty());
}

#[test]
fn invalid_capacity_acquires_nothing() {
    let mut platform = MockPlatform::new();
    let config = CaptureConfig {
        capacity: 100,
        ..CaptureConfig::default()
    };

    let err = Driver::init(&mut platform, config).unwrap_err();
    assert_eq!(err, CaptureError::InvalidCapacity(100));
    assert!(platform.calls.is_empty());
}
