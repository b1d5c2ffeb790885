//! Linux sysfs binding for SensorHub
//!
//! ## Overview
//!
//! This crate turns a Linux sensor class driver stack into a populated
//! [`SensorHub`]: it reads sensor metadata from sysfs, finds the input event
//! device each sensor reports through, builds one hardware driver per sensor
//! and lets the core synthesize virtual sensors on top.
//!
//! ## Filesystem Layout
//!
//! ```text
//! /sys/class/sensors/
//! ├── bma250/            name vendor version type max_range resolution
//! │                      sensor_power min_delay enable poll_delay
//! └── akm8963/           ...
//! /sys/class/input/eventN/device/name     driver-registered device name
//! /dev/input/eventN                       input_event stream
//! ```
//!
//! ## Bootstrapping
//!
//! ```no_run
//! use sensorhub_core::calibration::{CalibrationTable, PassThrough};
//! use sensorhub_core::SensorType;
//! use sensorhub_sysfs::{open_hub, HalConfig};
//!
//! let calibration = CalibrationTable::new()
//!     .with_type(SensorType::Orientation, || Box::new(PassThrough));
//! let hub = open_hub(&HalConfig::default(), Some(&calibration));
//!
//! for sensor in hub.sensor_list() {
//!     println!("{} -> handle {}", sensor.name, sensor.handle);
//! }
//! ```
//!
//! ## Failure Policy
//!
//! Discovery never fails outright. Unreadable directories degrade to zero
//! sensors, incomplete sensor nodes are skipped and failed opens leave a
//! sensor registered without a data source. Everything is logged through the
//! `log` facade; install any logger to see it.

pub mod attributes;
pub mod config;
pub mod discovery;
pub mod error;
pub mod input_driver;
pub mod probe;

// Re-export common types
pub use config::{DiscoveryConfig, HalConfig};
pub use discovery::{discover, Candidate, EventNode};
pub use error::DiscoveryError;
pub use input_driver::{DriverFactory, InputDriverFactory, InputEventDriver};
pub use probe::{EventDeviceProbe, SysfsNameProbe};

use log::info;
use sensorhub_core::synthesis;
use sensorhub_core::{CalibrationProvider, SensorHub};

/// Discover, synthesize and wrap in a hub, using the stock probe and drivers
pub fn open_hub(config: &HalConfig, calibration: Option<&dyn CalibrationProvider>) -> SensorHub {
    let probe = SysfsNameProbe::new(&config.discovery.input_sysfs_root);
    open_hub_with(config, &probe, &InputDriverFactory, calibration)
}

/// [`open_hub`] with a custom event-node probe and driver factory
pub fn open_hub_with(
    config: &HalConfig,
    probe: &dyn EventDeviceProbe,
    factory: &dyn DriverFactory,
    calibration: Option<&dyn CalibrationProvider>,
) -> SensorHub {
    let mut registry = discover(&config.discovery, probe, factory);
    let hardware = registry.count();

    let report = synthesis::synthesize(&mut registry, calibration);
    info!(
        "{} hardware and {} virtual sensors registered",
        hardware,
        report.created.len()
    );

    SensorHub::new(registry, config.hub)
}
