//! Sensor registry and virtual-sensor dependency engine
//!
//! Enumerates physical and synthetic sensors, tracks which sensors keep which
//! others powered, reconciles sample-rate requests and fans raw samples out
//! to the virtual sensors computed from them.
//!
//! Key constraints:
//! - Fixed-capacity context table, no growth after initialization
//! - Listener membership is the power reference count
//! - Caller serializes access (or uses [`SensorHub`] with `std`)
//!
//! ```
//! use sensorhub_core::calibration::{CalibrationTable, PassThrough};
//! use sensorhub_core::{synthesis, DeviceBinding, SensorDescriptor, SensorRegistry, SensorType};
//!
//! let mut registry = SensorRegistry::new();
//! for (name, t) in [("bma250", SensorType::Accelerometer), ("akm8963", SensorType::MagneticField)] {
//!     let desc = SensorDescriptor::new(name, "acme", t);
//!     registry.register_hardware(desc, DeviceBinding::default(), None).unwrap();
//! }
//!
//! let table = CalibrationTable::new().with_type(SensorType::Orientation, || Box::new(PassThrough));
//! let report = synthesis::synthesize(&mut registry, Some(&table));
//! assert_eq!(report.created.len(), 1);
//! assert_eq!(registry.count(), 3);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

#[macro_use]
mod macros;

pub mod calibration;
pub mod constants;
pub mod context;
pub mod descriptor;
pub mod errors;
pub mod events;
#[cfg(feature = "std")]
pub mod hub;
pub mod registry;
pub mod synthesis;
pub mod traits;
pub mod virtual_driver;

// Public API
pub use context::{DeviceBinding, SensorContext};
pub use descriptor::SensorDescriptor;
pub use errors::{SensorError, SensorResult};
pub use events::{SampleAccuracy, SensorEvent, SensorType, TypeMask};
#[cfg(feature = "std")]
pub use hub::{ContextSnapshot, HubConfig, SensorHub};
pub use registry::SensorRegistry;
pub use synthesis::{SynthesisReport, VirtualSensorKind};
pub use traits::{CalibrationAlgorithm, CalibrationProvider, Driver, DriverKind, SensorDriver};
pub use virtual_driver::VirtualDriver;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
