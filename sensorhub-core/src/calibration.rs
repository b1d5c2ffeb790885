//! Table-Driven Calibration Provider
//!
//! [`CalibrationTable`] is the stock [`CalibrationProvider`]: a list of
//! algorithm factories keyed either by an exact sensor name or by a sensor
//! type. Lookup tries every name entry before any type entry, so a vendor
//! can register a specific algorithm for "oem-orientation" and still have a
//! generic orientation algorithm serve any other orientation sensor.
//!
//! ```rust
//! use sensorhub_core::calibration::{CalibrationTable, PassThrough};
//! use sensorhub_core::traits::CalibrationProvider;
//! use sensorhub_core::{SensorDescriptor, SensorType};
//!
//! let table = CalibrationTable::new()
//!     .with_type(SensorType::Orientation, || Box::new(PassThrough));
//!
//! let orientation = SensorDescriptor::new("oem-orientation", "oem", SensorType::Orientation);
//! let gravity = SensorDescriptor::new("oem-gravity", "oem", SensorType::Gravity);
//! assert!(table.supports_descriptor(&orientation));
//! assert!(!table.supports_descriptor(&gravity));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::descriptor::SensorDescriptor;
use crate::events::{SensorEvent, SensorType};
use crate::traits::{CalibrationAlgorithm, CalibrationProvider};

/// Factory producing a fresh algorithm instance
pub type AlgorithmFactory = Box<dyn Fn() -> Box<dyn CalibrationAlgorithm> + Send + Sync>;

/// What a table entry matches on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationMatch {
    /// Exact descriptor name
    Name(String),
    /// Any descriptor of this type
    Type(SensorType),
}

struct Entry {
    matcher: CalibrationMatch,
    factory: AlgorithmFactory,
}

/// Calibration provider backed by a list of factories
#[derive(Default)]
pub struct CalibrationTable {
    entries: Vec<Entry>,
}

impl CalibrationTable {
    /// Create an empty table (supports nothing)
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register an algorithm for one exact sensor name
    pub fn with_name<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn CalibrationAlgorithm> + Send + Sync + 'static,
    {
        self.entries.push(Entry {
            matcher: CalibrationMatch::Name(String::from(name)),
            factory: Box::new(factory),
        });
        self
    }

    /// Register an algorithm for every sensor of a type
    pub fn with_type<F>(mut self, sensor_type: SensorType, factory: F) -> Self
    where
        F: Fn() -> Box<dyn CalibrationAlgorithm> + Send + Sync + 'static,
    {
        self.entries.push(Entry {
            matcher: CalibrationMatch::Type(sensor_type),
            factory: Box::new(factory),
        });
        self
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, descriptor: &SensorDescriptor) -> Option<&Entry> {
        let by_name = self.entries.iter().find(|e| {
            matches!(&e.matcher, CalibrationMatch::Name(n) if n.as_str() == descriptor.name.as_str())
        });

        by_name.or_else(|| {
            self.entries.iter().find(|e| {
                matches!(&e.matcher, CalibrationMatch::Type(t) if *t == descriptor.sensor_type)
            })
        })
    }
}

impl CalibrationProvider for CalibrationTable {
    fn algorithm_for(&self, descriptor: &SensorDescriptor) -> Option<Box<dyn CalibrationAlgorithm>> {
        self.find(descriptor).map(|entry| (entry.factory)())
    }

    fn supports_descriptor(&self, descriptor: &SensorDescriptor) -> bool {
        self.find(descriptor).is_some()
    }
}

/// Algorithm that forwards every input sample unchanged
///
/// Useful for uncalibrated passthrough sensors and for wiring tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl CalibrationAlgorithm for PassThrough {
    fn process(&mut self, input: &SensorEvent) -> Option<SensorEvent> {
        Some(*input)
    }
}
