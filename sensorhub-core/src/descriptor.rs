//! Sensor Descriptors
//!
//! A [`SensorDescriptor`] is the static metadata the host enumerates: what a
//! sensor measures, its range and resolution, its power draw and the fastest
//! rate it supports. Descriptors are filled once (from sysfs attributes or a
//! virtual sensor template) and afterwards only `handle` and `version` may be
//! assigned at registration.
//!
//! Names are stored inline so descriptors never allocate; over-long names are
//! truncated at a character boundary, matching what a bounded sysfs read
//! would have produced.

use core::fmt;

use heapless::String;

use crate::constants::buffers::SENSOR_NAME_MAX_LEN;
use crate::constants::time::NS_PER_US;
use crate::events::SensorType;

/// Inline storage for sensor names and vendors
pub type SensorName = String<SENSOR_NAME_MAX_LEN>;

/// Copy `s` into a [`SensorName`], truncating if needed
pub fn bounded_name(s: &str) -> SensorName {
    let mut out = SensorName::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Static metadata for one sensor
#[derive(Clone, PartialEq)]
pub struct SensorDescriptor {
    /// Sensor name, e.g. "bma250" or "oem-orientation"
    pub name: SensorName,
    /// Vendor string
    pub vendor: SensorName,
    /// Hardware/software version
    pub version: i32,
    /// Handle, unique within one registry
    pub handle: i32,
    /// Measured quantity
    pub sensor_type: SensorType,
    /// Maximum reportable value in sensor units
    pub max_range: f32,
    /// Smallest reportable change in sensor units
    pub resolution: f32,
    /// Power draw in mA while active
    pub power: f32,
    /// Minimum sample period in microseconds (0 = on-change sensor)
    pub min_delay_us: i32,
}

impl SensorDescriptor {
    /// Create a descriptor with zeroed numeric fields
    pub fn new(name: &str, vendor: &str, sensor_type: SensorType) -> Self {
        Self {
            name: bounded_name(name),
            vendor: bounded_name(vendor),
            version: 0,
            handle: 0,
            sensor_type,
            max_range: 0.0,
            resolution: 0.0,
            power: 0.0,
            min_delay_us: 0,
        }
    }

    /// Set version
    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Set range, resolution and power in one go
    pub fn with_characteristics(mut self, max_range: f32, resolution: f32, power: f32) -> Self {
        self.max_range = max_range;
        self.resolution = resolution;
        self.power = power;
        self
    }

    /// Set minimum delay (microseconds)
    pub fn with_min_delay_us(mut self, min_delay_us: i32) -> Self {
        self.min_delay_us = min_delay_us;
        self
    }

    /// Minimum sample period in nanoseconds
    ///
    /// Negative declarations are treated as zero.
    pub fn min_delay_ns(&self) -> i64 {
        i64::from(self.min_delay_us.max(0)) * NS_PER_US
    }
}

impl Default for SensorDescriptor {
    fn default() -> Self {
        Self::new("", "", SensorType::Other(0))
    }
}

impl fmt::Debug for SensorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorDescriptor")
            .field("name", &self.name.as_str())
            .field("vendor", &self.vendor.as_str())
            .field("version", &self.version)
            .field("handle", &self.handle)
            .field("type", &self.sensor_type)
            .field("max_range", &self.max_range)
            .field("resolution", &self.resolution)
            .field("power", &self.power)
            .field("min_delay_us", &self.min_delay_us)
            .finish()
    }
}
