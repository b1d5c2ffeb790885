//! Sensor Types, Dependency Masks and Sensor Events
//!
//! ## Overview
//!
//! This module defines the vocabulary shared by every other part of the
//! crate: which physical quantity a sensor measures ([`SensorType`]), sets of
//! those quantities ([`TypeMask`]), and the sample record that flows from a
//! driver to the host and to dependent virtual sensors ([`SensorEvent`]).
//!
//! ## Dependency Masks
//!
//! Dependencies are expressed over sensor *types*, not handles:
//!
//! ```text
//! orientation.dep_mask = {accelerometer, magnetic_field}
//!                               │               │
//!        every context whose type is one of these is a dependency source
//! ```
//!
//! A real sensor always carries its own type bit, so "enable a real sensor"
//! and "enable a virtual sensor" walk the same code path.
//!
//! ## Memory Model
//!
//! Events are `Copy` and fixed size so that drivers can fill caller-provided
//! slices without allocating:
//!
//! ```text
//! SensorEvent
//! ├── handle:      4 bytes
//! ├── sensor_type: 8 bytes
//! ├── timestamp:   8 bytes
//! ├── values:      24 bytes (MAX_EVENT_VALUES × f32)
//! └── accuracy:    1 byte (+ padding)
//! ```

use core::fmt;

use crate::constants::buffers::MAX_EVENT_VALUES;
use crate::constants::sensors::*;

/// Physical quantity measured by a sensor.
///
/// Known types map one-to-one onto the raw numbering in
/// [`crate::constants::sensors`]; anything else is carried as `Other(raw)`.
/// Always build from raw numbers with [`SensorType::from_raw`] so that a known
/// number never ends up inside `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorType {
    Accelerometer,
    MagneticField,
    Orientation,
    Gyroscope,
    Light,
    Pressure,
    Temperature,
    Proximity,
    Gravity,
    LinearAcceleration,
    RotationVector,
    RelativeHumidity,
    AmbientTemperature,
    MagneticFieldUncalibrated,
    GameRotationVector,
    GyroscopeUncalibrated,
    /// Type number without a named variant
    Other(u32),
}

impl SensorType {
    /// Decode a raw type number as reported by the kernel
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            SENSOR_TYPE_ACCELEROMETER => SensorType::Accelerometer,
            SENSOR_TYPE_MAGNETIC_FIELD => SensorType::MagneticField,
            SENSOR_TYPE_ORIENTATION => SensorType::Orientation,
            SENSOR_TYPE_GYROSCOPE => SensorType::Gyroscope,
            SENSOR_TYPE_LIGHT => SensorType::Light,
            SENSOR_TYPE_PRESSURE => SensorType::Pressure,
            SENSOR_TYPE_TEMPERATURE => SensorType::Temperature,
            SENSOR_TYPE_PROXIMITY => SensorType::Proximity,
            SENSOR_TYPE_GRAVITY => SensorType::Gravity,
            SENSOR_TYPE_LINEAR_ACCELERATION => SensorType::LinearAcceleration,
            SENSOR_TYPE_ROTATION_VECTOR => SensorType::RotationVector,
            SENSOR_TYPE_RELATIVE_HUMIDITY => SensorType::RelativeHumidity,
            SENSOR_TYPE_AMBIENT_TEMPERATURE => SensorType::AmbientTemperature,
            SENSOR_TYPE_MAGNETIC_FIELD_UNCALIBRATED => SensorType::MagneticFieldUncalibrated,
            SENSOR_TYPE_GAME_ROTATION_VECTOR => SensorType::GameRotationVector,
            SENSOR_TYPE_GYROSCOPE_UNCALIBRATED => SensorType::GyroscopeUncalibrated,
            other => SensorType::Other(other),
        }
    }

    /// Raw type number
    pub const fn raw(self) -> u32 {
        match self {
            SensorType::Accelerometer => SENSOR_TYPE_ACCELEROMETER,
            SensorType::MagneticField => SENSOR_TYPE_MAGNETIC_FIELD,
            SensorType::Orientation => SENSOR_TYPE_ORIENTATION,
            SensorType::Gyroscope => SENSOR_TYPE_GYROSCOPE,
            SensorType::Light => SENSOR_TYPE_LIGHT,
            SensorType::Pressure => SENSOR_TYPE_PRESSURE,
            SensorType::Temperature => SENSOR_TYPE_TEMPERATURE,
            SensorType::Proximity => SENSOR_TYPE_PROXIMITY,
            SensorType::Gravity => SENSOR_TYPE_GRAVITY,
            SensorType::LinearAcceleration => SENSOR_TYPE_LINEAR_ACCELERATION,
            SensorType::RotationVector => SENSOR_TYPE_ROTATION_VECTOR,
            SensorType::RelativeHumidity => SENSOR_TYPE_RELATIVE_HUMIDITY,
            SensorType::AmbientTemperature => SENSOR_TYPE_AMBIENT_TEMPERATURE,
            SensorType::MagneticFieldUncalibrated => SENSOR_TYPE_MAGNETIC_FIELD_UNCALIBRATED,
            SensorType::GameRotationVector => SENSOR_TYPE_GAME_ROTATION_VECTOR,
            SensorType::GyroscopeUncalibrated => SENSOR_TYPE_GYROSCOPE_UNCALIBRATED,
            SensorType::Other(raw) => raw,
        }
    }

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorType::Accelerometer => "accelerometer",
            SensorType::MagneticField => "magnetic_field",
            SensorType::Orientation => "orientation",
            SensorType::Gyroscope => "gyroscope",
            SensorType::Light => "light",
            SensorType::Pressure => "pressure",
            SensorType::Temperature => "temperature",
            SensorType::Proximity => "proximity",
            SensorType::Gravity => "gravity",
            SensorType::LinearAcceleration => "linear_acceleration",
            SensorType::RotationVector => "rotation_vector",
            SensorType::RelativeHumidity => "relative_humidity",
            SensorType::AmbientTemperature => "ambient_temperature",
            SensorType::MagneticFieldUncalibrated => "magnetic_field_uncalibrated",
            SensorType::GameRotationVector => "game_rotation_vector",
            SensorType::GyroscopeUncalibrated => "gyroscope_uncalibrated",
            SensorType::Other(_) => "other",
        }
    }

    /// Input device name a driver of this type registers when it does not
    /// reuse the sysfs sensor name
    ///
    /// Only physical types have one; used as the fallback when binding a
    /// discovered sensor to its event device.
    pub const fn canonical_device_name(&self) -> Option<&'static str> {
        match self {
            SensorType::Accelerometer => Some(ACCELEROMETER_DEVICE_NAME),
            SensorType::MagneticField => Some(COMPASS_DEVICE_NAME),
            SensorType::Gyroscope => Some(GYROSCOPE_DEVICE_NAME),
            SensorType::Light => Some(LIGHT_DEVICE_NAME),
            SensorType::Proximity => Some(PROXIMITY_DEVICE_NAME),
            SensorType::Pressure => Some(PRESSURE_DEVICE_NAME),
            _ => None,
        }
    }

    /// Single-bit mask for this type
    ///
    /// Types numbered 64 or above cannot be expressed and yield an empty
    /// mask, so they never match a dependency.
    pub const fn bit(self) -> u64 {
        let raw = self.raw();
        if raw < 64 {
            1u64 << raw
        } else {
            0
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorType::Other(raw) => write!(f, "other({})", raw),
            known => f.write_str(known.name()),
        }
    }
}

/// Set of sensor types
///
/// Used both as a context's dependency mask and as discovery's supported-type
/// filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeMask(u64);

impl TypeMask {
    /// Mask with no types
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Mask holding exactly one type
    pub const fn of(sensor_type: SensorType) -> Self {
        Self(sensor_type.bit())
    }

    /// Build from raw bits
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Copy of this mask with `sensor_type` added
    pub const fn with(self, sensor_type: SensorType) -> Self {
        Self(self.0 | sensor_type.bit())
    }

    /// Add a type in place
    pub fn insert(&mut self, sensor_type: SensorType) {
        self.0 |= sensor_type.bit();
    }

    /// Union of two masks
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether `sensor_type` is in the set
    pub const fn contains(&self, sensor_type: SensorType) -> bool {
        (self.0 & sensor_type.bit()) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<SensorType> for TypeMask {
    fn from_iter<I: IntoIterator<Item = SensorType>>(iter: I) -> Self {
        iter.into_iter().fold(TypeMask::empty(), TypeMask::with)
    }
}

impl fmt::Display for TypeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Reported accuracy of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i8)]
pub enum SampleAccuracy {
    /// Sensor cannot be trusted, calibration needed
    Unreliable = 0,
    Low = 1,
    Medium = 2,
    #[default]
    High = 3,
}

/// One sample produced by a driver
///
/// `handle` and `sensor_type` identify the producing context. Drivers fill
/// only as many `values` as their type needs; the rest stay zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
    /// Handle of the producing sensor
    pub handle: i32,
    /// Type of the producing sensor
    pub sensor_type: SensorType,
    /// Monotonic timestamp in nanoseconds
    pub timestamp_ns: i64,
    /// Sample payload
    pub values: [f32; MAX_EVENT_VALUES],
    /// Accuracy reported with the sample
    pub accuracy: SampleAccuracy,
}

impl SensorEvent {
    /// Create an event with the given leading values
    ///
    /// Values beyond [`MAX_EVENT_VALUES`] are ignored.
    pub fn new(handle: i32, sensor_type: SensorType, timestamp_ns: i64, values: &[f32]) -> Self {
        let mut payload = [0.0; MAX_EVENT_VALUES];
        let n = values.len().min(MAX_EVENT_VALUES);
        payload[..n].copy_from_slice(&values[..n]);

        Self {
            handle,
            sensor_type,
            timestamp_ns,
            values: payload,
            accuracy: SampleAccuracy::default(),
        }
    }

    /// Same sample re-attributed to another sensor
    pub fn retagged(mut self, handle: i32, sensor_type: SensorType) -> Self {
        self.handle = handle;
        self.sensor_type = sensor_type;
        self
    }

    /// Set accuracy
    pub fn with_accuracy(mut self, accuracy: SampleAccuracy) -> Self {
        self.accuracy = accuracy;
        self
    }
}

impl Default for SensorEvent {
    fn default() -> Self {
        Self::new(0, SensorType::Other(0), 0, &[])
    }
}
