//! Sensor Type Numbering and Naming
//!
//! The numeric sensor types below are the values the kernel sensor class
//! reports in each node's `type` attribute, and the values hosts use to
//! identify a physical quantity. They must never be renumbered.

use crate::events::{SensorType, TypeMask};

// ===== RAW TYPE NUMBERS =====

/// Accelerometer (m/s², 3 axes).
pub const SENSOR_TYPE_ACCELEROMETER: u32 = 1;
/// Calibrated magnetic field (µT, 3 axes).
pub const SENSOR_TYPE_MAGNETIC_FIELD: u32 = 2;
/// Orientation (azimuth, pitch, roll in degrees).
pub const SENSOR_TYPE_ORIENTATION: u32 = 3;
/// Gyroscope (rad/s, 3 axes).
pub const SENSOR_TYPE_GYROSCOPE: u32 = 4;
/// Ambient light (lux).
pub const SENSOR_TYPE_LIGHT: u32 = 5;
/// Barometric pressure (hPa).
pub const SENSOR_TYPE_PRESSURE: u32 = 6;
/// Device temperature (°C, deprecated by ambient temperature).
pub const SENSOR_TYPE_TEMPERATURE: u32 = 7;
/// Proximity (cm).
pub const SENSOR_TYPE_PROXIMITY: u32 = 8;
/// Gravity vector (m/s²).
pub const SENSOR_TYPE_GRAVITY: u32 = 9;
/// Linear acceleration, gravity removed (m/s²).
pub const SENSOR_TYPE_LINEAR_ACCELERATION: u32 = 10;
/// Rotation vector (unit quaternion components).
pub const SENSOR_TYPE_ROTATION_VECTOR: u32 = 11;
/// Relative humidity (%).
pub const SENSOR_TYPE_RELATIVE_HUMIDITY: u32 = 12;
/// Ambient temperature (°C).
pub const SENSOR_TYPE_AMBIENT_TEMPERATURE: u32 = 13;
/// Uncalibrated magnetic field with bias estimate (µT).
pub const SENSOR_TYPE_MAGNETIC_FIELD_UNCALIBRATED: u32 = 14;
/// Rotation vector without magnetometer input.
pub const SENSOR_TYPE_GAME_ROTATION_VECTOR: u32 = 15;
/// Uncalibrated gyroscope with drift estimate (rad/s).
pub const SENSOR_TYPE_GYROSCOPE_UNCALIBRATED: u32 = 16;

// ===== HANDLES =====

/// Handle assigned to slot 0.
///
/// Handles are `HANDLE_BASE + slot`. Zero is never a valid handle so that a
/// zero-initialized host structure cannot alias the first sensor.
pub const HANDLE_BASE: i32 = 1;

// ===== DISCOVERY FILTER =====

/// Physical sensor types discovery accepts by default.
///
/// Exactly the types a concrete hardware driver exists for. Everything else
/// is read from sysfs and then dropped.
pub const SUPPORTED_SENSOR_TYPES: TypeMask = TypeMask::empty()
    .with(SensorType::Accelerometer)
    .with(SensorType::MagneticField)
    .with(SensorType::Proximity)
    .with(SensorType::Light)
    .with(SensorType::Gyroscope)
    .with(SensorType::Pressure);

// ===== CANONICAL EVENT DEVICE NAMES =====

/// Input device name used by accelerometer drivers that do not report the
/// sysfs sensor name.
pub const ACCELEROMETER_DEVICE_NAME: &str = "accelerometer";
/// Canonical input device name for magnetometers.
pub const COMPASS_DEVICE_NAME: &str = "compass";
/// Canonical input device name for gyroscopes.
pub const GYROSCOPE_DEVICE_NAME: &str = "gyroscope";
/// Canonical input device name for light sensors.
pub const LIGHT_DEVICE_NAME: &str = "light";
/// Canonical input device name for proximity sensors.
pub const PROXIMITY_DEVICE_NAME: &str = "proximity";
/// Canonical input device name for barometers.
pub const PRESSURE_DEVICE_NAME: &str = "pressure";
