//! Prebuilt registry layouts
//!
//! Provides:
//! - The accelerometer + magnetometer board with N virtual dependents
//! - Deterministic handles for assertions

use sensorhub_core::{SensorRegistry, SensorType};

use super::{accel_mag, add_hardware, add_virtual, Recorder};

/// Accelerometer and magnetometer with virtual sensors listening to both
pub struct Board {
    pub registry: SensorRegistry,
    pub accel: i32,
    pub accel_log: Recorder,
    pub mag: i32,
    pub mag_log: Recorder,
    pub virtuals: Vec<i32>,
}

const VIRTUAL_TYPES: [SensorType; 4] = [
    SensorType::Orientation,
    SensorType::Gravity,
    SensorType::LinearAcceleration,
    SensorType::RotationVector,
];

impl Board {
    /// Board whose accelerometer produces `per_read` samples per read
    pub fn new(virtual_count: usize, per_read: usize) -> Self {
        let mut registry = SensorRegistry::new();
        let (accel, accel_log) = add_hardware(&mut registry, "bma250", SensorType::Accelerometer, 0, per_read);
        let (mag, mag_log) = add_hardware(&mut registry, "akm8963", SensorType::MagneticField, 0, 0);
        let virtuals = VIRTUAL_TYPES
            .iter()
            .cycle()
            .take(virtual_count)
            .enumerate()
            .map(|(i, t)| add_virtual(&mut registry, &format!("virtual-{}", i), *t, accel_mag()))
            .collect();

        Self { registry, accel, accel_log, mag, mag_log, virtuals }
    }
}
