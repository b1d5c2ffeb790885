//! Common test utilities for registry integration tests
//!
//! This module provides:
//! - Recording mock drivers whose calls can be inspected after the fact
//! - Mock calibration providers with per-type support switches
//! - A registry builder for the usual accelerometer/magnetometer layouts

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sensorhub_core::calibration::{CalibrationTable, PassThrough};
use sensorhub_core::{
    DeviceBinding, Driver, DriverKind, SensorDescriptor, SensorDriver, SensorEvent, SensorRegistry,
    SensorResult, SensorType, TypeMask,
};

pub mod harness;

/// Everything a recording driver has been asked to do
#[derive(Debug, Default, Clone)]
pub struct DriverLog {
    /// Current hardware power state as last requested
    pub powered: bool,
    pub enable_calls: usize,
    pub delays: Vec<i64>,
    pub injected: Vec<SensorEvent>,
}

/// Shared view of a recording driver's log
#[derive(Debug, Default, Clone)]
pub struct Recorder(Arc<Mutex<DriverLog>>);

impl Recorder {
    pub fn snapshot(&self) -> DriverLog {
        self.0.lock().unwrap().clone()
    }

    pub fn powered(&self) -> bool {
        self.snapshot().powered
    }

    pub fn last_delay(&self) -> Option<i64> {
        self.snapshot().delays.last().copied()
    }
}

/// Driver that records calls and replays a fixed batch of samples per read
pub struct RecordingDriver {
    log: Recorder,
    handle: i32,
    sensor_type: SensorType,
    per_read: usize,
    clock: i64,
}

impl SensorDriver for RecordingDriver {
    fn enable(&mut self, _handle: i32, enabled: bool) -> SensorResult<()> {
        let mut log = self.log.0.lock().unwrap();
        log.powered = enabled;
        log.enable_calls += 1;
        Ok(())
    }

    fn set_delay(&mut self, _handle: i32, period_ns: i64) -> SensorResult<()> {
        self.log.0.lock().unwrap().delays.push(period_ns);
        Ok(())
    }

    fn read_events(&mut self, out: &mut [SensorEvent]) -> SensorResult<usize> {
        let n = self.per_read.min(out.len());
        for slot in out.iter_mut().take(n) {
            self.clock += 1_000;
            *slot = SensorEvent::new(self.handle, self.sensor_type, self.clock, &[1.0, 2.0, 3.0]);
        }
        Ok(n)
    }

    fn inject_events(&mut self, events: &[SensorEvent]) -> SensorResult<()> {
        self.log.0.lock().unwrap().injected.extend_from_slice(events);
        Ok(())
    }
}

/// Register a hardware sensor backed by a recording driver
pub fn add_hardware(
    registry: &mut SensorRegistry,
    name: &str,
    sensor_type: SensorType,
    min_delay_us: i32,
    per_read: usize,
) -> (i32, Recorder) {
    let log = Recorder::default();
    let handle = registry.next_handle();
    let driver = RecordingDriver {
        log: log.clone(),
        handle,
        sensor_type,
        per_read,
        clock: 0,
    };
    let kind = DriverKind::for_physical(sensor_type).unwrap_or(DriverKind::Light);
    let desc = SensorDescriptor::new(name, "acme", sensor_type).with_min_delay_us(min_delay_us);
    let handle = registry
        .register_hardware(desc, DeviceBinding::default(), Some(Driver::new(kind, Box::new(driver))))
        .unwrap();
    (handle, log)
}

/// Register a pass-through virtual sensor over `deps`
pub fn add_virtual(registry: &mut SensorRegistry, name: &str, sensor_type: SensorType, deps: TypeMask) -> i32 {
    let desc = SensorDescriptor::new(name, "oem", sensor_type).with_min_delay_us(10_000);
    registry.register_virtual(desc, deps, Box::new(PassThrough)).unwrap()
}

pub fn accel_mag() -> TypeMask {
    TypeMask::of(SensorType::Accelerometer).with(SensorType::MagneticField)
}

/// Calibration table supporting exactly `types`
pub fn calibration_for(types: &[SensorType]) -> CalibrationTable {
    types
        .iter()
        .fold(CalibrationTable::new(), |table, t| table.with_type(*t, || Box::new(PassThrough)))
}

/// Calibration table supporting every virtual sensor kind
pub fn full_calibration() -> CalibrationTable {
    calibration_for(&[
        SensorType::MagneticFieldUncalibrated,
        SensorType::Orientation,
        SensorType::Gyroscope,
        SensorType::LinearAcceleration,
        SensorType::RotationVector,
        SensorType::Gravity,
    ])
}
