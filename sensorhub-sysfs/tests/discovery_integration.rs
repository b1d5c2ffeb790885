//! Integration tests for sysfs discovery and hub bootstrapping
//!
//! Tests run against a fake sensor class tree on a TempDir:
//! - Attribute parsing, type filtering and capacity
//! - Event device binding and data source opening
//! - Virtual sensor synthesis on top of discovered hardware
//! - End-to-end sample flow from an event node to a virtual sensor

mod common;

use std::fs::{self, File};
use std::os::unix::io::AsRawFd;

use sensorhub_core::calibration::{CalibrationTable, PassThrough};
use sensorhub_core::{SensorError, SensorEvent, SensorType};
use sensorhub_sysfs::{discover, open_hub_with, InputDriverFactory};

use common::{xyz_sample, AnyNodeProbe, FakeSysfs, FileProbe, NoDriverFactory, NodeSpec};

fn orientation_only() -> CalibrationTable {
    CalibrationTable::new().with_type(SensorType::Orientation, || Box::new(PassThrough))
}

#[test]
fn discovers_supported_nodes_in_name_order() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("b-compass", "akm8963", 2));
    tree.add_node(&NodeSpec::new("a-accel", "bma250", 1));
    tree.add_node(&NodeSpec::new("c-temp", "tmp108", 7));

    let config = tree.config();
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &InputDriverFactory);

    let names: Vec<_> = registry.sensor_list().map(|d| d.name.as_str().to_string()).collect();
    assert_eq!(names, ["bma250", "akm8963"]);
    assert_eq!(registry.context_by_type(SensorType::Accelerometer).unwrap().handle(), 1);
    assert!(registry.context_by_type(SensorType::Temperature).is_none());
}

#[test]
fn incomplete_node_is_skipped() {
    let tree = FakeSysfs::new();
    let dir = tree.add_node(&NodeSpec::new("accel", "bma250", 1));
    tree.add_node(&NodeSpec::new("light", "tsl2771", 5));
    fs::remove_file(dir.join("min_delay")).unwrap();

    let config = tree.config();
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &InputDriverFactory);
    assert_eq!(registry.count(), 1);
    assert_eq!(registry.contexts()[0].sensor_type(), SensorType::Light);
}

#[test]
fn missing_class_root_yields_empty_registry() {
    let tree = FakeSysfs::new();
    fs::remove_dir_all(tree.class_root()).unwrap();

    let config = tree.config();
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &InputDriverFactory);
    assert!(registry.is_empty());
}

#[test]
fn capacity_limits_discovery() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("a", "bma250", 1));
    tree.add_node(&NodeSpec::new("b", "akm8963", 2));
    tree.add_node(&NodeSpec::new("c", "tsl2771", 5));

    let mut config = tree.config();
    config.discovery = config.discovery.with_capacity(2);
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &InputDriverFactory);
    assert_eq!(registry.count(), 2);
}

#[test]
fn binding_prefers_exact_name_then_canonical() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("accel", "bma250", 1));
    tree.add_node(&NodeSpec::new("compass", "akm8963", 2));
    tree.add_event_node("event0", "accelerometer", &[]);
    tree.add_event_node("event1", "bma250", &[]);
    tree.add_event_node("event2", "compass", &[]);

    let config = tree.config();
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &InputDriverFactory);

    let accel = registry.context_by_type(SensorType::Accelerometer).unwrap();
    assert!(accel.binding().data_path.as_deref().unwrap().ends_with("event1"));
    assert!(accel.data_fd().is_some());
    assert!(accel.binding().enable_path.as_deref().unwrap().ends_with("accel"));

    let compass = registry.context_by_type(SensorType::MagneticField).unwrap();
    assert!(compass.binding().data_path.as_deref().unwrap().ends_with("event2"));
}

#[test]
fn unbound_sensor_is_still_registered() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("light", "tsl2771", 5));

    let config = tree.config();
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &InputDriverFactory);
    let light = registry.context_by_type(SensorType::Light).unwrap();
    assert!(light.data_fd().is_none());
    assert!(light.driver().is_some());
}

#[test]
fn driverless_sensor_keeps_no_stale_fd() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("light", "tsl2771", 5));
    tree.add_event_node("event0", "tsl2771", &[]);

    let config = tree.config();
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &NoDriverFactory);
    let light = registry.context_by_type(SensorType::Light).unwrap();
    assert!(light.binding().data_path.as_deref().unwrap().ends_with("event0"));
    assert!(light.driver().is_none());
    assert!(light.data_fd().is_none());

    // The released descriptor number is reused by the next open
    let unrelated = File::open(tree.class_root().join("light").join("name")).unwrap();
    assert!(registry.context_by_fd(unrelated.as_raw_fd()).is_none());
}

#[test]
fn bound_fd_resolves_to_its_sensor() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("light", "tsl2771", 5));
    tree.add_event_node("event0", "tsl2771", &[]);

    let config = tree.config();
    let registry = discover(&config.discovery, &FileProbe::for_tree(&tree), &InputDriverFactory);
    let fd = registry.context_by_type(SensorType::Light).unwrap().data_fd().unwrap();
    assert_eq!(registry.context_by_fd(fd).map(|c| c.sensor_type()), Some(SensorType::Light));

    let unrelated = File::open(tree.class_root().join("light").join("name")).unwrap();
    assert_ne!(unrelated.as_raw_fd(), fd);
}

#[test]
fn failed_open_leaves_sensor_registered_without_fd() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("light", "tsl2771", 5));
    tree.add_dangling_event_node("event0", "tsl2771");

    let config = tree.config();
    let mut registry = discover(&config.discovery, &AnyNodeProbe::for_tree(&tree), &InputDriverFactory);
    assert_eq!(registry.count(), 1);

    let light = registry.context_by_type(SensorType::Light).unwrap();
    let handle = light.handle();
    assert!(light.binding().data_path.as_deref().unwrap().ends_with("event0"));
    assert!(light.data_fd().is_none());

    let mut out = [SensorEvent::default(); 4];
    assert!(matches!(registry.read_events(handle, &mut out), Err(SensorError::Io { .. })));
}

#[test]
fn hub_synthesizes_and_streams_orientation() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("accel", "bma250", 1));
    tree.add_node(&NodeSpec::new("compass", "akm8963", 2));
    let mut accel_stream = xyz_sample(1_000, 0, 0, 10);
    accel_stream.extend(xyz_sample(3_000, 0, 1, 10));
    tree.add_event_node("event0", "bma250", &accel_stream);
    tree.add_event_node("event1", "akm8963", &xyz_sample(2_000, 30, 0, -40));

    let calibration = orientation_only();
    let hub = open_hub_with(&tree.config(), &FileProbe::for_tree(&tree), &InputDriverFactory, Some(&calibration));
    assert_eq!(hub.count(), 3);

    let orientation = hub.context_by_type(SensorType::Orientation).unwrap();
    hub.activate(orientation.handle(), true).unwrap();
    hub.set_delay(orientation.handle(), 20_000_000).unwrap();

    // Both control directories saw the cascade
    let accel_dir = tree.class_root().join("accel");
    assert_eq!(fs::read_to_string(accel_dir.join("enable")).unwrap(), "1");
    assert_eq!(fs::read_to_string(accel_dir.join("poll_delay")).unwrap(), "20");

    let accel_fd = hub.context_by_type(SensorType::Accelerometer).unwrap().data_fd.unwrap();
    let compass_fd = hub.context_by_type(SensorType::MagneticField).unwrap().data_fd.unwrap();

    let mut out = [SensorEvent::default(); 16];
    let n = hub.poll_events(&[accel_fd, compass_fd], &mut out).unwrap();
    assert_eq!(n, 3);
    assert!(out[..n].iter().all(|e| e.handle == orientation.handle()));
    let stamps: Vec<i64> = out[..n].iter().map(|e| e.timestamp_ns).collect();
    assert_eq!(stamps, [1_000_000, 2_000_000, 3_000_000]);

    hub.activate(orientation.handle(), false).unwrap();
    assert_eq!(fs::read_to_string(accel_dir.join("enable")).unwrap(), "0");
}

#[test]
fn real_gyro_limits_virtual_sensors() {
    let tree = FakeSysfs::new();
    tree.add_node(&NodeSpec::new("accel", "bma250", 1));
    tree.add_node(&NodeSpec::new("compass", "akm8963", 2));
    tree.add_node(&NodeSpec::new("gyro", "l3g4200d", 4));

    let calibration = CalibrationTable::new()
        .with_type(SensorType::Orientation, || Box::new(PassThrough))
        .with_type(SensorType::Gravity, || Box::new(PassThrough))
        .with_type(SensorType::Gyroscope, || Box::new(PassThrough));
    let hub = open_hub_with(&tree.config(), &FileProbe::for_tree(&tree), &InputDriverFactory, Some(&calibration));

    let virtuals: Vec<_> = hub
        .sensor_list()
        .into_iter()
        .filter(|d| d.vendor.as_str() == "oem")
        .map(|d| d.sensor_type)
        .collect();
    assert_eq!(virtuals, [SensorType::Orientation]);
}
