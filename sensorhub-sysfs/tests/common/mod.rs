//! Shared fixtures for sysfs integration tests
//!
//! Provides:
//! - A fake sensor class tree, input directory and input sysfs tree on a TempDir
//! - Probes accepting regular files (or any entry) as event nodes
//! - A factory that builds no drivers
//! - `input_event` stream builders

#![allow(dead_code)]

use std::fs::{self, File};
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use sensorhub_core::{DeviceBinding, DriverKind, SensorDescriptor, SensorDriver};
use sensorhub_sysfs::input_driver::{InputEvent, EV_ABS, EV_SYN, SYN_REPORT};
use sensorhub_sysfs::{DiscoveryConfig, DriverFactory, EventDeviceProbe, HalConfig, SysfsNameProbe};

/// One sensor class node to create
pub struct NodeSpec {
    pub dir: &'static str,
    pub name: &'static str,
    pub sensor_type: u32,
    pub min_delay_us: i32,
    pub resolution: &'static str,
}

impl NodeSpec {
    pub fn new(dir: &'static str, name: &'static str, sensor_type: u32) -> Self {
        Self { dir, name, sensor_type, min_delay_us: 10_000, resolution: "1.0" }
    }
}

/// Sensor class tree, input directory and input sysfs tree in one TempDir
pub struct FakeSysfs {
    pub root: TempDir,
}

impl FakeSysfs {
    pub fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        for sub in ["class", "input", "input-sysfs"] {
            fs::create_dir_all(root.path().join(sub)).expect("mkdir");
        }
        Self { root }
    }

    pub fn class_root(&self) -> PathBuf {
        self.root.path().join("class")
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.path().join("input")
    }

    pub fn input_sysfs_root(&self) -> PathBuf {
        self.root.path().join("input-sysfs")
    }

    pub fn config(&self) -> HalConfig {
        HalConfig {
            discovery: DiscoveryConfig::default()
                .with_class_root(self.class_root())
                .with_input_dir(self.input_dir())
                .with_input_sysfs_root(self.input_sysfs_root()),
            hub: Default::default(),
        }
    }

    /// Create a complete sensor class node
    pub fn add_node(&self, spec: &NodeSpec) -> PathBuf {
        let dir = self.class_root().join(spec.dir);
        fs::create_dir_all(&dir).expect("mkdir node");
        let attrs = [
            ("name", spec.name.to_string()),
            ("vendor", "acme".to_string()),
            ("version", "1".to_string()),
            ("type", spec.sensor_type.to_string()),
            ("max_range", "100.0".to_string()),
            ("resolution", spec.resolution.to_string()),
            ("sensor_power", "0.5".to_string()),
            ("min_delay", spec.min_delay_us.to_string()),
        ];
        for (file, value) in attrs {
            fs::write(dir.join(file), format!("{}\n", value)).expect("write attr");
        }
        dir
    }

    /// Create an event node named `name` holding `stream`
    pub fn add_event_node(&self, node: &str, name: &str, stream: &[u8]) -> PathBuf {
        let path = self.input_dir().join(node);
        fs::write(&path, stream).expect("write event node");
        let device = self.input_sysfs_root().join(node).join("device");
        fs::create_dir_all(&device).expect("mkdir device");
        fs::write(device.join("name"), format!("{}\n", name)).expect("write name");
        path
    }

    /// Create an event node named `name` whose path cannot be opened
    pub fn add_dangling_event_node(&self, node: &str, name: &str) -> PathBuf {
        let path = self.input_dir().join(node);
        symlink(self.root.path().join("gone"), &path).expect("symlink event node");
        let device = self.input_sysfs_root().join(node).join("device");
        fs::create_dir_all(&device).expect("mkdir device");
        fs::write(device.join("name"), format!("{}\n", name)).expect("write name");
        path
    }
}

/// Name probe that accepts every directory entry, openable or not
pub struct AnyNodeProbe(pub SysfsNameProbe);

impl AnyNodeProbe {
    pub fn for_tree(tree: &FakeSysfs) -> Self {
        Self(SysfsNameProbe::new(tree.input_sysfs_root()))
    }
}

impl EventDeviceProbe for AnyNodeProbe {
    fn is_event_node(&self, _node: &Path) -> bool {
        true
    }

    fn device_name(&self, node: &Path) -> io::Result<String> {
        self.0.device_name(node)
    }
}

/// Factory that never builds a driver
pub struct NoDriverFactory;

impl DriverFactory for NoDriverFactory {
    fn create(
        &self,
        _kind: DriverKind,
        _descriptor: &SensorDescriptor,
        _binding: &DeviceBinding,
        _data: Option<File>,
    ) -> Option<Box<dyn SensorDriver>> {
        None
    }
}

/// Name probe that accepts regular files as event nodes
pub struct FileProbe(pub SysfsNameProbe);

impl FileProbe {
    pub fn for_tree(tree: &FakeSysfs) -> Self {
        Self(SysfsNameProbe::new(tree.input_sysfs_root()))
    }
}

impl EventDeviceProbe for FileProbe {
    fn is_event_node(&self, node: &Path) -> bool {
        node.is_file()
    }

    fn device_name(&self, node: &Path) -> io::Result<String> {
        self.0.device_name(node)
    }
}

/// One sample: three axis updates closed by a sync report
pub fn xyz_sample(t_us: i64, x: i32, y: i32, z: i32) -> Vec<u8> {
    let record = |kind, code, value| {
        InputEvent {
            tv_sec: t_us / 1_000_000,
            tv_usec: t_us % 1_000_000,
            kind,
            code,
            value,
        }
        .encode()
    };
    [
        record(EV_ABS, 0, x),
        record(EV_ABS, 1, y),
        record(EV_ABS, 2, z),
        record(EV_SYN, SYN_REPORT, 0),
    ]
    .iter()
    .flatten()
    .copied()
    .collect()
}
