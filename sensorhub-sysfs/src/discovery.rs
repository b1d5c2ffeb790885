//! Device discovery
//!
//! Populates a [`SensorRegistry`] from the sensor class tree:
//!
//! ```text
//! /sys/class/sensors/<node>/{name,vendor,...}  ──read_descriptor──▶ candidates
//!        │ unsupported type / unreadable attribute: dropped
//!        ▼
//! /dev/input/eventN ──probe name──▶ (name, path) list
//!        │ exact name match, else canonical type name
//!        ▼
//! open data path read-only ──▶ DriverFactory ──▶ register_hardware
//! ```
//!
//! Nothing here is fatal. An unreadable directory degrades to zero sensors
//! (or zero bindings), a bad candidate is skipped and a failed open leaves
//! the context without a data descriptor.

use std::fs::{self, File};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use sensorhub_core::{DeviceBinding, Driver, DriverKind, SensorDescriptor, SensorError, SensorRegistry};

use crate::attributes::read_descriptor;
use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::input_driver::DriverFactory;
use crate::probe::EventDeviceProbe;

/// A sensor class node that passed attribute parsing and the type filter
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub descriptor: SensorDescriptor,
    /// Class directory, also holding the control files
    pub node_dir: PathBuf,
}

/// An input event device and the name its driver registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNode {
    pub name: String,
    pub path: PathBuf,
}

/// Directory entries of `dir`, sorted by file name
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DiscoveryError::io(dir, e))? {
        let entry = entry.map_err(|e| DiscoveryError::io(dir, e))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Read every sensor node under the class root
///
/// Stops after `config.capacity` accepted candidates.
pub fn scan_class_tree(config: &DiscoveryConfig) -> Result<Vec<Candidate>, DiscoveryError> {
    let mut candidates = Vec::new();

    for node_dir in sorted_entries(&config.class_root)? {
        if candidates.len() >= config.effective_capacity() {
            warn!("Sensor capacity {} reached, ignoring remaining nodes", config.effective_capacity());
            break;
        }

        let descriptor = match read_descriptor(&node_dir) {
            Ok(d) => d,
            Err(e) => {
                warn!("Skipping {}: {}", node_dir.display(), e);
                continue;
            }
        };

        if !config.supported_types.contains(descriptor.sensor_type) {
            info!("Dropping unsupported {} ({})", descriptor.name.as_str(), descriptor.sensor_type);
            continue;
        }

        candidates.push(Candidate { descriptor, node_dir });
    }

    Ok(candidates)
}

/// Probe every event device node for its name
///
/// Nodes the probe rejects or cannot name are skipped.
pub fn scan_event_nodes(config: &DiscoveryConfig, probe: &dyn EventDeviceProbe) -> Result<Vec<EventNode>, DiscoveryError> {
    let mut nodes = Vec::new();

    for path in sorted_entries(&config.input_dir)? {
        if !probe.is_event_node(&path) {
            continue;
        }
        match probe.device_name(&path) {
            Ok(name) => nodes.push(EventNode { name, path }),
            Err(e) => warn!("Cannot name {}: {}", path.display(), e),
        }
    }

    Ok(nodes)
}

/// Event node carrying `descriptor`'s samples
///
/// An exact sensor name match wins outright; otherwise the last node named
/// after the sensor type's canonical device name is used.
pub fn bind_data_path<'a>(descriptor: &SensorDescriptor, nodes: &'a [EventNode]) -> Option<&'a EventNode> {
    if let Some(exact) = nodes.iter().find(|n| n.name == descriptor.name.as_str()) {
        return Some(exact);
    }
    let canonical = descriptor.sensor_type.canonical_device_name()?;
    nodes.iter().rev().find(|n| n.name == canonical)
}

/// Build a registry of every discovered hardware sensor
pub fn discover(
    config: &DiscoveryConfig,
    probe: &dyn EventDeviceProbe,
    factory: &dyn DriverFactory,
) -> SensorRegistry {
    let mut registry = SensorRegistry::with_capacity(config.effective_capacity());

    let candidates = scan_class_tree(config).unwrap_or_else(|e| {
        error!("Sensor class scan failed: {}", e);
        Vec::new()
    });
    let nodes = scan_event_nodes(config, probe).unwrap_or_else(|e| {
        error!("Event device scan failed: {}", e);
        Vec::new()
    });

    for candidate in candidates {
        if let Err(e) = register_candidate(&mut registry, candidate, &nodes, factory) {
            warn!("Registration stopped: {}", e);
            break;
        }
    }

    registry
}

fn register_candidate(
    registry: &mut SensorRegistry,
    candidate: Candidate,
    nodes: &[EventNode],
    factory: &dyn DriverFactory,
) -> Result<i32, SensorError> {
    let Candidate { mut descriptor, node_dir } = candidate;
    descriptor.handle = registry.next_handle();

    let data_path = bind_data_path(&descriptor, nodes).map(|n| n.path.clone());
    let data = match &data_path {
        Some(path) => match File::open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                error!("open {} failed({})", path.display(), e);
                None
            }
        },
        None => {
            warn!("No event device for {}", descriptor.name.as_str());
            None
        }
    };

    let mut binding = DeviceBinding {
        data_path: data_path.map(|p| p.display().to_string()),
        data_fd: None,
        enable_path: Some(node_dir.display().to_string()),
    };

    // The fd stays valid only while a driver owns the file
    let data_fd = data.as_ref().map(|f| f.as_raw_fd());
    let driver = match DriverKind::for_physical(descriptor.sensor_type) {
        Some(kind) => factory
            .create(kind, &descriptor, &binding, data)
            .map(|inner| Driver::new(kind, inner)),
        None => {
            error!("No driver for {} sensor {}", descriptor.sensor_type, descriptor.name.as_str());
            None
        }
    };
    if driver.is_some() {
        binding.data_fd = data_fd;
    } else if data_fd.is_some() {
        warn!("Closing data source of driverless {}", descriptor.name.as_str());
    }

    registry.register_hardware(descriptor, binding, driver)
}
