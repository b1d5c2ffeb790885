//! Sensor class attribute reader
//!
//! Every sensor directory under the class root exposes its metadata as one
//! newline-terminated text file per field. [`read_descriptor`] walks a fixed
//! table of readers, one per attribute, each parsing its file and storing the
//! value in the matching descriptor field.
//!
//! The table is all-or-nothing: the first missing or unparsable attribute
//! aborts the candidate and no partial descriptor is returned.

use std::fs;
use std::path::Path;

use sensorhub_core::descriptor::bounded_name;
use sensorhub_core::{SensorDescriptor, SensorType};

use crate::error::DiscoveryError;

/// Control file switching the sensor on and off
pub const ENABLE_FILE: &str = "enable";
/// Control file taking the poll period in milliseconds
pub const POLL_DELAY_FILE: &str = "poll_delay";

/// One metadata attribute of a sensor class node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey {
    Name,
    Vendor,
    Version,
    Type,
    MaxRange,
    Resolution,
    Power,
    MinDelay,
}

impl AttributeKey {
    /// Every attribute, in read order
    pub const ALL: [AttributeKey; 8] = [
        AttributeKey::Name,
        AttributeKey::Vendor,
        AttributeKey::Version,
        AttributeKey::Type,
        AttributeKey::MaxRange,
        AttributeKey::Resolution,
        AttributeKey::Power,
        AttributeKey::MinDelay,
    ];

    /// File name inside the sensor directory
    pub const fn file_name(&self) -> &'static str {
        match self {
            AttributeKey::Name => "name",
            AttributeKey::Vendor => "vendor",
            AttributeKey::Version => "version",
            AttributeKey::Type => "type",
            AttributeKey::MaxRange => "max_range",
            AttributeKey::Resolution => "resolution",
            AttributeKey::Power => "sensor_power",
            AttributeKey::MinDelay => "min_delay",
        }
    }

    /// Parse `value` and store it in `descriptor`
    ///
    /// Returns `None` when the text does not parse as the field's type.
    fn apply(&self, descriptor: &mut SensorDescriptor, value: &str) -> Option<()> {
        match self {
            AttributeKey::Name => descriptor.name = bounded_name(value),
            AttributeKey::Vendor => descriptor.vendor = bounded_name(value),
            AttributeKey::Version => descriptor.version = value.trim().parse().ok()?,
            AttributeKey::Type => descriptor.sensor_type = SensorType::from_raw(value.trim().parse().ok()?),
            AttributeKey::MaxRange => descriptor.max_range = value.trim().parse().ok()?,
            AttributeKey::Resolution => descriptor.resolution = value.trim().parse().ok()?,
            AttributeKey::Power => descriptor.power = value.trim().parse().ok()?,
            AttributeKey::MinDelay => descriptor.min_delay_us = value.trim().parse().ok()?,
        }
        Some(())
    }
}

/// Read one attribute file, dropping the trailing newline
pub fn read_attribute(dir: &Path, key: AttributeKey) -> Result<String, DiscoveryError> {
    let path = dir.join(key.file_name());
    let mut text = fs::read_to_string(&path).map_err(|e| DiscoveryError::io(&path, e))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Build a descriptor from every attribute in `dir`
pub fn read_descriptor(dir: &Path) -> Result<SensorDescriptor, DiscoveryError> {
    let mut descriptor = SensorDescriptor::default();
    for key in AttributeKey::ALL {
        let value = read_attribute(dir, key)?;
        if key.apply(&mut descriptor, &value).is_none() {
            return Err(DiscoveryError::Parse {
                attribute: key.file_name(),
                path: dir.join(key.file_name()),
                value,
            });
        }
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_node(dir: &Path, overrides: &[(&str, &str)]) {
        let defaults = [
            ("name", "bma250\n"),
            ("vendor", "Bosch\n"),
            ("version", "2\n"),
            ("type", "1\n"),
            ("max_range", "19.6\n"),
            ("resolution", "0.0383\n"),
            ("sensor_power", "0.2\n"),
            ("min_delay", "10000\n"),
        ];
        for (file, value) in defaults {
            let value = overrides.iter().find(|(f, _)| *f == file).map_or(value, |(_, v)| *v);
            fs::write(dir.join(file), value).unwrap();
        }
    }

    #[test]
    fn reads_every_field() {
        let tmp = TempDir::new().unwrap();
        write_node(tmp.path(), &[]);

        let desc = read_descriptor(tmp.path()).unwrap();
        assert_eq!(desc.name.as_str(), "bma250");
        assert_eq!(desc.vendor.as_str(), "Bosch");
        assert_eq!(desc.version, 2);
        assert_eq!(desc.sensor_type, SensorType::Accelerometer);
        assert_eq!(desc.max_range, 19.6);
        assert_eq!(desc.min_delay_us, 10_000);
    }

    #[test]
    fn missing_attribute_aborts() {
        let tmp = TempDir::new().unwrap();
        write_node(tmp.path(), &[]);
        fs::remove_file(tmp.path().join("sensor_power")).unwrap();

        assert!(matches!(read_descriptor(tmp.path()), Err(DiscoveryError::Io { .. })));
    }

    #[test]
    fn unparsable_number_aborts() {
        let tmp = TempDir::new().unwrap();
        write_node(tmp.path(), &[("max_range", "lots\n")]);

        match read_descriptor(tmp.path()) {
            Err(DiscoveryError::Parse { attribute, value, .. }) => {
                assert_eq!(attribute, "max_range");
                assert_eq!(value, "lots");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn only_one_newline_is_dropped() {
        let tmp = TempDir::new().unwrap();
        write_node(tmp.path(), &[("vendor", "Acme Corp\n")]);
        assert_eq!(read_attribute(tmp.path(), AttributeKey::Vendor).unwrap(), "Acme Corp");
    }
}
