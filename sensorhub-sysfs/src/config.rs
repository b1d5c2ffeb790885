//! Discovery configuration
//!
//! Defaults match the layout of a stock Linux sensor class driver stack.
//! Hosts that keep their configuration in JSON can load a [`HalConfig`]
//! directly; every field is optional and falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sensorhub_core::constants::{MAX_SENSORS, SUPPORTED_SENSOR_TYPES};
use sensorhub_core::{HubConfig, TypeMask};

use crate::error::DiscoveryError;

/// Sysfs class tree with one directory per sensor
pub const DEFAULT_CLASS_ROOT: &str = "/sys/class/sensors";
/// Directory of input event device nodes
pub const DEFAULT_INPUT_DIR: &str = "/dev/input";
/// Sysfs view of the input subsystem, used to read device names
pub const DEFAULT_INPUT_SYSFS_ROOT: &str = "/sys/class/input";

/// Where and what to discover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub class_root: PathBuf,
    pub input_dir: PathBuf,
    pub input_sysfs_root: PathBuf,
    /// Types kept after reading attributes; others are dropped
    pub supported_types: TypeMask,
    /// Maximum number of contexts, clamped to `MAX_SENSORS`
    pub capacity: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            class_root: PathBuf::from(DEFAULT_CLASS_ROOT),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            input_sysfs_root: PathBuf::from(DEFAULT_INPUT_SYSFS_ROOT),
            supported_types: SUPPORTED_SENSOR_TYPES,
            capacity: MAX_SENSORS,
        }
    }
}

impl DiscoveryConfig {
    pub fn with_class_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.class_root = path.into();
        self
    }

    pub fn with_input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = path.into();
        self
    }

    pub fn with_input_sysfs_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_sysfs_root = path.into();
        self
    }

    pub fn with_supported_types(mut self, mask: TypeMask) -> Self {
        self.supported_types = mask;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.min(MAX_SENSORS);
        self
    }

    /// Capacity after clamping
    pub fn effective_capacity(&self) -> usize {
        self.capacity.min(MAX_SENSORS)
    }
}

/// Everything `open_hub` needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalConfig {
    pub discovery: DiscoveryConfig,
    pub hub: HubConfig,
}

impl HalConfig {
    /// Parse from a JSON document
    pub fn from_json(text: &str) -> Result<Self, DiscoveryError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, DiscoveryError> {
        let text = fs::read_to_string(path).map_err(|e| DiscoveryError::io(path, e))?;
        Self::from_json(&text)
    }
}
