//! Event device name probing
//!
//! Binding a sensor to its event device needs the name the input driver
//! registered. The kernel exposes it twice: through an ioctl on the device
//! node and as `/sys/class/input/eventN/device/name`. [`SysfsNameProbe`]
//! reads the sysfs copy so no ioctl is needed.

use std::fs;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

/// Answers questions about nodes in the input event directory
pub trait EventDeviceProbe {
    /// Whether `node` is an event device worth probing
    fn is_event_node(&self, node: &Path) -> bool {
        fs::metadata(node).map(|m| m.file_type().is_char_device()).unwrap_or(false)
    }

    /// Name the input driver registered for `node`
    fn device_name(&self, node: &Path) -> io::Result<String>;
}

/// Reads device names from the input subsystem's sysfs tree
#[derive(Debug, Clone)]
pub struct SysfsNameProbe {
    input_sysfs_root: PathBuf,
}

impl SysfsNameProbe {
    pub fn new(input_sysfs_root: impl Into<PathBuf>) -> Self {
        Self { input_sysfs_root: input_sysfs_root.into() }
    }

    fn name_path(&self, node: &Path) -> io::Result<PathBuf> {
        let event = node
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "node has no file name"))?;
        Ok(self.input_sysfs_root.join(event).join("device").join("name"))
    }
}

impl EventDeviceProbe for SysfsNameProbe {
    fn device_name(&self, node: &Path) -> io::Result<String> {
        let mut name = fs::read_to_string(self.name_path(node)?)?;
        if name.ends_with('\n') {
            name.pop();
        }
        Ok(name)
    }
}
