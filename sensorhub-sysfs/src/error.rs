//! Discovery errors
//!
//! These carry the path and the underlying `io::Error` for logging. At the
//! engine boundary they collapse into the small, `Copy` [`SensorError`].

use std::io;
use std::path::{Path, PathBuf};

use sensorhub_core::SensorError;
use thiserror::Error;

/// Failures while scanning sysfs or loading configuration
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Attribute {attribute} in {} is not valid: {value:?}", .path.display())]
    Parse {
        attribute: &'static str,
        path: PathBuf,
        value: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Sensor(#[from] SensorError),
}

impl DiscoveryError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

impl From<DiscoveryError> for SensorError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::Io { .. } => SensorError::DiscoveryIo { stage: "sysfs" },
            DiscoveryError::Parse { attribute, .. } => SensorError::AttributeParseIncomplete { attribute },
            DiscoveryError::Config(_) => SensorError::DiscoveryIo { stage: "config" },
            DiscoveryError::Sensor(e) => e,
        }
    }
}
