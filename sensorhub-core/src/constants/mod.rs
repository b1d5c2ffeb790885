//! Constants for SensorHub Core
//!
//! This module provides centralized, documented constants used throughout
//! the registry, the synthesizer and the drivers. Numeric values that the host
//! ABI depends on (sensor type numbering, handle derivation, delay floors)
//! live here and nowhere else.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Buffers**: Table capacity, event payload width, queue depths
//! - **Sensors**: Sensor type numbering, supported types, canonical names
//! - **Time**: Delay floors and unit conversions
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Use descriptive names that include units (`_NS`, `_US`, `_MS`)
//! 3. Anything the kernel side dictates must cite the attribute or ABI it mirrors

/// Table capacity, event payload width and queue depths.
pub mod buffers;

/// Sensor type numbering, supported types and canonical event-device names.
pub mod sensors;

/// Delay floors and time unit conversions.
pub mod time;

// Re-export commonly used constants for convenience
pub use buffers::{
    MAX_SENSORS, MAX_EVENT_VALUES, VIRTUAL_QUEUE_DEPTH,
    DEFAULT_READ_BATCH, SENSOR_NAME_MAX_LEN,
};

pub use sensors::{
    HANDLE_BASE, SUPPORTED_SENSOR_TYPES,
};

pub use time::{
    MIN_DELAY_FLOOR_NS, NS_PER_US, NS_PER_MS, NS_PER_SEC,
};
