//! Buffer Sizes and Table Capacity
//!
//! Every container the registry owns is sized here at compile time. Nothing
//! grows after initialization: discovery and synthesis stop appending once
//! the table is full.

// ===== CONTEXT TABLE =====

/// Maximum number of sensor contexts (real + virtual) in one registry.
///
/// Also bounds every listener set, since a context can be listened to by at
/// most every other context plus itself. Must stay below 64 so that slot
/// indices fit a `u64` bitmap if a caller wants one.
pub const MAX_SENSORS: usize = 32;

/// Maximum stored length of a sensor name or vendor string (bytes).
///
/// Mirrors the sysfs attribute read size; longer values are truncated at a
/// character boundary.
pub const SENSOR_NAME_MAX_LEN: usize = 64;

// ===== EVENTS =====

/// Number of value slots carried by one sensor event.
///
/// Six covers the widest payload the synthesized sensors produce: an
/// uncalibrated magnetic field sample (x, y, z plus bias x, y, z).
pub const MAX_EVENT_VALUES: usize = 6;

/// Depth of the derived-event queue inside each virtual driver.
///
/// When full the oldest derived event is dropped.
pub const VIRTUAL_QUEUE_DEPTH: usize = 64;

/// Default number of events pulled from one driver per multiplexer pass.
pub const DEFAULT_READ_BATCH: usize = 16;
