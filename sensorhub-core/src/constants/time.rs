//! Time-Related Constants
//!
//! Sample periods are carried in nanoseconds throughout the registry, while
//! descriptors declare their minimum delay in microseconds (as the sysfs
//! `min_delay` attribute does).

/// Nanoseconds per microsecond.
pub const NS_PER_US: i64 = 1_000;

/// Nanoseconds per millisecond.
pub const NS_PER_MS: i64 = 1_000_000;

/// Nanoseconds per second.
pub const NS_PER_SEC: i64 = 1_000_000_000;

/// Period applied when a request resolves to exactly zero (1 ms).
///
/// A zero period would ask the hardware for an unbounded rate; on-change
/// sensors declare `min_delay = 0`, so a request of 0 on those lands here.
pub const MIN_DELAY_FLOOR_NS: i64 = NS_PER_MS;
