//! Error Types for the Sensor Registry
//!
//! ## Design Philosophy
//!
//! The registry sits directly under a host ABI that speaks negative errno
//! values, and it runs on devices where allocation in the control path is
//! unwelcome:
//!
//! 1. **Small and Copy**: Every variant carries only integers and
//!    `&'static str`, so errors are cheap to return and to log.
//!
//! 2. **Errno Mapping**: [`SensorError::errno`] gives the negative code the
//!    host layer returns to its caller.
//!
//! 3. **Absorb or Report**: Failures are either absorbed during
//!    initialization (configuration degrades) or reported synchronously to
//!    the immediate caller. Nothing is queued for retry.
//!
//! ## Error Categories
//!
//! ### Caller Errors
//! - `InvalidHandle`: Unknown handle passed to any entry point
//!
//! ### Graph Bookkeeping
//! - `AlreadyListening`: Duplicate listener edge, no-op
//! - `NotListening`: Missing listener edge on removal, no-op
//!
//! ### Initialization
//! - `DiscoveryIo`: Class or event directory unreadable; zero sensors result
//! - `AttributeParseIncomplete`: One candidate skipped
//! - `CalibrationUnsupported`: One virtual sensor skipped
//! - `CapacityExceeded`: Table full, further registrations rejected
//!
//! ### Driver Errors
//! - `DriverUnavailable`, `Io`, `Unsupported`
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use sensorhub_core::SensorError;
//!
//! fn host_activate(result: Result<(), SensorError>) -> i32 {
//!     match result {
//!         Ok(()) => 0,
//!         Err(e) => e.errno(),
//!     }
//! }
//!
//! assert_eq!(host_activate(Err(SensorError::InvalidHandle { handle: 77 })), -22);
//! ```

use thiserror_no_std::Error;

/// Result type for registry and driver operations
pub type SensorResult<T> = Result<T, SensorError>;

/// `EINVAL`
const EINVAL: i32 = 22;
/// `EIO`
const EIO: i32 = 5;
/// `ENODEV`
const ENODEV: i32 = 19;
/// `ENOSPC`
const ENOSPC: i32 = 28;
/// `EEXIST`
const EEXIST: i32 = 17;
/// `ENOENT`
const ENOENT: i32 = 2;
/// `ENOTSUP`
const ENOTSUP: i32 = 95;

/// Registry errors - kept small and `Copy`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No context carries this handle
    #[error("Invalid handle {handle}")]
    InvalidHandle {
        /// The handle the caller passed
        handle: i32,
    },

    /// Listener edge already present
    #[error("Handle {listener} already listens to handle {producer}")]
    AlreadyListening {
        /// Handle of the dependency source
        producer: i32,
        /// Handle of the listener
        listener: i32,
    },

    /// Listener edge absent
    #[error("Handle {listener} is not a listener of handle {producer}")]
    NotListening {
        /// Handle of the dependency source
        producer: i32,
        /// Handle of the would-be listener
        listener: i32,
    },

    /// The fixed-size context table or a listener set is full
    #[error("Capacity of {capacity} sensors exceeded")]
    CapacityExceeded {
        /// Configured capacity
        capacity: usize,
    },

    /// No calibration algorithm exists for a virtual sensor template
    #[error("No calibration algorithm for {name}")]
    CalibrationUnsupported {
        /// Template name
        name: &'static str,
    },

    /// A required sysfs attribute was missing or unparsable
    #[error("Attribute {attribute} unreadable")]
    AttributeParseIncomplete {
        /// Attribute file name
        attribute: &'static str,
    },

    /// A discovery directory could not be opened or read
    #[error("Discovery I/O failure in {stage}")]
    DiscoveryIo {
        /// Which scan failed
        stage: &'static str,
    },

    /// The context has no concrete driver (unrecognized type)
    #[error("No driver bound to handle {handle}")]
    DriverUnavailable {
        /// Handle of the driver-less context
        handle: i32,
    },

    /// Device I/O failed inside a driver
    #[error("Driver I/O failure: {reason}")]
    Io {
        /// Short description of the failing operation
        reason: &'static str,
    },

    /// The driver does not implement this capability
    #[error("Operation not supported: {operation}")]
    Unsupported {
        /// Name of the capability
        operation: &'static str,
    },
}

impl SensorError {
    /// Negative errno for the host ABI
    pub const fn errno(&self) -> i32 {
        match self {
            Self::InvalidHandle { .. } => -EINVAL,
            Self::AlreadyListening { .. } => -EEXIST,
            Self::NotListening { .. } => -ENOENT,
            Self::CapacityExceeded { .. } => -ENOSPC,
            Self::CalibrationUnsupported { .. } => -ENOTSUP,
            Self::AttributeParseIncomplete { .. } => -EINVAL,
            Self::DiscoveryIo { .. } => -EIO,
            Self::DriverUnavailable { .. } => -ENODEV,
            Self::Io { .. } => -EIO,
            Self::Unsupported { .. } => -ENOTSUP,
        }
    }
}
