//! Driver Capability Interface
//!
//! Every sensor context in the registry is backed by one concrete driver.
//! Hardware drivers read samples from a device node and switch the sensor
//! on and off through its control files; virtual drivers receive samples from
//! other sensors by injection and compute derived samples from them.
//!
//! The registry never knows which concrete driver it is talking to. It holds
//! a [`Driver`]: a variant tag ([`DriverKind`]) plus the boxed capability
//! object, built once at discovery or synthesis time.
//!
//! ## Implementation Guidelines
//!
//! 1. **Idempotent enable**: `enable(handle, true)` on an enabled sensor must
//!    succeed and change nothing. The registry relies on this when several
//!    virtual sensors share one hardware source.
//! 2. **Bounded reads**: `read_events` fills at most `out.len()` events and may
//!    block only inside the device read.
//! 3. **Never panic**: return [`SensorError`](crate::SensorError) instead.

use alloc::boxed::Box;
use core::fmt;

use crate::errors::{SensorError, SensorResult};
use crate::events::{SensorEvent, SensorType};

/// Capabilities the registry calls on a concrete driver
///
/// ## Example Implementation
///
/// ```rust
/// use sensorhub_core::traits::SensorDriver;
/// use sensorhub_core::{SensorEvent, SensorResult, SensorType};
///
/// struct ConstantLight {
///     on: bool,
/// }
///
/// impl SensorDriver for ConstantLight {
///     fn enable(&mut self, _handle: i32, enabled: bool) -> SensorResult<()> {
///         self.on = enabled;
///         Ok(())
///     }
///
///     fn set_delay(&mut self, _handle: i32, _period_ns: i64) -> SensorResult<()> {
///         Ok(())
///     }
///
///     fn read_events(&mut self, out: &mut [SensorEvent]) -> SensorResult<usize> {
///         if !self.on || out.is_empty() {
///             return Ok(0);
///         }
///         out[0] = SensorEvent::new(5, SensorType::Light, 0, &[120.0]);
///         Ok(1)
///     }
/// }
/// ```
pub trait SensorDriver: Send {
    /// Switch the sensor identified by `handle` on or off
    fn enable(&mut self, handle: i32, enabled: bool) -> SensorResult<()>;

    /// Apply a sample period in nanoseconds
    fn set_delay(&mut self, handle: i32, period_ns: i64) -> SensorResult<()>;

    /// Read up to `out.len()` samples, returning how many were written
    fn read_events(&mut self, out: &mut [SensorEvent]) -> SensorResult<usize>;

    /// Whether samples are buffered and can be read without touching the device
    fn has_pending_events(&self) -> bool {
        false
    }

    /// Feed samples produced by another sensor
    ///
    /// Only virtual drivers consume injected samples.
    fn inject_events(&mut self, _events: &[SensorEvent]) -> SensorResult<()> {
        Err(SensorError::Unsupported { operation: "inject_events" })
    }
}

/// Driver variant, fixed when the context is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Accelerometer,
    Magnetometer,
    Proximity,
    Light,
    Gyroscope,
    Pressure,
    /// Computed from other sensors' samples
    Virtual,
}

impl DriverKind {
    /// Hardware driver variant for a physical sensor type
    ///
    /// `None` for types no hardware driver exists for.
    pub const fn for_physical(sensor_type: SensorType) -> Option<Self> {
        match sensor_type {
            SensorType::Accelerometer => Some(DriverKind::Accelerometer),
            SensorType::MagneticField => Some(DriverKind::Magnetometer),
            SensorType::Proximity => Some(DriverKind::Proximity),
            SensorType::Light => Some(DriverKind::Light),
            SensorType::Gyroscope => Some(DriverKind::Gyroscope),
            SensorType::Pressure => Some(DriverKind::Pressure),
            _ => None,
        }
    }

    pub const fn is_virtual(&self) -> bool {
        matches!(self, DriverKind::Virtual)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            DriverKind::Accelerometer => "accelerometer",
            DriverKind::Magnetometer => "magnetometer",
            DriverKind::Proximity => "proximity",
            DriverKind::Light => "light",
            DriverKind::Gyroscope => "gyroscope",
            DriverKind::Pressure => "pressure",
            DriverKind::Virtual => "virtual",
        }
    }
}

/// A concrete driver tagged with its variant
pub struct Driver {
    kind: DriverKind,
    inner: Box<dyn SensorDriver>,
}

impl Driver {
    /// Wrap a capability object
    pub fn new(kind: DriverKind, inner: Box<dyn SensorDriver>) -> Self {
        Self { kind, inner }
    }

    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    pub fn enable(&mut self, handle: i32, enabled: bool) -> SensorResult<()> {
        self.inner.enable(handle, enabled)
    }

    pub fn set_delay(&mut self, handle: i32, period_ns: i64) -> SensorResult<()> {
        self.inner.set_delay(handle, period_ns)
    }

    pub fn read_events(&mut self, out: &mut [SensorEvent]) -> SensorResult<usize> {
        // A driver reporting more than it was given room for is clamped
        self.inner.read_events(out).map(|n| n.min(out.len()))
    }

    pub fn has_pending_events(&self) -> bool {
        self.inner.has_pending_events()
    }

    pub fn inject_events(&mut self, events: &[SensorEvent]) -> SensorResult<()> {
        self.inner.inject_events(events)
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver").field("kind", &self.kind).finish_non_exhaustive()
    }
}
