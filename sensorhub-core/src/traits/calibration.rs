//! Calibration Capability Interface
//!
//! Fusion and calibration math is not part of this crate. A
//! [`CalibrationProvider`] decides, per descriptor, whether an algorithm
//! exists; the algorithm itself ([`CalibrationAlgorithm`]) turns injected
//! samples into derived samples inside a virtual driver.
//!
//! A provider answering "no" for a virtual sensor template vetoes that
//! sensor: its slot is never counted and its handle is not consumed.

use alloc::boxed::Box;

use crate::descriptor::SensorDescriptor;
use crate::events::SensorEvent;

/// One instance of a fusion or calibration algorithm
///
/// The returned event only needs meaningful `values`, `timestamp_ns` and
/// `accuracy`; the virtual driver stamps its own handle and type on it.
pub trait CalibrationAlgorithm: Send {
    /// Consume one input sample, optionally producing a derived sample
    fn process(&mut self, input: &SensorEvent) -> Option<SensorEvent>;

    /// Drop accumulated state (called when the virtual sensor is disabled)
    fn reset(&mut self) {}
}

/// Source of calibration algorithms
pub trait CalibrationProvider {
    /// Fresh algorithm instance for `descriptor`, or `None` if unsupported
    fn algorithm_for(&self, descriptor: &SensorDescriptor) -> Option<Box<dyn CalibrationAlgorithm>>;

    /// Whether an algorithm exists for `descriptor`
    fn supports_descriptor(&self, descriptor: &SensorDescriptor) -> bool {
        self.algorithm_for(descriptor).is_some()
    }
}
