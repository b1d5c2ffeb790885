//! Sensor Contexts
//!
//! A [`SensorContext`] is the registry's record for one sensor, real or
//! virtual. It wraps the descriptor the host sees and adds everything the
//! dependency engine needs:
//!
//! ```text
//! SensorContext
//! ├── descriptor      what the host enumerates
//! ├── data_path / fd  where raw samples come from (hardware only)
//! ├── driver          concrete reader, tagged with its variant
//! ├── dep_mask        sensor types this context needs running
//! ├── enabled         application-level request for this handle
//! ├── delay_ns        last requested sample period
//! └── listeners       slots of contexts consuming this one's samples
//! ```
//!
//! Listener membership doubles as a reference count: a hardware sensor stays
//! powered exactly as long as its listener set is non-empty.
//!
//! Contexts are created once at initialization, live in a fixed slot of the
//! registry table, and are never moved or destroyed individually.

use alloc::string::String;

use heapless::Vec;

use crate::constants::buffers::MAX_SENSORS;
use crate::descriptor::SensorDescriptor;
use crate::events::{SensorType, TypeMask};
use crate::traits::Driver;

/// Index of a context in the registry table
pub type Slot = usize;

/// Where a hardware sensor's samples and controls live
///
/// Filled in by device discovery; every field may be absent when binding
/// failed, in which case later reads fail in the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceBinding {
    /// Event device the samples are read from
    pub data_path: Option<String>,
    /// Raw descriptor of the opened event device
    pub data_fd: Option<i32>,
    /// Sysfs directory holding the control files
    pub enable_path: Option<String>,
}

/// Why a listener could not be added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerInsertError {
    AlreadyPresent,
    Full,
}

/// Set of listener slots, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerSet {
    slots: Vec<Slot, MAX_SENSORS>,
}

impl ListenerSet {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn insert(&mut self, slot: Slot) -> Result<(), ListenerInsertError> {
        if self.contains(slot) {
            return Err(ListenerInsertError::AlreadyPresent);
        }
        self.slots.push(slot).map_err(|_| ListenerInsertError::Full)
    }

    /// Remove `slot`, returning whether it was present
    pub(crate) fn remove(&mut self, slot: Slot) -> bool {
        match self.slots.iter().position(|&s| s == slot) {
            Some(pos) => {
                self.slots.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate listener slots in registration order
    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.iter().copied()
    }
}

/// The registry's record for one sensor
#[derive(Debug)]
pub struct SensorContext {
    pub(crate) descriptor: SensorDescriptor,
    pub(crate) binding: DeviceBinding,
    pub(crate) driver: Option<Driver>,
    pub(crate) is_virtual: bool,
    pub(crate) dep_mask: TypeMask,
    pub(crate) enabled: bool,
    pub(crate) delay_ns: i64,
    pub(crate) listeners: ListenerSet,
}

impl SensorContext {
    /// Context for a discovered hardware sensor
    ///
    /// The context depends on its own type, so activating it goes through
    /// the same cascade as activating a virtual sensor.
    pub fn hardware(descriptor: SensorDescriptor, binding: DeviceBinding, driver: Option<Driver>) -> Self {
        let dep_mask = TypeMask::of(descriptor.sensor_type);
        Self {
            descriptor,
            binding,
            driver,
            is_virtual: false,
            dep_mask,
            enabled: false,
            delay_ns: 0,
            listeners: ListenerSet::new(),
        }
    }

    /// Context for a sensor computed from the sensors in `dep_mask`
    pub fn virtual_sensor(descriptor: SensorDescriptor, dep_mask: TypeMask, driver: Driver) -> Self {
        Self {
            descriptor,
            binding: DeviceBinding::default(),
            driver: Some(driver),
            is_virtual: true,
            dep_mask,
            enabled: false,
            delay_ns: 0,
            listeners: ListenerSet::new(),
        }
    }

    pub fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    pub fn handle(&self) -> i32 {
        self.descriptor.handle
    }

    pub fn sensor_type(&self) -> SensorType {
        self.descriptor.sensor_type
    }

    pub fn binding(&self) -> &DeviceBinding {
        &self.binding
    }

    pub fn data_fd(&self) -> Option<i32> {
        self.binding.data_fd
    }

    pub fn driver(&self) -> Option<&Driver> {
        self.driver.as_ref()
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn dep_mask(&self) -> TypeMask {
        self.dep_mask
    }

    /// Whether the application enabled this handle
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last requested sample period (ns)
    pub fn delay_ns(&self) -> i64 {
        self.delay_ns
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    /// Whether anything keeps this sensor running
    ///
    /// True when enabled directly or when at least one listener remains.
    pub fn is_active(&self) -> bool {
        self.enabled || !self.listeners.is_empty()
    }

    /// Whether this context consumes samples of `sensor_type`
    pub fn depends_on(&self, sensor_type: SensorType) -> bool {
        self.dep_mask.contains(sensor_type)
    }
}
