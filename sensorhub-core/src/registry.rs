//! Sensor Registry and Dependency Engine
//!
//! The registry owns the fixed-capacity context table and every listener
//! edge between contexts. It is the only code that touches listener sets.
//!
//! ## Dependency Direction
//!
//! "C depends on X" holds when C's dependency mask contains X's type. The
//! same relation drives all three cascades:
//!
//! - [`SensorRegistry::activate`] powers every X that C depends on and
//!   registers C as a listener of X (disable releases it)
//! - [`SensorRegistry::set_delay`] re-synchronizes the period of every such X
//! - [`SensorRegistry::read_events`] injects each sample X produces into
//!   every enabled C that depends on X
//!
//! A hardware context's mask holds its own type, so a hardware sensor
//! enabled directly becomes its own listener.
//!
//! ## Power Accounting
//!
//! There is no reference counter. A source stays powered for as long as its
//! listener set is non-empty, and the last listener leaving switches its
//! driver off.
//!
//! ## Rate Reconciliation
//!
//! ```text
//! listeners of X:  [orientation 20ms] [gravity 5ms] [X itself 10ms]
//!                                 │
//!                 min over listener delays = 5ms
//!                                 │
//!   X enabled with own nonzero delay < min?  ──yes──▶ own delay
//!                                 │ no
//!                                 ▼
//!                      driver(X).set_delay(5ms)
//! ```
//!
//! ## Threading
//!
//! The registry has no internal locking: every entry point takes `&mut self`
//! and the owner must serialize calls. [`SensorHub`](crate::hub::SensorHub)
//! provides a mutex-guarded wrapper for hosts that share it across threads.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::Write;

use heapless::Vec;

use crate::constants::buffers::MAX_SENSORS;
use crate::constants::sensors::HANDLE_BASE;
use crate::constants::time::MIN_DELAY_FLOOR_NS;
use crate::context::{DeviceBinding, ListenerInsertError, SensorContext, Slot};
use crate::descriptor::SensorDescriptor;
use crate::errors::{SensorError, SensorResult};
use crate::events::{SensorEvent, SensorType, TypeMask};
use crate::traits::{CalibrationAlgorithm, Driver, DriverKind};
use crate::virtual_driver::VirtualDriver;

/// Fixed-capacity table of sensor contexts
#[derive(Debug)]
pub struct SensorRegistry {
    contexts: Vec<SensorContext, MAX_SENSORS>,
    capacity: usize,
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorRegistry {
    /// Empty registry holding up to [`MAX_SENSORS`] contexts
    pub const fn new() -> Self {
        Self {
            contexts: Vec::new(),
            capacity: MAX_SENSORS,
        }
    }

    /// Empty registry with a smaller capacity
    ///
    /// Capacities above [`MAX_SENSORS`] are clamped.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            contexts: Vec::new(),
            capacity: capacity.min(MAX_SENSORS),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of registered contexts
    pub fn count(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.contexts.len() >= self.capacity
    }

    /// Handle the next successful registration will receive
    pub fn next_handle(&self) -> i32 {
        HANDLE_BASE + self.contexts.len() as i32
    }

    fn push(&mut self, context: SensorContext) -> SensorResult<i32> {
        if self.is_full() {
            log_warn!("Sensor table full ({}), rejecting {}", self.capacity, context.descriptor.name.as_str());
            return Err(SensorError::CapacityExceeded { capacity: self.capacity });
        }
        let handle = context.handle();
        self.contexts
            .push(context)
            .map_err(|_| SensorError::CapacityExceeded { capacity: self.capacity })?;
        Ok(handle)
    }

    /// Append a discovered hardware sensor
    ///
    /// The handle is derived from the slot and overwrites whatever the
    /// descriptor carried. Returns the assigned handle.
    pub fn register_hardware(
        &mut self,
        mut descriptor: SensorDescriptor,
        binding: DeviceBinding,
        driver: Option<Driver>,
    ) -> SensorResult<i32> {
        descriptor.handle = self.next_handle();
        if driver.is_none() {
            log_debug!("No driver for {} ({})", descriptor.name.as_str(), descriptor.sensor_type);
        }
        self.push(SensorContext::hardware(descriptor, binding, driver))
    }

    /// Append a virtual sensor computed by `algorithm` from `dep_mask`
    ///
    /// A rejected registration leaves the table and the next handle unchanged.
    pub fn register_virtual(
        &mut self,
        mut descriptor: SensorDescriptor,
        dep_mask: TypeMask,
        algorithm: Box<dyn CalibrationAlgorithm>,
    ) -> SensorResult<i32> {
        if self.is_full() {
            return Err(SensorError::CapacityExceeded { capacity: self.capacity });
        }
        descriptor.handle = self.next_handle();
        let driver = Driver::new(
            DriverKind::Virtual,
            Box::new(VirtualDriver::new(descriptor.handle, descriptor.sensor_type, algorithm)),
        );
        self.push(SensorContext::virtual_sensor(descriptor, dep_mask, driver))
    }

    /// All contexts in slot order
    pub fn contexts(&self) -> &[SensorContext] {
        &self.contexts
    }

    /// Descriptors of every registered sensor, in slot order
    pub fn sensor_list(&self) -> impl Iterator<Item = &SensorDescriptor> + '_ {
        self.contexts.iter().map(|c| &c.descriptor)
    }

    /// Slot of the context carrying `handle`
    pub fn slot_of(&self, handle: i32) -> SensorResult<Slot> {
        match self.contexts.iter().position(|c| c.handle() == handle) {
            Some(slot) => Ok(slot),
            None => {
                log_error!("Invalid handle({})", handle);
                Err(SensorError::InvalidHandle { handle })
            }
        }
    }

    /// Context carrying `handle`
    pub fn context_by_handle(&self, handle: i32) -> SensorResult<&SensorContext> {
        let slot = self.slot_of(handle)?;
        Ok(&self.contexts[slot])
    }

    /// Context reading from the event device `fd`
    pub fn context_by_fd(&self, fd: i32) -> Option<&SensorContext> {
        self.contexts.iter().find(|c| c.data_fd() == Some(fd))
    }

    /// First context of `sensor_type`
    pub fn context_by_type(&self, sensor_type: SensorType) -> Option<&SensorContext> {
        self.contexts.iter().find(|c| c.sensor_type() == sensor_type)
    }

    /// Whether any context has `sensor_type`
    pub fn has_type(&self, sensor_type: SensorType) -> bool {
        self.context_by_type(sensor_type).is_some()
    }

    // Slots of every context `slot` depends on, in slot order
    fn sources_of(&self, slot: Slot) -> Vec<Slot, MAX_SENSORS> {
        let mask = self.contexts[slot].dep_mask;
        self.contexts
            .iter()
            .enumerate()
            .filter(|(_, c)| mask.contains(c.sensor_type()))
            .map(|(i, _)| i)
            .collect()
    }

    fn link(&mut self, producer: Slot, listener: Slot) -> SensorResult<()> {
        let listener_handle = self.contexts[listener].handle();
        let source = &mut self.contexts[producer];
        match source.listeners.insert(listener) {
            Ok(()) => Ok(()),
            Err(ListenerInsertError::AlreadyPresent) => {
                log_error!(
                    "Already registered as listener for {}:{}",
                    source.descriptor.name.as_str(),
                    listener_handle
                );
                Err(SensorError::AlreadyListening { producer: source.handle(), listener: listener_handle })
            }
            Err(ListenerInsertError::Full) => Err(SensorError::CapacityExceeded { capacity: MAX_SENSORS }),
        }
    }

    fn unlink(&mut self, producer: Slot, listener: Slot) -> SensorResult<()> {
        let listener_handle = self.contexts[listener].handle();
        let source = &mut self.contexts[producer];
        if source.listeners.remove(listener) {
            Ok(())
        } else {
            log_error!("{} is not a listener of {}", listener_handle, source.descriptor.name.as_str());
            Err(SensorError::NotListening { producer: source.handle(), listener: listener_handle })
        }
    }

    /// Add `listener` to the listener set of `producer`
    ///
    /// Fails with [`SensorError::AlreadyListening`] when the edge exists; the
    /// set is left with exactly one edge.
    pub fn register_listener(&mut self, producer: i32, listener: i32) -> SensorResult<()> {
        let p = self.slot_of(producer)?;
        let l = self.slot_of(listener)?;
        self.link(p, l)
    }

    /// Remove `listener` from the listener set of `producer`
    pub fn unregister_listener(&mut self, producer: i32, listener: i32) -> SensorResult<()> {
        let p = self.slot_of(producer)?;
        let l = self.slot_of(listener)?;
        self.unlink(p, l)
    }

    /// Enable or disable the sensor `handle`, cascading to its sources
    ///
    /// Every source is visited even when one fails; the first driver error is
    /// returned and the context's own enabled flag is updated regardless.
    pub fn activate(&mut self, handle: i32, enable: bool) -> SensorResult<()> {
        let index = self.slot_of(handle)?;
        let mut first_err: Option<SensorError> = None;

        for i in self.sources_of(index) {
            let result = if enable {
                self.enable_source(i, index)
            } else {
                self.release_source(i, index)
            };
            if let Err(e) = result {
                first_err.get_or_insert(e);
            }
        }

        self.contexts[index].enabled = enable;
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn enable_source(&mut self, source: Slot, listener: Slot) -> SensorResult<()> {
        let ctx = &mut self.contexts[source];
        let handle = ctx.handle();
        let driver = ctx.driver.as_mut().ok_or(SensorError::DriverUnavailable { handle })?;
        driver.enable(handle, true)?;
        // A duplicate edge is already logged and leaves the set intact
        let _ = self.link(source, listener);
        Ok(())
    }

    fn release_source(&mut self, source: Slot, listener: Slot) -> SensorResult<()> {
        let mut result = Ok(());

        if !self.contexts[source].listeners.is_empty() {
            let _ = self.unlink(source, listener);
            if source == listener && self.contexts[source].enabled {
                self.contexts[source].enabled = false;
            }
            if let Err(e) = self.sync_slot(source) {
                result = Err(e);
            }
        }

        let ctx = &mut self.contexts[source];
        if ctx.listeners.is_empty() {
            let handle = ctx.handle();
            if let Some(driver) = ctx.driver.as_mut() {
                driver.enable(handle, false)?;
            }
        }
        result
    }

    /// Request a sample period for `handle`
    ///
    /// The request is clamped to the sensor's declared minimum, and a zero
    /// period becomes [`MIN_DELAY_FLOOR_NS`]. Every source the sensor depends
    /// on is then re-synchronized. Only an unknown handle fails.
    pub fn set_delay(&mut self, handle: i32, period_ns: i64) -> SensorResult<()> {
        let index = self.slot_of(handle)?;
        let ctx = &mut self.contexts[index];

        let min_ns = ctx.descriptor.min_delay_ns();
        let mut delay = if period_ns < min_ns { min_ns } else { period_ns };
        if delay == 0 {
            delay = MIN_DELAY_FLOOR_NS;
        }
        ctx.delay_ns = delay;

        for i in self.sources_of(index) {
            if let Err(_e) = self.sync_slot(i) {
                log_warn!("Delay sync for slot {} failed: {}", i, _e);
            }
        }
        Ok(())
    }

    /// Push the reconciled period of source `handle` to its driver
    ///
    /// Returns the period that was applied.
    pub fn sync_delay(&mut self, handle: i32) -> SensorResult<i64> {
        let index = self.slot_of(handle)?;
        self.sync_slot(index)
    }

    fn sync_slot(&mut self, index: Slot) -> SensorResult<i64> {
        let listeners = self.contexts[index].listeners.clone();

        let mut min_ns = if listeners.is_empty() {
            self.contexts[index].delay_ns
        } else {
            let mut min_ns = i64::MAX;
            for slot in listeners.iter() {
                let listener = &mut self.contexts[slot];
                if listener.delay_ns == 0 {
                    log_warn!("Listener delay is 0. Fix it to minDelay");
                    listener.delay_ns = match listener.descriptor.min_delay_ns() {
                        0 => MIN_DELAY_FLOOR_NS,
                        min => min,
                    };
                }
                min_ns = min_ns.min(listener.delay_ns);
            }
            min_ns
        };

        let ctx = &mut self.contexts[index];
        if ctx.delay_ns != 0 && ctx.delay_ns < min_ns && ctx.enabled {
            min_ns = ctx.delay_ns;
        }

        let handle = ctx.handle();
        let driver = ctx.driver.as_mut().ok_or(SensorError::DriverUnavailable { handle })?;
        driver.set_delay(handle, min_ns)?;
        Ok(min_ns)
    }

    /// Read samples from `handle` and fan them out to its dependents
    ///
    /// Each sample is injected once into every other enabled context that
    /// depends on the source's type. Returns the number of samples the source
    /// produced, which is what `out[..n]` holds.
    pub fn read_events(&mut self, handle: i32, out: &mut [SensorEvent]) -> SensorResult<usize> {
        let index = self.slot_of(handle)?;
        self.read_slot(index, out)
    }

    pub(crate) fn read_slot(&mut self, index: Slot, out: &mut [SensorEvent]) -> SensorResult<usize> {
        let source = &mut self.contexts[index];
        let handle = source.handle();
        let source_type = source.sensor_type();
        let driver = source.driver.as_mut().ok_or(SensorError::DriverUnavailable { handle })?;
        let produced = driver.read_events(out)?;

        for event in &out[..produced] {
            for (i, ctx) in self.contexts.iter_mut().enumerate() {
                if i == index || !ctx.enabled || !ctx.depends_on(source_type) {
                    continue;
                }
                if let Some(driver) = ctx.driver.as_mut() {
                    if let Err(_e) = driver.inject_events(core::slice::from_ref(event)) {
                        log_debug!("Inject into {} failed: {}", ctx.descriptor.name.as_str(), _e);
                    }
                }
            }
        }

        Ok(produced)
    }

    /// Whether `handle` has samples buffered
    pub fn has_pending_events(&self, handle: i32) -> SensorResult<bool> {
        let ctx = self.context_by_handle(handle)?;
        Ok(ctx.driver.as_ref().map(Driver::has_pending_events).unwrap_or(false))
    }

    /// Human-readable rendering of every context and its listeners
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for ctx in self.contexts.iter() {
            let desc = &ctx.descriptor;
            let _ = writeln!(
                out,
                "name:{} type:{} handle:{} data_fd:{} is_virtual:{}",
                desc.name.as_str(),
                desc.sensor_type.raw(),
                desc.handle,
                ctx.binding.data_fd.unwrap_or(-1),
                ctx.is_virtual,
            );
            let _ = writeln!(
                out,
                "  data_path:{} enable_path:{}",
                ctx.binding.data_path.as_deref().unwrap_or("-"),
                ctx.binding.enable_path.as_deref().unwrap_or("-"),
            );
            let _ = writeln!(
                out,
                "  delay_ns:{} enable:{} dep_mask:{}",
                ctx.delay_ns, ctx.enabled, ctx.dep_mask
            );
            let _ = write!(out, "  listeners:");
            for slot in ctx.listeners.iter() {
                let l = &self.contexts[slot];
                let _ = write!(out, " {}({})", l.descriptor.name.as_str(), l.handle());
            }
            let _ = writeln!(out);
        }
        out
    }
}
