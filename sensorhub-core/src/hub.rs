//! Host-Facing Sensor Hub
//!
//! [`SensorHub`] is the service object a host talks to. It is built exactly
//! once from a populated [`SensorRegistry`] and then shared by reference or
//! `Arc`. Every entry point takes the hub's single mutex for its whole
//! duration, so listener sets are never mutated concurrently.
//!
//! ## Event Multiplexing
//!
//! [`SensorHub::poll_events`] merges every active sensor into one stream:
//!
//! ```text
//! ready fds ──▶ by-fd lookup ──┐
//!                              ▼
//! slot order: accel, mag, ..., orientation, gravity
//!   active && (fd ready || pending) ──▶ read_events (fans out to virtuals)
//!   enabled by application?        ──▶ copy into out
//!                              ▼
//!                  stable sort by timestamp
//! ```
//!
//! Hardware sensors precede virtual ones in the table, so samples injected
//! into a virtual sensor during a poll are drained by the same poll.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::constants::buffers::DEFAULT_READ_BATCH;
use crate::context::SensorContext;
use crate::descriptor::SensorDescriptor;
use crate::errors::{SensorError, SensorResult};
use crate::events::{SensorEvent, SensorType, TypeMask};
use crate::registry::SensorRegistry;

/// Hub tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HubConfig {
    /// Samples read from one sensor per drain
    pub read_batch: usize,
    /// Log the full table at info level once constructed
    pub log_dump: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            read_batch: DEFAULT_READ_BATCH,
            log_dump: true,
        }
    }
}

impl HubConfig {
    pub fn with_read_batch(mut self, read_batch: usize) -> Self {
        self.read_batch = read_batch.max(1);
        self
    }

    pub fn with_log_dump(mut self, log_dump: bool) -> Self {
        self.log_dump = log_dump;
        self
    }
}

/// Owned view of one context, safe to hold outside the lock
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSnapshot {
    pub descriptor: SensorDescriptor,
    pub data_fd: Option<i32>,
    pub is_virtual: bool,
    pub dep_mask: TypeMask,
    pub enabled: bool,
    pub delay_ns: i64,
    /// Handles of the listeners, in registration order
    pub listeners: Vec<i32>,
}

impl ContextSnapshot {
    fn capture(registry: &SensorRegistry, ctx: &SensorContext) -> Self {
        let listeners = ctx
            .listeners()
            .iter()
            .filter_map(|slot| registry.contexts().get(slot))
            .map(SensorContext::handle)
            .collect();
        Self {
            descriptor: ctx.descriptor().clone(),
            data_fd: ctx.data_fd(),
            is_virtual: ctx.is_virtual(),
            dep_mask: ctx.dep_mask(),
            enabled: ctx.is_enabled(),
            delay_ns: ctx.delay_ns(),
            listeners,
        }
    }

    pub fn handle(&self) -> i32 {
        self.descriptor.handle
    }

    /// Enabled directly or kept alive by listeners
    pub fn is_active(&self) -> bool {
        self.enabled || !self.listeners.is_empty()
    }
}

struct Inner {
    registry: SensorRegistry,
    scratch: Vec<SensorEvent>,
}

/// Registry behind a mutex, exposing the host API
pub struct SensorHub {
    inner: Mutex<Inner>,
    config: HubConfig,
}

impl SensorHub {
    /// Take ownership of a populated registry
    pub fn new(registry: SensorRegistry, config: HubConfig) -> Self {
        if config.log_dump {
            log_info!("Sensor table ({} sensors):\n{}", registry.count(), registry.dump());
        }
        let batch = config.read_batch.max(1);
        Self {
            inner: Mutex::new(Inner {
                registry,
                scratch: vec![SensorEvent::default(); batch],
            }),
            config,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    // A panic while holding the lock leaves the table consistent at the
    // granularity of one entry point, so poisoning is ignored
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the registry
    pub fn with_registry<R>(&self, f: impl FnOnce(&mut SensorRegistry) -> R) -> R {
        f(&mut self.lock().registry)
    }

    /// Descriptors of every sensor, in handle order
    pub fn sensor_list(&self) -> Vec<SensorDescriptor> {
        self.lock().registry.sensor_list().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.lock().registry.count()
    }

    pub fn context_by_handle(&self, handle: i32) -> SensorResult<ContextSnapshot> {
        let inner = self.lock();
        let ctx = inner.registry.context_by_handle(handle)?;
        Ok(ContextSnapshot::capture(&inner.registry, ctx))
    }

    pub fn context_by_fd(&self, fd: i32) -> Option<ContextSnapshot> {
        let inner = self.lock();
        inner
            .registry
            .context_by_fd(fd)
            .map(|ctx| ContextSnapshot::capture(&inner.registry, ctx))
    }

    pub fn context_by_type(&self, sensor_type: SensorType) -> Option<ContextSnapshot> {
        let inner = self.lock();
        inner
            .registry
            .context_by_type(sensor_type)
            .map(|ctx| ContextSnapshot::capture(&inner.registry, ctx))
    }

    pub fn activate(&self, handle: i32, enable: bool) -> SensorResult<()> {
        self.lock().registry.activate(handle, enable)
    }

    pub fn set_delay(&self, handle: i32, period_ns: i64) -> SensorResult<()> {
        self.lock().registry.set_delay(handle, period_ns)
    }

    pub fn read_events(&self, handle: i32, out: &mut [SensorEvent]) -> SensorResult<usize> {
        self.lock().registry.read_events(handle, out)
    }

    pub fn has_pending_events(&self, handle: i32) -> SensorResult<bool> {
        self.lock().registry.has_pending_events(handle)
    }

    pub fn dump(&self) -> String {
        self.lock().registry.dump()
    }

    /// Drain every ready sensor into `out` as one timestamp-ordered stream
    ///
    /// `ready_fds` lists the event devices the host's poll reported readable.
    /// Returns `WouldBlock` when nothing was produced; a driver error is
    /// reported only if no sensor delivered anything.
    pub fn poll_events(&self, ready_fds: &[i32], out: &mut [SensorEvent]) -> nb::Result<usize, SensorError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let registry = &mut inner.registry;
        let scratch = &mut inner.scratch;

        let ready: Vec<i32> = ready_fds
            .iter()
            .filter_map(|fd| registry.context_by_fd(*fd))
            .map(SensorContext::handle)
            .collect();

        let mut filled = 0;
        let mut first_err = None;

        for slot in 0..registry.count() {
            if filled == out.len() {
                break;
            }
            let ctx = &registry.contexts()[slot];
            if !ctx.is_active() {
                continue;
            }
            let pending = ctx.driver().map_or(false, |d| d.has_pending_events());
            if !pending && !ready.contains(&ctx.handle()) {
                continue;
            }

            let enabled = ctx.is_enabled();
            let room = if enabled {
                (out.len() - filled).min(scratch.len())
            } else {
                scratch.len()
            };

            match registry.read_slot(slot, &mut scratch[..room]) {
                Ok(n) if enabled => {
                    out[filled..filled + n].copy_from_slice(&scratch[..n]);
                    filled += n;
                }
                Ok(_) => {}
                Err(e) => {
                    log_warn!("Reading slot {} failed: {}", slot, e);
                    first_err.get_or_insert(e);
                }
            }
        }

        out[..filled].sort_by_key(|e| e.timestamp_ns);

        match (filled, first_err) {
            (0, Some(e)) => Err(nb::Error::Other(e)),
            (0, None) => Err(nb::Error::WouldBlock),
            (n, _) => Ok(n),
        }
    }
}

impl core::fmt::Debug for SensorHub {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorHub")
            .field("count", &self.count())
            .field("config", &self.config)
            .finish()
    }
}
