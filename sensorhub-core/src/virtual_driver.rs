//! Generic Virtual Sensor Driver
//!
//! A virtual sensor has no device node. The registry fans every sample its
//! dependency sources produce into this driver through
//! [`SensorDriver::inject_events`]; the driver hands each sample to its
//! calibration algorithm and queues whatever derived sample comes back. The
//! host later collects derived samples by reading the virtual sensor's own
//! handle.
//!
//! ```text
//! accelerometer ──read──▶ registry ──inject──▶ VirtualDriver(orientation)
//! magnetometer  ──read──▶ registry ──inject──▶        │ algorithm.process()
//!                                                     ▼
//!                                      queue ──read_events(orientation)──▶ host
//! ```
//!
//! ## Backpressure
//!
//! The queue holds [`VIRTUAL_QUEUE_DEPTH`] events. When a reader falls behind,
//! the oldest derived sample is dropped: for fused orientation data a fresh
//! sample is worth more than an old one. Drops are counted in
//! [`VirtualDriverStats`].

use alloc::boxed::Box;

use heapless::Deque;

use crate::constants::buffers::VIRTUAL_QUEUE_DEPTH;
use crate::errors::SensorResult;
use crate::events::{SensorEvent, SensorType};
use crate::traits::{CalibrationAlgorithm, SensorDriver};

/// Counters kept by a virtual driver
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VirtualDriverStats {
    /// Samples injected from dependency sources
    pub injected: u32,
    /// Derived samples produced by the algorithm
    pub produced: u32,
    /// Derived samples dropped because the queue was full
    pub dropped: u32,
}

/// Driver for sensors computed from other sensors
pub struct VirtualDriver {
    handle: i32,
    sensor_type: SensorType,
    algorithm: Box<dyn CalibrationAlgorithm>,
    queue: Deque<SensorEvent, VIRTUAL_QUEUE_DEPTH>,
    period_ns: i64,
    stats: VirtualDriverStats,
}

impl VirtualDriver {
    /// Create a driver producing events for `handle` / `sensor_type`
    pub fn new(handle: i32, sensor_type: SensorType, algorithm: Box<dyn CalibrationAlgorithm>) -> Self {
        Self {
            handle,
            sensor_type,
            algorithm,
            queue: Deque::new(),
            period_ns: 0,
            stats: VirtualDriverStats::default(),
        }
    }

    /// Get statistics
    pub fn stats(&self) -> VirtualDriverStats {
        self.stats
    }

    /// Last period applied through `set_delay`
    pub fn period_ns(&self) -> i64 {
        self.period_ns
    }

    fn enqueue(&mut self, event: SensorEvent) {
        if self.queue.is_full() {
            self.queue.pop_front();
            self.stats.dropped = self.stats.dropped.saturating_add(1);
        }
        // Cannot fail: a slot was freed above if needed
        let _ = self.queue.push_back(event);
    }
}

impl SensorDriver for VirtualDriver {
    fn enable(&mut self, _handle: i32, enabled: bool) -> SensorResult<()> {
        if !enabled {
            self.algorithm.reset();
            self.queue.clear();
        }
        Ok(())
    }

    fn set_delay(&mut self, _handle: i32, period_ns: i64) -> SensorResult<()> {
        self.period_ns = period_ns;
        Ok(())
    }

    fn read_events(&mut self, out: &mut [SensorEvent]) -> SensorResult<usize> {
        let mut count = 0;
        for slot in out.iter_mut() {
            match self.queue.pop_front() {
                Some(event) => {
                    *slot = event;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn has_pending_events(&self) -> bool {
        !self.queue.is_empty()
    }

    fn inject_events(&mut self, events: &[SensorEvent]) -> SensorResult<()> {
        for event in events {
            self.stats.injected = self.stats.injected.saturating_add(1);
            if let Some(derived) = self.algorithm.process(event) {
                self.stats.produced = self.stats.produced.saturating_add(1);
                self.enqueue(derived.retagged(self.handle, self.sensor_type));
            }
        }
        Ok(())
    }
}
