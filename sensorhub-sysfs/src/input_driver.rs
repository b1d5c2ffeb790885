//! Generic input-event hardware driver
//!
//! Sensor class drivers report samples through an evdev node: each axis
//! update is one `input_event` record and an `EV_SYN` record closes a
//! sample. [`InputEventDriver`] decodes that stream into [`SensorEvent`]s and
//! drives the sensor through the `enable` and `poll_delay` control files of
//! its class directory.
//!
//! ## Record layout (64-bit kernels)
//!
//! ```text
//! 0        8        16     18     20       24
//! ├ tv_sec ┼ tv_usec ┼ type ┼ code ┼ value  ┤
//! ```
//!
//! Axis values persist across samples: the kernel only reports axes that
//! changed, so an axis missing from a report keeps its previous value.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use log::{debug, warn};

use sensorhub_core::constants::{MAX_EVENT_VALUES, NS_PER_MS, NS_PER_SEC, NS_PER_US};
use sensorhub_core::{
    DeviceBinding, DriverKind, SensorDescriptor, SensorDriver, SensorError, SensorEvent, SensorResult,
    SensorType,
};

use crate::attributes::{ENABLE_FILE, POLL_DELAY_FILE};

/// Size of one `input_event` record
pub const INPUT_EVENT_SIZE: usize = 24;

/// Records pulled from the device per read
const RECORDS_PER_READ: usize = 64;

pub const EV_SYN: u16 = 0x00;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;
pub const SYN_REPORT: u16 = 0x00;

const ABS_PRESSURE: u16 = 0x18;
const ABS_DISTANCE: u16 = 0x19;
const ABS_MISC: u16 = 0x28;
const REL_MISC: u16 = 0x09;

/// One decoded `input_event`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub tv_sec: i64,
    pub tv_usec: i64,
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    /// Decode a native-endian record
    pub fn decode(raw: &[u8; INPUT_EVENT_SIZE]) -> Self {
        let mut sec = [0u8; 8];
        let mut usec = [0u8; 8];
        let mut value = [0u8; 4];
        sec.copy_from_slice(&raw[0..8]);
        usec.copy_from_slice(&raw[8..16]);
        value.copy_from_slice(&raw[20..24]);
        Self {
            tv_sec: i64::from_ne_bytes(sec),
            tv_usec: i64::from_ne_bytes(usec),
            kind: u16::from_ne_bytes([raw[16], raw[17]]),
            code: u16::from_ne_bytes([raw[18], raw[19]]),
            value: i32::from_ne_bytes(value),
        }
    }

    /// Encode as a native-endian record
    pub fn encode(&self) -> [u8; INPUT_EVENT_SIZE] {
        let mut raw = [0u8; INPUT_EVENT_SIZE];
        raw[0..8].copy_from_slice(&self.tv_sec.to_ne_bytes());
        raw[8..16].copy_from_slice(&self.tv_usec.to_ne_bytes());
        raw[16..18].copy_from_slice(&self.kind.to_ne_bytes());
        raw[18..20].copy_from_slice(&self.code.to_ne_bytes());
        raw[20..24].copy_from_slice(&self.value.to_ne_bytes());
        raw
    }

    pub fn timestamp_ns(&self) -> i64 {
        self.tv_sec
            .saturating_mul(NS_PER_SEC)
            .saturating_add(self.tv_usec.saturating_mul(NS_PER_US))
    }
}

/// Payload slot an axis code writes to
fn axis_slot(kind: u16, code: u16) -> Option<usize> {
    match (kind, code) {
        (EV_ABS, ABS_PRESSURE | ABS_DISTANCE | ABS_MISC) => Some(0),
        (EV_REL, REL_MISC) => Some(0),
        (EV_ABS | EV_REL, c) if (c as usize) < MAX_EVENT_VALUES => Some(c as usize),
        _ => None,
    }
}

/// Hardware driver reading an evdev node
pub struct InputEventDriver {
    handle: i32,
    sensor_type: SensorType,
    scale: f32,
    data: Option<File>,
    control_dir: Option<PathBuf>,
    axes: [i32; MAX_EVENT_VALUES],
    dirty: bool,
    partial: Vec<u8>,
    pending: VecDeque<SensorEvent>,
}

impl InputEventDriver {
    /// Driver for `descriptor`, reading `data` and controlled through `control_dir`
    pub fn new(descriptor: &SensorDescriptor, data: Option<File>, control_dir: Option<PathBuf>) -> Self {
        let scale = if descriptor.resolution > 0.0 { descriptor.resolution } else { 1.0 };
        Self {
            handle: descriptor.handle,
            sensor_type: descriptor.sensor_type,
            scale,
            data,
            control_dir,
            axes: [0; MAX_EVENT_VALUES],
            dirty: false,
            partial: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    fn write_control(&self, file: &str, value: &str) -> SensorResult<()> {
        let Some(dir) = &self.control_dir else {
            return Ok(());
        };
        let path = dir.join(file);
        fs::write(&path, value).map_err(|e| {
            warn!("write {} to {} failed: {}", value, path.display(), e);
            SensorError::Io { reason: "control write" }
        })
    }

    fn decode_into_pending(&mut self, bytes: &[u8]) {
        self.partial.extend_from_slice(bytes);
        let whole = self.partial.len() / INPUT_EVENT_SIZE * INPUT_EVENT_SIZE;

        for chunk in self.partial[..whole].chunks_exact(INPUT_EVENT_SIZE) {
            let mut raw = [0u8; INPUT_EVENT_SIZE];
            raw.copy_from_slice(chunk);
            let event = InputEvent::decode(&raw);

            if event.kind == EV_SYN && event.code == SYN_REPORT {
                if self.dirty {
                    let mut values = [0.0f32; MAX_EVENT_VALUES];
                    for (v, a) in values.iter_mut().zip(self.axes.iter()) {
                        *v = *a as f32 * self.scale;
                    }
                    self.pending.push_back(SensorEvent::new(
                        self.handle,
                        self.sensor_type,
                        event.timestamp_ns(),
                        &values,
                    ));
                    self.dirty = false;
                }
            } else if let Some(slot) = axis_slot(event.kind, event.code) {
                self.axes[slot] = event.value;
                self.dirty = true;
            }
        }

        self.partial.drain(..whole);
    }

    fn fill_from_device(&mut self) -> io::Result<()> {
        let Some(file) = self.data.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "no event device bound"));
        };
        let mut buf = [0u8; INPUT_EVENT_SIZE * RECORDS_PER_READ];
        let n = file.read(&mut buf)?;
        self.decode_into_pending(&buf[..n]);
        Ok(())
    }
}

impl SensorDriver for InputEventDriver {
    fn enable(&mut self, _handle: i32, enabled: bool) -> SensorResult<()> {
        self.write_control(ENABLE_FILE, if enabled { "1" } else { "0" })?;
        if !enabled {
            self.pending.clear();
            self.partial.clear();
            self.dirty = false;
        }
        Ok(())
    }

    fn set_delay(&mut self, _handle: i32, period_ns: i64) -> SensorResult<()> {
        let ms = period_ns / NS_PER_MS;
        self.write_control(POLL_DELAY_FILE, &ms.to_string())
    }

    fn read_events(&mut self, out: &mut [SensorEvent]) -> SensorResult<usize> {
        if self.pending.len() < out.len() {
            if let Err(e) = self.fill_from_device() {
                if self.pending.is_empty() {
                    debug!("read on handle {} failed: {}", self.handle, e);
                    return Err(SensorError::Io { reason: "event read" });
                }
            }
        }

        let n = self.pending.len().min(out.len());
        for (slot, event) in out.iter_mut().zip(self.pending.drain(..n)) {
            *slot = event;
        }
        Ok(n)
    }

    fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Builds the concrete driver for a discovered sensor
pub trait DriverFactory {
    /// Driver for `descriptor`, or `None` to leave the context driverless
    ///
    /// `data` is the opened event device, if binding and opening succeeded.
    /// A returned driver must keep it open: its fd is recorded in the binding
    /// and resolved by the hub's ready-fd lookup.
    fn create(
        &self,
        kind: DriverKind,
        descriptor: &SensorDescriptor,
        binding: &DeviceBinding,
        data: Option<File>,
    ) -> Option<Box<dyn SensorDriver>>;
}

/// Default factory: one [`InputEventDriver`] per recognised physical type
#[derive(Debug, Default, Clone, Copy)]
pub struct InputDriverFactory;

impl DriverFactory for InputDriverFactory {
    fn create(
        &self,
        kind: DriverKind,
        descriptor: &SensorDescriptor,
        binding: &DeviceBinding,
        data: Option<File>,
    ) -> Option<Box<dyn SensorDriver>> {
        if kind.is_virtual() {
            return None;
        }
        let control_dir = binding.enable_path.as_ref().map(PathBuf::from);
        Some(Box::new(InputEventDriver::new(descriptor, data, control_dir)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn record(t_us: i64, kind: u16, code: u16, value: i32) -> [u8; INPUT_EVENT_SIZE] {
        InputEvent {
            tv_sec: t_us / 1_000_000,
            tv_usec: t_us % 1_000_000,
            kind,
            code,
            value,
        }
        .encode()
    }

    fn stream(records: &[[u8; INPUT_EVENT_SIZE]]) -> Vec<u8> {
        records.iter().flatten().copied().collect()
    }

    fn accel() -> SensorDescriptor {
        let mut desc = SensorDescriptor::new("bma250", "bosch", SensorType::Accelerometer)
            .with_characteristics(19.6, 0.5, 0.2);
        desc.handle = 4;
        desc
    }

    fn driver_over(bytes: &[u8], control: Option<PathBuf>) -> (InputEventDriver, TempDir) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("event0");
        File::create(&path).unwrap().write_all(bytes).unwrap();
        let driver = InputEventDriver::new(&accel(), Some(File::open(&path).unwrap()), control);
        (driver, tmp)
    }

    #[test]
    fn records_round_trip() {
        let raw = record(1_500_000, EV_ABS, 2, -7);
        let event = InputEvent::decode(&raw);
        assert_eq!(event.tv_sec, 1);
        assert_eq!(event.code, 2);
        assert_eq!(event.value, -7);
        assert_eq!(event.timestamp_ns(), 1_500_000_000);
    }

    #[test]
    fn corrupt_timestamps_saturate() {
        let event = InputEvent { tv_sec: i64::MAX, tv_usec: 999_999, kind: EV_SYN, code: SYN_REPORT, value: 0 };
        assert_eq!(event.timestamp_ns(), i64::MAX);

        let event = InputEvent { tv_sec: i64::MIN, tv_usec: i64::MIN, kind: EV_SYN, code: SYN_REPORT, value: 0 };
        assert_eq!(event.timestamp_ns(), i64::MIN);
    }

    #[test]
    fn sync_closes_a_sample() {
        let bytes = stream(&[
            record(10, EV_ABS, 0, 2),
            record(10, EV_ABS, 1, 4),
            record(10, EV_ABS, 2, 6),
            record(10, EV_SYN, SYN_REPORT, 0),
            record(20, EV_ABS, 2, 8),
            record(20, EV_SYN, SYN_REPORT, 0),
        ]);
        let (mut driver, _tmp) = driver_over(&bytes, None);

        let mut out = [SensorEvent::default(); 4];
        assert_eq!(driver.read_events(&mut out).unwrap(), 2);
        assert_eq!(out[0].handle, 4);
        assert_eq!(&out[0].values[..3], &[1.0, 2.0, 3.0]);
        // Unreported axes keep their last value
        assert_eq!(&out[1].values[..3], &[1.0, 2.0, 4.0]);
        assert_eq!(out[1].timestamp_ns, 20_000);
    }

    #[test]
    fn overflow_is_kept_pending() {
        let bytes = stream(&[
            record(1, EV_ABS, 0, 1),
            record(1, EV_SYN, SYN_REPORT, 0),
            record(2, EV_ABS, 0, 2),
            record(2, EV_SYN, SYN_REPORT, 0),
        ]);
        let (mut driver, _tmp) = driver_over(&bytes, None);

        let mut out = [SensorEvent::default(); 1];
        assert_eq!(driver.read_events(&mut out).unwrap(), 1);
        assert!(driver.has_pending_events());
        assert_eq!(driver.read_events(&mut out).unwrap(), 1);
        assert_eq!(out[0].timestamp_ns, 2_000);
    }

    #[test]
    fn empty_sync_produces_nothing() {
        let bytes = stream(&[record(1, EV_SYN, SYN_REPORT, 0)]);
        let (mut driver, _tmp) = driver_over(&bytes, None);
        let mut out = [SensorEvent::default(); 2];
        assert_eq!(driver.read_events(&mut out).unwrap(), 0);
    }

    #[test]
    fn unbound_driver_fails_reads() {
        let mut driver = InputEventDriver::new(&accel(), None, None);
        let mut out = [SensorEvent::default(); 1];
        assert_eq!(driver.read_events(&mut out), Err(SensorError::Io { reason: "event read" }));
    }

    #[test]
    fn control_files_are_written() {
        let control = TempDir::new().unwrap();
        let (mut driver, _tmp) = driver_over(&[], Some(control.path().to_path_buf()));

        driver.enable(4, true).unwrap();
        assert_eq!(fs::read_to_string(control.path().join("enable")).unwrap(), "1");
        driver.set_delay(4, 20_000_000).unwrap();
        assert_eq!(fs::read_to_string(control.path().join("poll_delay")).unwrap(), "20");
        driver.enable(4, false).unwrap();
        assert_eq!(fs::read_to_string(control.path().join("enable")).unwrap(), "0");
    }

    proptest::proptest! {
        #[test]
        fn records_split_across_reads_decode_identically(
            values in proptest::collection::vec(-1000i32..1000, 1..12),
            split in 0usize..1000,
        ) {
            let mut records = Vec::new();
            for (i, v) in values.iter().enumerate() {
                records.push(record(i as i64, EV_ABS, 0, *v));
                records.push(record(i as i64, EV_SYN, SYN_REPORT, 0));
            }
            let bytes = stream(&records);
            let split = split % (bytes.len() + 1);

            let mut whole = InputEventDriver::new(&accel(), None, None);
            whole.decode_into_pending(&bytes);
            let mut pieces = InputEventDriver::new(&accel(), None, None);
            pieces.decode_into_pending(&bytes[..split]);
            pieces.decode_into_pending(&bytes[split..]);

            proptest::prop_assert_eq!(pieces.pending.len(), values.len());
            proptest::prop_assert_eq!(&whole.pending, &pieces.pending);
        }
    }

    #[test]
    fn factory_skips_virtual_kind() {
        let factory = InputDriverFactory;
        let binding = DeviceBinding::default();
        assert!(factory.create(DriverKind::Virtual, &accel(), &binding, None).is_none());
        assert!(factory.create(DriverKind::Accelerometer, &accel(), &binding, None).is_some());
    }
}
