//! Virtual Sensor Synthesis
//!
//! After discovery the synthesizer looks at which physical sensors exist and
//! appends the virtual sensors that can be computed from them. Each addition
//! is gated by the calibration provider: without an algorithm for the target
//! descriptor the sensor is skipped and its handle is not consumed.
//!
//! ## Rules
//!
//! | Present hardware                     | Virtual sensors attempted             |
//! |--------------------------------------|---------------------------------------|
//! | magnetometer                         | uncalibrated magnetic field           |
//! | accelerometer + magnetometer         | orientation                           |
//! | accelerometer + magnetometer, no gyro| pseudo gyroscope, linear acceleration,|
//! |                                      | rotation vector, gravity              |
//!
//! A real gyroscope suppresses the whole last group. Attempt order is fixed,
//! so handles are deterministic for a given hardware set and provider.

use heapless::Vec;

use crate::descriptor::SensorDescriptor;
use crate::errors::{SensorError, SensorResult};
use crate::events::{SensorType, TypeMask};
use crate::registry::SensorRegistry;
use crate::traits::CalibrationProvider;

/// Vendor string of the built-in virtual sensor templates
pub const VIRTUAL_VENDOR: &str = "oem";

/// Minimum delay of the built-in templates (µs)
pub const VIRTUAL_MIN_DELAY_US: i32 = 10_000;

/// Number of virtual sensor kinds
pub const VIRTUAL_KIND_COUNT: usize = 6;

/// Virtual sensors the synthesizer knows how to add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualSensorKind {
    /// Raw magnetometer data, sharing the magnetometer's name and vendor
    UncalibratedMagneticField,
    Orientation,
    /// Angular rate estimated from accelerometer and magnetometer
    PseudoGyroscope,
    LinearAcceleration,
    RotationVector,
    Gravity,
}

/// Accelerometer plus magnetometer
const ACCEL_MAG: TypeMask = TypeMask::of(SensorType::Accelerometer).with(SensorType::MagneticField);

impl VirtualSensorKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UncalibratedMagneticField => "uncalibrated-magnetic-field",
            Self::Orientation => "oem-orientation",
            Self::PseudoGyroscope => "oem-pseudo-gyro",
            Self::LinearAcceleration => "oem-linear-acceleration",
            Self::RotationVector => "oem-rotation-vector",
            Self::Gravity => "oem-gravity",
        }
    }

    /// Type the virtual sensor reports
    ///
    /// The pseudo gyroscope reports as a gyroscope.
    pub const fn sensor_type(&self) -> SensorType {
        match self {
            Self::UncalibratedMagneticField => SensorType::MagneticFieldUncalibrated,
            Self::Orientation => SensorType::Orientation,
            Self::PseudoGyroscope => SensorType::Gyroscope,
            Self::LinearAcceleration => SensorType::LinearAcceleration,
            Self::RotationVector => SensorType::RotationVector,
            Self::Gravity => SensorType::Gravity,
        }
    }

    /// Sensor types this kind is computed from
    pub const fn dependencies(&self) -> TypeMask {
        match self {
            Self::UncalibratedMagneticField => TypeMask::of(SensorType::MagneticField),
            _ => ACCEL_MAG,
        }
    }

    /// Static descriptor template
    ///
    /// The uncalibrated magnetic field has none; it copies the magnetometer.
    pub fn template(&self) -> Option<SensorDescriptor> {
        let (max_range, resolution) = match self {
            Self::UncalibratedMagneticField => return None,
            Self::Orientation => (360.0, 1.0 / 256.0),
            Self::PseudoGyroscope => (50.0, 0.01),
            Self::RotationVector => (1.0, 1.0 / (1u32 << 24) as f32),
            Self::LinearAcceleration | Self::Gravity => (40.0, 0.01),
        };
        Some(
            SensorDescriptor::new(self.name(), VIRTUAL_VENDOR, self.sensor_type())
                .with_version(1)
                .with_characteristics(max_range, resolution, 1.0)
                .with_min_delay_us(VIRTUAL_MIN_DELAY_US),
        )
    }
}

/// Outcome of one synthesis pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Sensors added, with their handles, in attempt order
    pub created: Vec<(VirtualSensorKind, i32), VIRTUAL_KIND_COUNT>,
    /// Sensors attempted but not added
    pub skipped: Vec<(VirtualSensorKind, SensorError), VIRTUAL_KIND_COUNT>,
}

impl SynthesisReport {
    /// Handle of `kind` if it was created
    pub fn handle_of(&self, kind: VirtualSensorKind) -> Option<i32> {
        self.created.iter().find(|(k, _)| *k == kind).map(|(_, h)| *h)
    }
}

/// Kinds to attempt for the hardware currently in `registry`, in order
pub fn plan(registry: &SensorRegistry) -> Vec<VirtualSensorKind, VIRTUAL_KIND_COUNT> {
    let has_accel = registry.has_type(SensorType::Accelerometer);
    let has_mag = registry.has_type(SensorType::MagneticField);
    let has_gyro = registry.has_type(SensorType::Gyroscope);

    let mut kinds = Vec::new();
    // Pushes cannot overflow: at most VIRTUAL_KIND_COUNT kinds are planned
    if has_mag {
        let _ = kinds.push(VirtualSensorKind::UncalibratedMagneticField);
    }
    if has_accel && has_mag {
        let _ = kinds.push(VirtualSensorKind::Orientation);
        if !has_gyro {
            let _ = kinds.push(VirtualSensorKind::PseudoGyroscope);
            let _ = kinds.push(VirtualSensorKind::LinearAcceleration);
            let _ = kinds.push(VirtualSensorKind::RotationVector);
            let _ = kinds.push(VirtualSensorKind::Gravity);
        }
    }
    kinds
}

/// Append every virtual sensor the hardware and `provider` allow
///
/// Without a provider nothing is added. A failed attempt leaves no trace in
/// the registry; later attempts still run.
pub fn synthesize(registry: &mut SensorRegistry, provider: Option<&dyn CalibrationProvider>) -> SynthesisReport {
    let mut report = SynthesisReport::default();
    let Some(provider) = provider else {
        log_info!("No calibration provider, skipping virtual sensors");
        return report;
    };

    // Descriptor of the last magnetometer, source of the uncalibrated copy
    let magnetometer = registry
        .contexts()
        .iter()
        .rev()
        .find(|c| !c.is_virtual() && c.sensor_type() == SensorType::MagneticField)
        .map(|c| c.descriptor().clone());

    for kind in plan(registry) {
        let template = match kind.template() {
            Some(t) => Some(t),
            None => magnetometer.clone().map(|mut d| {
                d.sensor_type = kind.sensor_type();
                d
            }),
        };
        let result = match template {
            Some(t) => add_virtual(registry, provider, kind, t),
            None => Err(SensorError::Unsupported { operation: "virtual template" }),
        };

        // Both reports have room for every planned kind
        match result {
            Ok(handle) => {
                log_info!("Added virtual sensor {} as handle {}", kind.name(), handle);
                let _ = report.created.push((kind, handle));
            }
            Err(e) => {
                log_warn!("Virtual sensor {} not added: {}", kind.name(), e);
                let _ = report.skipped.push((kind, e));
            }
        }
    }

    report
}

fn add_virtual(
    registry: &mut SensorRegistry,
    provider: &dyn CalibrationProvider,
    kind: VirtualSensorKind,
    mut descriptor: SensorDescriptor,
) -> SensorResult<i32> {
    descriptor.handle = registry.next_handle();
    let algorithm = provider
        .algorithm_for(&descriptor)
        .ok_or(SensorError::CalibrationUnsupported { name: kind.name() })?;
    registry.register_virtual(descriptor, kind.dependencies(), algorithm)
}
