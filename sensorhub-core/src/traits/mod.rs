//! Core Traits and Abstractions for SensorHub
//!
//! This module holds the interfaces the registry calls on its external
//! collaborators. Concrete hardware drivers, calibration algorithms and the
//! device discovery that builds them live outside the engine and plug in
//! here.
//!
//! ## Module Organization
//!
//! - [`driver`] - Per-sensor driver capabilities and driver variants
//! - [`calibration`] - Calibration/fusion algorithm provider
//!
//! ## Design Philosophy
//!
//! - **One capability set**: Hardware and virtual drivers answer the same five
//!   calls; only virtual drivers accept injected samples.
//! - **Built once**: Drivers are constructed at discovery or synthesis time and
//!   live as long as the registry.
//! - **Dynamic dispatch at the seam**: The table is heterogeneous, so drivers
//!   are boxed trait objects tagged with a [`DriverKind`].

pub mod calibration;
pub mod driver;

pub use calibration::{CalibrationAlgorithm, CalibrationProvider};
pub use driver::{Driver, DriverKind, SensorDriver};
