//! Capacitive touch sensing
//!
//! Calibration of the no-touch band and hysteresis debouncing of averaged
//! electrode samples. The sampling itself lives in the runtime crate.

pub mod band;
pub mod debounce;

pub use band::{BandBuilder, CalibrationBand, CalibrationError};
pub use debounce::{Debouncer, Observation, TouchReport, TouchState};
