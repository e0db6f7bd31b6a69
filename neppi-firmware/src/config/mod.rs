//! Configuration and persisted calibration

pub mod calibration;
pub mod device;

pub use calibration::{load_calibration, save_calibration, CalibrationStoreError};
pub use device::load_device_config;
