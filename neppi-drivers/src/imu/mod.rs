//! Inertial measurement units

pub mod mpu9250;

pub use mpu9250::{Mpu9250, Mpu9250Error};
