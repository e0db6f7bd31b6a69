//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in neppi-core:
//!
//! - Motion sensor (MPU-9250 with AK8963 compass, I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod imu;
