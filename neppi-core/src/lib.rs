//! Board-agnostic event core for the Neppi wearable firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sensor and actuator abstraction traits (motion sensor, touch electrode)
//! - Wake/stillness detection for the motion sensor
//! - Touch calibration and hysteresis debouncing
//! - Color state and hue cycling for the LED strip
//! - The device state machine and its coordinator
//! - Radio attribute identifiers and payload encoding
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod attributes;
pub mod color;
pub mod config;
pub mod motion;
pub mod state;
pub mod touch;
pub mod traits;
