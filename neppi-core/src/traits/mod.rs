//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations. The LED strip uses
//! `smart_leds::SmartLedsWrite` directly.

pub mod motion;
pub mod touch;

pub use motion::{InterruptStatus, MotionSensor};
pub use touch::{SenseElectrode, TouchAdc};
