//! Embassy async tasks
//!
//! Thin wrappers binding the runtime task bodies to RP2040 peripherals and
//! the static mailboxes.

pub mod actuator;
pub mod bridge;
pub mod calibration;
pub mod coordinator;
pub mod motion;
pub mod motion_irq;
pub mod touch;

pub use actuator::{actuator_task, LedStrip};
pub use bridge::bridge_task;
pub use calibration::calibration_task;
pub use coordinator::coordinator_task;
pub use motion::{motion_task, MotionSensorHw};
pub use motion_irq::motion_irq_task;
pub use touch::{touch_task, SharedSenseAdc};
