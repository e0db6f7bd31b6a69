//! Task bodies for the Neppi wearable
//!
//! Each subsystem is a struct owning its driver and state, with an async
//! `step` that waits on its inbox and a `run` loop around it. The structs
//! are generic over the hardware traits so the firmware wraps them in thin
//! `#[embassy_executor::task]` functions and the host tests drive them with
//! mocks.

#![no_std]
#![deny(unsafe_code)]

// This must go first so the macros are visible to the other modules
mod fmt;

pub mod actuator;
pub mod bridge;
pub mod coordinator;
pub mod mailbox;
pub mod motion;
pub mod touch;

pub use actuator::ActuatorTask;
pub use bridge::WirelessBridge;
pub use coordinator::CoordinatorTask;
pub use mailbox::{Delivery, Inbox, Outbox};
pub use motion::{MotionTask, WakeNotice};
pub use touch::{TouchError, TouchTask};
