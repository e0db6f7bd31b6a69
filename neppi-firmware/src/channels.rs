//! Inter-task mailboxes
//!
//! Every task owns its inboxes. Producers get an [`Outbox`] and choose
//! between waiting (`post`) and dropping (`offer`) per message.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use neppi_core::attributes::AttributeUpdate;
use neppi_core::color::ActuatorCommand;
use neppi_core::motion::MotionSample;
use neppi_core::state::Event;
use neppi_core::touch::CalibrationBand;
use neppi_runtime::{Outbox, WakeNotice, WirelessBridge};

/// Coordinator inbox capacity
const COORDINATOR_INBOX_SIZE: usize = 8;

/// Motion stream capacity (double buffer)
const MOTION_STREAM_SIZE: usize = 2;

/// Actuator inbox capacity
const ACTUATOR_INBOX_SIZE: usize = 8;

/// Pending wake notices from the motion interrupt pin
const MOTION_WAKE_SIZE: usize = 4;

/// Outbound attribute updates waiting for the radio stack
const ATTRIBUTE_UPDATES_SIZE: usize = 8;

/// Events for the coordinator: remote writes, motion and touch transitions,
/// color feedback and bridge faults
pub static COORDINATOR_INBOX: Channel<CriticalSectionRawMutex, Event, COORDINATOR_INBOX_SIZE> =
    Channel::new();

/// Motion samples forwarded while the glove is moving
pub static MOTION_STREAM: Channel<CriticalSectionRawMutex, MotionSample, MOTION_STREAM_SIZE> =
    Channel::new();

/// Commands for the LED strip
pub static ACTUATOR_INBOX: Channel<CriticalSectionRawMutex, ActuatorCommand, ACTUATOR_INBOX_SIZE> =
    Channel::new();

/// Interrupt notifications for the motion task
pub static MOTION_WAKE: Channel<CriticalSectionRawMutex, WakeNotice, MOTION_WAKE_SIZE> =
    Channel::new();

/// Updates published by the coordinator for the radio stack
pub static ATTRIBUTE_UPDATES: Channel<
    CriticalSectionRawMutex,
    AttributeUpdate,
    ATTRIBUTE_UPDATES_SIZE,
> = Channel::new();

/// Freshly computed touch bands waiting to be written to flash
pub static CALIBRATION_SAVE: Channel<CriticalSectionRawMutex, CalibrationBand, 1> =
    Channel::new();

pub fn coordinator_outbox() -> Outbox<'static, Event> {
    COORDINATOR_INBOX.sender().into()
}

/// Endpoints for the radio stack's callbacks
pub fn wireless_bridge() -> WirelessBridge<'static> {
    WirelessBridge::new(coordinator_outbox(), ATTRIBUTE_UPDATES.receiver().into())
}
