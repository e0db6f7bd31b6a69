//! Coordinator task
//!
//! Runs the device state machine. A bridge fault is unrecoverable: the
//! task logs it and resets the chip.

use defmt::*;
use embassy_time::Timer;

use neppi_core::config::IntensityLevels;
use neppi_runtime::CoordinatorTask;

use crate::channels::{ACTUATOR_INBOX, ATTRIBUTE_UPDATES, COORDINATOR_INBOX, MOTION_STREAM};

#[embassy_executor::task]
pub async fn coordinator_task(levels: IntensityLevels) {
    info!("Coordinator task started");

    let task = CoordinatorTask::new(
        levels,
        COORDINATOR_INBOX.receiver().into(),
        MOTION_STREAM.receiver().into(),
        ACTUATOR_INBOX.sender().into(),
        ATTRIBUTE_UPDATES.sender().into(),
    );

    let fault = task.run().await;
    error!("Coordinator halted: {:?}, resetting", fault);

    // Give RTT a moment to drain
    Timer::after_millis(100).await;
    cortex_m::peripheral::SCB::sys_reset();
}
