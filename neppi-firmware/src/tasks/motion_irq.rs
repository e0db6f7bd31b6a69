//! Motion interrupt pin
//!
//! Forwards each rising edge on the sensor's INT line as a wake notice and
//! does nothing else. The line is latched until the motion task reads the
//! interrupt status.

use defmt::*;
use embassy_rp::gpio::Input;

use neppi_runtime::WakeNotice;

use crate::channels::MOTION_WAKE;

#[embassy_executor::task]
pub async fn motion_irq_task(mut pin: Input<'static>) {
    info!("Motion interrupt task started");

    // A line already latched at boot never produces an edge
    notify();

    loop {
        pin.wait_for_rising_edge().await;
        notify();
    }
}

fn notify() {
    if MOTION_WAKE.try_send(WakeNotice).is_err() {
        trace!("Wake notice dropped, motion task busy");
    }
}
