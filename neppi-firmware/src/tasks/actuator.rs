//! Actuator task
//!
//! Drives the WS2812 strip over SPI0.

use defmt::*;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use ws2812_spi::prerendered::Ws2812;

use neppi_core::config::ActuatorConfig;
use neppi_runtime::ActuatorTask;

use crate::channels::{coordinator_outbox, ACTUATOR_INBOX};

pub type LedStrip = Ws2812<'static, Spi<'static, SPI0, Blocking>>;

#[embassy_executor::task]
pub async fn actuator_task(leds: LedStrip, config: ActuatorConfig) {
    info!(
        "Actuator task started ({} pixels, {} ms cycle tick)",
        config.pixel_count, config.cycle_period_ms
    );

    let task = ActuatorTask::new(
        leds,
        Delay,
        &config,
        ACTUATOR_INBOX.receiver().into(),
        coordinator_outbox(),
    );
    task.run().await
}
