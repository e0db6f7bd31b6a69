//! Motion task
//!
//! Owns the MPU-9250 on I2C0.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;

use neppi_core::config::MotionConfig;
use neppi_drivers::imu::Mpu9250;
use neppi_runtime::MotionTask;

use crate::channels::{coordinator_outbox, MOTION_STREAM, MOTION_WAKE};

pub type MotionSensorHw = Mpu9250<I2c<'static, I2C0, Async>, Delay>;

#[embassy_executor::task]
pub async fn motion_task(sensor: MotionSensorHw, config: MotionConfig) {
    info!(
        "Motion task started ({} Hz, {} still reads to sleep)",
        config.sample_rate_hz, config.stillness_reads
    );

    let task = MotionTask::new(
        sensor,
        config,
        MOTION_WAKE.receiver().into(),
        coordinator_outbox(),
        MOTION_STREAM.sender().into(),
    );
    task.run().await
}
