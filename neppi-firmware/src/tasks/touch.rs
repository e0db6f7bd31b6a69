//! Touch task
//!
//! Samples the capacitive electrode through the shared ADC.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;

use neppi_core::config::TouchConfig;
use neppi_core::touch::CalibrationBand;
use neppi_runtime::TouchTask;

use crate::channels::{coordinator_outbox, CALIBRATION_SAVE};
use crate::sense::{FlexElectrode, SenseAdc};

/// The ADC, shared with anything else that needs a conversion
pub type SharedSenseAdc = Mutex<CriticalSectionRawMutex, SenseAdc<'static>>;

#[embassy_executor::task]
pub async fn touch_task(
    electrode: FlexElectrode<'static>,
    adc: &'static SharedSenseAdc,
    config: TouchConfig,
    stored: Option<CalibrationBand>,
) {
    info!(
        "Touch task started ({} rounds, hysteresis {})",
        config.sample_rounds, config.hysteresis
    );

    let task = match TouchTask::new(
        electrode,
        adc,
        Delay,
        config,
        coordinator_outbox(),
        CALIBRATION_SAVE.sender().into(),
    ) {
        Ok(task) => task,
        Err(e) => {
            error!("Touch configuration rejected: {:?}, touch disabled", e);
            return;
        }
    };

    task.run(stored).await
}
