//! Calibration persistence task
//!
//! Owns the flash storage and writes each freshly computed touch band.
//! Saving runs here so flash erase/program never stalls the touch loop.

use defmt::*;

use crate::channels::CALIBRATION_SAVE;
use crate::config::save_calibration;
use crate::flash::FlashStorage;

#[embassy_executor::task]
pub async fn calibration_task(mut storage: FlashStorage<'static>) {
    info!("Calibration task started");

    loop {
        let band = CALIBRATION_SAVE.receive().await;

        match save_calibration(&mut storage, band).await {
            Ok(()) => info!("Touch calibration saved"),
            Err(e) => error!("Failed to save touch calibration: {:?}", e),
        }
    }
}
