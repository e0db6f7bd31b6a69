//! Touch calibration persistence
//!
//! Loads and saves the touch calibration band to flash storage.

use defmt::*;

use neppi_core::config::CalibrationRecord;
use neppi_core::touch::CalibrationBand;

use crate::flash::{FlashError, FlashStorage, StorageKey};

/// Maximum serialized calibration size
const MAX_CALIBRATION_SIZE: usize = 32;

/// Calibration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationStoreError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
    /// Magic, version, CRC or band ordering check failed
    Untrusted,
}

impl From<FlashError> for CalibrationStoreError {
    fn from(e: FlashError) -> Self {
        CalibrationStoreError::Flash(e)
    }
}

/// Load the stored calibration band
///
/// Returns `None` if nothing is stored or the record cannot be trusted; the
/// touch task then calibrates from scratch.
pub async fn load_calibration(storage: &mut FlashStorage<'_>) -> Option<CalibrationBand> {
    match load_calibration_inner(storage).await {
        Ok(band) => {
            info!("Loaded touch band [{}, {}] from flash", band.low, band.high);
            Some(band)
        }
        Err(CalibrationStoreError::Flash(FlashError::NotFound)) => {
            debug!("No touch calibration in flash");
            None
        }
        Err(e) => {
            warn!("Failed to load touch calibration: {:?}", e);
            None
        }
    }
}

async fn load_calibration_inner(
    storage: &mut FlashStorage<'_>,
) -> Result<CalibrationBand, CalibrationStoreError> {
    let mut buffer = [0u8; MAX_CALIBRATION_SIZE];
    let len = storage
        .read(StorageKey::TouchCalibration, &mut buffer)
        .await?;

    debug!("Read {} bytes of calibration from flash", len);

    let record: CalibrationRecord =
        postcard::from_bytes(&buffer[..len]).map_err(|_| CalibrationStoreError::Deserialize)?;

    record.trusted_band().ok_or(CalibrationStoreError::Untrusted)
}

/// Save a calibration band
pub async fn save_calibration(
    storage: &mut FlashStorage<'_>,
    band: CalibrationBand,
) -> Result<(), CalibrationStoreError> {
    let record = CalibrationRecord::new(band);

    let mut buffer = [0u8; MAX_CALIBRATION_SIZE];
    let bytes =
        postcard::to_slice(&record, &mut buffer).map_err(|_| CalibrationStoreError::Serialize)?;

    debug!("Saving {} bytes of calibration to flash", bytes.len());

    storage.write(StorageKey::TouchCalibration, bytes).await?;

    info!("Saved touch band [{}, {}] to flash", band.low, band.high);
    Ok(())
}
