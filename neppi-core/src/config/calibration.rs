//! Touch calibration record
//!
//! Wraps a computed calibration band with a header so it can be persisted
//! to flash and trusted on the next boot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::touch::CalibrationBand;

/// Magic number to identify a valid calibration record
pub const CALIBRATION_MAGIC: u32 = 0x5443_4C42; // "TCLB"

/// Current calibration record version
pub const CALIBRATION_VERSION: u8 = 1;

/// Persisted touch calibration
///
/// This struct is serialized to flash using postcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationRecord {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// The no-touch band
    pub band: CalibrationBand,
    /// CRC32 checksum (calculated over magic..band)
    pub crc: u32,
}

impl CalibrationRecord {
    /// Create a sealed record for a band
    pub fn new(band: CalibrationBand) -> Self {
        let mut record = Self {
            magic: CALIBRATION_MAGIC,
            version: CALIBRATION_VERSION,
            band,
            crc: 0,
        };
        record.update_crc();
        record
    }

    /// Check if the header matches this firmware
    pub fn is_valid(&self) -> bool {
        self.magic == CALIBRATION_MAGIC && self.version == CALIBRATION_VERSION
    }

    /// Band carried by this record, if header, CRC and ordering all check out
    pub fn trusted_band(&self) -> Option<CalibrationBand> {
        if self.is_valid() && self.verify_crc() && self.band.low < self.band.high {
            Some(self.band)
        } else {
            None
        }
    }

    /// Calculate CRC32 over the record (excluding the crc field itself)
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        crc = crc32_update(crc, &self.band.low.to_le_bytes());
        crc = crc32_update(crc, &self.band.high.to_le_bytes());
        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC is correct
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }
}

/// CRC32 update (IEEE 802.3 polynomial, reflected)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
