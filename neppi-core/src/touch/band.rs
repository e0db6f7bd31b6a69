//! Calibration band
//!
//! The `[low, high]` range of no-touch readings, widened by a margin of
//! half the observed spread plus a fixed constant.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// No-touch sample range
///
/// Both bounds are inclusive: a sample equal to a bound is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationBand {
    pub low: u16,
    pub high: u16,
}

/// Reasons a calibration run cannot produce a band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// No samples were taken
    NoSamples,
    /// A sample read zero, so no lower bound can sit below it
    SampleAtFloor,
    /// A sample reached the top of the u16 range
    SampleAtCeiling,
}

impl CalibrationBand {
    /// True when the sample lies within `[low, high]`
    pub const fn contains(&self, sample: u32) -> bool {
        sample >= self.low as u32 && sample <= self.high as u32
    }

    /// Compute a band from a full set of calibration samples
    pub fn from_samples<I>(samples: I, margin: u16) -> Result<Self, CalibrationError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut builder = BandBuilder::new();
        for sample in samples {
            builder.add(sample);
        }
        builder.finish(margin)
    }
}

/// Incremental min/max tracker used while calibration samples arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandBuilder {
    min: u32,
    max: u32,
    count: u32,
}

impl Default for BandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BandBuilder {
    pub const fn new() -> Self {
        Self {
            min: u32::MAX,
            max: 0,
            count: 0,
        }
    }

    /// Record one averaged sample
    pub fn add(&mut self, sample: u32) {
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
        self.count += 1;
    }

    /// Number of samples recorded so far
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Close the run and compute the band
    ///
    /// The effective margin is never below one count, so every recorded
    /// sample ends up strictly inside the band.
    pub fn finish(&self, margin: u16) -> Result<CalibrationBand, CalibrationError> {
        if self.count == 0 {
            return Err(CalibrationError::NoSamples);
        }
        if self.min == 0 {
            return Err(CalibrationError::SampleAtFloor);
        }
        if self.max >= u16::MAX as u32 {
            return Err(CalibrationError::SampleAtCeiling);
        }

        let margin = ((self.max - self.min) / 2 + margin as u32).max(1);
        let low = self.min.saturating_sub(margin);
        let high = (self.max + margin).min(u16::MAX as u32);

        Ok(CalibrationBand {
            low: low as u16,
            high: high as u16,
        })
    }
}
