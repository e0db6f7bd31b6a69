//! Configuration type definitions
//!
//! These records parametrize every subsystem state machine. Nothing in the
//! core logic uses compile-time tuning constants; thresholds, timings and
//! hysteresis depth all come from here.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Low-power wake-on-motion poll rates supported by the motion sensor
///
/// The discriminant is the sensor's low-power output data rate code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum WakePollRate {
    Hz0_24 = 0,
    Hz0_49 = 1,
    Hz0_98 = 2,
    Hz1_95 = 3,
    Hz3_91 = 4,
    #[default]
    Hz7_81 = 5,
    Hz15_63 = 6,
    Hz31_25 = 7,
    Hz62_50 = 8,
    Hz125 = 9,
    Hz250 = 10,
    Hz500 = 11,
}

impl WakePollRate {
    /// Sensor register code for this rate
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Poll rate in millihertz
    pub const fn millihertz(self) -> u32 {
        match self {
            WakePollRate::Hz0_24 => 240,
            WakePollRate::Hz0_49 => 490,
            WakePollRate::Hz0_98 => 980,
            WakePollRate::Hz1_95 => 1_950,
            WakePollRate::Hz3_91 => 3_910,
            WakePollRate::Hz7_81 => 7_810,
            WakePollRate::Hz15_63 => 15_630,
            WakePollRate::Hz31_25 => 31_250,
            WakePollRate::Hz62_50 => 62_500,
            WakePollRate::Hz125 => 125_000,
            WakePollRate::Hz250 => 250_000,
            WakePollRate::Hz500 => 500_000,
        }
    }
}

/// Compass continuous-measurement rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompassRate {
    Hz8,
    #[default]
    Hz100,
}

/// ADC conversion resolution requested for a touch sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdcResolution {
    Bits8,
    Bits10,
    #[default]
    Bits12,
    Bits14,
}

impl AdcResolution {
    /// Number of significant bits
    pub const fn bits(self) -> u8 {
        match self {
            AdcResolution::Bits8 => 8,
            AdcResolution::Bits10 => 10,
            AdcResolution::Bits12 => 12,
            AdcResolution::Bits14 => 14,
        }
    }
}

/// Motion task configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Wake-on-motion threshold (sensor LSBs, 4 mg each)
    pub wake_threshold: u8,
    /// Poll rate while waiting for motion
    pub wake_poll_rate: WakePollRate,
    /// Accelerometer/gyro sample rate while streaming (Hz)
    pub sample_rate_hz: u16,
    /// Compass rate while streaming
    pub compass_rate: CompassRate,
    /// Consecutive unchanged reads before dropping back to low power
    pub stillness_reads: u16,
    /// Accelerometer delta below which a read counts as unchanged
    pub accel_epsilon: u32,
    /// Gyroscope delta below which a read counts as unchanged
    pub gyro_epsilon: u32,
    /// Compass delta below which a read counts as unchanged
    pub compass_epsilon: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            wake_threshold: 20,
            wake_poll_rate: WakePollRate::Hz7_81,
            sample_rate_hz: 50,
            compass_rate: CompassRate::Hz100,
            stillness_reads: 50,
            accel_epsilon: 600,
            gyro_epsilon: 300,
            compass_epsilon: 30,
        }
    }
}

/// Touch task configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TouchConfig {
    /// Charge/settle/read rounds averaged into one sample
    pub sample_rounds: u8,
    /// Samples taken during calibration
    pub calibration_rounds: u16,
    /// Time the electrode is driven high (µs)
    pub charge_time_us: u32,
    /// Time the electrode floats before the ADC reading (µs)
    pub settle_time_us: u32,
    /// Pause between two samples (µs)
    pub cycle_interval_us: u32,
    /// Consecutive qualifying samples required to change state
    pub hysteresis: u8,
    /// Constant added to half the calibration spread
    pub margin: u16,
    /// Report every sample, not only state changes
    pub report_all: bool,
    /// ADC resolution
    pub resolution: AdcResolution,
    /// Ignore a stored calibration band and recalibrate at boot
    pub force_recalibration: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            sample_rounds: 10,
            calibration_rounds: 100,
            charge_time_us: 100,
            settle_time_us: 50,
            cycle_interval_us: 1000,
            hysteresis: 3,
            margin: 50,
            report_all: true,
            resolution: AdcResolution::Bits12,
            force_recalibration: false,
        }
    }
}

/// LED actuator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActuatorConfig {
    /// Number of pixels on the strip
    pub pixel_count: u16,
    /// Hue advance per cycle tick (degrees)
    pub cycle_step_deg: f32,
    /// Time between cycle ticks (ms)
    pub cycle_period_ms: u32,
    /// Color shown while recording (R, G, B)
    pub recording_color: [u8; 3],
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            pixel_count: 8,
            cycle_step_deg: 1.0,
            cycle_period_ms: 1000,
            recording_color: [255, 0, 0],
        }
    }
}

/// LED intensity (HSV value) applied on entry to each device state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntensityLevels {
    pub off: f32,
    pub sleep: f32,
    pub active: f32,
    pub painting: f32,
}

impl Default for IntensityLevels {
    fn default() -> Self {
        Self {
            off: 0.0,
            sleep: 0.1,
            active: 0.5,
            painting: 1.0,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    pub motion: MotionConfig,
    pub touch: TouchConfig,
    pub actuator: ActuatorConfig,
    pub levels: IntensityLevels,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Touch sample rounds is zero
    ZeroSampleRounds,
    /// Touch calibration rounds is zero
    ZeroCalibrationRounds,
    /// Touch charge time is zero
    ZeroChargeTime,
    /// Motion sample rate outside 4..=1000 Hz
    SampleRateOutOfRange,
    /// Stillness read count is zero
    ZeroStillnessReads,
    /// Cycle period is zero
    ZeroCyclePeriod,
    /// An intensity level is outside 0.0..=1.0
    IntensityOutOfRange,
}

impl TouchConfig {
    /// Validate the sampling parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rounds == 0 {
            return Err(ConfigError::ZeroSampleRounds);
        }
        if self.calibration_rounds == 0 {
            return Err(ConfigError::ZeroCalibrationRounds);
        }
        if self.charge_time_us == 0 {
            return Err(ConfigError::ZeroChargeTime);
        }
        Ok(())
    }
}

impl MotionConfig {
    /// Validate rates and counters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=1000).contains(&self.sample_rate_hz) {
            return Err(ConfigError::SampleRateOutOfRange);
        }
        if self.stillness_reads == 0 {
            return Err(ConfigError::ZeroStillnessReads);
        }
        Ok(())
    }
}

impl DeviceConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.touch.validate()?;

        if self.actuator.cycle_period_ms == 0 {
            return Err(ConfigError::ZeroCyclePeriod);
        }

        let levels = [
            self.levels.off,
            self.levels.sleep,
            self.levels.active,
            self.levels.painting,
        ];
        if levels.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(ConfigError::IntensityOutOfRange);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(DeviceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_touch_validation_order() {
        let mut touch = TouchConfig::default();
        touch.charge_time_us = 0;
        assert_eq!(touch.validate(), Err(ConfigError::ZeroChargeTime));

        touch.calibration_rounds = 0;
        assert_eq!(touch.validate(), Err(ConfigError::ZeroCalibrationRounds));

        touch.sample_rounds = 0;
        assert_eq!(touch.validate(), Err(ConfigError::ZeroSampleRounds));
    }

    #[test]
    fn test_intensity_out_of_range() {
        let mut config = DeviceConfig::default();
        config.levels.painting = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::IntensityOutOfRange));
    }

    #[test]
    fn test_wake_poll_rate_codes() {
        assert_eq!(WakePollRate::Hz0_24.code(), 0);
        assert_eq!(WakePollRate::Hz7_81.code(), 5);
        assert_eq!(WakePollRate::Hz500.code(), 11);
        assert_eq!(WakePollRate::Hz62_50.millihertz(), 62_500);
    }
}
