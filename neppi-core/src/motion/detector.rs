//! Wake/stillness state machine
//!
//! `LowPower` waits for a wake-on-motion interrupt. `Sampling` compares each
//! full-rate read against the previous one and returns to `LowPower` after
//! a run of unchanged reads.
//!
//! A run counts reads, not deltas: the read that starts a run (the first
//! after wake, or one that moved) counts as one, and each following read
//! within epsilon of its predecessor extends it.

use crate::config::MotionConfig;

use super::sample::MotionSample;

/// Motion sensor operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    #[default]
    LowPower,
    Sampling,
}

/// What to do with a sample after the detector has seen it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleOutcome {
    /// Not sampling; the read is stale or spurious
    Ignored,
    /// Still sampling; stream the sample downstream
    Forward,
    /// The stillness run completed; switch to low power and stop streaming
    BecameIdle,
}

/// Stillness detector
#[derive(Debug, Clone)]
pub struct MotionDetector {
    stillness_reads: u16,
    accel_epsilon: u32,
    gyro_epsilon: u32,
    compass_epsilon: u32,
    mode: MotionMode,
    stillness_count: u16,
    last: Option<MotionSample>,
}

impl MotionDetector {
    /// Create a detector in low-power mode
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            stillness_reads: config.stillness_reads.max(1),
            accel_epsilon: config.accel_epsilon,
            gyro_epsilon: config.gyro_epsilon,
            compass_epsilon: config.compass_epsilon,
            mode: MotionMode::LowPower,
            stillness_count: 0,
            last: None,
        }
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn stillness_count(&self) -> u16 {
        self.stillness_count
    }

    /// Handle a wake-on-motion interrupt
    ///
    /// Returns true if this moved the detector into `Sampling`.
    pub fn on_wake(&mut self) -> bool {
        if self.mode == MotionMode::Sampling {
            return false;
        }
        self.mode = MotionMode::Sampling;
        self.stillness_count = 0;
        self.last = None;
        true
    }

    /// Handle one full-rate read
    pub fn on_sample(&mut self, sample: MotionSample) -> SampleOutcome {
        if self.mode != MotionMode::Sampling {
            return SampleOutcome::Ignored;
        }

        let unchanged = self.last.is_some_and(|prev| self.is_unchanged(&prev, &sample));
        self.last = Some(sample);

        if unchanged {
            self.stillness_count = self.stillness_count.saturating_add(1);
        } else {
            self.stillness_count = 1;
        }

        if self.stillness_count >= self.stillness_reads {
            self.mode = MotionMode::LowPower;
            self.stillness_count = 0;
            self.last = None;
            return SampleOutcome::BecameIdle;
        }

        SampleOutcome::Forward
    }

    fn is_unchanged(&self, prev: &MotionSample, next: &MotionSample) -> bool {
        prev.accel.delta(&next.accel) < self.accel_epsilon
            && prev.gyro.delta(&next.gyro) < self.gyro_epsilon
            && prev.compass.delta(&next.compass) < self.compass_epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Axes;

    fn config(reads: u16) -> MotionConfig {
        MotionConfig {
            stillness_reads: reads,
            accel_epsilon: 10,
            gyro_epsilon: 10,
            compass_epsilon: 10,
            ..Default::default()
        }
    }

    fn still() -> MotionSample {
        MotionSample {
            accel: Axes::new(0, 0, 16384),
            gyro: Axes::new(1, -2, 0),
            compass: Axes::new(100, 40, -30),
        }
    }

    #[test]
    fn test_samples_ignored_in_low_power() {
        let mut d = MotionDetector::new(&config(3));
        assert_eq!(d.on_sample(still()), SampleOutcome::Ignored);
    }

    #[test]
    fn test_wake_only_once() {
        let mut d = MotionDetector::new(&config(3));
        assert!(d.on_wake());
        assert!(!d.on_wake());
        assert_eq!(d.mode(), MotionMode::Sampling);
    }

    #[test]
    fn test_becomes_idle_after_still_run() {
        let mut d = MotionDetector::new(&config(3));
        d.on_wake();
        // First read starts the run
        assert_eq!(d.on_sample(still()), SampleOutcome::Forward);
        assert_eq!(d.on_sample(still()), SampleOutcome::Forward);
        assert_eq!(d.stillness_count(), 2);
        assert_eq!(d.on_sample(still()), SampleOutcome::BecameIdle);
        assert_eq!(d.mode(), MotionMode::LowPower);
        assert_eq!(d.on_sample(still()), SampleOutcome::Ignored);
    }

    #[test]
    fn test_movement_resets_count() {
        let mut d = MotionDetector::new(&config(3));
        d.on_wake();
        d.on_sample(still());
        d.on_sample(still());
        assert_eq!(d.stillness_count(), 2);

        let mut moved = still();
        moved.gyro = Axes::new(500, 0, 0);
        assert_eq!(d.on_sample(moved), SampleOutcome::Forward);
        assert_eq!(d.stillness_count(), 1);
    }

    #[test]
    fn test_opposing_axes_count_as_movement() {
        let mut d = MotionDetector::new(&config(2));
        d.on_wake();
        d.on_sample(still());

        let mut twisted = still();
        twisted.accel.x += 20;
        twisted.accel.y -= 20;
        assert_eq!(d.on_sample(twisted), SampleOutcome::Forward);
    }
}
