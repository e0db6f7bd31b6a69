//! Hysteresis debouncer for the touch electrode
//!
//! A sample that argues for the other state is a candidate. The state
//! flips only after `hysteresis` consecutive candidates; any sample that
//! breaks the run resets the counter to zero.

use super::band::CalibrationBand;

/// Debounced electrode state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchState {
    #[default]
    Disengaged,
    Engaged,
}

impl TouchState {
    fn flipped(self) -> Self {
        match self {
            TouchState::Disengaged => TouchState::Engaged,
            TouchState::Engaged => TouchState::Disengaged,
        }
    }
}

/// A `(state, sample)` pair as reported to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchReport {
    pub state: TouchState,
    pub sample: u32,
}

/// Result of feeding one sample to the debouncer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Observation {
    pub state: TouchState,
    pub sample: u32,
    /// The debounced state changed on this sample
    pub changed: bool,
}

impl Observation {
    pub fn report(&self) -> TouchReport {
        TouchReport {
            state: self.state,
            sample: self.sample,
        }
    }
}

/// Touch state machine
#[derive(Debug, Clone)]
pub struct Debouncer {
    band: CalibrationBand,
    hysteresis: u8,
    state: TouchState,
    count: u8,
}

impl Debouncer {
    /// Create a debouncer starting disengaged
    pub fn new(band: CalibrationBand, hysteresis: u8) -> Self {
        Self {
            band,
            hysteresis: hysteresis.max(1),
            state: TouchState::Disengaged,
            count: 0,
        }
    }

    pub fn state(&self) -> TouchState {
        self.state
    }

    pub fn band(&self) -> CalibrationBand {
        self.band
    }

    /// Current run of consecutive candidates
    pub fn hysteresis_count(&self) -> u8 {
        self.count
    }

    /// Feed one averaged sample
    pub fn observe(&mut self, sample: u32) -> Observation {
        let inside = self.band.contains(sample);
        let candidate = match self.state {
            TouchState::Disengaged => !inside,
            TouchState::Engaged => inside,
        };

        let mut changed = false;
        if candidate {
            self.count += 1;
            if self.count >= self.hysteresis {
                self.state = self.state.flipped();
                self.count = 0;
                changed = true;
            }
        } else {
            self.count = 0;
        }

        Observation {
            state: self.state,
            sample,
            changed,
        }
    }

    /// Fall back to disengaged after a sensing fault
    ///
    /// Returns true if this changed the debounced state.
    pub fn force_disengaged(&mut self) -> bool {
        self.count = 0;
        let changed = self.state == TouchState::Engaged;
        self.state = TouchState::Disengaged;
        changed
    }
}
