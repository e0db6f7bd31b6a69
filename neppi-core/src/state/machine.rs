//! Device state machine
//!
//! The LED behavior and the state mirrored to the remote peer are a
//! function of the current state and an event.

use crate::attributes::AttributeId;
use crate::touch::TouchState;

use super::events::Event;

/// Device states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Dark, nothing happening
    #[default]
    Off,
    /// Worn but still; slow hue cycle at low intensity
    Sleep,
    /// Moving; steady color at medium intensity
    Active,
    /// Moving with the electrode touched; full intensity, recording
    Painting,
}

impl DeviceState {
    pub const fn as_u8(self) -> u8 {
        match self {
            DeviceState::Off => 0,
            DeviceState::Sleep => 1,
            DeviceState::Active => 2,
            DeviceState::Painting => 3,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DeviceState::Off),
            1 => Some(DeviceState::Sleep),
            2 => Some(DeviceState::Active),
            3 => Some(DeviceState::Painting),
            _ => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply in the current state leave it unchanged.
    pub fn transition(self, event: &Event) -> Self {
        match (self, event) {
            // Remote peer forces a state; unknown values are ignored
            (_, Event::Remote(write)) if write.id == AttributeId::DeviceState.as_u16() => {
                u8::try_from(write.value)
                    .ok()
                    .and_then(DeviceState::from_u8)
                    .unwrap_or(self)
            }

            // Stillness puts a worn device to sleep, but never wakes an off one
            (DeviceState::Off, Event::MotionBecameIdle) => DeviceState::Off,
            (_, Event::MotionBecameIdle) => DeviceState::Sleep,

            (_, Event::MotionBecameActive) => DeviceState::Active,

            // Touch escalates and de-escalates between Active and Painting only
            (DeviceState::Active, Event::Touch(report)) if report.state == TouchState::Engaged => {
                DeviceState::Painting
            }
            (DeviceState::Painting, Event::Touch(report))
                if report.state == TouchState::Disengaged =>
            {
                DeviceState::Active
            }

            _ => self,
        }
    }
}
