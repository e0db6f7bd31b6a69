//! Events delivered to the coordinator
//!
//! Every payload is a small value copied into the mailbox. No event refers
//! to state owned by another task.

use crate::attributes::{AttributeWrite, BridgeFault};
use crate::color::ColorFeedback;
use crate::touch::{TouchReport, TouchState};

/// Coordinator inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Remote peer wrote an attribute
    Remote(AttributeWrite),
    /// Motion sensor left low power
    MotionBecameActive,
    /// Motion sensor saw a full stillness run
    MotionBecameIdle,
    /// Touch state report (a transition, or any sample in report-all mode)
    Touch(TouchReport),
    /// Actuator color changed
    ColorChanged(ColorFeedback),
    /// Wireless bridge hit an unrecoverable condition
    BridgeFault(BridgeFault),
}

impl Event {
    /// Check if this is a motion event
    pub fn is_motion_event(&self) -> bool {
        matches!(self, Event::MotionBecameActive | Event::MotionBecameIdle)
    }

    /// Check if this is a touch engagement
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            Event::Touch(TouchReport {
                state: TouchState::Engaged,
                ..
            })
        )
    }

    /// Check if this event must halt the device
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BridgeFault(_))
    }

    /// Value carried to the remote peer alongside a state change
    pub fn auxiliary(&self) -> i32 {
        match self {
            Event::Remote(write) => write.value,
            Event::Touch(report) => report.sample.min(i32::MAX as u32) as i32,
            Event::ColorChanged(feedback) => feedback.hue_deg as i32,
            _ => 0,
        }
    }
}
