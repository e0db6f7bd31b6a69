//! Device coordinator
//!
//! Owns the device state. Each event is turned into a list of effects that
//! the runtime executes: commands for the actuator task, updates for the
//! wireless bridge, or a halt. Entry effects are produced only when the
//! state actually changes.

use heapless::Vec;

use crate::attributes::{AttributeId, AttributeUpdate, AttributeWrite, BridgeFault, StatusRecord};
use crate::color::{ActuatorCommand, ColorFeedback};
use crate::config::IntensityLevels;
use crate::motion::MotionSample;

use super::events::Event;
use super::machine::DeviceState;

/// Most effects a single event can produce
pub const MAX_EFFECTS: usize = 5;

/// How an effect's message must be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendMode {
    /// Wait for mailbox space; loss is not acceptable
    Guaranteed,
    /// Drop if the mailbox is full
    BestEffort,
}

/// Side effect requested by the coordinator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Command for the actuator task (always guaranteed)
    Actuate(ActuatorCommand),
    /// Update for the wireless bridge
    Publish(AttributeUpdate, SendMode),
    /// Stop the device
    Halt(BridgeFault),
}

/// Effects produced by one event, in execution order
pub type Reaction = Vec<Effect, MAX_EFFECTS>;

/// Top-level device state owner
#[derive(Debug, Clone)]
pub struct Coordinator {
    state: DeviceState,
    levels: IntensityLevels,
    mirrored: Option<ColorFeedback>,
    /// Cycling flag last shown to the peer
    cycling: Option<bool>,
}

impl Coordinator {
    /// Create a coordinator in the implicit init state
    ///
    /// Call [`Coordinator::boot`] before handling events.
    pub fn new(levels: IntensityLevels) -> Self {
        Self {
            state: DeviceState::Off,
            levels,
            mirrored: None,
            cycling: None,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Resolve init to `Off` and run its entry effects
    pub fn boot(&mut self) -> Reaction {
        self.state = DeviceState::Off;
        self.mirrored = None;
        self.cycling = None;
        self.enter(DeviceState::Off, 0)
    }

    /// Handle one event
    pub fn handle(&mut self, event: &Event) -> Reaction {
        match event {
            Event::BridgeFault(fault) => {
                let mut reaction = Reaction::new();
                push(&mut reaction, Effect::Halt(*fault));
                reaction
            }
            Event::ColorChanged(feedback) => self.mirror(*feedback),
            Event::Remote(write) if write.id != AttributeId::DeviceState.as_u16() => {
                self.relay(write)
            }
            _ => {
                let next = self.state.transition(event);
                if next == self.state {
                    return Reaction::new();
                }
                self.state = next;
                self.enter(next, event.auxiliary())
            }
        }
    }

    /// Stream a motion sample to the remote peer
    pub fn stream(&self, sample: &MotionSample) -> Effect {
        Effect::Publish(AttributeUpdate::motion(sample), SendMode::BestEffort)
    }

    /// Entry effects for a state
    fn enter(&mut self, state: DeviceState, auxiliary: i32) -> Reaction {
        let mut reaction = Reaction::new();

        match state {
            DeviceState::Off => {
                push(&mut reaction, Effect::Actuate(ActuatorCommand::SetRecording(false)));
                push(&mut reaction, Effect::Actuate(ActuatorCommand::StopCycle));
                push(
                    &mut reaction,
                    Effect::Actuate(ActuatorCommand::SetIntensity(self.levels.off)),
                );
            }
            DeviceState::Sleep => {
                push(&mut reaction, Effect::Actuate(ActuatorCommand::SetRecording(false)));
                push(
                    &mut reaction,
                    Effect::Actuate(ActuatorCommand::SetIntensity(self.levels.sleep)),
                );
                push(&mut reaction, Effect::Actuate(ActuatorCommand::StartCycle));
            }
            DeviceState::Active => {
                push(&mut reaction, Effect::Actuate(ActuatorCommand::SetRecording(false)));
                push(&mut reaction, Effect::Actuate(ActuatorCommand::StopCycle));
                push(
                    &mut reaction,
                    Effect::Actuate(ActuatorCommand::SetIntensity(self.levels.active)),
                );
            }
            DeviceState::Painting => {
                push(&mut reaction, Effect::Actuate(ActuatorCommand::StopCycle));
                push(
                    &mut reaction,
                    Effect::Actuate(ActuatorCommand::SetIntensity(self.levels.painting)),
                );
                push(&mut reaction, Effect::Actuate(ActuatorCommand::SetRecording(true)));
            }
        }

        let cycling = state == DeviceState::Sleep;
        if self.cycling.replace(cycling) != Some(cycling) {
            push(
                &mut reaction,
                Effect::Publish(AttributeUpdate::cycling(cycling), SendMode::BestEffort),
            );
        }

        let record = StatusRecord { state, auxiliary };
        push(
            &mut reaction,
            Effect::Publish(AttributeUpdate::status(record), SendMode::Guaranteed),
        );
        reaction
    }

    /// Remote color writes go to the actuator
    fn relay(&mut self, write: &AttributeWrite) -> Reaction {
        let mut reaction = Reaction::new();

        let command = match AttributeId::from_u16(write.id) {
            Some(AttributeId::Hue) => {
                // 360 wraps to 0 in the actuator
                Some(ActuatorCommand::SetHue(write.value.clamp(0, 360) as f32))
            }
            Some(AttributeId::Intensity) => Some(ActuatorCommand::SetIntensity(
                write.value.clamp(0, 100) as f32 / 100.0,
            )),
            Some(AttributeId::Cycling) => {
                // The peer already knows what it wrote
                let on = write.value != 0;
                self.cycling = Some(on);
                Some(if on {
                    ActuatorCommand::StartCycle
                } else {
                    ActuatorCommand::StopCycle
                })
            }
            // Controls is read-only; unknown ids are dropped
            _ => None,
        };

        if let Some(command) = command {
            push(&mut reaction, Effect::Actuate(command));
        }
        reaction
    }

    /// Publish the parts of a color snapshot the peer has not seen yet
    fn mirror(&mut self, feedback: ColorFeedback) -> Reaction {
        let mut reaction = Reaction::new();
        let previous = self.mirrored.replace(feedback);

        if previous.map(|p| p.hue_deg) != Some(feedback.hue_deg) {
            push(
                &mut reaction,
                Effect::Publish(AttributeUpdate::hue(feedback.hue_deg), SendMode::BestEffort),
            );
        }
        if previous.map(|p| p.intensity_pct) != Some(feedback.intensity_pct) {
            push(
                &mut reaction,
                Effect::Publish(
                    AttributeUpdate::intensity(feedback.intensity_pct),
                    SendMode::BestEffort,
                ),
            );
        }
        reaction
    }
}

fn push(reaction: &mut Reaction, effect: Effect) {
    let pushed = reaction.push(effect);
    debug_assert!(pushed.is_ok(), "reaction exceeds MAX_EFFECTS");
}
