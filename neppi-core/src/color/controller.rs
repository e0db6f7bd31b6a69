//! Color controller
//!
//! Applies actuator commands to the owned [`ColorState`] and advances the
//! hue cycle. The runtime task wraps this with the strip driver and timer.

use smart_leds::RGB8;

use crate::config::ActuatorConfig;

use super::hsv::{clamp_unit, normalize_hue, ColorState};

/// Commands accepted by the actuator task
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    /// Set hue, saturation and value together
    SetColor {
        hue: f32,
        saturation: f32,
        value: f32,
    },
    /// Change hue, keeping saturation and value
    SetHue(f32),
    /// Change value (intensity), keeping hue and saturation
    SetIntensity(f32),
    /// Start the hue cycle
    StartCycle,
    /// Stop the hue cycle, holding the current hue
    StopCycle,
    /// Show or clear the recording indicator
    SetRecording(bool),
}

/// Color snapshot mirrored to remote clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorFeedback {
    /// Hue in whole degrees, 0..=359
    pub hue_deg: u16,
    /// Value as a percentage, 0..=100
    pub intensity_pct: u8,
}

/// Color state owner
#[derive(Debug, Clone)]
pub struct ColorController {
    state: ColorState,
    recording: bool,
    cycle_step: f32,
    recording_color: RGB8,
}

impl ColorController {
    pub fn new(config: &ActuatorConfig) -> Self {
        let [r, g, b] = config.recording_color;
        Self {
            state: ColorState::default(),
            recording: false,
            cycle_step: config.cycle_step_deg,
            recording_color: RGB8::new(r, g, b),
        }
    }

    /// Current color snapshot
    pub fn state(&self) -> ColorState {
        self.state
    }

    pub fn is_cycling(&self) -> bool {
        self.state.cycling
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Apply a command
    ///
    /// Returns feedback when the rendered hue or value changed.
    pub fn apply(&mut self, command: ActuatorCommand) -> Option<ColorFeedback> {
        let before = self.feedback();

        match command {
            ActuatorCommand::SetColor {
                hue,
                saturation,
                value,
            } => {
                self.state.hue = normalize_hue(hue);
                self.state.saturation = clamp_unit(saturation);
                self.state.value = clamp_unit(value);
            }
            ActuatorCommand::SetHue(hue) => self.state.hue = normalize_hue(hue),
            ActuatorCommand::SetIntensity(value) => self.state.value = clamp_unit(value),
            ActuatorCommand::StartCycle => self.state.cycling = true,
            ActuatorCommand::StopCycle => self.state.cycling = false,
            ActuatorCommand::SetRecording(on) => self.recording = on,
        }

        let after = self.feedback();
        (after != before).then_some(after)
    }

    /// One cycle tick
    ///
    /// Does nothing once cycling has been stopped; the caller stops
    /// rescheduling when this returns `None`.
    pub fn tick(&mut self) -> Option<ColorFeedback> {
        if !self.state.cycling {
            return None;
        }
        self.state.hue = normalize_hue(self.state.hue + self.cycle_step);
        Some(self.feedback())
    }

    /// Pixel value for every LED on the strip
    pub fn pixel(&self) -> RGB8 {
        if self.recording {
            let v = clamp_unit(self.state.value);
            let scale = |c: u8| (c as f32 * v + 0.5) as u8;
            RGB8::new(
                scale(self.recording_color.r),
                scale(self.recording_color.g),
                scale(self.recording_color.b),
            )
        } else {
            self.state.to_rgb()
        }
    }

    /// Hue and value rounded for remote mirroring
    pub fn feedback(&self) -> ColorFeedback {
        let hue_deg = ((self.state.hue + 0.5) as u16) % 360;
        let intensity_pct = (self.state.value * 100.0 + 0.5) as u8;
        ColorFeedback {
            hue_deg,
            intensity_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ColorController {
        ColorController::new(&ActuatorConfig {
            cycle_step_deg: 90.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_set_color_round_trip() {
        let mut c = controller();
        c.apply(ActuatorCommand::SetColor {
            hue: 210.0,
            saturation: 0.75,
            value: 0.5,
        });
        let s = c.state();
        assert_eq!((s.hue, s.saturation, s.value), (210.0, 0.75, 0.5));
    }

    #[test]
    fn test_tick_wraps_hue() {
        let mut c = controller();
        c.apply(ActuatorCommand::SetHue(300.0));
        c.apply(ActuatorCommand::StartCycle);
        let fb = c.tick().unwrap();
        assert_eq!(fb.hue_deg, 30);
        assert_eq!(c.state().hue, 30.0);
    }

    #[test]
    fn test_tick_after_stop_does_nothing() {
        let mut c = controller();
        c.apply(ActuatorCommand::StartCycle);
        c.apply(ActuatorCommand::StopCycle);
        assert_eq!(c.tick(), None);
        assert_eq!(c.state().hue, 0.0);
    }

    #[test]
    fn test_feedback_only_on_visible_change() {
        let mut c = controller();
        assert!(c.apply(ActuatorCommand::SetIntensity(0.5)).is_some());
        assert!(c.apply(ActuatorCommand::SetIntensity(0.5)).is_none());
        assert!(c.apply(ActuatorCommand::StartCycle).is_none());
    }

    #[test]
    fn test_recording_overlay_keeps_hue() {
        let mut c = controller();
        c.apply(ActuatorCommand::SetColor {
            hue: 120.0,
            saturation: 1.0,
            value: 1.0,
        });
        c.apply(ActuatorCommand::SetRecording(true));
        assert_eq!(c.pixel(), RGB8::new(255, 0, 0));
        assert_eq!(c.state().hue, 120.0);

        c.apply(ActuatorCommand::SetRecording(false));
        assert_eq!(c.pixel(), RGB8::new(0, 255, 0));
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let mut c = controller();
        c.apply(ActuatorCommand::SetColor {
            hue: -30.0,
            saturation: 2.0,
            value: -1.0,
        });
        let s = c.state();
        assert_eq!((s.hue, s.saturation, s.value), (330.0, 1.0, 0.0));
    }
}
