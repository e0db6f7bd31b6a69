//! Color actuation
//!
//! HSV color state for the LED strip, the commands that change it, and the
//! self-rescheduling hue cycle.

pub mod controller;
pub mod hsv;

pub use controller::{ActuatorCommand, ColorController, ColorFeedback};
pub use hsv::{normalize_hue, ColorState};
