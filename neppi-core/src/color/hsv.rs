//! HSV color state and conversion to strip pixels

use palette::{FromColor, Hsv, Srgb};
use smart_leds::RGB8;

/// Color owned by the actuator task
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorState {
    /// Hue in degrees, `[0, 360)`
    pub hue: f32,
    /// Saturation, `[0, 1]`
    pub saturation: f32,
    /// Value (intensity), `[0, 1]`
    pub value: f32,
    /// Hue cycle running
    pub cycling: bool,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 1.0,
            value: 0.0,
            cycling: false,
        }
    }
}

/// Wrap a hue into `[0, 360)`; non-finite input maps to 0
pub fn normalize_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }
    let mut h = hue % 360.0;
    if h < 0.0 {
        h += 360.0;
    }
    if h >= 360.0 {
        h = 0.0;
    }
    h
}

/// Clamp a saturation/value component into `[0, 1]`; NaN maps to 0
pub fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

impl ColorState {
    /// Render to an 8-bit RGB pixel
    pub fn to_rgb(&self) -> RGB8 {
        let hsv: Hsv = Hsv::new(
            normalize_hue(self.hue),
            clamp_unit(self.saturation),
            clamp_unit(self.value),
        );
        let rgb: Srgb = Srgb::from_color(hsv);
        let rgb: Srgb<u8> = rgb.into_format();
        RGB8::new(rgb.red, rgb.green, rgb.blue)
    }
}
