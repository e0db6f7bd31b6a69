//! Motion sensing
//!
//! Nine-axis samples and the wake/stillness state machine that decides when
//! the motion sensor streams at full rate and when it drops back to
//! wake-on-motion.

pub mod detector;
pub mod sample;

pub use detector::{MotionDetector, MotionMode, SampleOutcome};
pub use sample::{Axes, MotionSample, MOTION_SAMPLE_BYTES};
