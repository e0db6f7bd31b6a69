//! Configuration types
//!
//! Board-agnostic configuration records. The firmware embeds them as
//! postcard binary data generated from `device.toml` at build time.

pub mod calibration;
pub mod types;

pub use calibration::*;
pub use types::*;
