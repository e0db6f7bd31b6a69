//! Device configuration embedded at build time
//!
//! `build.rs` validates device.toml and encodes it with postcard; this
//! module decodes the blob at boot.

use defmt::*;

use neppi_core::config::DeviceConfig;

/// Encoded device.toml
static DEVICE_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/device_config.bin"));

/// Decode the embedded configuration, falling back to defaults
pub fn load_device_config() -> DeviceConfig {
    match postcard::from_bytes::<DeviceConfig>(DEVICE_CONFIG) {
        Ok(config) if config.validate().is_ok() => {
            info!("Loaded device configuration ({} bytes)", DEVICE_CONFIG.len());
            config
        }
        Ok(config) => {
            error!(
                "Embedded configuration invalid: {:?}, using defaults",
                config.validate()
            );
            DeviceConfig::default()
        }
        Err(e) => {
            error!(
                "Failed to decode embedded configuration: {:?}, using defaults",
                Debug2Format(&e)
            );
            DeviceConfig::default()
        }
    }
}
