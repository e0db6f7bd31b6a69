//! Capacitive sense hardware
//!
//! The electrode is charged through a GPIO and read back through an ADC
//! input wired to the same sense line.

use embassy_rp::adc::{self, Adc, Async, Channel};
use embassy_rp::gpio::{Flex, Pull};

use neppi_core::config::AdcResolution;
use neppi_core::traits::{SenseElectrode, TouchAdc};

/// Native resolution of the RP2040 ADC
const NATIVE_BITS: u8 = 12;

/// Charge pin driven high, then floated
pub struct FlexElectrode<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexElectrode<'d> {
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_pull(Pull::None);
        pin.set_as_input();
        Self { pin }
    }
}

impl SenseElectrode for FlexElectrode<'_> {
    fn charge(&mut self) {
        self.pin.set_high();
        self.pin.set_as_output();
    }

    fn release(&mut self) {
        self.pin.set_as_input();
    }
}

/// ADC channel on the sense line
pub struct SenseAdc<'d> {
    adc: Adc<'d, Async>,
    channel: Channel<'d>,
}

impl<'d> SenseAdc<'d> {
    pub fn new(adc: Adc<'d, Async>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl TouchAdc for SenseAdc<'_> {
    type Error = adc::Error;

    /// Sample at the native 12 bits, rescaled to the requested resolution
    async fn sample(&mut self, resolution: AdcResolution) -> Result<u32, adc::Error> {
        let raw = self.adc.read(&mut self.channel).await? as u32;
        let bits = resolution.bits();
        Ok(if bits >= NATIVE_BITS {
            raw << (bits - NATIVE_BITS)
        } else {
            raw >> (NATIVE_BITS - bits)
        })
    }
}
