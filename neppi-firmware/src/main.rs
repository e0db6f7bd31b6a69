//! Neppi - Wearable Painting Glove Firmware
//!
//! Main firmware binary for the RP2040 glove board. Motion wakes the
//! device, touch starts a stroke and the LED strip mirrors the state; a
//! radio stack exposes it all through the wireless bridge.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Flex, Input, Pull};
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::I2C0;
use embassy_rp::spi::{self, Spi};
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use static_cell::StaticCell;
use ws2812_spi::prerendered::Ws2812;
use {defmt_rtt as _, panic_probe as _};

use neppi_drivers::imu::Mpu9250;

use crate::config::{load_calibration, load_device_config};
use crate::flash::FlashStorage;
use crate::sense::{FlexElectrode, SenseAdc};
use crate::tasks::SharedSenseAdc;

mod channels;
mod config;
mod flash;
mod sense;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Longest strip the SPI render buffer can hold
const MAX_PIXELS: usize = 32;

/// ws2812-spi prerendered encoding: 12 SPI bytes per pixel
const LED_BUFFER_SIZE: usize = MAX_PIXELS * 12;

/// 3.2 MHz gives 4 SPI bits per WS2812 bit
const LED_SPI_FREQUENCY: u32 = 3_200_000;

const IMU_I2C_FREQUENCY: u32 = 400_000;

static LED_BUFFER: StaticCell<[u8; LED_BUFFER_SIZE]> = StaticCell::new();
static SENSE_ADC: StaticCell<SharedSenseAdc> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Neppi firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut config = load_device_config();
    if config.actuator.pixel_count as usize > MAX_PIXELS {
        warn!(
            "Strip of {} pixels exceeds render buffer, driving {}",
            config.actuator.pixel_count, MAX_PIXELS
        );
        config.actuator.pixel_count = MAX_PIXELS as u16;
    }

    let mut storage = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let stored_band = load_calibration(&mut storage).await;

    // Motion sensor on I2C0 (SCL=GPIO5, SDA=GPIO4), INT on GPIO6
    let i2c_config = {
        let mut cfg = i2c::Config::default();
        cfg.frequency = IMU_I2C_FREQUENCY;
        cfg
    };
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let imu = Mpu9250::new(i2c, Delay);
    let imu_int = Input::new(p.PIN_6, Pull::Down);

    info!("Motion sensor bus initialized");

    // Touch electrode: charge through GPIO22, read back on ADC0 (GPIO26)
    let electrode = FlexElectrode::new(Flex::new(p.PIN_22));
    let adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let sense_channel = Channel::new_pin(p.PIN_26, Pull::None);
    let sense_adc = SENSE_ADC.init(Mutex::new(SenseAdc::new(adc, sense_channel)));

    info!("Touch sense initialized");

    // LED strip data on SPI0 MOSI (GPIO19)
    let spi_config = {
        let mut cfg = spi::Config::default();
        cfg.frequency = LED_SPI_FREQUENCY;
        cfg
    };
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let led_buffer = LED_BUFFER.init([0u8; LED_BUFFER_SIZE]);
    let leds = Ws2812::new(spi, led_buffer);

    info!("LED strip initialized");

    // Spawn tasks
    spawner.spawn(tasks::calibration_task(storage)).unwrap();
    spawner.spawn(tasks::coordinator_task(config.levels)).unwrap();
    spawner
        .spawn(tasks::bridge_task(channels::wireless_bridge()))
        .unwrap();
    spawner
        .spawn(tasks::actuator_task(leds, config.actuator))
        .unwrap();
    spawner.spawn(tasks::motion_task(imu, config.motion)).unwrap();
    spawner.spawn(tasks::motion_irq_task(imu_int)).unwrap();
    spawner
        .spawn(tasks::touch_task(electrode, sense_adc, config.touch, stored_band))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
