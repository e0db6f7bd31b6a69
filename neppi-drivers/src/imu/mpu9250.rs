//! MPU-9250 nine-axis motion sensor (I2C)
//!
//! The package holds an MPU-6500 accelerometer/gyroscope and an AK8963
//! magnetometer. The magnetometer sits behind the MPU's I2C bypass switch
//! and is addressed directly once bypass is enabled.
//!
//! # Modes
//!
//! - Low power: gyro and compass off, accelerometer duty-cycled at the
//!   wake poll rate. The INT pin fires on movement above the wake
//!   threshold (4 mg per LSB).
//! - Full rate: everything on, DLPF at 41 Hz, INT pin fires on every new
//!   sample.
//!
//! The INT pin is latched until INT_STATUS is read.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use neppi_core::config::{CompassRate, WakePollRate};
use neppi_core::motion::Axes;
use neppi_core::traits::{InterruptStatus, MotionSensor};

/// I2C address with AD0 low
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// AK8963 address once bypass is enabled
pub const COMPASS_ADDRESS: u8 = 0x0C;

/// MPU-6500 register addresses
pub mod reg {
    pub const SMPLRT_DIV: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const ACCEL_CONFIG2: u8 = 0x1D;
    pub const LP_ACCEL_ODR: u8 = 0x1E;
    /// Wake-on-motion threshold, 4 mg per LSB
    pub const WOM_THR: u8 = 0x1F;
    pub const INT_PIN_CFG: u8 = 0x37;
    pub const INT_ENABLE: u8 = 0x38;
    /// Interrupt status, cleared on read
    pub const INT_STATUS: u8 = 0x3A;
    /// First of six big-endian accelerometer bytes
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    /// First of six big-endian gyroscope bytes
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const MOT_DETECT_CTRL: u8 = 0x69;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const PWR_MGMT_2: u8 = 0x6C;
    pub const WHO_AM_I: u8 = 0x75;
}

/// AK8963 register addresses
pub mod ak8963 {
    pub const WIA: u8 = 0x00;
    pub const ST1: u8 = 0x02;
    /// First of six little-endian magnetometer bytes; ST2 follows
    pub const HXL: u8 = 0x03;
    pub const ST2: u8 = 0x09;
    pub const CNTL1: u8 = 0x0A;

    /// Expected WIA value
    pub const DEVICE_ID: u8 = 0x48;
    /// ST2 magnetic overflow flag
    pub const ST2_HOFL: u8 = 0x08;
    /// CNTL1 power-down
    pub const POWER_DOWN: u8 = 0x00;
    /// CNTL1 16-bit continuous measurement at 8 Hz
    pub const CONTINUOUS_8HZ: u8 = 0x12;
    /// CNTL1 16-bit continuous measurement at 100 Hz
    pub const CONTINUOUS_100HZ: u8 = 0x16;
}

const PWR1_RESET: u8 = 0x80;
const PWR1_CYCLE: u8 = 0x20;
/// Auto-select the best clock source
const PWR1_CLKSEL_AUTO: u8 = 0x01;

/// Gyro axes disabled, accelerometer on
const PWR2_GYRO_OFF: u8 = 0x07;
const PWR2_ALL_ON: u8 = 0x00;

/// ACCEL_FCHOICE_B clear, A_DLPF_CFG 1 (184 Hz), required for wake-on-motion
const ACCEL_CONFIG2_WOM: u8 = 0x09;
/// DLPF at 41 Hz for both accelerometer and gyro
const DLPF_41HZ: u8 = 0x03;

/// Latch INT until INT_STATUS is read, enable the compass bypass
const INT_PIN_LATCH_BYPASS: u8 = 0x22;

const INT_WOM: u8 = 0x40;
const INT_RAW_RDY: u8 = 0x01;

/// Hardware compare enabled against the initial sample
const MOT_DETECT_ENABLE: u8 = 0xC0;

const WHO_AM_I_MPU9250: u8 = 0x71;
const WHO_AM_I_MPU9255: u8 = 0x73;

/// Sensor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mpu9250Error<E> {
    /// I2C transfer failed
    Bus(E),
    /// WHO_AM_I returned an unexpected value
    UnknownDevice(u8),
    /// The AK8963 did not answer behind the bypass switch
    CompassMissing(u8),
}

impl<E> From<E> for Mpu9250Error<E> {
    fn from(e: E) -> Self {
        Mpu9250Error::Bus(e)
    }
}

/// SMPLRT_DIV value for a full-rate sample frequency (1 kHz base)
pub fn sample_rate_divider(sample_rate_hz: u16) -> u8 {
    let hz = sample_rate_hz.clamp(4, 1000);
    ((1000 / hz) - 1).min(255) as u8
}

/// MPU-9250 driver
pub struct Mpu9250<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    /// Last compass reading, repeated while the magnetometer has nothing new
    compass: Axes,
}

impl<I: I2c, D: DelayNs> Mpu9250<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            compass: Axes::default(),
        }
    }

    /// Release the bus
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    async fn write(&mut self, register: u8, value: u8) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[register, value]).await
    }

    async fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<(), I::Error> {
        self.i2c.write_read(self.address, &[register], buf).await
    }

    async fn read_u8(&mut self, register: u8) -> Result<u8, I::Error> {
        let mut buf = [0u8; 1];
        self.read(register, &mut buf).await?;
        Ok(buf[0])
    }

    async fn read_be_axes(&mut self, register: u8) -> Result<Axes, I::Error> {
        let mut raw = [0u8; 6];
        self.read(register, &mut raw).await?;
        Ok(Axes::new(
            i16::from_be_bytes([raw[0], raw[1]]),
            i16::from_be_bytes([raw[2], raw[3]]),
            i16::from_be_bytes([raw[4], raw[5]]),
        ))
    }

    async fn write_compass(&mut self, register: u8, value: u8) -> Result<(), I::Error> {
        self.i2c.write(COMPASS_ADDRESS, &[register, value]).await
    }

    async fn read_compass_regs(&mut self, register: u8, buf: &mut [u8]) -> Result<(), I::Error> {
        self.i2c.write_read(COMPASS_ADDRESS, &[register], buf).await
    }
}

impl<I: I2c, D: DelayNs> MotionSensor for Mpu9250<I, D> {
    type Error = Mpu9250Error<I::Error>;

    async fn init(&mut self) -> Result<(), Self::Error> {
        self.write(reg::PWR_MGMT_1, PWR1_RESET).await?;
        self.delay.delay_ms(100).await;
        self.write(reg::PWR_MGMT_1, PWR1_CLKSEL_AUTO).await?;
        self.delay.delay_ms(10).await;

        let id = self.read_u8(reg::WHO_AM_I).await?;
        if id != WHO_AM_I_MPU9250 && id != WHO_AM_I_MPU9255 {
            return Err(Mpu9250Error::UnknownDevice(id));
        }

        self.write(reg::INT_PIN_CFG, INT_PIN_LATCH_BYPASS).await?;
        self.delay.delay_ms(1).await;

        let mut wia = [0u8; 1];
        self.read_compass_regs(ak8963::WIA, &mut wia).await?;
        if wia[0] != ak8963::DEVICE_ID {
            return Err(Mpu9250Error::CompassMissing(wia[0]));
        }
        self.write_compass(ak8963::CNTL1, ak8963::POWER_DOWN).await?;

        Ok(())
    }

    async fn enable_low_power_wake(
        &mut self,
        threshold: u8,
        poll_rate: WakePollRate,
    ) -> Result<(), Self::Error> {
        self.write_compass(ak8963::CNTL1, ak8963::POWER_DOWN).await?;

        // Accelerometer running, not cycling yet, gyro off
        self.write(reg::PWR_MGMT_1, PWR1_CLKSEL_AUTO).await?;
        self.write(reg::PWR_MGMT_2, PWR2_GYRO_OFF).await?;
        self.write(reg::ACCEL_CONFIG2, ACCEL_CONFIG2_WOM).await?;
        self.write(reg::INT_ENABLE, INT_WOM).await?;
        self.write(reg::MOT_DETECT_CTRL, MOT_DETECT_ENABLE).await?;
        self.write(reg::WOM_THR, threshold).await?;
        self.write(reg::LP_ACCEL_ODR, poll_rate.code()).await?;
        self.write(reg::PWR_MGMT_1, PWR1_CYCLE | PWR1_CLKSEL_AUTO).await?;

        // Drop anything latched before the switch
        self.read_u8(reg::INT_STATUS).await?;
        Ok(())
    }

    async fn enable_full_rate(
        &mut self,
        sample_rate_hz: u16,
        compass_rate: CompassRate,
    ) -> Result<(), Self::Error> {
        self.write(reg::PWR_MGMT_1, PWR1_CLKSEL_AUTO).await?;
        self.write(reg::PWR_MGMT_2, PWR2_ALL_ON).await?;
        self.write(reg::CONFIG, DLPF_41HZ).await?;
        self.write(reg::ACCEL_CONFIG2, DLPF_41HZ).await?;
        self.write(reg::SMPLRT_DIV, sample_rate_divider(sample_rate_hz))
            .await?;
        self.write(reg::MOT_DETECT_CTRL, 0).await?;

        let mode = match compass_rate {
            CompassRate::Hz8 => ak8963::CONTINUOUS_8HZ,
            CompassRate::Hz100 => ak8963::CONTINUOUS_100HZ,
        };
        // The AK8963 must pass through power-down between modes
        self.write_compass(ak8963::CNTL1, ak8963::POWER_DOWN).await?;
        self.delay.delay_us(100).await;
        self.write_compass(ak8963::CNTL1, mode).await?;

        self.write(reg::INT_ENABLE, INT_RAW_RDY).await?;
        self.read_u8(reg::INT_STATUS).await?;
        Ok(())
    }

    async fn read_accel(&mut self) -> Result<Axes, Self::Error> {
        Ok(self.read_be_axes(reg::ACCEL_XOUT_H).await?)
    }

    async fn read_gyro(&mut self) -> Result<Axes, Self::Error> {
        Ok(self.read_be_axes(reg::GYRO_XOUT_H).await?)
    }

    /// Latest magnetometer reading
    ///
    /// The compass runs slower than the accelerometer. When no new data is
    /// ready, or the reading overflowed, the previous value is returned.
    async fn read_compass(&mut self) -> Result<Axes, Self::Error> {
        let mut st1 = [0u8; 1];
        self.read_compass_regs(ak8963::ST1, &mut st1).await?;
        if st1[0] & 0x01 == 0 {
            return Ok(self.compass);
        }

        // Reading through ST2 releases the data registers
        let mut raw = [0u8; 7];
        self.read_compass_regs(ak8963::HXL, &mut raw).await?;
        if raw[6] & ak8963::ST2_HOFL == 0 {
            self.compass = Axes::new(
                i16::from_le_bytes([raw[0], raw[1]]),
                i16::from_le_bytes([raw[2], raw[3]]),
                i16::from_le_bytes([raw[4], raw[5]]),
            );
        }
        Ok(self.compass)
    }

    async fn read_interrupt_status(&mut self) -> Result<InterruptStatus, Self::Error> {
        let status = self.read_u8(reg::INT_STATUS).await?;
        Ok(InterruptStatus {
            data_ready: status & INT_RAW_RDY != 0,
            wake_on_motion: status & INT_WOM != 0,
        })
    }
}
