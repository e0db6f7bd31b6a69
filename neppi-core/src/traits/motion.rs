//! Motion sensor trait

use core::fmt::Debug;
use core::future::Future;

use crate::config::{CompassRate, WakePollRate};
use crate::motion::{Axes, MotionSample};

/// Interrupt sources pending on the motion sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// A full-rate sample is ready
    pub data_ready: bool,
    /// Movement above the wake threshold was detected
    pub wake_on_motion: bool,
}

/// Nine-axis motion sensor with a wake-on-motion low-power mode
///
/// Reading the interrupt status clears it.
pub trait MotionSensor {
    type Error: Debug;

    /// Reset and identify the sensor
    fn init(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Enter low-power mode, interrupting only on movement above `threshold`
    fn enable_low_power_wake(
        &mut self,
        threshold: u8,
        poll_rate: WakePollRate,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Enter full-rate mode with data-ready interrupts
    fn enable_full_rate(
        &mut self,
        sample_rate_hz: u16,
        compass_rate: CompassRate,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    fn read_accel(&mut self) -> impl Future<Output = Result<Axes, Self::Error>>;

    fn read_gyro(&mut self) -> impl Future<Output = Result<Axes, Self::Error>>;

    fn read_compass(&mut self) -> impl Future<Output = Result<Axes, Self::Error>>;

    fn read_interrupt_status(&mut self) -> impl Future<Output = Result<InterruptStatus, Self::Error>>;

    /// Read all three groups
    fn read_sample(&mut self) -> impl Future<Output = Result<MotionSample, Self::Error>> {
        async move {
            let accel = self.read_accel().await?;
            let gyro = self.read_gyro().await?;
            let compass = self.read_compass().await?;
            Ok(MotionSample {
                accel,
                gyro,
                compass,
            })
        }
    }
}
