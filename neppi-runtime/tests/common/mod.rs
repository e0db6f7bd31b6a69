//! Mock drivers shared by the runtime tests

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal_async::delay::DelayNs;
use neppi_core::config::{AdcResolution, CompassRate, WakePollRate};
use neppi_core::motion::{Axes, MotionSample};
use neppi_core::traits::{InterruptStatus, MotionSensor, SenseElectrode, TouchAdc};
use smart_leds::{SmartLedsWrite, RGB8};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Suspends once per wait, so each charge/settle pause is an await point
pub struct YieldingDelay;

impl DelayNs for YieldingDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        embassy_futures::yield_now().await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorCall {
    Init,
    LowPower(u8, WakePollRate),
    FullRate(u16, CompassRate),
}

/// Scripted motion sensor
#[derive(Default)]
pub struct MockSensor {
    pub statuses: VecDeque<InterruptStatus>,
    pub samples: VecDeque<MotionSample>,
    pub calls: Vec<SensorCall>,
    pub fail_init: bool,
    pub fail_reads: bool,
    /// Number of upcoming wake-on-motion programming attempts that fail
    pub fail_low_power: u32,
    pub current: MotionSample,
}

impl MockSensor {
    pub fn low_power_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SensorCall::LowPower(..)))
            .count()
    }

    pub fn wake() -> InterruptStatus {
        InterruptStatus {
            data_ready: false,
            wake_on_motion: true,
        }
    }

    pub fn data_ready() -> InterruptStatus {
        InterruptStatus {
            data_ready: true,
            wake_on_motion: false,
        }
    }
}

impl MotionSensor for MockSensor {
    type Error = MockError;

    async fn init(&mut self) -> Result<(), MockError> {
        self.calls.push(SensorCall::Init);
        if self.fail_init {
            Err(MockError)
        } else {
            Ok(())
        }
    }

    async fn enable_low_power_wake(
        &mut self,
        threshold: u8,
        poll_rate: WakePollRate,
    ) -> Result<(), MockError> {
        self.calls.push(SensorCall::LowPower(threshold, poll_rate));
        if self.fail_low_power > 0 {
            self.fail_low_power -= 1;
            return Err(MockError);
        }
        Ok(())
    }

    async fn enable_full_rate(
        &mut self,
        sample_rate_hz: u16,
        compass_rate: CompassRate,
    ) -> Result<(), MockError> {
        self.calls.push(SensorCall::FullRate(sample_rate_hz, compass_rate));
        Ok(())
    }

    async fn read_accel(&mut self) -> Result<Axes, MockError> {
        if self.fail_reads {
            return Err(MockError);
        }
        self.current = self.samples.pop_front().unwrap_or_default();
        Ok(self.current.accel)
    }

    async fn read_gyro(&mut self) -> Result<Axes, MockError> {
        Ok(self.current.gyro)
    }

    async fn read_compass(&mut self) -> Result<Axes, MockError> {
        Ok(self.current.compass)
    }

    async fn read_interrupt_status(&mut self) -> Result<InterruptStatus, MockError> {
        Ok(self.statuses.pop_front().unwrap_or_default())
    }
}

/// Electrode that counts charge/release cycles
#[derive(Default)]
pub struct MockElectrode {
    pub charges: usize,
    pub releases: usize,
    pub charged: bool,
}

impl SenseElectrode for MockElectrode {
    fn charge(&mut self) {
        self.charges += 1;
        self.charged = true;
    }

    fn release(&mut self) {
        self.releases += 1;
        self.charged = false;
    }
}

/// ADC returning scripted readings, then a fixed level
pub struct MockAdc {
    pub readings: VecDeque<Result<u32, MockError>>,
    pub level: u32,
    pub reads: usize,
}

impl MockAdc {
    pub fn at(level: u32) -> Self {
        Self {
            readings: VecDeque::new(),
            level,
            reads: 0,
        }
    }
}

impl TouchAdc for MockAdc {
    type Error = MockError;

    async fn sample(&mut self, _resolution: AdcResolution) -> Result<u32, MockError> {
        self.reads += 1;
        self.readings.pop_front().unwrap_or(Ok(self.level))
    }
}

/// LED strip that keeps every written frame
#[derive(Default)]
pub struct MockStrip {
    pub frames: Vec<Vec<RGB8>>,
}

impl MockStrip {
    pub fn last(&self) -> Option<&Vec<RGB8>> {
        self.frames.last()
    }
}

impl SmartLedsWrite for MockStrip {
    type Error = MockError;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), MockError>
    where
        T: IntoIterator<Item = I>,
        I: Into<RGB8>,
    {
        self.frames.push(iterator.into_iter().map(Into::into).collect());
        Ok(())
    }
}

pub fn still_sample() -> MotionSample {
    MotionSample {
        accel: Axes::new(12, -40, 16_390),
        gyro: Axes::new(3, -1, 2),
        compass: Axes::new(120, -35, 410),
    }
}
