//! Motion task
//!
//! Owns the motion sensor. The interrupt pin handler only forwards a
//! [`WakeNotice`]; all register access and decisions happen here.

use neppi_core::config::MotionConfig;
use neppi_core::motion::{MotionDetector, MotionMode, MotionSample, SampleOutcome};
use neppi_core::state::Event;
use neppi_core::traits::MotionSensor;

use crate::fmt::Debug2Format;
use crate::mailbox::{Delivery, Inbox, Outbox};

/// The sensor raised its interrupt line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeNotice;

pub struct MotionTask<'a, S: MotionSensor> {
    sensor: S,
    config: MotionConfig,
    detector: MotionDetector,
    wake: Inbox<'a, WakeNotice>,
    events: Outbox<'a, Event>,
    stream: Outbox<'a, MotionSample>,
    /// Wake-on-motion could not be re-armed after the last stillness run
    rearm_pending: bool,
}

impl<'a, S: MotionSensor> MotionTask<'a, S> {
    /// Create the task
    ///
    /// `stream` should have capacity 2: one slot being consumed while the
    /// next fills.
    pub fn new(
        sensor: S,
        config: MotionConfig,
        wake: Inbox<'a, WakeNotice>,
        events: Outbox<'a, Event>,
        stream: Outbox<'a, MotionSample>,
    ) -> Self {
        Self {
            sensor,
            detector: MotionDetector::new(&config),
            config,
            wake,
            events,
            stream,
            rearm_pending: false,
        }
    }

    pub fn mode(&self) -> MotionMode {
        self.detector.mode()
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// True while the sensor is still streaming after a failed re-arm
    pub fn rearm_pending(&self) -> bool {
        self.rearm_pending
    }

    /// Initialize the sensor and arm wake-on-motion
    pub async fn start(&mut self) -> Result<(), S::Error> {
        self.sensor.init().await?;
        self.arm_wake().await?;
        info!(
            "Motion sensor armed: threshold={}, poll={} mHz",
            self.config.wake_threshold,
            self.config.wake_poll_rate.millihertz()
        );
        Ok(())
    }

    /// Wait for the next interrupt and service it
    pub async fn step(&mut self) {
        self.wake.receive().await;
        self.service().await;
    }

    /// Start, then service interrupts forever
    ///
    /// If the sensor cannot be initialized the task parks and the rest of
    /// the device keeps running without motion.
    pub async fn run(mut self) -> ! {
        if let Err(e) = self.start().await {
            error!("Motion sensor init failed: {}, motion disabled", Debug2Format(&e));
            core::future::pending::<()>().await;
        }

        loop {
            self.step().await;
        }
    }

    /// Act on the sensor's pending interrupt sources
    pub async fn service(&mut self) {
        let status = match self.sensor.read_interrupt_status().await {
            Ok(status) => status,
            Err(e) => {
                warn!("Motion interrupt status read failed: {}", Debug2Format(&e));
                return;
            }
        };

        match self.detector.mode() {
            MotionMode::LowPower if status.wake_on_motion => self.wake_up().await,
            // Still at full rate, so data-ready keeps firing until re-armed
            MotionMode::LowPower if self.rearm_pending => self.rearm().await,
            MotionMode::Sampling if status.data_ready => self.sample().await,
            _ => trace!("Spurious motion interrupt"),
        }
    }

    async fn wake_up(&mut self) {
        let rate = self.config.sample_rate_hz;
        if let Err(e) = self.sensor.enable_full_rate(rate, self.config.compass_rate).await {
            warn!("Full-rate reconfigure failed: {}", Debug2Format(&e));
            return;
        }

        self.detector.on_wake();
        debug!("Motion: LowPower -> Sampling at {} Hz", rate);
        self.events.post(Event::MotionBecameActive).await;
    }

    async fn sample(&mut self) {
        let sample = match self.sensor.read_sample().await {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Motion read failed, skipping: {}", Debug2Format(&e));
                return;
            }
        };

        match self.detector.on_sample(sample) {
            SampleOutcome::Forward => {
                if self.stream.offer(sample) == Delivery::Full {
                    trace!("Motion stream full, sample dropped");
                }
            }
            SampleOutcome::BecameIdle => {
                self.rearm().await;
                debug!("Motion: Sampling -> LowPower");
                self.events.post(Event::MotionBecameIdle).await;
            }
            SampleOutcome::Ignored => {}
        }
    }

    async fn rearm(&mut self) {
        match self.arm_wake().await {
            Ok(()) => {
                if self.rearm_pending {
                    info!("Wake-on-motion re-armed");
                }
                self.rearm_pending = false;
            }
            Err(e) => {
                warn!(
                    "Wake-on-motion rearm failed, retrying on next interrupt: {}",
                    Debug2Format(&e)
                );
                self.rearm_pending = true;
            }
        }
    }

    async fn arm_wake(&mut self) -> Result<(), S::Error> {
        self.sensor
            .enable_low_power_wake(self.config.wake_threshold, self.config.wake_poll_rate)
            .await
    }
}
