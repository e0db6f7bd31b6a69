//! Touch task
//!
//! Owns the sense electrode. One sample is `sample_rounds` charge, settle
//! and read rounds averaged together, taken with the shared ADC locked.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use neppi_core::config::{ConfigError, TouchConfig};
use neppi_core::state::Event;
use neppi_core::touch::{
    BandBuilder, CalibrationBand, CalibrationError, Debouncer, Observation, TouchReport,
    TouchState,
};
use neppi_core::traits::{SenseElectrode, TouchAdc};

use crate::fmt::Debug2Format;
use crate::mailbox::{Delivery, Outbox};

/// Touch startup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError<E> {
    /// ADC read failed
    Adc(E),
    /// Calibration samples could not form a band
    Calibration(CalibrationError),
}

pub struct TouchTask<'a, M: RawMutex, P: SenseElectrode, A: TouchAdc, D: DelayNs> {
    electrode: P,
    adc: &'a Mutex<M, A>,
    delay: D,
    config: TouchConfig,
    debouncer: Option<Debouncer>,
    events: Outbox<'a, Event>,
    calibrations: Outbox<'a, CalibrationBand>,
}

impl<'a, M, P, A, D> TouchTask<'a, M, P, A, D>
where
    M: RawMutex,
    P: SenseElectrode,
    A: TouchAdc,
    D: DelayNs,
{
    /// Create the task, rejecting zero rounds or a zero charge time
    pub fn new(
        electrode: P,
        adc: &'a Mutex<M, A>,
        delay: D,
        config: TouchConfig,
        events: Outbox<'a, Event>,
        calibrations: Outbox<'a, CalibrationBand>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            electrode,
            adc,
            delay,
            config,
            debouncer: None,
            events,
            calibrations,
        })
    }

    /// Debounced state, once started
    pub fn state(&self) -> Option<TouchState> {
        self.debouncer.as_ref().map(Debouncer::state)
    }

    pub fn electrode(&self) -> &P {
        &self.electrode
    }

    /// Take one averaged sample
    pub async fn sample(&mut self) -> Result<u32, A::Error> {
        let rounds = self.config.sample_rounds.max(1) as u32;
        let adc = self.adc;
        let mut adc = adc.lock().await;

        let mut sum: u32 = 0;
        for _ in 0..rounds {
            self.electrode.charge();
            self.delay.delay_us(self.config.charge_time_us).await;
            self.electrode.release();
            self.delay.delay_us(self.config.settle_time_us).await;
            sum = sum.saturating_add(adc.sample(self.config.resolution).await?);
        }

        Ok(sum / rounds)
    }

    /// Run a calibration pass with no touch present
    pub async fn calibrate(&mut self) -> Result<CalibrationBand, TouchError<A::Error>> {
        info!(
            "Touch: calibrating for {} rounds...",
            self.config.calibration_rounds
        );

        let mut builder = BandBuilder::new();
        for _ in 0..self.config.calibration_rounds {
            let sample = self.sample().await.map_err(TouchError::Adc)?;
            builder.add(sample);
            self.delay.delay_us(self.config.cycle_interval_us).await;
        }

        let band = builder
            .finish(self.config.margin)
            .map_err(TouchError::Calibration)?;
        info!("Touch: calibrated band [{}, {}]", band.low, band.high);
        Ok(band)
    }

    /// Pick a band and arm the debouncer
    ///
    /// A stored band is used as-is unless recalibration is forced. A freshly
    /// computed band is handed to the calibration outbox for persistence.
    pub async fn start(
        &mut self,
        stored: Option<CalibrationBand>,
    ) -> Result<CalibrationBand, TouchError<A::Error>> {
        let band = match stored {
            Some(band) if !self.config.force_recalibration => {
                info!("Touch: using stored band [{}, {}]", band.low, band.high);
                band
            }
            _ => {
                let band = self.calibrate().await?;
                self.calibrations.post(band).await;
                band
            }
        };

        self.debouncer = Some(Debouncer::new(band, self.config.hysteresis));
        Ok(band)
    }

    /// Take one sample, debounce it and report
    ///
    /// Returns `None` before `start` or when the ADC read failed.
    pub async fn step(&mut self) -> Option<Observation> {
        self.debouncer.as_ref()?;

        let sample = self.sample().await;
        self.delay.delay_us(self.config.cycle_interval_us).await;

        let debouncer = self.debouncer.as_mut()?;
        match sample {
            Ok(sample) => {
                let observation = debouncer.observe(sample);
                if observation.changed {
                    debug!("Touch: {} (sample {})", observation.state, sample);
                    self.events.post(Event::Touch(observation.report())).await;
                } else if self.config.report_all
                    && self.events.offer(Event::Touch(observation.report())) == Delivery::Full
                {
                    trace!("Touch report dropped");
                }
                Some(observation)
            }
            Err(e) => {
                warn!("Touch sample failed: {}", Debug2Format(&e));
                if debouncer.force_disengaged() {
                    let report = TouchReport {
                        state: TouchState::Disengaged,
                        sample: 0,
                    };
                    self.events.post(Event::Touch(report)).await;
                }
                None
            }
        }
    }

    /// Start, then sample forever
    ///
    /// If no band can be established the task parks and touch stays
    /// disabled.
    pub async fn run(mut self, stored: Option<CalibrationBand>) -> ! {
        if let Err(e) = self.start(stored).await {
            error!("Touch start failed: {}, touch disabled", Debug2Format(&e));
            core::future::pending::<()>().await;
        }

        loop {
            self.step().await;
        }
    }
}
