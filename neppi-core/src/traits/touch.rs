//! Capacitive touch electrode traits

use core::fmt::Debug;
use core::future::Future;

use crate::config::AdcResolution;

/// The sense pin, switched between driven-high and floating
pub trait SenseElectrode {
    /// Drive the electrode high
    fn charge(&mut self);

    /// Float the electrode as an input
    fn release(&mut self);
}

/// Analog reading of the sense line
///
/// The converter may be shared with other consumers; callers serialize
/// access around a whole sample.
pub trait TouchAdc {
    type Error: Debug;

    fn sample(&mut self, resolution: AdcResolution) -> impl Future<Output = Result<u32, Self::Error>>;
}
