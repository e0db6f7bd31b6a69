//! Actuator task
//!
//! Owns the LED strip and its color state. While cycling, the next tick is
//! armed only after checking the cycling flag, so `StopCycle` takes effect
//! at the next tick boundary.

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use neppi_core::color::{ActuatorCommand, ColorController, ColorFeedback, ColorState};
use neppi_core::config::ActuatorConfig;
use neppi_core::state::Event;
use smart_leds::{SmartLedsWrite, RGB8};

use crate::fmt::Debug2Format;
use crate::mailbox::{Delivery, Inbox, Outbox};

pub struct ActuatorTask<'a, L, D>
where
    L: SmartLedsWrite,
    L::Color: From<RGB8>,
    L::Error: core::fmt::Debug,
    D: DelayNs,
{
    leds: L,
    delay: D,
    controller: ColorController,
    pixel_count: usize,
    cycle_period_ms: u32,
    inbox: Inbox<'a, ActuatorCommand>,
    feedback: Outbox<'a, Event>,
}

impl<'a, L, D> ActuatorTask<'a, L, D>
where
    L: SmartLedsWrite,
    L::Color: From<RGB8>,
    L::Error: core::fmt::Debug,
    D: DelayNs,
{
    pub fn new(
        leds: L,
        delay: D,
        config: &ActuatorConfig,
        inbox: Inbox<'a, ActuatorCommand>,
        feedback: Outbox<'a, Event>,
    ) -> Self {
        Self {
            leds,
            delay,
            controller: ColorController::new(config),
            pixel_count: config.pixel_count as usize,
            cycle_period_ms: config.cycle_period_ms,
            inbox,
            feedback,
        }
    }

    /// Current color snapshot
    pub fn color(&self) -> ColorState {
        self.controller.state()
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    /// Blank the strip
    pub fn start(&mut self) {
        self.render();
    }

    /// Handle the next command, or the next cycle tick if cycling
    pub async fn step(&mut self) {
        if !self.controller.is_cycling() {
            let command = self.inbox.receive().await;
            self.apply(command);
            return;
        }

        match select(
            self.inbox.receive(),
            self.delay.delay_ms(self.cycle_period_ms),
        )
        .await
        {
            Either::First(command) => self.apply(command),
            Either::Second(()) => self.tick(),
        }
    }

    pub async fn run(mut self) -> ! {
        self.start();
        loop {
            self.step().await;
        }
    }

    /// Apply one command and render it
    pub fn apply(&mut self, command: ActuatorCommand) {
        trace!("Actuator: {}", command);
        let changed = self.controller.apply(command);
        self.render();
        if let Some(feedback) = changed {
            self.report(feedback);
        }
    }

    /// Advance the hue cycle by one step
    pub fn tick(&mut self) {
        if let Some(feedback) = self.controller.tick() {
            self.render();
            self.report(feedback);
        }
    }

    fn render(&mut self) {
        let pixel = self.controller.pixel();
        if let Err(e) = self
            .leds
            .write(core::iter::repeat(pixel).take(self.pixel_count))
        {
            warn!("LED write failed: {}", Debug2Format(&e));
        }
    }

    fn report(&self, feedback: ColorFeedback) {
        if self.feedback.offer(Event::ColorChanged(feedback)) == Delivery::Full {
            trace!("Color feedback dropped");
        }
    }
}
