//! Coordinator task
//!
//! Drains the coordinator inbox and the motion stream, runs the device
//! state machine and executes the resulting effects. Control events are
//! always served before stream samples.

use embassy_futures::select::{select, Either};
use neppi_core::attributes::{AttributeUpdate, BridgeFault};
use neppi_core::color::ActuatorCommand;
use neppi_core::config::IntensityLevels;
use neppi_core::motion::MotionSample;
use neppi_core::state::{Coordinator, DeviceState, Effect, Event, Reaction};

use crate::mailbox::{Delivery, Inbox, Outbox};

pub struct CoordinatorTask<'a> {
    coordinator: Coordinator,
    events: Inbox<'a, Event>,
    stream: Inbox<'a, MotionSample>,
    actuator: Outbox<'a, ActuatorCommand>,
    bridge: Outbox<'a, AttributeUpdate>,
}

impl<'a> CoordinatorTask<'a> {
    pub fn new(
        levels: IntensityLevels,
        events: Inbox<'a, Event>,
        stream: Inbox<'a, MotionSample>,
        actuator: Outbox<'a, ActuatorCommand>,
        bridge: Outbox<'a, AttributeUpdate>,
    ) -> Self {
        Self {
            coordinator: Coordinator::new(levels),
            events,
            stream,
            actuator,
            bridge,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.coordinator.state()
    }

    /// Enter `Off` and announce it
    pub async fn start(&mut self) -> Result<(), BridgeFault> {
        let reaction = self.coordinator.boot();
        info!("Coordinator: boot -> {}", self.coordinator.state());
        self.execute(reaction).await
    }

    /// Handle the next event or stream sample
    pub async fn step(&mut self) -> Result<(), BridgeFault> {
        match select(self.events.receive(), self.stream.receive()).await {
            Either::First(event) => self.handle(event).await,
            Either::Second(sample) => {
                let effect = self.coordinator.stream(&sample);
                self.perform(effect).await
            }
        }
    }

    /// Handle one event
    pub async fn handle(&mut self, event: Event) -> Result<(), BridgeFault> {
        let before = self.coordinator.state();
        let reaction = self.coordinator.handle(&event);
        let after = self.coordinator.state();
        if before != after {
            info!("Coordinator: {} -> {}", before, after);
        }
        self.execute(reaction).await
    }

    /// Run until a fatal fault, which is returned to the caller
    pub async fn run(mut self) -> BridgeFault {
        if let Err(fault) = self.start().await {
            return fault;
        }
        loop {
            if let Err(fault) = self.step().await {
                return fault;
            }
        }
    }

    async fn execute(&mut self, reaction: Reaction) -> Result<(), BridgeFault> {
        for effect in reaction {
            self.perform(effect).await?;
        }
        Ok(())
    }

    async fn perform(&mut self, effect: Effect) -> Result<(), BridgeFault> {
        match effect {
            Effect::Actuate(command) => self.actuator.post(command).await,
            Effect::Publish(update, mode) => {
                if self.bridge.dispatch(update, mode).await == Delivery::Full {
                    trace!("Attribute update dropped");
                }
            }
            Effect::Halt(fault) => {
                error!("Bridge fault: {}, halting", fault);
                return Err(fault);
            }
        }
        Ok(())
    }
}
