//! Wireless bridge endpoints
//!
//! The radio stack is external. It calls into [`WirelessBridge`] from its
//! own callbacks and drains outbound updates from it; nothing here touches
//! the radio.

use neppi_core::attributes::{AttributeUpdate, AttributeWrite, BridgeFault};
use neppi_core::state::Event;

use crate::mailbox::{Delivery, Inbox, Outbox};

pub struct WirelessBridge<'a> {
    events: Outbox<'a, Event>,
    updates: Inbox<'a, AttributeUpdate>,
}

impl<'a> WirelessBridge<'a> {
    pub fn new(events: Outbox<'a, Event>, updates: Inbox<'a, AttributeUpdate>) -> Self {
        Self { events, updates }
    }

    /// Remote write from a radio callback
    ///
    /// Never waits. On `Full` the stack should reject the write so the peer
    /// retries.
    pub fn on_attribute_write(&self, id: u16, value: i32) -> Delivery {
        let delivery = self.events.offer(Event::Remote(AttributeWrite { id, value }));
        if delivery == Delivery::Full {
            warn!("Remote write {:#x} rejected, coordinator busy", id);
        }
        delivery
    }

    /// Report an unrecoverable radio condition; the device will halt
    pub async fn report_fault(&self, fault: BridgeFault) {
        error!("Wireless bridge fault: {}", fault);
        self.events.post(Event::BridgeFault(fault)).await
    }

    /// Next outbound update for the radio stack
    pub async fn next_update(&self) -> AttributeUpdate {
        self.updates.receive().await
    }

    /// Outbound update if one is pending
    pub fn poll_update(&self) -> Option<AttributeUpdate> {
        self.updates.try_receive().ok()
    }
}
