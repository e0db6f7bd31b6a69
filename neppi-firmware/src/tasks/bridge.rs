//! Wireless bridge outbound pump
//!
//! The radio stack is not part of this firmware. Until one is attached,
//! this task drains the outbound attribute updates so the coordinator's
//! guaranteed publishes never stall, and logs what would have been sent.
//! A radio integration replaces this task and calls
//! [`crate::channels::wireless_bridge`] from its own callbacks instead.

use defmt::*;

use neppi_core::attributes::AttributeId;
use neppi_runtime::WirelessBridge;

#[embassy_executor::task]
pub async fn bridge_task(bridge: WirelessBridge<'static>) {
    info!("Bridge task started (no radio attached)");

    loop {
        let update = bridge.next_update().await;
        match update.id {
            AttributeId::Controls => trace!("Motion sample: {=[u8]:x}", &update.payload[..]),
            id => debug!("Attribute {}: {=[u8]:x}", id, &update.payload[..]),
        }
    }
}
