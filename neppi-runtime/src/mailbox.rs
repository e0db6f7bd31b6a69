//! Mailbox send disciplines
//!
//! Every task owns one or more bounded FIFO inboxes. Producers hold an
//! [`Outbox`] and pick a discipline per message: `post` waits for space and
//! never loses the message, `offer` never waits and drops on a full inbox.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{DynamicReceiver, DynamicSender, Sender, TrySendError};
use neppi_core::state::SendMode;

/// Receiving end of a task mailbox (single consumer)
pub type Inbox<'a, T> = DynamicReceiver<'a, T>;

/// Outcome of a non-blocking send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    Enqueued,
    Full,
}

/// Sending end of a task mailbox (any number of producers)
pub struct Outbox<'a, T> {
    sender: DynamicSender<'a, T>,
}

impl<'a, T> Clone for Outbox<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Outbox<'a, T> {}

impl<'a, T> From<DynamicSender<'a, T>> for Outbox<'a, T> {
    fn from(sender: DynamicSender<'a, T>) -> Self {
        Self { sender }
    }
}

impl<'a, M: RawMutex, T, const N: usize> From<Sender<'a, M, T, N>> for Outbox<'a, T> {
    fn from(sender: Sender<'a, M, T, N>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl<'a, T> Outbox<'a, T> {
    pub fn new(sender: DynamicSender<'a, T>) -> Self {
        Self { sender }
    }

    /// Guaranteed delivery: wait until the inbox has room
    pub async fn post(&self, message: T) {
        self.sender.send(message).await
    }

    /// Best-effort delivery: drop the message if the inbox is full
    pub fn offer(&self, message: T) -> Delivery {
        match self.sender.try_send(message) {
            Ok(()) => Delivery::Enqueued,
            Err(TrySendError::Full(_)) => Delivery::Full,
        }
    }

    /// Send with the discipline chosen by the coordinator
    pub async fn dispatch(&self, message: T, mode: SendMode) -> Delivery {
        match mode {
            SendMode::Guaranteed => {
                self.post(message).await;
                Delivery::Enqueued
            }
            SendMode::BestEffort => self.offer(message),
        }
    }
}
