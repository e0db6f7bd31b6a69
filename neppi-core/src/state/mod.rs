//! Device state
//!
//! The state machine, its input events and the coordinator that turns
//! transitions into effects. The state machine is explicit, finite and
//! deterministic.

pub mod coordinator;
pub mod events;
pub mod machine;

pub use coordinator::{Coordinator, Effect, Reaction, SendMode, MAX_EFFECTS};
pub use events::Event;
pub use machine::DeviceState;
