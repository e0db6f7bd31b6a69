//! Radio attribute surface
//!
//! Identifiers and payload encodings for the attributes the wireless bridge
//! exposes to the remote peer. The bridge itself (advertising, connections,
//! GATT encoding) is external; this module only fixes what crosses it.

use heapless::Vec;

use crate::motion::MotionSample;
use crate::state::DeviceState;

/// Largest payload carried by one attribute update
pub const MAX_ATTRIBUTE_PAYLOAD: usize = 20;

/// Attribute identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum AttributeId {
    /// Motion stream (read/notify)
    Controls = 0xABBB,
    /// Hue in degrees (read/write/notify)
    Hue = 0xBBD0,
    /// Intensity in percent (read/write/notify)
    Intensity = 0xBBCF,
    /// Hue cycle on/off (read/write/notify)
    Cycling = 0xBBD1,
    /// Device state record (read/write/notify)
    DeviceState = 0xBBD2,
}

impl AttributeId {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0xABBB => Some(AttributeId::Controls),
            0xBBD0 => Some(AttributeId::Hue),
            0xBBCF => Some(AttributeId::Intensity),
            0xBBD1 => Some(AttributeId::Cycling),
            0xBBD2 => Some(AttributeId::DeviceState),
            _ => None,
        }
    }
}

/// Inbound write from the remote peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeWrite {
    pub id: u16,
    pub value: i32,
}

/// Device state plus the value of whatever triggered the change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusRecord {
    pub state: DeviceState,
    pub auxiliary: i32,
}

impl StatusRecord {
    /// Encoded size
    pub const BYTES: usize = 5;

    /// `[state][auxiliary as i32 LE]`
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut out = [0u8; Self::BYTES];
        out[0] = self.state.as_u8();
        out[1..].copy_from_slice(&self.auxiliary.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::BYTES {
            return None;
        }
        let state = DeviceState::from_u8(bytes[0])?;
        let auxiliary = i32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        Some(Self { state, auxiliary })
    }
}

/// Outbound attribute update for the wireless bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeUpdate {
    pub id: AttributeId,
    pub payload: Vec<u8, MAX_ATTRIBUTE_PAYLOAD>,
}

impl AttributeUpdate {
    fn with_payload(id: AttributeId, bytes: &[u8]) -> Self {
        let mut payload = Vec::new();
        // Every encoder below fits in MAX_ATTRIBUTE_PAYLOAD
        let _ = payload.extend_from_slice(bytes);
        Self { id, payload }
    }

    /// Motion stream sample on the controls attribute
    pub fn motion(sample: &MotionSample) -> Self {
        Self::with_payload(AttributeId::Controls, &sample.to_bytes())
    }

    pub fn hue(degrees: u16) -> Self {
        Self::with_payload(AttributeId::Hue, &degrees.to_le_bytes())
    }

    pub fn intensity(percent: u8) -> Self {
        Self::with_payload(AttributeId::Intensity, &[percent])
    }

    pub fn cycling(on: bool) -> Self {
        Self::with_payload(AttributeId::Cycling, &[on as u8])
    }

    pub fn status(record: StatusRecord) -> Self {
        Self::with_payload(AttributeId::DeviceState, &record.to_bytes())
    }
}

/// Faults reported by the wireless bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeFault {
    /// Radio stack state no longer matches what the bridge expects
    InconsistentState,
    /// Radio stack returned an unrecoverable error code
    StackFailure(i32),
}
