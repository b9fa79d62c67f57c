//! Protocol message types
//!
//! A message is nothing more than a numeric type id and the raw payload bytes
//! as delivered by the host. No further decoding happens on this side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric classifier of an incoming protocol message.
///
/// Observed ids fit in 10 bits; the full `u64` range is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTypeId(pub u64);

impl MessageTypeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MessageTypeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Formats as `0x` followed by at least three uppercase hex digits.
impl fmt::Display for MessageTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

/// A message as received from the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    /// Message class
    pub type_id: MessageTypeId,

    /// Message body, excluding any transport framing
    pub payload: Vec<u8>,
}

impl ProtocolMessage {
    /// Create a new message
    pub fn new(type_id: impl Into<MessageTypeId>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            type_id: type_id.into(),
            payload: payload.into(),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
