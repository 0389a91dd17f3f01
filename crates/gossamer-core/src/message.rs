//! Message type relayed between peers
//!
//! The resilience layer never looks inside a message body; it only
//! rewrites the destination before forwarding.

use serde::{Deserialize, Serialize};

/// A message addressed to one peer.
///
/// The body is opaque to the connection layer. The destination is
/// rewritten per recipient before forwarding, so one logical message
/// built once can be fanned out to several peers: each peer's copy
/// carries that peer's own URL.
///
/// `Clone` gives independent copies: mutating a clone's destination
/// never affects the original or any sibling copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Destination peer URL
    pub to: String,
    /// Opaque payload
    pub body: Vec<u8>,
}

impl Message {
    /// Create a message with no destination yet
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            to: String::new(),
            body,
        }
    }

    /// Create a message addressed to a specific peer
    pub fn to(destination: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            to: destination.into(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_has_empty_destination() {
        let msg = Message::new(b"payload".to_vec());
        assert!(msg.to.is_empty());
        assert_eq!(msg.body, b"payload");
    }

    #[test]
    fn clone_is_independent() {
        let original = Message::to("ws://a.example/gossamer", b"shared".to_vec());
        let mut copy = original.clone();
        copy.to = "ws://b.example/gossamer".to_string();

        assert_eq!(original.to, "ws://a.example/gossamer");
        assert_eq!(copy.body, original.body);
    }
}
