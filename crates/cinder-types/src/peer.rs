//! # Peer Identity

use serde::{Deserialize, Serialize};

/// Unique identifier for a peer connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub [u8; 32]);

impl PeerId {
    /// Create a peer id from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
