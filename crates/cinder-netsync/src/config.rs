//! # Sync Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for peer synchronization sessions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum headers a responder returns (and a requester accepts) per
    /// locate round.
    pub max_headers_per_round: usize,

    /// Maximum blocks requested in a single fetch batch. Caps memory and
    /// keeps round-trip latency predictable.
    pub max_blocks_per_batch: usize,

    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Additional attempts after a timed-out or dropped request before the
    /// round fails.
    pub max_request_retries: u32,

    /// Upper bound on continuation rounds against a single peer.
    pub max_rounds: u32,

    /// Whether to run the checkpoint root exchange over received header
    /// batches. Linkage replay always runs.
    pub verify_checkpoints: bool,

    /// Hard cap on a decoded message payload.
    pub max_message_bytes: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_headers_per_round: 1024,
            max_blocks_per_batch: 128,
            request_timeout_ms: 30_000,
            max_request_retries: 2,
            max_rounds: 64,
            verify_checkpoints: true,
            max_message_bytes: 32 * 1024 * 1024,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (small values, short timeouts).
    pub fn for_testing() -> Self {
        Self {
            max_headers_per_round: 16,
            max_blocks_per_batch: 4,
            request_timeout_ms: 50,
            max_request_retries: 2,
            max_rounds: 8,
            verify_checkpoints: true,
            max_message_bytes: 1024 * 1024,
        }
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
