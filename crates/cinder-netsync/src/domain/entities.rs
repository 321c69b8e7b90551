//! # Domain Entities
//!
//! Locators, checkpoint ranges, and session state. Locators and checkpoint
//! ranges are ephemeral: built fresh per sync round, owned exclusively by
//! the round, never persisted.

use cinder_types::Hash;
use serde::{Deserialize, Serialize};

/// One probe in a locator: an ancestor hash and its height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorEntry {
    /// Hash of the local block at `height`.
    pub hash: Hash,
    /// Height the hash was drawn from.
    pub height: u32,
}

/// Sparse list of ancestor hashes at exponentially increasing back-off
/// distances from the tip, nearest-tip first, genesis always last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locator {
    /// Probe entries, ordered nearest-tip first.
    pub entries: Vec<LocatorEntry>,
}

impl Locator {
    /// The probe hashes in wire order.
    pub fn hashes(&self) -> Vec<Hash> {
        self.entries.iter().map(|entry| entry.hash).collect()
    }

    /// Number of probes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the locator holds no probes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A contiguous header span and the Merkle root over its header hashes,
/// used to batch-validate headers received from a peer before any
/// per-header work is committed to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointRange {
    /// Hash of the first header in the span.
    pub begin_hash: Hash,
    /// Number of headers in the span.
    pub length: u32,
    /// Merkle root over the span's header hashes.
    pub root_hash: Hash,
}

/// Stages of a synchronization session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStage {
    /// No round in progress.
    Idle,
    /// Building the locator.
    Locating,
    /// Locator sent, waiting for the header batch.
    AwaitingHeaders,
    /// Replaying linkage and checking the checkpoint root.
    Verifying,
    /// Requesting full blocks for the verified headers.
    FetchingBlocks,
    /// Appending fetched blocks to the local chain.
    Committing,
    /// Round abandoned after a validation failure or cancellation.
    Aborted,
}

/// Result of a [`crate::SyncSession::run`] call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Rounds executed.
    pub rounds: u32,
    /// Total blocks committed across all rounds.
    pub blocks_committed: u64,
    /// Local tip height after the last round.
    pub tip_height: u32,
    /// Whether the local tip reached the peer's announced height.
    pub caught_up: bool,
}
