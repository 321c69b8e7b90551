//! # Sync Errors
//!
//! Four classes, with different handling:
//!
//! - *Protocol*: malformed or unexpected message: reject it, fail the
//!   round, keep the session alive.
//! - *Validation*: the peer supplied data that fails a cryptographic or
//!   structural check: abort the round, penalize the peer, never partially
//!   commit.
//! - *Availability*: timeout or connection loss: retry with bounded
//!   attempts, then surface as a transient failure. Not evidence of bad
//!   data.
//! - *Fatal/local*: the ledger rejected a commit: surfaced to the
//!   operator, not retried here.

use cinder_ledger::LedgerError;
use cinder_types::WireError;
use thiserror::Error;

/// Errors produced by synchronization rounds.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The peer sent a message that does not fit the protocol at this
    /// point (wrong kind, over-limit counts, unknown checkpoint range).
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// A message failed to decode.
    #[error("wire decode failed: {0}")]
    Wire(#[from] WireError),

    /// The responder recognized none of the locator hashes, not even
    /// genesis.
    #[error("no locator hash recognized")]
    UnknownFork,

    /// A received header does not reference the hash of the header before
    /// it (position 0 means the batch does not attach to the local chain).
    #[error("broken header linkage at position {position}")]
    BrokenLinkage {
        /// Index of the offending header in the received batch.
        position: usize,
    },

    /// The checkpoint root recomputed over the received headers does not
    /// match the root the peer claimed.
    #[error("checkpoint root mismatch over {length} headers")]
    CheckpointMismatch {
        /// Length of the checked range.
        length: u32,
    },

    /// A fetched block's hash does not match the hash requested at that
    /// position.
    #[error("block hash mismatch at position {position}")]
    BlockMismatch {
        /// Index of the misaligned block within the requested order.
        position: usize,
    },

    /// A fetched block's transaction root does not match its transactions.
    #[error("transaction root mismatch in block at height {height}")]
    TxsRootMismatch {
        /// Height the block claimed.
        height: u32,
    },

    /// A request went unanswered after the configured retries.
    #[error("request timed out after {attempts} attempts")]
    Timeout {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// The connection was dropped by the peer or cancelled locally.
    #[error("connection closed")]
    ConnectionClosed,

    /// Transport-level failure other than a clean close.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The local ledger refused the commit.
    #[error("ledger commit failed: {0}")]
    Ledger(#[from] LedgerError),
}

impl SyncError {
    /// True for failures meaning the peer supplied bad data.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SyncError::UnknownFork
                | SyncError::BrokenLinkage { .. }
                | SyncError::CheckpointMismatch { .. }
                | SyncError::BlockMismatch { .. }
                | SyncError::TxsRootMismatch { .. }
        )
    }

    /// True for failures meaning the peer was unreachable, not wrong.
    pub fn is_availability(&self) -> bool {
        matches!(
            self,
            SyncError::Timeout { .. } | SyncError::ConnectionClosed | SyncError::Transport(_)
        )
    }

    /// Penalty to report to the peer scorer, if this error warrants one.
    pub fn penalty(&self) -> Option<PenaltyReason> {
        match self {
            SyncError::UnknownFork => Some(PenaltyReason::UnknownFork),
            SyncError::BrokenLinkage { .. } => Some(PenaltyReason::BadLinkage),
            SyncError::CheckpointMismatch { .. } => Some(PenaltyReason::BadCheckpointRoot),
            SyncError::BlockMismatch { .. } => Some(PenaltyReason::BadBlockHash),
            SyncError::TxsRootMismatch { .. } => Some(PenaltyReason::BadTxsRoot),
            _ => None,
        }
    }
}

/// Reasons reported to the peer scorer on validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenaltyReason {
    /// Locator negotiation failed entirely.
    UnknownFork,
    /// Header batch with broken prev-hash linkage.
    BadLinkage,
    /// Checkpoint root did not match the header range.
    BadCheckpointRoot,
    /// Block content did not match its requested hash.
    BadBlockHash,
    /// Block transactions did not match the committed root.
    BadTxsRoot,
}
