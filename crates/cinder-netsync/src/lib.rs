//! # Cinder Netsync
//!
//! Peer-to-peer chain synchronization: discover how far the local chain has
//! diverged from a peer's, locate the common ancestor with a sparse
//! exponentially-spaced locator, batch-validate long header ranges with a
//! checkpoint Merkle root, and fetch the missing blocks in verifiable,
//! order-matched batches.
//!
//! ## Module Structure
//!
//! ```text
//! cinder-netsync/
//! ├── domain/          # Locator, checkpoint range, sync stages, errors
//! ├── algorithms/      # Locator spacing, fork-point resolution, range roots, linkage replay
//! ├── wire/            # The six sync messages and their field-tagged codec
//! ├── application/     # Requester-side SyncSession, responder-side SyncResponder
//! ├── ports/           # Peer transport + scorer traits, mock peer
//! └── config.rs        # SyncConfig
//! ```
//!
//! ## Round Shape
//!
//! One [`SyncSession`] runs per peer connection, independently of other
//! sessions. A round walks `Idle → Locating → AwaitingHeaders → Verifying →
//! FetchingBlocks → Committing → Idle`; validation failures abort the round
//! and penalize the peer, availability failures retry a bounded number of
//! times and then return the session to idle. The shared chain is touched
//! only through the ledger's serialized append entry point, so a cancelled
//! or failed round leaves no partial state behind.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod wire;

// Re-exports
pub use algorithms::{
    build_locator, compute_range_root, range_root, resolve_locator, validate_header_linkage,
    verify_range,
};
pub use application::{SyncResponder, SyncSession};
pub use config::SyncConfig;
pub use domain::{
    CheckpointRange, Locator, LocatorEntry, PenaltyReason, SyncError, SyncReport, SyncStage,
};
pub use ports::{MockPeer, NoopScorer, PeerScorer, PeerTransport, RecordingScorer, Tamper};
pub use wire::{
    decode_message, encode_message, CheckHash, FetchBlocksHeaders, LocateHeaders, MessageKind,
    SyncBlocks, SyncCheckHash, SyncHeaders, SyncMessage,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
