//! # Outbound Ports
//!
//! Traits for the peer transport and the peer scorer, with mock
//! implementations for testing.

use crate::application::SyncResponder;
use crate::config::SyncConfig;
use crate::domain::{PenaltyReason, SyncError};
use crate::wire::{decode_message, encode_message, SyncMessage};
use async_trait::async_trait;
use cinder_ledger::SharedLedger;
use cinder_types::{PeerId, Transaction};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::debug;

/// One peer connection - outbound port.
///
/// `send` and `recv` are the suspension points of a sync round; dropping
/// the round future at either cancels the round with no side effects on
/// the shared chain. A connection-level abort surfaces as
/// [`SyncError::ConnectionClosed`].
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Send a message to the remote peer.
    async fn send(&self, message: SyncMessage) -> Result<(), SyncError>;

    /// Receive the next message from the remote peer.
    async fn recv(&self) -> Result<SyncMessage, SyncError>;

    /// Identity of the remote peer, for scoring and logs.
    fn peer_id(&self) -> PeerId;
}

/// Peer scorer - outbound port. Receives a penalty whenever a round aborts
/// on a validation failure.
pub trait PeerScorer: Send + Sync {
    /// Record a penalty against a peer.
    fn penalize(&self, peer: PeerId, reason: PenaltyReason);
}

/// Scorer that discards penalties, for contexts without a scoring
/// collaborator.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopScorer;

impl PeerScorer for NoopScorer {
    fn penalize(&self, _peer: PeerId, _reason: PenaltyReason) {}
}

/// Scorer that records every penalty it receives.
#[derive(Debug, Default)]
pub struct RecordingScorer {
    penalties: Mutex<Vec<(PeerId, PenaltyReason)>>,
}

impl RecordingScorer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded penalties.
    pub fn penalties(&self) -> Vec<(PeerId, PenaltyReason)> {
        self.penalties.lock().clone()
    }
}

impl PeerScorer for RecordingScorer {
    fn penalize(&self, peer: PeerId, reason: PenaltyReason) {
        self.penalties.lock().push((peer, reason));
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Ways a [`MockPeer`] can corrupt its responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tamper {
    /// Break the prev-hash link inside a header batch.
    BreakLinkage,
    /// Flip a byte of the checkpoint root.
    CorruptCheckpointRoot,
    /// Return fetched blocks out of order.
    ReverseBlocks,
    /// Return only the first `n` blocks of each fetch response.
    TruncateBlocks(usize),
    /// Add an uncommitted transaction to the first fetched block.
    CorruptBlockTxs,
}

/// In-process peer: a scripted remote chain behind the real responder and
/// the real codec, with switches for dropping and corrupting responses.
pub struct MockPeer {
    id: PeerId,
    responder: SyncResponder,
    config: SyncConfig,
    queue: Mutex<VecDeque<SyncMessage>>,
    drop_next: AtomicU32,
    tamper: Mutex<Option<Tamper>>,
}

impl MockPeer {
    /// Create a peer serving the given remote chain.
    pub fn new(id: PeerId, remote: SharedLedger, config: SyncConfig) -> Self {
        Self {
            id,
            responder: SyncResponder::new(remote, config.clone()),
            config,
            queue: Mutex::new(VecDeque::new()),
            drop_next: AtomicU32::new(0),
            tamper: Mutex::new(None),
        }
    }

    /// Swallow the next `count` responses, so the requester times out.
    pub fn drop_responses(&self, count: u32) {
        self.drop_next.store(count, Ordering::SeqCst);
    }

    /// Corrupt every matching response from now on.
    pub fn set_tamper(&self, tamper: Option<Tamper>) {
        *self.tamper.lock() = tamper;
    }

    fn apply_tamper(&self, response: &mut SyncMessage) {
        let Some(tamper) = *self.tamper.lock() else {
            return;
        };
        match (tamper, response) {
            (Tamper::BreakLinkage, SyncMessage::SyncHeaders(msg)) => {
                let position = if msg.headers.len() >= 3 { 2 } else { 0 };
                if let Some(header) = msg.headers.get_mut(position) {
                    header.prev_block_hash = [0xAB; 32];
                }
            }
            (Tamper::CorruptCheckpointRoot, SyncMessage::SyncCheckHash(msg)) => {
                msg.root_hash[0] ^= 0xFF;
            }
            (Tamper::ReverseBlocks, SyncMessage::SyncBlocks(msg)) => {
                msg.blocks.reverse();
            }
            (Tamper::TruncateBlocks(keep), SyncMessage::SyncBlocks(msg)) => {
                msg.blocks.truncate(keep);
            }
            (Tamper::CorruptBlockTxs, SyncMessage::SyncBlocks(msg)) => {
                if let Some(block) = msg.blocks.first_mut() {
                    block.txs.push(Transaction::default());
                }
            }
            _ => {}
        }
    }
}

#[async_trait]
impl PeerTransport for MockPeer {
    async fn send(&self, message: SyncMessage) -> Result<(), SyncError> {
        // Every exchange round-trips through the real codec.
        let frame = encode_message(&message);
        let request = decode_message(&frame, self.config.max_message_bytes)?;

        match self.responder.handle(request) {
            Ok(mut response) => {
                if self.drop_next.load(Ordering::SeqCst) > 0 {
                    self.drop_next.fetch_sub(1, Ordering::SeqCst);
                    debug!("mock peer dropping response");
                    return Ok(());
                }
                self.apply_tamper(&mut response);
                let frame = encode_message(&response);
                let response = decode_message(&frame, self.config.max_message_bytes)?;
                self.queue.lock().push_back(response);
                Ok(())
            }
            Err(err) => {
                // A real responder stays silent on a bad request; the
                // requester sees a timeout.
                debug!(error = %err, "mock peer rejecting request");
                Ok(())
            }
        }
    }

    async fn recv(&self) -> Result<SyncMessage, SyncError> {
        loop {
            if let Some(message) = self.queue.lock().pop_front() {
                return Ok(message);
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    fn peer_id(&self) -> PeerId {
        self.id
    }
}
