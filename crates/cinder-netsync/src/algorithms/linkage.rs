//! # Linkage Replay
//!
//! Header batches from a peer are never trusted on checkpoint roots alone:
//! the prev-hash chain is replayed element by element. The root check
//! detects tampering and substitution; the linkage check detects a
//! non-contiguous or reordered set.

use crate::domain::SyncError;
use cinder_ledger::SharedLedger;
use cinder_types::BlockHeader;

/// Replay the prev-hash chain over a received header batch.
///
/// The first header must attach to a block the local chain already holds
/// (the agreed fork point); each following header must reference the hash
/// of the header before it. An empty batch is trivially valid.
pub fn validate_header_linkage(
    ledger: &SharedLedger,
    headers: &[BlockHeader],
) -> Result<(), SyncError> {
    let Some(first) = headers.first() else {
        return Ok(());
    };

    if !ledger.has_hash(&first.prev_block_hash) {
        return Err(SyncError::BrokenLinkage { position: 0 });
    }

    for (index, window) in headers.windows(2).enumerate() {
        if window[1].prev_block_hash != window[0].hash() {
            return Err(SyncError::BrokenLinkage {
                position: index + 1,
            });
        }
    }

    Ok(())
}
