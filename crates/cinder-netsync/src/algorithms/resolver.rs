//! # Fork-Point Resolver
//!
//! Responder-side: given a peer's locator, find the highest block both
//! chains agree on and return the headers after it.

use crate::domain::SyncError;
use cinder_ledger::SharedLedger;
use cinder_types::{BlockHeader, Hash};
use tracing::debug;

/// Resolve a locator against the local chain.
///
/// Probes are scanned in the order received (nearest-tip first, as the
/// builder produces them); the first hash present locally is the fork
/// point. Returns up to `max_headers` consecutive headers strictly after
/// it, ascending. An empty result means the fork point is already the
/// local tip; the requester is not behind us.
///
/// # Errors
///
/// [`SyncError::UnknownFork`] when none of the probes are recognized, not
/// even genesis. That is a protocol violation: two nodes on the same
/// network always share genesis.
pub fn resolve_locator(
    ledger: &SharedLedger,
    hashes: &[Hash],
    max_headers: usize,
) -> Result<Vec<BlockHeader>, SyncError> {
    for hash in hashes {
        if let Some(height) = ledger.height_of(hash) {
            let headers = ledger.headers_after(height, max_headers);
            debug!(
                fork_height = height,
                returned = headers.len(),
                "resolved fork point"
            );
            return Ok(headers);
        }
    }
    Err(SyncError::UnknownFork)
}
