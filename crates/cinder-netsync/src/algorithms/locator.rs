//! # Locator Builder
//!
//! A locator probes the responder for the fork point without shipping the
//! whole chain: dense probes near the tip where recent forks live, then
//! geometrically growing gaps so even an ancient fork resolves in
//! O(log height) probes.

use crate::domain::{Locator, LocatorEntry};
use cinder_ledger::SharedLedger;
use tracing::debug;

/// Back-off distances from the tip: 0, 1, then `2^m + (m - 1)` for
/// m = 1, 2, 3, and so on: 0, 1, 2, 5, 10, 19, 36, 69, ...
///
/// Doubling region with a small linear correction term. Peers need not use
/// the exact same spacing, but both sides must keep the sequence dense near
/// the tip and always terminate at genesis.
pub fn backoff_distances() -> impl Iterator<Item = u64> {
    (0u32..).map(|i| match i {
        0 => 0,
        1 => 1,
        _ => {
            let m = u64::from(i - 1);
            (1u64 << m) + m - 1
        }
    })
}

/// Build a locator from the current chain state.
///
/// Entries are ordered nearest-tip first; the genesis hash is always the
/// final entry. For a chain of height 0 the locator is exactly the genesis
/// hash.
pub fn build_locator(ledger: &SharedLedger) -> Locator {
    let tip_height = ledger.tip_height();
    let mut entries = Vec::new();

    for distance in backoff_distances() {
        if distance >= u64::from(tip_height) {
            break;
        }
        let height = tip_height - distance as u32;
        if let Some(hash) = ledger.hash_at_height(height) {
            entries.push(LocatorEntry { hash, height });
        }
    }

    // Genesis is the always-present terminal entry.
    if let Some(hash) = ledger.hash_at_height(0) {
        entries.push(LocatorEntry { hash, height: 0 });
    }

    debug!(
        tip_height,
        probes = entries.len(),
        "built locator"
    );
    Locator { entries }
}
