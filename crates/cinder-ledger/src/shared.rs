//! # Shared Ledger Handle
//!
//! Cloneable handle around [`Chain`] for concurrent peer sessions. Any
//! number of readers may inspect tip state while another session is mid
//! round; only [`SharedLedger::append_blocks`] takes the write lock, so
//! commits are serialized and never observed half-applied. Callers must not
//! hold results across a network suspension point expecting them to stay
//! fresh; reads are snapshots.

use crate::chain::Chain;
use crate::error::LedgerError;
use cinder_types::{Block, BlockHeader, Hash};
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe, cloneable handle to the local chain.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Chain>>,
}

impl SharedLedger {
    /// Create a ledger holding only the genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Chain::new(genesis))),
        }
    }

    /// Current tip height.
    pub fn tip_height(&self) -> u32 {
        self.inner.read().tip_height()
    }

    /// Current tip hash.
    pub fn tip_hash(&self) -> Hash {
        self.inner.read().tip_hash()
    }

    /// Hash of the genesis block.
    pub fn genesis_hash(&self) -> Hash {
        self.inner.read().genesis_hash()
    }

    /// Block at a height, cloned out of the chain.
    pub fn block_at_height(&self, height: u32) -> Option<Block> {
        self.inner.read().block_at_height(height).cloned()
    }

    /// Header at a height, cloned out of the chain.
    pub fn header_at_height(&self, height: u32) -> Option<BlockHeader> {
        self.inner.read().header_at_height(height).cloned()
    }

    /// Hash at a height.
    pub fn hash_at_height(&self, height: u32) -> Option<Hash> {
        self.inner.read().hash_at_height(height)
    }

    /// Height of a block identified by hash.
    pub fn height_of(&self, hash: &Hash) -> Option<u32> {
        self.inner.read().height_of(hash)
    }

    /// Whether the chain contains a block with this hash.
    pub fn has_hash(&self, hash: &Hash) -> bool {
        self.inner.read().has_hash(hash)
    }

    /// Block identified by hash, cloned out of the chain.
    pub fn block_by_hash(&self, hash: &Hash) -> Option<Block> {
        self.inner.read().block_by_hash(hash).cloned()
    }

    /// Up to `max` consecutive headers strictly after the given height.
    pub fn headers_after(&self, height: u32, max: usize) -> Vec<BlockHeader> {
        self.inner.read().headers_after(height, max)
    }

    /// The single commit entry point. Takes the write lock for the whole
    /// batch; concurrent commits serialize here.
    pub fn append_blocks(&self, blocks: Vec<Block>) -> Result<u32, LedgerError> {
        self.inner.write().append_blocks(blocks)
    }
}
