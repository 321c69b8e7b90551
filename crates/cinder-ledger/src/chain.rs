//! # Chain
//!
//! Blocks indexed by hash, hashes indexed by height, tip tracking, and the
//! append/reorganization rules.

use crate::error::LedgerError;
use cinder_types::{short_hex, Block, BlockHeader, Hash};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// An ordered sequence of blocks from genesis (height 0) to tip.
///
/// Invariants: no gaps, no hash collisions, monotonically increasing
/// height. Every mutation goes through [`Chain::append_blocks`].
#[derive(Clone, Debug)]
pub struct Chain {
    /// Blocks indexed by hash.
    blocks: HashMap<Hash, Block>,
    /// Hash indexed by height.
    by_height: BTreeMap<u32, Hash>,
    /// Current tip hash.
    tip: Hash,
    /// Current tip height.
    height: u32,
}

impl Chain {
    /// Create a chain holding only the given genesis block.
    pub fn new(genesis: Block) -> Self {
        let hash = genesis.hash();
        let mut blocks = HashMap::new();
        let mut by_height = BTreeMap::new();

        blocks.insert(hash, genesis);
        by_height.insert(0, hash);

        Self {
            blocks,
            by_height,
            tip: hash,
            height: 0,
        }
    }

    /// Current tip height.
    pub fn tip_height(&self) -> u32 {
        self.height
    }

    /// Current tip hash.
    pub fn tip_hash(&self) -> Hash {
        self.tip
    }

    /// Hash of the genesis block.
    pub fn genesis_hash(&self) -> Hash {
        self.by_height[&0]
    }

    /// Block at a height, if present.
    pub fn block_at_height(&self, height: u32) -> Option<&Block> {
        self.by_height
            .get(&height)
            .and_then(|hash| self.blocks.get(hash))
    }

    /// Header at a height, if present.
    pub fn header_at_height(&self, height: u32) -> Option<&BlockHeader> {
        self.block_at_height(height).map(|block| &block.header)
    }

    /// Hash at a height, if present.
    pub fn hash_at_height(&self, height: u32) -> Option<Hash> {
        self.by_height.get(&height).copied()
    }

    /// Height of a block identified by hash, if present.
    pub fn height_of(&self, hash: &Hash) -> Option<u32> {
        self.blocks.get(hash).map(|block| block.height)
    }

    /// Whether the chain contains a block with this hash.
    pub fn has_hash(&self, hash: &Hash) -> bool {
        self.blocks.contains_key(hash)
    }

    /// Block identified by hash, if present.
    pub fn block_by_hash(&self, hash: &Hash) -> Option<&Block> {
        self.blocks.get(hash)
    }

    /// Number of blocks in the chain.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a chain holds at least its genesis.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Up to `max` consecutive headers strictly after the given height,
    /// in ascending order.
    pub fn headers_after(&self, height: u32, max: usize) -> Vec<BlockHeader> {
        let mut headers = Vec::new();
        let mut current = height.saturating_add(1);
        while headers.len() < max {
            match self.header_at_height(current) {
                Some(header) => headers.push(header.clone()),
                None => break,
            }
            current += 1;
        }
        headers
    }

    /// Append a validated batch of blocks, in ascending height order.
    ///
    /// The first block's parent must already be in the chain. A batch
    /// rooted at the tip extends it; a batch rooted below the tip is
    /// accepted only when the result is strictly longer than the current
    /// chain, in which case the blocks above the fork point are discarded
    /// first. Nothing is mutated on rejection.
    ///
    /// Returns the new tip height.
    pub fn append_blocks(&mut self, blocks: Vec<Block>) -> Result<u32, LedgerError> {
        let Some(first) = blocks.first() else {
            return Ok(self.height);
        };

        let parent_hash = first.header.prev_block_hash;
        let parent_height = self
            .height_of(&parent_hash)
            .ok_or(LedgerError::UnknownParent(parent_hash))?;

        // Validate the whole batch before touching any index.
        let mut expected_height = parent_height + 1;
        let mut expected_parent = parent_hash;
        for block in &blocks {
            if block.height != expected_height {
                return Err(LedgerError::HeightGap {
                    expected: expected_height,
                    got: block.height,
                });
            }
            if block.header.prev_block_hash != expected_parent {
                return Err(LedgerError::BrokenBatchLinkage {
                    height: block.height,
                });
            }
            expected_parent = block.hash();
            expected_height += 1;
        }

        let candidate_tip = expected_height - 1;
        if parent_height < self.height {
            if candidate_tip <= self.height {
                return Err(LedgerError::WouldNotExtend {
                    tip: self.height,
                    candidate: candidate_tip,
                });
            }
            self.truncate_above(parent_height);
        }

        for block in blocks {
            let hash = block.hash();
            if self.blocks.contains_key(&hash) {
                return Err(LedgerError::DuplicateHash(hash));
            }
            let height = block.height;
            self.blocks.insert(hash, block);
            self.by_height.insert(height, hash);
            self.tip = hash;
            self.height = height;
        }

        info!(
            height = self.height,
            tip = %short_hex(&self.tip),
            "chain advanced"
        );
        Ok(self.height)
    }

    /// Drop every block strictly above the given height.
    fn truncate_above(&mut self, height: u32) {
        let removed: Vec<u32> = self
            .by_height
            .range(height + 1..)
            .map(|(h, _)| *h)
            .collect();
        warn!(
            fork_height = height,
            discarded = removed.len(),
            "reorganizing: discarding blocks above fork point"
        );
        for h in removed {
            if let Some(hash) = self.by_height.remove(&h) {
                self.blocks.remove(&hash);
            }
        }
        self.height = height;
        self.tip = self.by_height[&height];
    }
}
