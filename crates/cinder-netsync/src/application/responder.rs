//! # Sync Responder
//!
//! Peer-side service answering the three request kinds against the local
//! ledger, with bounded response sizes. Malformed or unexpected requests
//! are rejected as protocol errors; the session that carried them stays
//! alive.

use crate::algorithms::{range_root, resolve_locator};
use crate::config::SyncConfig;
use crate::domain::SyncError;
use crate::wire::{
    CheckHash, FetchBlocksHeaders, LocateHeaders, SyncBlocks, SyncCheckHash, SyncHeaders,
    SyncMessage,
};
use cinder_ledger::SharedLedger;
use cinder_types::{Block, BlockHeader};
use tracing::debug;

/// Answers sync requests for one node.
///
/// Stateless between requests; a single responder can serve any number of
/// concurrent peer sessions, since it only ever reads the shared ledger.
pub struct SyncResponder {
    ledger: SharedLedger,
    config: SyncConfig,
}

impl SyncResponder {
    /// Create a responder over the local ledger.
    pub fn new(ledger: SharedLedger, config: SyncConfig) -> Self {
        Self { ledger, config }
    }

    /// Handle one inbound request and produce the reply.
    pub fn handle(&self, request: SyncMessage) -> Result<SyncMessage, SyncError> {
        match request {
            SyncMessage::LocateHeaders(msg) => {
                self.handle_locate(msg).map(SyncMessage::SyncHeaders)
            }
            SyncMessage::CheckHash(msg) => self.handle_check(msg).map(SyncMessage::SyncCheckHash),
            SyncMessage::FetchBlocksHeaders(msg) => {
                self.handle_fetch(msg).map(SyncMessage::SyncBlocks)
            }
            other => Err(SyncError::Protocol(format!(
                "unexpected request kind {:?}",
                other.kind()
            ))),
        }
    }

    fn handle_locate(&self, msg: LocateHeaders) -> Result<SyncHeaders, SyncError> {
        let headers = resolve_locator(&self.ledger, &msg.hashes, self.config.max_headers_per_round)?;
        let hashes = headers.iter().map(BlockHeader::hash).collect();
        Ok(SyncHeaders { hashes, headers })
    }

    fn handle_check(&self, msg: CheckHash) -> Result<SyncCheckHash, SyncError> {
        if msg.length == 0 {
            return Err(SyncError::Protocol("zero-length checkpoint range".into()));
        }
        if msg.length as usize > self.config.max_headers_per_round {
            return Err(SyncError::Protocol(format!(
                "checkpoint range of {} exceeds limit {}",
                msg.length, self.config.max_headers_per_round
            )));
        }
        let root_hash = range_root(&self.ledger, &msg.begin_hash, msg.length)
            .ok_or_else(|| SyncError::Protocol("checkpoint range not in local chain".into()))?;
        Ok(SyncCheckHash { root_hash })
    }

    fn handle_fetch(&self, msg: FetchBlocksHeaders) -> Result<SyncBlocks, SyncError> {
        if msg.hashes.len() > self.config.max_blocks_per_batch {
            return Err(SyncError::Protocol(format!(
                "fetch of {} blocks exceeds batch limit {}",
                msg.hashes.len(),
                self.config.max_blocks_per_batch
            )));
        }

        // Serve the longest known prefix, preserving request order. A
        // shorter response leaves the tail owed to the requester.
        let mut blocks: Vec<Block> = Vec::with_capacity(msg.hashes.len());
        for hash in &msg.hashes {
            match self.ledger.block_by_hash(hash) {
                Some(block) => blocks.push(block),
                None => {
                    debug!(served = blocks.len(), "fetch stopped at unknown hash");
                    break;
                }
            }
        }
        Ok(SyncBlocks { blocks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_types::{build_genesis, Transaction, MAINNET_MAGIC};

    fn build_ledger(height: u32) -> SharedLedger {
        let genesis = build_genesis(MAINNET_MAGIC);
        let ledger = SharedLedger::new(genesis.clone());
        let mut parent = genesis;
        for _ in 0..height {
            let mut block = Block {
                header: BlockHeader {
                    version: 1,
                    prev_block_hash: parent.hash(),
                    txs_root: [0u8; 32],
                    timestamp: parent.header.timestamp + 600,
                    magic: parent.header.magic,
                },
                txs: vec![Transaction::default()],
                height: parent.height + 1,
            };
            block.header.txs_root = block.compute_txs_root();
            ledger.append_blocks(vec![block.clone()]).unwrap();
            parent = block;
        }
        ledger
    }

    fn responder(height: u32) -> (SyncResponder, SharedLedger) {
        let ledger = build_ledger(height);
        (
            SyncResponder::new(ledger.clone(), SyncConfig::for_testing()),
            ledger,
        )
    }

    #[test]
    fn test_locate_returns_headers_after_fork() {
        let (responder, ledger) = responder(6);
        let fork = ledger.hash_at_height(4).unwrap();
        let reply = responder
            .handle(SyncMessage::LocateHeaders(LocateHeaders {
                hashes: vec![fork],
            }))
            .unwrap();

        match reply {
            SyncMessage::SyncHeaders(msg) => {
                assert_eq!(msg.headers.len(), 2);
                assert_eq!(msg.hashes.len(), 2);
                assert_eq!(msg.headers[0].hash(), msg.hashes[0]);
            }
            other => panic!("unexpected reply kind {:?}", other.kind()),
        }
    }

    #[test]
    fn test_locate_unknown_fork() {
        let (responder, _) = responder(3);
        let result = responder.handle(SyncMessage::LocateHeaders(LocateHeaders {
            hashes: vec![[0xEE; 32]],
        }));
        assert!(matches!(result, Err(SyncError::UnknownFork)));
    }

    #[test]
    fn test_check_hash_over_known_range() {
        let (responder, ledger) = responder(5);
        let begin = ledger.hash_at_height(1).unwrap();
        let reply = responder
            .handle(SyncMessage::CheckHash(CheckHash {
                begin_hash: begin,
                length: 3,
            }))
            .unwrap();
        assert!(matches!(reply, SyncMessage::SyncCheckHash(_)));
    }

    #[test]
    fn test_check_hash_rejects_bad_ranges() {
        let (responder, ledger) = responder(5);
        let begin = ledger.hash_at_height(1).unwrap();

        let zero = responder.handle(SyncMessage::CheckHash(CheckHash {
            begin_hash: begin,
            length: 0,
        }));
        assert!(matches!(zero, Err(SyncError::Protocol(_))));

        let past_tip = responder.handle(SyncMessage::CheckHash(CheckHash {
            begin_hash: begin,
            length: 10,
        }));
        assert!(matches!(past_tip, Err(SyncError::Protocol(_))));
    }

    #[test]
    fn test_fetch_serves_known_prefix() {
        let (responder, ledger) = responder(4);
        let mut hashes = vec![
            ledger.hash_at_height(1).unwrap(),
            ledger.hash_at_height(2).unwrap(),
        ];
        hashes.push([0xEE; 32]);
        hashes.push(ledger.hash_at_height(3).unwrap());

        let reply = responder
            .handle(SyncMessage::FetchBlocksHeaders(FetchBlocksHeaders {
                hashes,
            }))
            .unwrap();
        match reply {
            SyncMessage::SyncBlocks(msg) => {
                assert_eq!(msg.blocks.len(), 2);
                assert_eq!(msg.blocks[0].height, 1);
                assert_eq!(msg.blocks[1].height, 2);
            }
            other => panic!("unexpected reply kind {:?}", other.kind()),
        }
    }

    #[test]
    fn test_fetch_rejects_oversize_batch() {
        let (responder, ledger) = responder(2);
        let config = SyncConfig::for_testing();
        let hashes = vec![ledger.genesis_hash(); config.max_blocks_per_batch + 1];
        let result = responder.handle(SyncMessage::FetchBlocksHeaders(FetchBlocksHeaders {
            hashes,
        }));
        assert!(matches!(result, Err(SyncError::Protocol(_))));
    }

    #[test]
    fn test_response_kind_rejected_as_request() {
        let (responder, _) = responder(1);
        let result = responder.handle(SyncMessage::SyncCheckHash(SyncCheckHash {
            root_hash: [0u8; 32],
        }));
        assert!(matches!(result, Err(SyncError::Protocol(_))));
    }
}
