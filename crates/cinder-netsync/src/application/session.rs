//! # Sync Session
//!
//! The requester-side state machine. One session runs per peer connection;
//! sessions for different peers execute concurrently and independently,
//! each owning its locator and checkpoint state. The shared chain is
//! touched only in `Committing`, through the ledger's serialized append,
//! and never while a network request is in flight.

use crate::algorithms::{build_locator, validate_header_linkage, verify_range};
use crate::config::SyncConfig;
use crate::domain::{CheckpointRange, SyncError, SyncReport, SyncStage};
use crate::ports::{PeerScorer, PeerTransport};
use crate::wire::{CheckHash, FetchBlocksHeaders, LocateHeaders, SyncMessage};
use cinder_ledger::SharedLedger;
use cinder_types::{short_hex, Block, BlockHeader, Hash};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Synchronization state machine for one peer connection.
pub struct SyncSession<T: PeerTransport, S: PeerScorer> {
    config: SyncConfig,
    ledger: SharedLedger,
    transport: Arc<T>,
    scorer: Arc<S>,
    stage: SyncStage,
}

impl<T: PeerTransport, S: PeerScorer> SyncSession<T, S> {
    /// Create an idle session.
    pub fn new(
        config: SyncConfig,
        ledger: SharedLedger,
        transport: Arc<T>,
        scorer: Arc<S>,
    ) -> Self {
        Self {
            config,
            ledger,
            transport,
            scorer,
            stage: SyncStage::Idle,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> SyncStage {
        self.stage
    }

    /// Run rounds against the peer until the local tip reaches the
    /// announced height, a round makes no progress, or the round bound is
    /// hit.
    ///
    /// Validation failures abort and propagate after penalizing the peer;
    /// availability failures propagate after bounded retries. Either way
    /// nothing is partially committed.
    pub async fn run(&mut self, announced_height: u32) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            rounds: 0,
            blocks_committed: 0,
            tip_height: self.ledger.tip_height(),
            caught_up: false,
        };

        loop {
            report.rounds += 1;
            let committed = self.run_round().await?;
            report.blocks_committed += committed as u64;
            report.tip_height = self.ledger.tip_height();

            if committed == 0 || report.tip_height >= announced_height {
                break;
            }
            if report.rounds >= self.config.max_rounds {
                warn!(
                    rounds = report.rounds,
                    "round bound hit before catching up"
                );
                break;
            }
        }

        report.caught_up = report.tip_height >= announced_height;
        info!(
            rounds = report.rounds,
            blocks = report.blocks_committed,
            tip = report.tip_height,
            caught_up = report.caught_up,
            "sync finished"
        );
        Ok(report)
    }

    /// Execute a single round. Returns the number of blocks committed
    /// (zero when the peer is not ahead).
    pub async fn run_round(&mut self) -> Result<usize, SyncError> {
        match self.round_inner().await {
            Ok(committed) => {
                self.stage = SyncStage::Idle;
                Ok(committed)
            }
            Err(err) => {
                if let Some(reason) = err.penalty() {
                    // Bad data: abort, discard the peer's contribution,
                    // and report it for scoring.
                    self.stage = SyncStage::Aborted;
                    self.scorer.penalize(self.transport.peer_id(), reason);
                    warn!(error = %err, ?reason, "round aborted on validation failure");
                } else {
                    // Unavailability or protocol noise is not evidence of
                    // bad data.
                    self.stage = SyncStage::Idle;
                    debug!(error = %err, "round failed without penalty");
                }
                Err(err)
            }
        }
    }

    async fn round_inner(&mut self) -> Result<usize, SyncError> {
        self.stage = SyncStage::Locating;
        let locator = build_locator(&self.ledger);

        self.stage = SyncStage::AwaitingHeaders;
        let reply = self
            .request(SyncMessage::LocateHeaders(LocateHeaders {
                hashes: locator.hashes(),
            }))
            .await?;
        let SyncMessage::SyncHeaders(sync_headers) = reply else {
            return Err(SyncError::Protocol(format!(
                "expected SyncHeaders, got {:?}",
                reply.kind()
            )));
        };
        let headers = sync_headers.headers;

        self.stage = SyncStage::Verifying;
        if headers.is_empty() {
            debug!("peer is not ahead of us");
            return Ok(0);
        }
        if headers.len() > self.config.max_headers_per_round {
            return Err(SyncError::Protocol(format!(
                "peer sent {} headers, limit is {}",
                headers.len(),
                self.config.max_headers_per_round
            )));
        }

        validate_header_linkage(&self.ledger, &headers)?;
        if self.config.verify_checkpoints {
            self.verify_checkpoint(&headers).await?;
        }

        self.stage = SyncStage::FetchingBlocks;
        let hashes: Vec<Hash> = headers.iter().map(BlockHeader::hash).collect();
        let blocks = self.fetch_blocks(&hashes).await?;
        for block in &blocks {
            if !block.txs_root_valid() {
                return Err(SyncError::TxsRootMismatch {
                    height: block.height,
                });
            }
        }

        self.stage = SyncStage::Committing;
        let committed = blocks.len();
        match self.ledger.append_blocks(blocks) {
            Ok(tip) => {
                info!(
                    committed,
                    tip,
                    peer = %short_hex(&self.transport.peer_id().0),
                    "round committed"
                );
                Ok(committed)
            }
            Err(err) => {
                // A concurrent session may have committed the same range
                // while this one was fetching; that is not a failure.
                if hashes.iter().all(|hash| self.ledger.has_hash(hash)) {
                    debug!("batch already committed by a concurrent session");
                    Ok(0)
                } else {
                    Err(err.into())
                }
            }
        }
    }

    /// Ask the peer for the checkpoint root over the received batch and
    /// verify it locally. The range lives only for this round.
    async fn verify_checkpoint(&mut self, headers: &[BlockHeader]) -> Result<(), SyncError> {
        let begin_hash = headers[0].hash();
        let length = headers.len() as u32;

        let reply = self
            .request(SyncMessage::CheckHash(CheckHash { begin_hash, length }))
            .await?;
        let SyncMessage::SyncCheckHash(check) = reply else {
            return Err(SyncError::Protocol(format!(
                "expected SyncCheckHash, got {:?}",
                reply.kind()
            )));
        };

        let range = CheckpointRange {
            begin_hash,
            length,
            root_hash: check.root_hash,
        };
        if !verify_range(&range.begin_hash, range.length, &range.root_hash, headers) {
            return Err(SyncError::CheckpointMismatch { length });
        }
        debug!(length, "checkpoint root verified");
        Ok(())
    }

    /// Fetch full blocks for the given hashes, in order, chunked to the
    /// batch limit. Responses must match the request 1:1 and in order; a
    /// shorter response leaves the tail owed and re-requested.
    async fn fetch_blocks(&mut self, hashes: &[Hash]) -> Result<Vec<Block>, SyncError> {
        let mut fetched: Vec<Block> = Vec::with_capacity(hashes.len());

        for chunk in hashes.chunks(self.config.max_blocks_per_batch) {
            let mut owed: &[Hash] = chunk;
            let mut attempts = 0u32;

            while !owed.is_empty() {
                let reply = self
                    .request(SyncMessage::FetchBlocksHeaders(FetchBlocksHeaders {
                        hashes: owed.to_vec(),
                    }))
                    .await?;
                let SyncMessage::SyncBlocks(batch) = reply else {
                    return Err(SyncError::Protocol(format!(
                        "expected SyncBlocks, got {:?}",
                        reply.kind()
                    )));
                };

                if batch.blocks.len() > owed.len() {
                    return Err(SyncError::Protocol(format!(
                        "peer sent {} blocks for {} requested",
                        batch.blocks.len(),
                        owed.len()
                    )));
                }

                // Responses must match the request 1:1 and in order; a
                // mismatch at any position discards the whole batch.
                for (index, block) in batch.blocks.iter().enumerate() {
                    if block.hash() != owed[index] {
                        return Err(SyncError::BlockMismatch {
                            position: fetched.len() + index,
                        });
                    }
                }

                let received = batch.blocks.len();
                fetched.extend(batch.blocks);
                owed = &owed[received..];

                if !owed.is_empty() {
                    attempts += 1;
                    if attempts > self.config.max_request_retries {
                        return Err(SyncError::Timeout { attempts });
                    }
                    debug!(
                        received,
                        owed = owed.len(),
                        "partial block response, re-requesting tail"
                    );
                }
            }
        }

        Ok(fetched)
    }

    /// Send a request and await its reply, retrying timeouts up to the
    /// configured bound. The chain write lock is never held here.
    async fn request(&self, message: SyncMessage) -> Result<SyncMessage, SyncError> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            self.transport.send(message.clone()).await?;

            match tokio::time::timeout(self.config.request_timeout(), self.transport.recv()).await
            {
                Ok(Ok(reply)) => return Ok(reply),
                Ok(Err(err)) => return Err(err),
                Err(_elapsed) => {
                    if attempts > self.config.max_request_retries {
                        return Err(SyncError::Timeout { attempts });
                    }
                    warn!(attempts, kind = ?message.kind(), "request timed out, retrying");
                }
            }
        }
    }
}
