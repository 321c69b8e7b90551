//! # Sync Scenarios
//!
//! End-to-end rounds between a local ledger and a mock peer that serves a
//! scripted remote chain through the real responder and the real codec.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cinder_netsync::{
        MockPeer, PenaltyReason, RecordingScorer, SyncConfig, SyncError, SyncSession, SyncStage,
        Tamper,
    };
    use cinder_types::PeerId;

    use crate::chains::{grow, ledger_at_height, ledger_with_seed};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn peer_id() -> PeerId {
        PeerId::new([0xBB; 32])
    }

    fn session(
        local_height: u32,
        remote_height: u32,
    ) -> (
        SyncSession<MockPeer, RecordingScorer>,
        cinder_ledger::SharedLedger,
        Arc<MockPeer>,
        Arc<RecordingScorer>,
    ) {
        let config = SyncConfig::for_testing();
        let local = ledger_at_height(local_height);
        let remote = ledger_at_height(remote_height);
        let peer = Arc::new(MockPeer::new(peer_id(), remote, config.clone()));
        let scorer = Arc::new(RecordingScorer::new());
        let sync = SyncSession::new(config, local.clone(), peer.clone(), scorer.clone());
        (sync, local, peer, scorer)
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    /// Identical chains at height 10: the round finishes idle with zero
    /// blocks fetched.
    #[tokio::test]
    async fn scenario_equal_chains_no_op_round() {
        let (mut sync, local, _peer, scorer) = session(10, 10);

        let committed = sync.run_round().await.unwrap();

        assert_eq!(committed, 0);
        assert_eq!(sync.stage(), SyncStage::Idle);
        assert_eq!(local.tip_height(), 10);
        assert!(scorer.penalties().is_empty());
    }

    /// Local at 5, peer at 8 with a shared ancestor at 5: the resolver
    /// returns headers for heights 6, 7, 8 and the round fetches exactly
    /// those three blocks.
    #[tokio::test]
    async fn scenario_short_gap_catch_up() {
        let (mut sync, local, _peer, scorer) = session(5, 8);

        let report = sync.run(8).await.unwrap();

        assert!(report.caught_up);
        assert_eq!(report.blocks_committed, 3);
        assert_eq!(local.tip_height(), 8);
        assert!(scorer.penalties().is_empty());
    }

    /// Chains sharing only genesis: the locator still ends in genesis, the
    /// fork resolves there, and the whole peer chain arrives over several
    /// bounded rounds and batches.
    #[tokio::test]
    async fn scenario_genesis_only_overlap_full_sync() {
        let config = SyncConfig::for_testing();
        let remote_height = (config.max_headers_per_round as u32) * 2 + 5;

        let (mut sync, local, _peer, _scorer) = session(0, remote_height);
        let report = sync.run(remote_height).await.unwrap();

        assert!(report.caught_up);
        assert_eq!(local.tip_height(), remote_height);
        // More headers than fit one round forces continuation rounds.
        assert!(report.rounds > 2);

        // The synced chain is the peer's chain, block for block.
        let remote = ledger_at_height(remote_height);
        for height in 0..=remote_height {
            assert_eq!(
                local.hash_at_height(height),
                remote.hash_at_height(height),
                "divergence at height {height}"
            );
        }
    }

    /// A peer serving a header batch with broken linkage: the round
    /// aborts, the peer is penalized, and the local chain is untouched.
    #[tokio::test]
    async fn scenario_broken_linkage_aborts() {
        let (mut sync, local, peer, scorer) = session(2, 9);
        let tip_before = local.tip_hash();
        peer.set_tamper(Some(Tamper::BreakLinkage));

        let err = sync.run_round().await.unwrap_err();

        assert!(matches!(err, SyncError::BrokenLinkage { .. }));
        assert_eq!(sync.stage(), SyncStage::Aborted);
        assert_eq!(local.tip_height(), 2);
        assert_eq!(local.tip_hash(), tip_before);
        assert_eq!(
            scorer.penalties(),
            vec![(peer_id(), PenaltyReason::BadLinkage)]
        );
    }

    /// A local side branch loses to a longer remote branch rooted at
    /// genesis: the session reorganizes onto the peer's chain.
    #[tokio::test]
    async fn scenario_reorg_onto_longer_branch() {
        let config = SyncConfig::for_testing();
        let local = ledger_with_seed(3, 7); // side branch, seed 7
        let remote = ledger_at_height(9); // main branch, seed 0
        let discarded = local.tip_hash();

        let peer = Arc::new(MockPeer::new(peer_id(), remote.clone(), config.clone()));
        let scorer = Arc::new(RecordingScorer::new());
        let mut sync = SyncSession::new(config, local.clone(), peer, scorer);

        let report = sync.run(9).await.unwrap();

        assert!(report.caught_up);
        assert_eq!(local.tip_height(), 9);
        assert_eq!(local.tip_hash(), remote.tip_hash());
        assert!(!local.has_hash(&discarded));
    }

    /// Continuation keeps going when the peer grows between rounds, up to
    /// the announced height known at start.
    #[tokio::test]
    async fn scenario_peer_grows_during_sync() {
        let (mut sync, local, _peer, _scorer) = session(0, 20);
        let report = sync.run(20).await.unwrap();
        assert!(report.caught_up);

        // Peer mines more; a later sync request picks up from the new tip.
        let remote = ledger_at_height(20);
        grow(&remote, 4, 0);
        let config = SyncConfig::for_testing();
        let peer = Arc::new(MockPeer::new(peer_id(), remote, config.clone()));
        let scorer = Arc::new(RecordingScorer::new());
        let mut sync = SyncSession::new(config, local.clone(), peer, scorer);

        let report = sync.run(24).await.unwrap();
        assert!(report.caught_up);
        assert_eq!(local.tip_height(), 24);
    }

    /// Checkpoint verification can be disabled; linkage replay still
    /// protects the round.
    #[tokio::test]
    async fn scenario_sync_without_checkpoints() {
        let mut config = SyncConfig::for_testing();
        config.verify_checkpoints = false;

        let local = ledger_at_height(1);
        let remote = ledger_at_height(6);
        let peer = Arc::new(MockPeer::new(peer_id(), remote, config.clone()));
        let scorer = Arc::new(RecordingScorer::new());
        let mut sync = SyncSession::new(config, local.clone(), peer.clone(), scorer.clone());

        let report = sync.run(6).await.unwrap();
        assert!(report.caught_up);
        assert_eq!(local.tip_height(), 6);

        // Same peer now serves a tampered header batch for the next gap.
        let remote = ledger_at_height(12);
        let mut config = SyncConfig::for_testing();
        config.verify_checkpoints = false;
        let peer = Arc::new(MockPeer::new(peer_id(), remote, config.clone()));
        peer.set_tamper(Some(Tamper::BreakLinkage));
        let mut sync = SyncSession::new(config, local.clone(), peer, scorer);

        let err = sync.run_round().await.unwrap_err();
        assert!(matches!(err, SyncError::BrokenLinkage { .. }));
        assert_eq!(local.tip_height(), 6);
    }

    /// An unresponsive peer costs retries, then the round fails as a
    /// transient availability error with no penalty and no chain change.
    #[tokio::test]
    async fn scenario_unresponsive_peer_times_out() {
        let (mut sync, local, peer, scorer) = session(4, 9);
        peer.drop_responses(u32::MAX);

        let err = sync.run_round().await.unwrap_err();

        assert!(matches!(err, SyncError::Timeout { .. }));
        assert_eq!(sync.stage(), SyncStage::Idle);
        assert_eq!(local.tip_height(), 4);
        assert!(scorer.penalties().is_empty());
    }

    /// Two sessions against different peers share one local ledger;
    /// commits serialize on the append path and both finish on the same
    /// tip.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn scenario_concurrent_sessions_share_ledger() {
        let config = SyncConfig::for_testing();
        let local = ledger_at_height(0);
        let remote = ledger_at_height(15);

        let mut handles = Vec::new();
        for id in [[0xB1u8; 32], [0xB2u8; 32]] {
            let peer = Arc::new(MockPeer::new(
                PeerId::new(id),
                remote.clone(),
                config.clone(),
            ));
            let scorer = Arc::new(RecordingScorer::new());
            let mut sync = SyncSession::new(config.clone(), local.clone(), peer, scorer);
            handles.push(tokio::spawn(async move { sync.run(15).await }));
        }

        for handle in handles {
            let report = handle.await.unwrap().unwrap();
            assert_eq!(report.tip_height, 15);
        }
        assert_eq!(local.tip_height(), 15);
        assert_eq!(local.tip_hash(), remote.tip_hash());
    }
}
