//! # Ports
//!
//! Traits for the collaborators a sync session talks to, plus the mock
//! peer used across the test suites.

pub mod outbound;

pub use outbound::{MockPeer, NoopScorer, PeerScorer, PeerTransport, RecordingScorer, Tamper};
