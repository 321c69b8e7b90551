//! # Application Services
//!
//! [`SyncSession`] drives a round as the requester; [`SyncResponder`]
//! answers the requests of remote peers.

pub mod responder;
pub mod session;

pub use responder::SyncResponder;
pub use session::SyncSession;
