//! # Sync Algorithms
//!
//! The pure logic under the state machine: locator spacing, fork-point
//! resolution, checkpoint range roots, and linkage replay.

pub mod checkpoint;
pub mod linkage;
pub mod locator;
pub mod resolver;

pub use checkpoint::{compute_range_root, range_root, verify_range};
pub use linkage::validate_header_linkage;
pub use locator::{backoff_distances, build_locator};
pub use resolver::resolve_locator;
