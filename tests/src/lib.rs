//! # Cinder Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ```text
//! tests/src/
//! ├── chains.rs         # Deterministic chain fixtures
//! └── integration/      # Cross-crate sync scenarios
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cinder-tests
//!
//! # By category
//! cargo test -p cinder-tests integration::
//! ```

#![allow(dead_code)]

pub mod chains;
pub mod integration;
