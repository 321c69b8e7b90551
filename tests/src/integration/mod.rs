//! # Integration Scenarios

pub mod sync_scenarios;
