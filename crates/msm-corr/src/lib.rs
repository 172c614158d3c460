#![deny(missing_docs)]

//! Time-correlation and relaxation functions of discrete-time Markov chains.
//!
//! Requests for many lag times are compiled into a [`CheckpointPlan`] and
//! served by advancing a single state vector (or block) through the sorted
//! checkpoints, so the cost is set by the largest lag alone. Results come back
//! in the caller's order and match single-lag evaluation exactly.

pub mod correlations;
pub mod expectations;
/// Content hashing of serializable payloads.
pub mod hash;
/// Serializable scan specifications and reports.
pub mod report;
pub mod schedule;
/// Canonical JSON helpers.
pub mod serde;

pub use crate::serde::{from_json_slice, to_canonical_json_bytes};
pub use correlations::{
    correlation_at, correlation_block_at, correlations_at, correlations_block_at, relaxation_at,
    relaxation_block_at, relaxations_at, relaxations_block_at,
};
pub use expectations::{
    expected_counts, expected_counts_stationary, geometric_series, geometric_series_vec,
};
pub use hash::stable_hash_string;
pub use report::{
    analyze_correlations, analyze_relaxations, ScanKind, ScanProvenance, ScanReport, ScanSpec,
    ValidationOpts, REPORT_SCHEMA,
};
pub use schedule::{Checkpoint, CheckpointPlan};
