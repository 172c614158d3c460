#![deny(missing_docs)]

//! Transition operator backends implementing the `msm-core` contract.
//!
//! [`DenseOperator`] wraps an `nalgebra` matrix and delegates products to
//! `gemm`; [`SparseOperator`] stores rows in CSR form. Both are interchangeable
//! behind [`msm_core::TransitionOperator`].

mod dense;
mod generators;
mod hash;
mod serialization;
mod sparse;
mod validation;

pub use dense::DenseOperator;
pub use generators::{
    random_distribution, random_observables, random_stochastic, BirthDeathChain,
};
pub use hash::canonical_operator_hash;
pub use serialization::{
    operator_from_bytes, operator_from_json, operator_to_bytes, operator_to_json, OperatorSpec,
};
pub use sparse::SparseOperator;
pub use validation::{
    ensure_distribution, ensure_transition_matrix, is_transition_matrix, DEFAULT_TOLERANCE,
};
