#![deny(missing_docs)]
#![doc = "Core traits and data types shared by the MSM correlation crates: the \
error taxonomy, the transition operator capability and deterministic seeding."]

use std::fmt::Debug;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, MsmError};
pub use provenance::SchemaVersion;
pub use rng::{derive_substream_seed, RngHandle};

/// Non-zero operator entry represented in coordinate form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OperatorEntry {
    /// Row index of the entry.
    pub row: usize,
    /// Column index of the entry.
    pub col: usize,
    /// Transition probability stored at `(row, col)`.
    pub weight: f64,
}

/// Capability contract for a square transition operator `T`.
///
/// Implementations only need to apply `T` (and `Tᵀ`) to dense `n×k` blocks;
/// nothing in the correlation machinery depends on how `T` is stored.
/// Callers guarantee that `src` and `dst` both have `num_states()` rows and
/// the same number of columns.
pub trait TransitionOperator: Debug + Send + Sync {
    /// Returns the number of states `n` of the chain.
    fn num_states(&self) -> usize;

    /// Overwrites `dst` with `T · src`.
    fn propagate_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>);

    /// Overwrites `dst` with `Tᵀ · src`, i.e. advances row distributions
    /// `pᵀ ↦ pᵀ T` stored as columns.
    fn propagate_transpose_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>);

    /// Returns the non-zero entries in row-major order.
    fn entries(&self) -> Vec<OperatorEntry>;

    /// Returns `T · src` in a freshly allocated block.
    fn propagate(&self, src: &DMatrix<f64>) -> DMatrix<f64> {
        let mut dst = DMatrix::zeros(self.num_states(), src.ncols());
        self.propagate_into(src, &mut dst);
        dst
    }

    /// Returns the sum of every row of `T`.
    fn row_sums(&self) -> DVector<f64> {
        let mut sums = DVector::zeros(self.num_states());
        for entry in self.entries() {
            sums[entry.row] += entry.weight;
        }
        sums
    }

    /// Materializes `T` as a dense matrix.
    fn to_dense(&self) -> DMatrix<f64> {
        let n = self.num_states();
        let mut dense = DMatrix::zeros(n, n);
        for entry in self.entries() {
            dense[(entry.row, entry.col)] += entry.weight;
        }
        dense
    }
}
