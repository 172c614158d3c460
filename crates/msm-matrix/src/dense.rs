use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::{OperatorEntry, TransitionOperator};
use nalgebra::{DMatrix, DVector};

/// Transition operator backed by a dense `nalgebra` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseOperator {
    matrix: DMatrix<f64>,
}

impl DenseOperator {
    /// Wraps a square matrix with finite entries.
    ///
    /// Stochasticity is not checked here; see
    /// [`ensure_transition_matrix`](crate::ensure_transition_matrix).
    pub fn new(matrix: DMatrix<f64>) -> Result<Self, MsmError> {
        if matrix.nrows() == 0 {
            return Err(MsmError::Shape(ErrorInfo::new(
                "empty-operator",
                "transition operator must have at least one state",
            )));
        }
        if matrix.nrows() != matrix.ncols() {
            return Err(MsmError::Shape(
                ErrorInfo::new("non-square", "transition operator must be square")
                    .with_context("rows", matrix.nrows().to_string())
                    .with_context("cols", matrix.ncols().to_string()),
            ));
        }
        if let Some(pos) = matrix.iter().position(|value| !value.is_finite()) {
            let n = matrix.nrows();
            return Err(MsmError::Domain(
                ErrorInfo::new("non-finite-entry", "transition operator has a non-finite entry")
                    .with_context("row", (pos % n).to_string())
                    .with_context("col", (pos / n).to_string()),
            ));
        }
        Ok(Self { matrix })
    }

    /// Builds an operator from row vectors.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MsmError> {
        let n = rows.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(MsmError::Shape(
                ErrorInfo::new("ragged-rows", "every row must have one entry per state")
                    .with_context("row", idx.to_string())
                    .with_context("expected", n.to_string())
                    .with_context("actual", row.len().to_string()),
            ));
        }
        Self::new(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }

    /// Constructor for matrices that are square and finite by construction.
    pub(crate) fn from_validated(matrix: DMatrix<f64>) -> Self {
        debug_assert!(matrix.is_square());
        Self { matrix }
    }

    /// Returns the wrapped matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Consumes the operator and returns the wrapped matrix.
    pub fn into_inner(self) -> DMatrix<f64> {
        self.matrix
    }
}

impl TransitionOperator for DenseOperator {
    fn num_states(&self) -> usize {
        self.matrix.nrows()
    }

    fn propagate_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>) {
        dst.gemm(1.0, &self.matrix, src, 0.0);
    }

    fn propagate_transpose_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>) {
        dst.gemm_tr(1.0, &self.matrix, src, 0.0);
    }

    fn entries(&self) -> Vec<OperatorEntry> {
        let n = self.matrix.nrows();
        let mut entries = Vec::new();
        for row in 0..n {
            for col in 0..n {
                let weight = self.matrix[(row, col)];
                if weight != 0.0 {
                    entries.push(OperatorEntry { row, col, weight });
                }
            }
        }
        entries
    }

    fn row_sums(&self) -> DVector<f64> {
        self.matrix.column_sum()
    }

    fn to_dense(&self) -> DMatrix<f64> {
        self.matrix.clone()
    }
}
