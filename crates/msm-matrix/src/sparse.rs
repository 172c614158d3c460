use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::{OperatorEntry, TransitionOperator};
use nalgebra::DMatrix;

/// Transition operator stored in compressed sparse row form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseOperator {
    states: usize,
    row_offsets: Vec<usize>,
    cols: Vec<usize>,
    weights: Vec<f64>,
}

impl SparseOperator {
    /// Assembles an operator from coordinate entries.
    ///
    /// Entries may arrive in any order; duplicates are summed and entries
    /// that coalesce to zero are dropped.
    pub fn from_entries(
        states: usize,
        entries: impl IntoIterator<Item = OperatorEntry>,
    ) -> Result<Self, MsmError> {
        if states == 0 {
            return Err(MsmError::Shape(ErrorInfo::new(
                "empty-operator",
                "transition operator must have at least one state",
            )));
        }
        let mut entries: Vec<OperatorEntry> = entries.into_iter().collect();
        for entry in &entries {
            if entry.row >= states || entry.col >= states {
                return Err(MsmError::Shape(
                    ErrorInfo::new("entry-out-of-range", "sparse entry lies outside the operator")
                        .with_context("row", entry.row.to_string())
                        .with_context("col", entry.col.to_string())
                        .with_context("states", states.to_string()),
                ));
            }
            if !entry.weight.is_finite() {
                return Err(MsmError::Domain(
                    ErrorInfo::new("non-finite-entry", "transition operator has a non-finite entry")
                        .with_context("row", entry.row.to_string())
                        .with_context("col", entry.col.to_string()),
                ));
            }
        }

        entries.sort_by(|a, b| a.row.cmp(&b.row).then_with(|| a.col.cmp(&b.col)));

        let mut coalesced: Vec<OperatorEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(prev) = coalesced.last_mut() {
                if prev.row == entry.row && prev.col == entry.col {
                    prev.weight += entry.weight;
                    continue;
                }
            }
            coalesced.push(entry);
        }
        coalesced.retain(|entry| entry.weight != 0.0);

        let mut row_offsets = vec![0usize; states + 1];
        for entry in &coalesced {
            row_offsets[entry.row + 1] += 1;
        }
        for row in 0..states {
            row_offsets[row + 1] += row_offsets[row];
        }

        Ok(Self {
            states,
            row_offsets,
            cols: coalesced.iter().map(|entry| entry.col).collect(),
            weights: coalesced.iter().map(|entry| entry.weight).collect(),
        })
    }

    /// Compresses a dense square matrix.
    pub fn from_dense(matrix: &DMatrix<f64>) -> Result<Self, MsmError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(MsmError::Shape(
                ErrorInfo::new("non-square", "transition operator must be square")
                    .with_context("rows", matrix.nrows().to_string())
                    .with_context("cols", matrix.ncols().to_string()),
            ));
        }
        let n = matrix.nrows();
        let entries = (0..n).flat_map(|row| {
            (0..n).map(move |col| OperatorEntry {
                row,
                col,
                weight: matrix[(row, col)],
            })
        });
        Self::from_entries(n, entries)
    }

    /// Compresses any other operator through its entry list.
    pub fn from_operator(op: &dyn TransitionOperator) -> Result<Self, MsmError> {
        Self::from_entries(op.num_states(), op.entries())
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.weights.len()
    }

    fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        self.row_offsets[row]..self.row_offsets[row + 1]
    }
}

impl TransitionOperator for SparseOperator {
    fn num_states(&self) -> usize {
        self.states
    }

    fn propagate_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>) {
        for c in 0..src.ncols() {
            let column = src.column(c);
            for row in 0..self.states {
                let mut acc = 0.0;
                for idx in self.row_range(row) {
                    acc += self.weights[idx] * column[self.cols[idx]];
                }
                dst[(row, c)] = acc;
            }
        }
    }

    fn propagate_transpose_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>) {
        dst.fill(0.0);
        for c in 0..src.ncols() {
            for row in 0..self.states {
                let value = src[(row, c)];
                for idx in self.row_range(row) {
                    dst[(self.cols[idx], c)] += self.weights[idx] * value;
                }
            }
        }
    }

    fn entries(&self) -> Vec<OperatorEntry> {
        let mut entries = Vec::with_capacity(self.nnz());
        for row in 0..self.states {
            for idx in self.row_range(row) {
                entries.push(OperatorEntry {
                    row,
                    col: self.cols[idx],
                    weight: self.weights[idx],
                });
            }
        }
        entries
    }
}
