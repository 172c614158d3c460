use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::rng::RngHandle;
use msm_core::OperatorEntry;
use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::dense::DenseOperator;
use crate::sparse::SparseOperator;

fn fixture_error(code: &str, message: impl Into<String>) -> MsmError {
    MsmError::Domain(ErrorInfo::new(code, message))
}

/// Nearest-neighbour birth–death chain on `n` states.
///
/// From state `i` the chain moves down with probability `q[i]`, up with
/// probability `p[i]` and stays otherwise. The chain satisfies detailed
/// balance, so its stationary distribution has a closed form.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthDeathChain {
    q: Vec<f64>,
    p: Vec<f64>,
}

impl BirthDeathChain {
    /// Creates a chain from death probabilities `q` and birth probabilities `p`.
    pub fn new(q: Vec<f64>, p: Vec<f64>) -> Result<Self, MsmError> {
        if q.is_empty() {
            return Err(MsmError::Shape(ErrorInfo::new(
                "empty-operator",
                "birth-death chain needs at least one state",
            )));
        }
        if q.len() != p.len() {
            return Err(MsmError::shape_mismatch("p", q.len(), p.len()));
        }
        let n = q.len();
        if q[0] != 0.0 {
            return Err(fixture_error("boundary-death", "q[0] must be zero"));
        }
        if p[n - 1] != 0.0 {
            return Err(fixture_error("boundary-birth", "p[n-1] must be zero"));
        }
        for state in 0..n {
            let (qi, pi) = (q[state], p[state]);
            if !(0.0..=1.0).contains(&qi) || !(0.0..=1.0).contains(&pi) || qi + pi > 1.0 {
                return Err(MsmError::Domain(
                    ErrorInfo::new(
                        "invalid-rates",
                        "birth and death probabilities must be in [0, 1] with p + q <= 1",
                    )
                    .with_context("state", state.to_string())
                    .with_context("q", qi.to_string())
                    .with_context("p", pi.to_string()),
                ));
            }
            if state > 0 && qi == 0.0 {
                return Err(MsmError::Domain(
                    ErrorInfo::new("reducible-chain", "interior death probabilities must be positive")
                        .with_context("state", state.to_string()),
                ));
            }
        }
        Ok(Self { q, p })
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.q.len()
    }

    fn entries(&self) -> Vec<OperatorEntry> {
        let n = self.num_states();
        let mut entries = Vec::with_capacity(3 * n);
        for row in 0..n {
            if row > 0 {
                entries.push(OperatorEntry {
                    row,
                    col: row - 1,
                    weight: self.q[row],
                });
            }
            entries.push(OperatorEntry {
                row,
                col: row,
                weight: 1.0 - self.q[row] - self.p[row],
            });
            if row + 1 < n {
                entries.push(OperatorEntry {
                    row,
                    col: row + 1,
                    weight: self.p[row],
                });
            }
        }
        entries
    }

    /// Dense tridiagonal transition matrix.
    pub fn transition_matrix(&self) -> DenseOperator {
        let n = self.num_states();
        let mut matrix = DMatrix::zeros(n, n);
        for entry in self.entries() {
            matrix[(entry.row, entry.col)] = entry.weight;
        }
        DenseOperator::from_validated(matrix)
    }

    /// Same transition matrix in compressed sparse row form.
    pub fn sparse_transition_matrix(&self) -> Result<SparseOperator, MsmError> {
        SparseOperator::from_entries(self.num_states(), self.entries())
    }

    /// Stationary distribution from detailed balance `μᵢ pᵢ = μᵢ₊₁ qᵢ₊₁`.
    pub fn stationary_distribution(&self) -> DVector<f64> {
        let n = self.num_states();
        let mut weights = DVector::zeros(n);
        weights[0] = 1.0;
        for state in 1..n {
            weights[state] = weights[state - 1] * self.p[state - 1] / self.q[state];
        }
        let total = weights.sum();
        weights / total
    }
}

/// Draws a random row-stochastic matrix on `states` states.
///
/// Every off-diagonal entry is kept with probability `density`; diagonal
/// entries are always present so that no row is empty.
pub fn random_stochastic(
    states: usize,
    density: f64,
    rng: &mut RngHandle,
) -> Result<DenseOperator, MsmError> {
    if states == 0 {
        return Err(MsmError::Shape(ErrorInfo::new(
            "empty-operator",
            "random generator requires at least one state",
        )));
    }
    if !(density > 0.0 && density <= 1.0) {
        return Err(MsmError::Domain(
            ErrorInfo::new("invalid-density", "density must lie in (0, 1]")
                .with_context("density", density.to_string()),
        ));
    }
    let mut matrix = DMatrix::zeros(states, states);
    for row in 0..states {
        for col in 0..states {
            if row == col || rng.gen_bool(density) {
                matrix[(row, col)] = rng.gen_range(0.05..1.0);
            }
        }
        let total: f64 = matrix.row(row).sum();
        for col in 0..states {
            matrix[(row, col)] /= total;
        }
    }
    Ok(DenseOperator::from_validated(matrix))
}

/// Draws a strictly positive probability vector.
pub fn random_distribution(states: usize, rng: &mut RngHandle) -> DVector<f64> {
    let weights = DVector::from_fn(states, |_, _| rng.gen_range(0.05..1.0));
    let total = weights.sum();
    weights / total
}

/// Draws an `states × columns` block of observables in `[-1, 1)`.
pub fn random_observables(states: usize, columns: usize, rng: &mut RngHandle) -> DMatrix<f64> {
    DMatrix::from_fn(states, columns, |_, _| rng.gen_range(-1.0..1.0))
}
