//! Expected transition counts along a trajectory of the chain.

use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::TransitionOperator;
use nalgebra::{DMatrix, DVector};

use crate::correlations::column_block;
use crate::schedule::{Direction, Propagator};

fn validate_steps(steps: i64) -> Result<u64, MsmError> {
    u64::try_from(steps).map_err(|_| {
        MsmError::Domain(
            ErrorInfo::new("negative-steps", "step counts must be non-negative")
                .with_context("steps", steps.to_string()),
        )
    })
}

fn scale_rows(mut matrix: DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
    for (row, mut values) in matrix.row_iter_mut().enumerate() {
        values *= weights[row];
    }
    matrix
}

/// Expected transition counts after `steps` steps started from `p0`.
///
/// `E[Cᵢⱼ] = Σ_{k=0}^{steps-1} (p₀ᵀ Tᵏ)ᵢ Tᵢⱼ`. The visit vector is accumulated
/// with successive products `pₖ₊₁ᵀ = pₖᵀ T`; the result is the zero matrix
/// when `steps == 0`. Negative step counts are domain errors.
pub fn expected_counts(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    steps: i64,
) -> Result<DMatrix<f64>, MsmError> {
    let states = op.num_states();
    if p0.len() != states {
        return Err(MsmError::shape_mismatch("p0", states, p0.len()));
    }
    let steps = validate_steps(steps)?;
    if steps == 0 {
        return Ok(DMatrix::zeros(states, states));
    }
    tracing::debug!(steps, states, "accumulating expected counts");
    let mut propagator = Propagator::new(op, Direction::Backward, column_block(p0));
    let mut visits = p0.clone();
    for _ in 1..steps {
        propagator.step();
        visits += propagator.state().column(0);
    }
    Ok(scale_rows(op.to_dense(), &visits))
}

/// Expected transition counts for a chain started in equilibrium.
///
/// With `μ` stationary every step contributes `diag(μ) T`, so the result is
/// `steps · diag(μ) · T`.
pub fn expected_counts_stationary(
    op: &dyn TransitionOperator,
    steps: i64,
    mu: &DVector<f64>,
) -> Result<DMatrix<f64>, MsmError> {
    let states = op.num_states();
    if mu.len() != states {
        return Err(MsmError::shape_mismatch("mu", states, mu.len()));
    }
    let steps = validate_steps(steps)?;
    if steps == 0 {
        return Ok(DMatrix::zeros(states, states));
    }
    Ok(scale_rows(op.to_dense(), &(mu * steps as f64)))
}

/// Finite geometric series `Σ_{k=0}^{n} qᵏ`.
pub fn geometric_series(q: f64, n: i64) -> Result<f64, MsmError> {
    if n < 0 {
        return Err(MsmError::Domain(
            ErrorInfo::new(
                "negative-terms",
                "finite geometric series is only defined for n >= 0",
            )
            .with_context("n", n.to_string()),
        ));
    }
    if q == 1.0 {
        return Ok((n + 1) as f64);
    }
    Ok((1.0 - q.powf((n + 1) as f64)) / (1.0 - q))
}

/// Element-wise [`geometric_series`] over a vector of ratios.
pub fn geometric_series_vec(q: &DVector<f64>, n: i64) -> Result<DVector<f64>, MsmError> {
    let mut sums = DVector::zeros(q.len());
    for (idx, &ratio) in q.iter().enumerate() {
        sums[idx] = geometric_series(ratio, n)?;
    }
    Ok(sums)
}
