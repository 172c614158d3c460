//! Correlation and relaxation functions of a Markov chain at discrete lags.
//!
//! The `*_block_*` functions take `n×k` observable blocks and return one
//! length-`k` vector per lag; the scalar functions lift their vectors into
//! `n×1` blocks and unwrap the single column, so both forms run through the
//! same code.

use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::TransitionOperator;
use nalgebra::{DMatrix, DVector};

use crate::schedule::{run_schedule, validate_lag, CheckpointPlan, Direction, Propagator, Schedule};

fn ensure_length(what: &str, states: usize, vector: &DVector<f64>) -> Result<(), MsmError> {
    if vector.len() != states {
        return Err(MsmError::shape_mismatch(what, states, vector.len()));
    }
    Ok(())
}

fn ensure_block(what: &str, states: usize, block: &DMatrix<f64>) -> Result<(), MsmError> {
    if block.nrows() != states {
        return Err(MsmError::shape_mismatch(what, states, block.nrows()));
    }
    if block.ncols() == 0 {
        return Err(MsmError::Shape(
            ErrorInfo::new("zero-columns", "observable block needs at least one column")
                .with_context("argument", what),
        ));
    }
    Ok(())
}

fn validate_correlation<'b>(
    op: &dyn TransitionOperator,
    mu: &DVector<f64>,
    obs1: &'b DMatrix<f64>,
    obs2: Option<&'b DMatrix<f64>>,
) -> Result<&'b DMatrix<f64>, MsmError> {
    let states = op.num_states();
    ensure_length("mu", states, mu)?;
    ensure_block("obs1", states, obs1)?;
    let obs2 = obs2.unwrap_or(obs1);
    ensure_block("obs2", states, obs2)?;
    if obs1.ncols() != obs2.ncols() {
        return Err(MsmError::Shape(
            ErrorInfo::new("column-mismatch", "obs1 and obs2 must have the same column count")
                .with_context("obs1", obs1.ncols().to_string())
                .with_context("obs2", obs2.ncols().to_string()),
        ));
    }
    Ok(obs2)
}

fn validate_relaxation(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    obs: &DMatrix<f64>,
) -> Result<(), MsmError> {
    let states = op.num_states();
    ensure_length("p0", states, p0)?;
    ensure_block("obs", states, obs)
}

/// `diag(μ) · obs1`, the left factor of every correlation.
fn weighted(mu: &DVector<f64>, obs1: &DMatrix<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(obs1.nrows(), obs1.ncols(), |i, j| mu[i] * obs1[(i, j)])
}

/// Column-wise dot products `Σᵢ left[i, j] · right[i, j]`.
fn column_dots(left: &DMatrix<f64>, right: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_fn(left.ncols(), |j, _| left.column(j).dot(&right.column(j)))
}

/// Dot product of the single distribution column with every observable column.
fn distribution_dots(obs: &DMatrix<f64>, dist: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_fn(obs.ncols(), |j, _| obs.column(j).dot(&dist.column(0)))
}

pub(crate) fn column_block(vector: &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_column_slice(vector.len(), 1, vector.as_slice())
}

pub(crate) fn schedule_correlations(
    op: &dyn TransitionOperator,
    mu: &DVector<f64>,
    obs1: &DMatrix<f64>,
    obs2: Option<&DMatrix<f64>>,
    times: &[i64],
) -> Result<Schedule, MsmError> {
    let obs2 = validate_correlation(op, mu, obs1, obs2)?;
    let plan = CheckpointPlan::new(times)?;
    let weights = weighted(mu, obs1);
    let propagator = Propagator::new(op, Direction::Forward, obs2.clone());
    Ok(run_schedule(&plan, propagator, |state| {
        column_dots(&weights, state)
    }))
}

pub(crate) fn schedule_relaxations(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    obs: &DMatrix<f64>,
    times: &[i64],
) -> Result<Schedule, MsmError> {
    validate_relaxation(op, p0, obs)?;
    let plan = CheckpointPlan::new(times)?;
    let propagator = Propagator::new(op, Direction::Backward, column_block(p0));
    Ok(run_schedule(&plan, propagator, |state| {
        distribution_dots(obs, state)
    }))
}

/// Per-column correlation `Σᵢ μᵢ · obs1[i, j] · (Tᵗ · obs2)[i, j]` at one lag.
///
/// `obs2 = None` computes autocorrelations of `obs1`.
pub fn correlation_block_at(
    op: &dyn TransitionOperator,
    mu: &DVector<f64>,
    obs1: &DMatrix<f64>,
    obs2: Option<&DMatrix<f64>>,
    time: i64,
) -> Result<DVector<f64>, MsmError> {
    let obs2 = validate_correlation(op, mu, obs1, obs2)?;
    let lag = validate_lag(time, 0)?;
    let mut propagator = Propagator::new(op, Direction::Forward, obs2.clone());
    propagator.advance_to(lag);
    Ok(column_dots(&weighted(mu, obs1), propagator.state()))
}

/// Per-column correlations at every lag in `times`, in the caller's order.
pub fn correlations_block_at(
    op: &dyn TransitionOperator,
    mu: &DVector<f64>,
    obs1: &DMatrix<f64>,
    obs2: Option<&DMatrix<f64>>,
    times: &[i64],
) -> Result<Vec<DVector<f64>>, MsmError> {
    Ok(schedule_correlations(op, mu, obs1, obs2, times)?.values)
}

/// Per-column relaxation `p₀ᵀ · Tᵗ · obs[:, j]` at one lag.
pub fn relaxation_block_at(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    obs: &DMatrix<f64>,
    time: i64,
) -> Result<DVector<f64>, MsmError> {
    validate_relaxation(op, p0, obs)?;
    let lag = validate_lag(time, 0)?;
    let mut propagator = Propagator::new(op, Direction::Backward, column_block(p0));
    propagator.advance_to(lag);
    Ok(distribution_dots(obs, propagator.state()))
}

/// Per-column relaxations at every lag in `times`, in the caller's order.
pub fn relaxations_block_at(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    obs: &DMatrix<f64>,
    times: &[i64],
) -> Result<Vec<DVector<f64>>, MsmError> {
    Ok(schedule_relaxations(op, p0, obs, times)?.values)
}

/// Correlation `Σᵢ μᵢ · obs1ᵢ · (Tᵗ · obs2)ᵢ` at lag `time`.
///
/// `obs2 = None` gives the autocorrelation of `obs1`; at lag zero that is
/// `Σᵢ μᵢ · obs1ᵢ²`.
pub fn correlation_at(
    op: &dyn TransitionOperator,
    mu: &DVector<f64>,
    obs1: &DVector<f64>,
    obs2: Option<&DVector<f64>>,
    time: i64,
) -> Result<f64, MsmError> {
    let obs2 = obs2.map(column_block);
    let values = correlation_block_at(op, mu, &column_block(obs1), obs2.as_ref(), time)?;
    Ok(values[0])
}

/// Correlations at every lag in `times`, in the caller's order.
///
/// Costs `max(times)` operator applications in total; every value equals
/// what [`correlation_at`] returns for the same lag.
pub fn correlations_at(
    op: &dyn TransitionOperator,
    mu: &DVector<f64>,
    obs1: &DVector<f64>,
    obs2: Option<&DVector<f64>>,
    times: &[i64],
) -> Result<Vec<f64>, MsmError> {
    let obs2 = obs2.map(column_block);
    let values = correlations_block_at(op, mu, &column_block(obs1), obs2.as_ref(), times)?;
    Ok(values.iter().map(|value| value[0]).collect())
}

/// Expected value `p₀ᵀ · Tᵗ · obs` of `obs` after `time` steps from `p0`.
pub fn relaxation_at(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    obs: &DVector<f64>,
    time: i64,
) -> Result<f64, MsmError> {
    let values = relaxation_block_at(op, p0, &column_block(obs), time)?;
    Ok(values[0])
}

/// Relaxations at every lag in `times`, in the caller's order.
pub fn relaxations_at(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    obs: &DVector<f64>,
    times: &[i64],
) -> Result<Vec<f64>, MsmError> {
    let values = relaxations_block_at(op, p0, &column_block(obs), times)?;
    Ok(values.iter().map(|value| value[0]).collect())
}
