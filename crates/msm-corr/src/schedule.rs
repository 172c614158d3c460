//! Checkpoint planning and incremental propagation across lag times.
//!
//! Lags `t₁ < … < tₙ` are served by one [`Propagator`] that is advanced from
//! checkpoint to checkpoint, so a whole request costs `tₙ` operator
//! applications no matter how many lags it contains.

use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::TransitionOperator;
use nalgebra::{DMatrix, DVector};

/// Converts a requested lag into a step count.
pub(crate) fn validate_lag(time: i64, position: usize) -> Result<u64, MsmError> {
    u64::try_from(time).map_err(|_| {
        MsmError::Domain(
            ErrorInfo::new("negative-lag", "lag times must be non-negative")
                .with_context("position", position.to_string())
                .with_context("lag", time.to_string()),
        )
    })
}

/// A distinct lag together with every caller position that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    lag: u64,
    positions: Vec<usize>,
}

impl Checkpoint {
    /// Lag at which a value is emitted.
    pub fn lag(&self) -> u64 {
        self.lag
    }

    /// Indices into the caller's lag slice served by this checkpoint, ascending.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

/// Sorted, deduplicated checkpoints compiled from a caller's lag times.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckpointPlan {
    checkpoints: Vec<Checkpoint>,
    requested: usize,
}

impl CheckpointPlan {
    /// Compiles `times` into ascending checkpoints.
    ///
    /// Fails with a domain error naming the first negative lag.
    pub fn new(times: &[i64]) -> Result<Self, MsmError> {
        let mut order = Vec::with_capacity(times.len());
        for (position, &time) in times.iter().enumerate() {
            order.push((validate_lag(time, position)?, position));
        }
        order.sort();

        let mut checkpoints: Vec<Checkpoint> = Vec::new();
        for (lag, position) in order {
            match checkpoints.last_mut() {
                Some(last) if last.lag == lag => last.positions.push(position),
                _ => checkpoints.push(Checkpoint {
                    lag,
                    positions: vec![position],
                }),
            }
        }

        Ok(Self {
            checkpoints,
            requested: times.len(),
        })
    }

    /// Checkpoints in ascending lag order.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Number of lags originally requested, duplicates included.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Largest requested lag, or zero for an empty plan.
    pub fn max_lag(&self) -> u64 {
        self.checkpoints.last().map_or(0, |checkpoint| checkpoint.lag)
    }

    /// Returns `true` when no lag was requested.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

/// Which side of `T` the advanced state is multiplied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Observables: `v ↦ T · v`.
    Forward,
    /// Distributions: `pᵀ ↦ pᵀ · T`, stored as `p ↦ Tᵀ · p`.
    Backward,
}

/// Advanced state `Tᵏ · v` (or `(Tᵀ)ᵏ · p`) local to one evaluation.
pub(crate) struct Propagator<'a> {
    op: &'a dyn TransitionOperator,
    direction: Direction,
    state: DMatrix<f64>,
    scratch: DMatrix<f64>,
    lag: u64,
    products: u64,
}

impl<'a> Propagator<'a> {
    pub(crate) fn new(
        op: &'a dyn TransitionOperator,
        direction: Direction,
        initial: DMatrix<f64>,
    ) -> Self {
        let scratch = DMatrix::zeros(initial.nrows(), initial.ncols());
        Self {
            op,
            direction,
            state: initial,
            scratch,
            lag: 0,
            products: 0,
        }
    }

    /// Applies the operator once.
    pub(crate) fn step(&mut self) {
        match self.direction {
            Direction::Forward => self.op.propagate_into(&self.state, &mut self.scratch),
            Direction::Backward => self
                .op
                .propagate_transpose_into(&self.state, &mut self.scratch),
        }
        std::mem::swap(&mut self.state, &mut self.scratch);
        self.lag += 1;
        self.products += 1;
    }

    /// Applies the operator until the state sits at `lag`. Lags never move backwards.
    pub(crate) fn advance_to(&mut self, lag: u64) {
        debug_assert!(lag >= self.lag, "propagator cannot move backwards");
        while self.lag < lag {
            self.step();
        }
    }

    pub(crate) fn state(&self) -> &DMatrix<f64> {
        &self.state
    }

    pub(crate) fn products(&self) -> u64 {
        self.products
    }
}

/// Values emitted by a scheduled run, in caller order.
#[derive(Debug, Clone)]
pub(crate) struct Schedule {
    pub(crate) values: Vec<DVector<f64>>,
    pub(crate) checkpoints: usize,
    pub(crate) products: u64,
}

/// Drives `propagator` through every checkpoint of `plan`, reducing the state
/// once per distinct lag and scattering the value to all requesting positions.
pub(crate) fn run_schedule<F>(
    plan: &CheckpointPlan,
    mut propagator: Propagator<'_>,
    mut reduce: F,
) -> Schedule
where
    F: FnMut(&DMatrix<f64>) -> DVector<f64>,
{
    tracing::debug!(
        requested = plan.requested(),
        checkpoints = plan.checkpoints().len(),
        max_lag = plan.max_lag(),
        columns = propagator.state().ncols(),
        "propagating lag schedule"
    );
    let mut values = vec![DVector::zeros(0); plan.requested()];
    for checkpoint in plan.checkpoints() {
        propagator.advance_to(checkpoint.lag);
        let value = reduce(propagator.state());
        tracing::trace!(
            lag = checkpoint.lag,
            positions = checkpoint.positions.len(),
            "checkpoint reached"
        );
        for &position in &checkpoint.positions {
            values[position] = value.clone();
        }
    }
    Schedule {
        values,
        checkpoints: plan.checkpoints().len(),
        products: propagator.products(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_groups_duplicates_and_sorts() {
        let plan = CheckpointPlan::new(&[100, 1, 20, 1, 0]).unwrap();
        let lags: Vec<u64> = plan.checkpoints().iter().map(Checkpoint::lag).collect();
        assert_eq!(lags, vec![0, 1, 20, 100]);
        assert_eq!(plan.checkpoints()[1].positions(), &[1, 3]);
        assert_eq!(plan.checkpoints()[3].positions(), &[0]);
        assert_eq!(plan.requested(), 5);
        assert_eq!(plan.max_lag(), 100);
    }

    #[test]
    fn duplicate_positions_keep_caller_order() {
        let times = [4, 2, 4, 4, 2, 0, 4];
        let plan = CheckpointPlan::new(&times).unwrap();
        assert_eq!(plan.checkpoints().len(), 3);
        assert_eq!(plan.checkpoints()[0].positions(), &[5]);
        assert_eq!(plan.checkpoints()[1].positions(), &[1, 4]);
        assert_eq!(plan.checkpoints()[2].positions(), &[0, 2, 3, 6]);
    }

    #[test]
    fn empty_plan() {
        let plan = CheckpointPlan::new(&[]).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.max_lag(), 0);
        assert_eq!(plan.requested(), 0);
    }

    #[test]
    fn negative_lag_names_position() {
        let err = CheckpointPlan::new(&[3, 5, -2]).unwrap_err();
        assert!(err.is_domain());
        assert_eq!(err.info().code, "negative-lag");
        assert_eq!(err.info().context.get("position").map(String::as_str), Some("2"));
        assert_eq!(err.info().context.get("lag").map(String::as_str), Some("-2"));
    }
}
