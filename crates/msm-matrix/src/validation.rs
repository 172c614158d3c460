use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::TransitionOperator;
use nalgebra::DVector;

/// Default absolute tolerance for row sums and distribution totals.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Checks that every entry lies in `[0, 1]` and every row sums to one.
pub fn ensure_transition_matrix(op: &dyn TransitionOperator, tol: f64) -> Result<(), MsmError> {
    for entry in op.entries() {
        if entry.weight < -tol || entry.weight > 1.0 + tol {
            tracing::debug!(
                row = entry.row,
                col = entry.col,
                weight = entry.weight,
                "transition probability outside [0, 1]"
            );
            return Err(MsmError::Domain(
                ErrorInfo::new(
                    "probability-out-of-range",
                    "transition probabilities must lie in [0, 1]",
                )
                .with_context("row", entry.row.to_string())
                .with_context("col", entry.col.to_string())
                .with_context("weight", entry.weight.to_string()),
            ));
        }
    }
    for (row, sum) in op.row_sums().iter().enumerate() {
        if (sum - 1.0).abs() > tol {
            tracing::debug!(row, sum, "transition matrix row does not sum to one");
            return Err(MsmError::Domain(
                ErrorInfo::new("row-sum", "transition matrix rows must sum to one")
                    .with_context("row", row.to_string())
                    .with_context("sum", sum.to_string())
                    .with_context("tolerance", tol.to_string())
                    .with_hint("normalize each row of the count matrix"),
            ));
        }
    }
    Ok(())
}

/// Returns `true` when `op` is row-stochastic within `tol`.
pub fn is_transition_matrix(op: &dyn TransitionOperator, tol: f64) -> bool {
    ensure_transition_matrix(op, tol).is_ok()
}

/// Checks that `dist` is non-negative and sums to one within `tol`.
pub fn ensure_distribution(name: &str, dist: &DVector<f64>, tol: f64) -> Result<(), MsmError> {
    if let Some((state, value)) = dist.iter().enumerate().find(|(_, value)| **value < -tol) {
        tracing::debug!(name, state, value, "negative probability in distribution");
        return Err(MsmError::Domain(
            ErrorInfo::new("negative-probability", "distribution has a negative entry")
                .with_context("argument", name)
                .with_context("state", state.to_string())
                .with_context("value", value.to_string()),
        ));
    }
    let total = dist.sum();
    if (total - 1.0).abs() > tol {
        tracing::debug!(name, total, "distribution does not sum to one");
        return Err(MsmError::Domain(
            ErrorInfo::new("distribution-sum", "distribution must sum to one")
                .with_context("argument", name)
                .with_context("sum", total.to_string())
                .with_context("tolerance", tol.to_string()),
        ));
    }
    Ok(())
}
