use msm_core::errors::MsmError;
use msm_core::{SchemaVersion, TransitionOperator};
use msm_matrix::{
    canonical_operator_hash, ensure_distribution, ensure_transition_matrix, DEFAULT_TOLERANCE,
};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::correlations::{schedule_correlations, schedule_relaxations};
use crate::hash::stable_hash_string;
use crate::schedule::Schedule;

/// Schema version stamped on every [`ScanReport`].
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// Optional input checks run before a scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationOpts {
    /// Reject operators whose rows leave `[0, 1]` or do not sum to one.
    #[serde(default)]
    pub check_stochastic: bool,
    /// Reject `μ`/`p₀` vectors that are not probability distributions.
    #[serde(default)]
    pub check_distribution: bool,
    /// Absolute tolerance for both checks.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for ValidationOpts {
    fn default() -> Self {
        Self {
            check_stochastic: false,
            check_distribution: false,
            tolerance: default_tolerance(),
        }
    }
}

impl ValidationOpts {
    fn run(
        &self,
        op: &dyn TransitionOperator,
        name: &str,
        dist: &DVector<f64>,
    ) -> Result<bool, MsmError> {
        if self.check_stochastic {
            ensure_transition_matrix(op, self.tolerance)?;
        }
        if self.check_distribution && dist.len() == op.num_states() {
            ensure_distribution(name, dist, self.tolerance)?;
        }
        Ok(self.check_stochastic || self.check_distribution)
    }
}

/// Lag times and checks for one scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScanSpec {
    /// Requested lags in caller order; duplicates allowed.
    pub times: Vec<i64>,
    /// Input validation applied before any propagation.
    #[serde(default)]
    pub validation: ValidationOpts,
}

/// Quantity computed by a scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScanKind {
    /// `obs1ᵀ diag(μ) Tᵗ obs2`.
    Correlation,
    /// `p₀ᵀ Tᵗ obs`.
    Relaxation,
}

/// Provenance metadata bundled with a [`ScanReport`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanProvenance {
    /// Source commit (if available) or package version.
    pub commit: String,
    /// Validation tolerance in effect.
    pub tolerance: f64,
    /// Whether any input validation ran.
    pub validated: bool,
}

/// Deterministic result bundle of a correlation or relaxation scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanReport {
    /// Content addressed hash of the scan inputs and values.
    pub analysis_hash: String,
    /// Canonical hash of the transition operator.
    pub operator_hash: String,
    /// Schema of this payload.
    pub schema_version: SchemaVersion,
    /// Quantity computed.
    pub kind: ScanKind,
    /// Requested lags in caller order.
    pub times: Vec<i64>,
    /// One row of per-column values for each requested lag.
    pub values: Vec<Vec<f64>>,
    /// Number of observable columns.
    pub columns: usize,
    /// Number of distinct lags evaluated.
    pub checkpoints: usize,
    /// Operator applications performed.
    pub products: u64,
    /// Provenance information.
    pub provenance: ScanProvenance,
}

fn commit_string() -> String {
    option_env!("GIT_COMMIT_HASH")
        .or_else(|| option_env!("VERGEN_GIT_SHA"))
        .map(|value| value.to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}

fn build_report(
    op: &dyn TransitionOperator,
    kind: ScanKind,
    columns: usize,
    spec: &ScanSpec,
    validated: bool,
    schedule: Schedule,
) -> Result<ScanReport, MsmError> {
    let values: Vec<Vec<f64>> = schedule
        .values
        .iter()
        .map(|value| value.iter().copied().collect())
        .collect();
    let operator_hash = canonical_operator_hash(op);
    let analysis_hash = stable_hash_string(&(&operator_hash, kind, &spec.times, &values))?;
    Ok(ScanReport {
        analysis_hash,
        operator_hash,
        schema_version: REPORT_SCHEMA,
        kind,
        times: spec.times.clone(),
        values,
        columns,
        checkpoints: schedule.checkpoints,
        products: schedule.products,
        provenance: ScanProvenance {
            commit: commit_string(),
            tolerance: spec.validation.tolerance,
            validated,
        },
    })
}

/// Runs a correlation scan over `spec.times` and emits a [`ScanReport`].
pub fn analyze_correlations(
    op: &dyn TransitionOperator,
    mu: &DVector<f64>,
    obs1: &DMatrix<f64>,
    obs2: Option<&DMatrix<f64>>,
    spec: &ScanSpec,
) -> Result<ScanReport, MsmError> {
    let validated = spec.validation.run(op, "mu", mu)?;
    let schedule = schedule_correlations(op, mu, obs1, obs2, &spec.times)?;
    build_report(
        op,
        ScanKind::Correlation,
        obs1.ncols(),
        spec,
        validated,
        schedule,
    )
}

/// Runs a relaxation scan over `spec.times` and emits a [`ScanReport`].
pub fn analyze_relaxations(
    op: &dyn TransitionOperator,
    p0: &DVector<f64>,
    obs: &DMatrix<f64>,
    spec: &ScanSpec,
) -> Result<ScanReport, MsmError> {
    let validated = spec.validation.run(op, "p0", p0)?;
    let schedule = schedule_relaxations(op, p0, obs, &spec.times)?;
    build_report(
        op,
        ScanKind::Relaxation,
        obs.ncols(),
        spec,
        validated,
        schedule,
    )
}
