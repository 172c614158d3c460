use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use msm_core::errors::{ErrorInfo, MsmError};
use msm_corr::{to_canonical_json_bytes, ScanSpec};
use msm_matrix::OperatorSpec;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Operator, distribution and observables for one scan.
///
/// `observables` and `second` list columns, one vector of per-state values
/// each. `distribution` is `μ` for correlations and `p₀` for relaxations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Problem {
    pub operator: OperatorSpec,
    pub distribution: Vec<f64>,
    pub observables: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub scan: ScanSpec,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Problem file (`.yaml`/`.yml` or JSON).
    #[arg(long)]
    pub problem: PathBuf,
    /// Output directory for the scan report.
    #[arg(long)]
    pub out: PathBuf,
    /// Comma separated lag times overriding `scan.times`.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub times: Option<Vec<i64>>,
    /// Reject operators that are not row stochastic.
    #[arg(long)]
    pub check_stochastic: bool,
    /// Reject distributions that are not normalized.
    #[arg(long)]
    pub check_distribution: bool,
}

impl ScanArgs {
    /// Scan settings from the problem file with command-line overrides applied.
    pub fn scan_spec(&self, problem: &Problem) -> ScanSpec {
        let mut spec = problem.scan.clone();
        if let Some(times) = &self.times {
            spec.times = times.clone();
        }
        spec.validation.check_stochastic |= self.check_stochastic;
        spec.validation.check_distribution |= self.check_distribution;
        spec
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

pub fn load_problem(path: &Path) -> Result<Problem, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let problem = if is_yaml(path) {
        serde_yaml::from_str(&text)?
    } else {
        serde_json::from_str(&text)?
    };
    Ok(problem)
}

pub fn save_problem(path: &Path, problem: &Problem) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = if is_yaml(path) {
        serde_yaml::to_string(problem)?
    } else {
        serde_json::to_string_pretty(problem)?
    };
    fs::write(path, text)?;
    Ok(())
}

/// Stacks observable columns into an `n×k` block.
pub fn column_block(
    what: &str,
    states: usize,
    columns: &[Vec<f64>],
) -> Result<DMatrix<f64>, MsmError> {
    let mut block = DMatrix::zeros(states, columns.len());
    for (idx, column) in columns.iter().enumerate() {
        if column.len() != states {
            return Err(MsmError::Shape(
                ErrorInfo::new("shape-mismatch", "observable column has the wrong length")
                    .with_context("argument", what)
                    .with_context("column", idx.to_string())
                    .with_context("expected", states.to_string())
                    .with_context("actual", column.len().to_string()),
            ));
        }
        block.set_column(idx, &DVector::from_column_slice(column));
    }
    Ok(block)
}

pub fn write_canonical<T: Serialize>(
    dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, to_canonical_json_bytes(value)?)?;
    Ok(path)
}
