use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use msm_corr::{expected_counts, expected_counts_stationary};
use msm_matrix::canonical_operator_hash;
use nalgebra::DVector;
use serde::Serialize;

use super::problem::{load_problem, write_canonical};

#[derive(Args, Debug)]
pub struct ExpectedCountsArgs {
    /// Problem file (`.yaml`/`.yml` or JSON); observables are ignored.
    #[arg(long)]
    pub problem: PathBuf,
    /// Output directory for the counts report.
    #[arg(long)]
    pub out: PathBuf,
    /// Trajectory length in steps.
    #[arg(long, allow_hyphen_values = true)]
    pub steps: i64,
    /// Treat the distribution as stationary and use the closed form.
    #[arg(long)]
    pub stationary: bool,
}

#[derive(Debug, Serialize)]
struct CountsReport {
    operator_hash: String,
    steps: i64,
    stationary: bool,
    counts: Vec<Vec<f64>>,
}

pub fn run(args: &ExpectedCountsArgs) -> Result<(), Box<dyn Error>> {
    let problem = load_problem(&args.problem)?;
    let op = problem.operator.build()?;
    let dist = DVector::from_vec(problem.distribution.clone());

    let counts = if args.stationary {
        expected_counts_stationary(op.as_ref(), args.steps, &dist)?
    } else {
        expected_counts(op.as_ref(), &dist, args.steps)?
    };
    let report = CountsReport {
        operator_hash: canonical_operator_hash(op.as_ref()),
        steps: args.steps,
        stationary: args.stationary,
        counts: counts
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect(),
    };
    write_canonical(&args.out, "expected_counts.json", &report)?;
    Ok(())
}
