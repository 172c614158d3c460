use std::error::Error;

use msm_corr::analyze_correlations;
use nalgebra::DVector;

use super::problem::{column_block, load_problem, write_canonical, ScanArgs};

pub fn run(args: &ScanArgs) -> Result<(), Box<dyn Error>> {
    let problem = load_problem(&args.problem)?;
    let spec = args.scan_spec(&problem);
    let op = problem.operator.build()?;
    let states = op.num_states();

    let mu = DVector::from_vec(problem.distribution.clone());
    let obs1 = column_block("observables", states, &problem.observables)?;
    let obs2 = problem
        .second
        .as_deref()
        .map(|columns| column_block("second", states, columns))
        .transpose()?;

    let report = analyze_correlations(op.as_ref(), &mu, &obs1, obs2.as_ref(), &spec)?;
    let path = write_canonical(&args.out, "correlations.json", &report)?;
    tracing::info!(
        path = %path.display(),
        lags = report.times.len(),
        products = report.products,
        "correlation report written"
    );
    Ok(())
}
