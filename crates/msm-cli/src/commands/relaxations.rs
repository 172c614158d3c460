use std::error::Error;

use msm_corr::analyze_relaxations;
use nalgebra::DVector;

use super::problem::{column_block, load_problem, write_canonical, ScanArgs};

pub fn run(args: &ScanArgs) -> Result<(), Box<dyn Error>> {
    let problem = load_problem(&args.problem)?;
    if problem.second.is_some() {
        tracing::warn!("relaxation scans ignore `second` observables");
    }
    let spec = args.scan_spec(&problem);
    let op = problem.operator.build()?;

    let p0 = DVector::from_vec(problem.distribution.clone());
    let obs = column_block("observables", op.num_states(), &problem.observables)?;

    let report = analyze_relaxations(op.as_ref(), &p0, &obs, &spec)?;
    let path = write_canonical(&args.out, "relaxations.json", &report)?;
    tracing::info!(
        path = %path.display(),
        lags = report.times.len(),
        products = report.products,
        "relaxation report written"
    );
    Ok(())
}
