use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use msm_core::rng::RngHandle;
use msm_core::TransitionOperator;
use msm_corr::ScanSpec;
use msm_matrix::{
    random_distribution, random_observables, random_stochastic, BirthDeathChain, OperatorSpec,
};
use nalgebra::DMatrix;

use super::problem::{save_problem, Problem};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FixtureKind {
    /// Uniform birth-death chain with reflecting boundaries.
    BirthDeath,
    /// Seeded random stochastic matrix.
    Random,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OperatorFormat {
    Dense,
    Sparse,
}

#[derive(Args, Debug)]
pub struct FixtureArgs {
    /// Chain family to generate.
    #[arg(long, value_enum, default_value_t = FixtureKind::BirthDeath)]
    pub kind: FixtureKind,
    /// Number of states.
    #[arg(long, default_value_t = 10)]
    pub states: usize,
    /// Birth and death probability for birth-death chains.
    #[arg(long, default_value_t = 0.25)]
    pub rate: f64,
    /// Fraction of non-zero entries per row for random chains.
    #[arg(long, default_value_t = 0.3)]
    pub density: f64,
    /// Number of random observable columns.
    #[arg(long, default_value_t = 2)]
    pub columns: usize,
    /// Master deterministic seed for random chains.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Storage format recorded for the operator.
    #[arg(long, value_enum, default_value_t = OperatorFormat::Dense)]
    pub format: OperatorFormat,
    /// Comma separated lag times stored in the problem's scan.
    #[arg(long, value_delimiter = ',', default_value = "0,1,10,100")]
    pub times: Vec<i64>,
    /// Problem file to write; `.yaml`/`.yml` selects YAML, anything else JSON.
    #[arg(long)]
    pub out: PathBuf,
}

/// Operator, distribution and observable columns of a generated problem.
type Generated = (Box<dyn TransitionOperator>, Vec<f64>, Vec<Vec<f64>>);

fn columns_of(block: &DMatrix<f64>) -> Vec<Vec<f64>> {
    block
        .column_iter()
        .map(|column| column.iter().copied().collect())
        .collect()
}

fn birth_death(args: &FixtureArgs) -> Result<Generated, Box<dyn Error>> {
    let states = args.states;
    let mut q = vec![args.rate; states];
    let mut p = vec![args.rate; states];
    if let Some(first) = q.first_mut() {
        *first = 0.0;
    }
    if let Some(last) = p.last_mut() {
        *last = 0.0;
    }
    let chain = BirthDeathChain::new(q, p)?;
    let mu = chain.stationary_distribution();
    let span = states.saturating_sub(1).max(1) as f64;
    let mut leftmost = vec![0.0; states];
    leftmost[0] = 1.0;
    let position = (0..states).map(|state| state as f64 / span).collect();
    Ok((
        Box::new(chain.transition_matrix()),
        mu.iter().copied().collect(),
        vec![leftmost, position],
    ))
}

fn random(args: &FixtureArgs) -> Result<Generated, Box<dyn Error>> {
    let mut chain_rng = RngHandle::substream(args.seed, 0);
    let mut dist_rng = RngHandle::substream(args.seed, 1);
    let mut obs_rng = RngHandle::substream(args.seed, 2);
    let op = random_stochastic(args.states, args.density, &mut chain_rng)?;
    let dist = random_distribution(args.states, &mut dist_rng);
    let obs = random_observables(args.states, args.columns.max(1), &mut obs_rng);
    Ok((Box::new(op), dist.iter().copied().collect(), columns_of(&obs)))
}

pub fn run(args: &FixtureArgs) -> Result<(), Box<dyn Error>> {
    let (op, distribution, observables) = match args.kind {
        FixtureKind::BirthDeath => birth_death(args)?,
        FixtureKind::Random => random(args)?,
    };
    let operator = match args.format {
        OperatorFormat::Dense => OperatorSpec::dense_from(op.as_ref()),
        OperatorFormat::Sparse => OperatorSpec::sparse_from(op.as_ref()),
    };
    let problem = Problem {
        operator,
        distribution,
        observables,
        second: None,
        scan: ScanSpec {
            times: args.times.clone(),
            ..ScanSpec::default()
        },
    };
    save_problem(&args.out, &problem)?;
    tracing::info!(path = %args.out.display(), states = args.states, "fixture written");
    Ok(())
}
