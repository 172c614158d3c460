use std::error::Error;

use clap::{ArgAction, Parser, Subcommand};
use commands::expected_counts::{self, ExpectedCountsArgs};
use commands::fixture::{self, FixtureArgs};
use commands::problem::ScanArgs;
use commands::{correlations, relaxations};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "msm", about = "Markov chain correlation and relaxation scans")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Equilibrium correlation functions of the problem's observables.
    Correlations(ScanArgs),
    /// Relaxation of the observables from the problem's initial distribution.
    Relaxations(ScanArgs),
    /// Expected transition counts after a fixed number of steps.
    ExpectedCounts(ExpectedCountsArgs),
    /// Write a birth-death or seeded random problem file.
    Fixture(FixtureArgs),
}

const CRATE_TARGETS: &[&str] = &["msm", "msm_core", "msm_matrix", "msm_corr"];

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let default_filter = CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Correlations(args) => correlations::run(&args),
        Command::Relaxations(args) => relaxations::run(&args),
        Command::ExpectedCounts(args) => expected_counts::run(&args),
        Command::Fixture(args) => fixture::run(&args),
    }
}
