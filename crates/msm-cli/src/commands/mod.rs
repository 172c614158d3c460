pub mod correlations;
pub mod expected_counts;
pub mod fixture;
pub mod problem;
pub mod relaxations;
