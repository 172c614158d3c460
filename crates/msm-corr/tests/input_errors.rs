mod common;

use common::{indicator, reference_chain};
use msm_corr::{
    correlation_at, correlation_block_at, correlations_at, correlations_block_at, relaxation_at,
    relaxations_at,
};
use nalgebra::{DMatrix, DVector};

#[test]
fn mismatched_lengths_are_shape_errors() {
    let chain = reference_chain();
    let t = chain.transition_matrix();
    let mu = chain.stationary_distribution();
    let short = DVector::zeros(9);
    let obs = indicator(10, &[1]);

    let err = correlation_at(&t, &short, &obs, None, 1).unwrap_err();
    assert!(err.is_shape());
    assert_eq!(err.info().context.get("argument").map(String::as_str), Some("mu"));

    let err = correlation_at(&t, &mu, &short, None, 1).unwrap_err();
    assert_eq!(err.info().context.get("argument").map(String::as_str), Some("obs1"));

    let err = correlations_at(&t, &mu, &obs, Some(&short), &[1, 2]).unwrap_err();
    assert_eq!(err.info().context.get("argument").map(String::as_str), Some("obs2"));

    let err = relaxation_at(&t, &short, &obs, 1).unwrap_err();
    assert_eq!(err.info().context.get("argument").map(String::as_str), Some("p0"));

    let err = relaxations_at(&t, &mu, &short, &[3]).unwrap_err();
    assert_eq!(err.info().context.get("argument").map(String::as_str), Some("obs"));
}

#[test]
fn negative_lags_are_domain_errors() {
    let chain = reference_chain();
    let t = chain.transition_matrix();
    let mu = chain.stationary_distribution();
    let obs = indicator(10, &[1]);

    let err = correlation_at(&t, &mu, &obs, None, -1).unwrap_err();
    assert!(err.is_domain());
    assert_eq!(err.info().code, "negative-lag");

    let err = relaxations_at(&t, &mu, &obs, &[10, 2, -7]).unwrap_err();
    assert!(err.is_domain());
    assert_eq!(err.info().context.get("position").map(String::as_str), Some("2"));
}

#[test]
fn shape_errors_win_over_lag_errors() {
    let chain = reference_chain();
    let t = chain.transition_matrix();
    let short = DVector::zeros(3);
    let obs = indicator(10, &[1]);
    let err = correlations_at(&t, &short, &obs, None, &[-1]).unwrap_err();
    assert!(err.is_shape());
}

#[test]
fn block_column_counts_must_agree() {
    let chain = reference_chain();
    let t = chain.transition_matrix();
    let mu = chain.stationary_distribution();
    let two = DMatrix::from_element(10, 2, 0.5);
    let three = DMatrix::from_element(10, 3, 0.5);
    let empty = DMatrix::zeros(10, 0);

    let err = correlations_block_at(&t, &mu, &two, Some(&three), &[1]).unwrap_err();
    assert_eq!(err.info().code, "column-mismatch");

    let err = correlation_block_at(&t, &mu, &empty, None, 1).unwrap_err();
    assert_eq!(err.info().code, "zero-columns");
}
