#![allow(dead_code)]

use msm_matrix::BirthDeathChain;
use nalgebra::DVector;

/// Ten-state chain with a slow birth at state 4 and a slow death at state 6.
pub fn reference_chain() -> BirthDeathChain {
    let mut p = vec![0.0; 10];
    let mut q = vec![0.0; 10];
    for value in p.iter_mut().take(9) {
        *value = 0.5;
    }
    for value in q.iter_mut().skip(1) {
        *value = 0.5;
    }
    p[4] = 0.01;
    q[6] = 0.1;
    BirthDeathChain::new(q, p).unwrap()
}

pub fn indicator(states: usize, support: &[usize]) -> DVector<f64> {
    let mut obs = DVector::zeros(states);
    for &state in support {
        obs[state] = 1.0;
    }
    obs
}

pub fn assert_close(actual: f64, expected: f64, rel: f64) {
    let scale = expected.abs().max(actual.abs()).max(1e-300);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel * scale || diff < 1e-12,
        "values differ: actual={actual} expected={expected} rel={}",
        diff / scale
    );
}

pub fn assert_all_close(actual: &[f64], expected: &[f64], rel: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (a, e) in actual.iter().zip(expected) {
        assert_close(*a, *e, rel);
    }
}
