use msm_core::TransitionOperator;
use msm_matrix::{ensure_distribution, ensure_transition_matrix, BirthDeathChain};
use nalgebra::DMatrix;

fn reference_chain() -> BirthDeathChain {
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

#[test]
fn transition_matrix_is_stochastic_and_tridiagonal() {
    let chain = reference_chain();
    let dense = chain.transition_matrix();
    ensure_transition_matrix(&dense, 1e-12).unwrap();
    let matrix = dense.matrix();
    for row in 0..10usize {
        for col in 0..10usize {
            if row.abs_diff(col) > 1 {
                assert_eq!(matrix[(row, col)], 0.0);
            }
        }
    }
    assert_eq!(matrix[(4, 5)], 0.01);
    assert_eq!(matrix[(6, 5)], 0.1);
    assert_eq!(matrix[(0, 0)], 0.5);
}

#[test]
fn stationary_distribution_is_invariant() {
    let chain = reference_chain();
    let mu = chain.stationary_distribution();
    ensure_distribution("mu", &mu, 1e-12).unwrap();

    let dense = chain.transition_matrix();
    let block = DMatrix::from_column_slice(10, 1, mu.as_slice());
    let advanced = {
        let mut dst = DMatrix::zeros(10, 1);
        dense.propagate_transpose_into(&block, &mut dst);
        dst
    };
    for state in 0..10 {
        assert!((advanced[(state, 0)] - mu[state]).abs() < 1e-14);
    }
}

#[test]
fn sparse_and_dense_fixtures_match() {
    let chain = reference_chain();
    let sparse = chain.sparse_transition_matrix().unwrap();
    assert_eq!(sparse.to_dense(), chain.transition_matrix().into_inner());
    assert_eq!(sparse.nnz(), 22);
}

#[test]
fn invalid_rates_are_rejected() {
    let err = BirthDeathChain::new(vec![0.1, 0.5], vec![0.5, 0.0]).unwrap_err();
    assert_eq!(err.info().code, "boundary-death");

    let err = BirthDeathChain::new(vec![0.0, 0.5], vec![0.5, 0.1]).unwrap_err();
    assert_eq!(err.info().code, "boundary-birth");

    let err = BirthDeathChain::new(vec![0.0, 0.7, 0.5], vec![0.5, 0.6, 0.0]).unwrap_err();
    assert_eq!(err.info().code, "invalid-rates");

    let err = BirthDeathChain::new(vec![0.0, 0.0], vec![0.5, 0.0]).unwrap_err();
    assert_eq!(err.info().code, "reducible-chain");

    let err = BirthDeathChain::new(vec![0.0, 0.5], vec![0.5]).unwrap_err();
    assert!(err.is_shape());
}
