mod common;

use common::{assert_close, indicator, reference_chain};
use msm_corr::{
    analyze_correlations, analyze_relaxations, correlations_at, from_json_slice,
    to_canonical_json_bytes, ScanKind, ScanReport, ScanSpec, ValidationOpts, REPORT_SCHEMA,
};
use msm_matrix::DenseOperator;
use nalgebra::{DMatrix, DVector};

fn observables() -> DMatrix<f64> {
    DMatrix::from_columns(&[indicator(10, &[0, 1]), indicator(10, &[3, 4])])
}

fn spec(times: Vec<i64>) -> ScanSpec {
    ScanSpec {
        times,
        validation: ValidationOpts::default(),
    }
}

#[test]
fn correlation_report_is_deterministic() {
    let chain = reference_chain();
    let t = chain.transition_matrix();
    let mu = chain.stationary_distribution();
    let obs = observables();
    let scan = spec(vec![50, 0, 200, 50]);

    let first = analyze_correlations(&t, &mu, &obs, None, &scan).unwrap();
    let second = analyze_correlations(&t, &mu, &obs, None, &scan).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.kind, ScanKind::Correlation);
    assert_eq!(first.schema_version, REPORT_SCHEMA);
    assert_eq!(first.columns, 2);
    assert_eq!(first.checkpoints, 3);
    assert_eq!(first.products, 200);
    assert_eq!(first.values.len(), 4);
    assert_eq!(first.values[0], first.values[3]);
    assert!(!first.provenance.validated);

    let column: DVector<f64> = obs.column(1).into_owned();
    let scalar = correlations_at(&t, &mu, &column, None, &scan.times).unwrap();
    for (row, value) in first.values.iter().zip(scalar) {
        assert_close(row[1], value, 1e-12);
    }
}

#[test]
fn dense_and_sparse_reports_share_operator_hash() {
    let chain = reference_chain();
    let dense = chain.transition_matrix();
    let sparse = chain.sparse_transition_matrix().unwrap();
    let mu = chain.stationary_distribution();
    let obs = observables();
    let scan = spec(vec![1, 2, 3]);

    let a = analyze_relaxations(&dense, &mu, &obs, &scan).unwrap();
    let b = analyze_relaxations(&sparse, &mu, &obs, &scan).unwrap();
    assert_eq!(a.operator_hash, b.operator_hash);
    assert_eq!(a.kind, ScanKind::Relaxation);
    assert_eq!(a.products, 3);
}

#[test]
fn validation_rejects_non_stochastic_operator() {
    let t = DenseOperator::from_rows(&[vec![0.5, 0.4], vec![0.5, 0.5]]).unwrap();
    let p0 = DVector::from_vec(vec![0.5, 0.5]);
    let obs = DMatrix::from_element(2, 1, 1.0);
    let mut scan = spec(vec![1]);

    assert!(analyze_relaxations(&t, &p0, &obs, &scan).is_ok());

    scan.validation.check_stochastic = true;
    let err = analyze_relaxations(&t, &p0, &obs, &scan).unwrap_err();
    assert!(err.is_domain());
    assert_eq!(err.info().code, "row-sum");
}

#[test]
fn validation_rejects_improper_distribution() {
    let chain = reference_chain();
    let t = chain.transition_matrix();
    let p0 = DVector::zeros(10);
    let obs = observables();
    let mut scan = spec(vec![5]);
    scan.validation.check_distribution = true;
    scan.validation.check_stochastic = true;

    let err = analyze_relaxations(&t, &p0, &obs, &scan).unwrap_err();
    assert_eq!(err.info().code, "distribution-sum");

    let mu = chain.stationary_distribution();
    let report = analyze_relaxations(&t, &mu, &obs, &scan).unwrap();
    assert!(report.provenance.validated);
}

#[test]
fn scan_spec_defaults_from_yaml() {
    let scan: ScanSpec = serde_yaml::from_str("times: [3, 1, 2]\n").unwrap();
    assert_eq!(scan.times, vec![3, 1, 2]);
    assert_eq!(scan.validation, ValidationOpts::default());

    let scan: ScanSpec =
        serde_yaml::from_str("times: [0]\nvalidation:\n  check_stochastic: true\n").unwrap();
    assert!(scan.validation.check_stochastic);
    assert!(!scan.validation.check_distribution);
    assert_eq!(scan.validation.tolerance, 1e-10);
}

#[test]
fn report_roundtrips_through_canonical_json() {
    let chain = reference_chain();
    let t = chain.transition_matrix();
    let mu = chain.stationary_distribution();
    let report = analyze_correlations(&t, &mu, &observables(), None, &spec(vec![4, 8])).unwrap();
    let bytes = to_canonical_json_bytes(&report).unwrap();
    let restored: ScanReport = from_json_slice(&bytes).unwrap();
    assert_eq!(restored, report);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("{\"analysis_hash\""));
    assert!(text.contains("\"kind\":\"correlation\""));
}
