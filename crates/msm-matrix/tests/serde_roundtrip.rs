use msm_core::TransitionOperator;
use msm_matrix::{
    operator_from_bytes, operator_from_json, operator_to_bytes, operator_to_json, BirthDeathChain,
    OperatorSpec,
};

fn chain() -> BirthDeathChain {
    BirthDeathChain::new(vec![0.0, 0.3, 0.2, 0.4], vec![0.6, 0.1, 0.5, 0.0]).unwrap()
}

#[test]
fn dense_spec_roundtrips_through_json() {
    let op = chain().transition_matrix();
    let spec = OperatorSpec::dense_from(&op);
    let json = operator_to_json(&spec).unwrap();
    assert!(json.contains("\"format\": \"dense\""));
    let restored = operator_from_json(&json).unwrap();
    assert_eq!(restored, spec);
    let rebuilt = restored.build().unwrap();
    assert_eq!(rebuilt.to_dense(), op.to_dense());
}

#[test]
fn sparse_spec_roundtrips_through_json() {
    let op = chain().sparse_transition_matrix().unwrap();
    let spec = OperatorSpec::sparse_from(&op);
    let json = operator_to_json(&spec).unwrap();
    assert!(json.contains("\"format\": \"sparse\""));
    let rebuilt = operator_from_json(&json).unwrap().build().unwrap();
    assert_eq!(rebuilt.entries(), op.entries());
}

#[test]
fn binary_roundtrip_preserves_entries() {
    let op = chain().transition_matrix();
    let bytes = operator_to_bytes(&op).unwrap();
    let restored = operator_from_bytes(&bytes).unwrap();
    assert_eq!(restored.num_states(), 4);
    assert_eq!(restored.entries(), op.entries());
}

#[test]
fn malformed_payloads_surface_serde_errors() {
    let err = operator_from_json("{\"format\": \"banded\"}").unwrap_err();
    assert_eq!(err.info().code, "deserialize-json");

    let err = operator_from_bytes(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.info().code, "deserialize-bytes");
}
