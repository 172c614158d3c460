use msm_core::SchemaVersion;

const CURRENT: SchemaVersion = SchemaVersion::new(1, 2, 0);

#[test]
fn versions_order_by_major_minor_patch() {
    assert!(SchemaVersion::new(1, 0, 9) < CURRENT);
    assert!(CURRENT < SchemaVersion::new(2, 0, 0));
    assert_eq!(CURRENT, SchemaVersion::new(1, 2, 0));
}

#[test]
fn version_serializes_as_named_fields() {
    let json = serde_json::to_string(&CURRENT).unwrap();
    assert_eq!(json, r#"{"major":1,"minor":2,"patch":0}"#);
    let restored: SchemaVersion = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, CURRENT);
}
