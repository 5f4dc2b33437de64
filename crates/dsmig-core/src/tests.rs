use super::*;

#[test]
fn parse_full_descriptor() {
    let raw = r#"{
        "method": "put",
        "uri": "users",
        "body": { "settings": { "number_of_shards": 1 } },
        "rollback": { "method": "DELETE", "uri": "users" }
    }"#;
    let operation = Operation::from_descriptor("20200101120000_create_users", raw)
        .expect("descriptor must parse");

    assert_eq!(operation.id, "20200101120000_create_users");
    assert_eq!(operation.method, Method::Put);
    assert_eq!(operation.uri, "users");
    assert!(operation.body.contains_key("settings"));
    assert_eq!(operation.rollback.method, Some(Method::Delete));
    assert_eq!(operation.rollback.uri, "users");
    assert!(operation.rollback.has_spec());
}

#[test]
fn parse_minimal_descriptor_defaults_body_and_rollback() {
    let operation = Operation::from_descriptor("op", r#"{ "method": "GET", "uri": "_cat/indices" }"#)
        .expect("descriptor must parse");

    assert!(operation.body.is_empty());
    assert_eq!(operation.rollback, RollbackSpec::default());
    assert!(!operation.rollback.has_spec());
}

#[test]
fn method_is_case_insensitive_on_input() {
    for raw in ["get", "GET", "Get", "gEt"] {
        assert_eq!(raw.parse::<Method>().expect("must parse"), Method::Get);
    }
}

#[test]
fn method_rejects_unsupported_verbs() {
    let raw = r#"{ "method": "PATCH", "uri": "users" }"#;
    assert!(Operation::from_descriptor("op", raw).is_err());
    assert!("OPTIONS".parse::<Method>().is_err());
}

#[test]
fn method_serializes_uppercase() {
    let value = serde_json::to_value(Method::Delete).expect("must serialize");
    assert_eq!(value, serde_json::json!("DELETE"));
}

#[test]
fn descriptor_id_never_comes_from_the_document() {
    let raw = r#"{ "method": "GET", "uri": "users", "id": "embedded" }"#;
    let operation = Operation::from_descriptor("from_filename", raw).expect("descriptor must parse");
    assert_eq!(operation.id, "from_filename");
}

#[test]
fn rollback_spec_needs_both_method_and_uri() {
    let method_only = RollbackSpec {
        method: Some(Method::Delete),
        ..RollbackSpec::default()
    };
    let uri_only = RollbackSpec {
        uri: "users".to_string(),
        ..RollbackSpec::default()
    };
    assert!(!method_only.has_spec());
    assert!(!uri_only.has_spec());
}

#[test]
fn malformed_descriptor_is_a_parse_error() {
    assert!(Operation::from_descriptor("op", "{ not json").is_err());
    assert!(Operation::from_descriptor("op", r#"{ "uri": "users" }"#).is_err());
}
