use firetodo_core::config::{AppConfig, ConfigError, DEFAULT_COLLECTION};

const FULL: &str = r#"{
    "firebase": {
        "apiKey": "AIza-test",
        "authDomain": "demo.firebaseapp.com",
        "projectId": "demo",
        "storageBucket": "demo.firebasestorage.app",
        "messagingSenderId": "1234",
        "appId": "1:1234:web:abcd",
        "measurementId": "G-TEST"
    },
    "collection": "tasks"
}"#;

#[test]
fn test_full_config_parses() {
    let config = AppConfig::from_json(FULL).unwrap();
    assert_eq!(config.firebase.project_id, "demo");
    assert_eq!(config.firebase.measurement_id.as_deref(), Some("G-TEST"));
    assert_eq!(config.collection, "tasks");
}

#[test]
fn test_collection_defaults_to_todos() {
    let json = r#"{"firebase": {"apiKey": "k", "authDomain": "d", "projectId": "p", "appId": "a"}}"#;
    let config = AppConfig::from_json(json).unwrap();
    assert_eq!(config.collection, DEFAULT_COLLECTION);
    assert_eq!(config.firebase.storage_bucket, None);
}

#[test]
fn test_empty_api_key_is_rejected() {
    let json = r#"{"firebase": {"apiKey": " ", "authDomain": "d", "projectId": "p", "appId": "a"}}"#;
    match AppConfig::from_json(json) {
        Err(ConfigError::Missing(name)) => assert_eq!(name, "firebase.apiKey"),
        other => panic!("expected missing apiKey, got {other:?}"),
    }
}

#[test]
fn test_missing_field_is_a_parse_error() {
    let json = r#"{"firebase": {"authDomain": "d", "projectId": "p", "appId": "a"}}"#;
    let err = AppConfig::from_json(json).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("apiKey"));
}

#[test]
fn test_round_trips_firebase_keys_in_camel_case() {
    let config = AppConfig::from_json(FULL).unwrap();
    let json = serde_json::to_value(&config.firebase).unwrap();
    assert_eq!(json["apiKey"], "AIza-test");
    assert_eq!(json["messagingSenderId"], "1234");
}
