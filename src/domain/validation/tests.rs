use super::rules::{self, presets};
use super::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

fn values(value: Value) -> FormValues {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn first_failing_rule_wins() {
    let engine = ValidationEngine::new().field(
        "password",
        [
            rules::required("required"),
            rules::min_length(6, Some("too short")),
            rules::rule(|_, _| Some("never reached".to_string())),
        ],
    );

    assert_eq!(
        engine.validate_field("password", &values(json!({"password": ""}))),
        Some("required".to_string())
    );
    assert_eq!(
        engine.validate_field("password", &values(json!({"password": "abc"}))),
        Some("too short".to_string())
    );
}

#[test]
fn later_rules_are_skipped_after_a_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let engine = ValidationEngine::new().field(
        "name",
        [
            rules::required("required"),
            rules::rule(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            }),
        ],
    );

    engine.validate_field("name", &values(json!({"name": " "})));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    engine.validate_field("name", &values(json!({"name": "ok"})));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn validate_all_reports_only_failing_fields_with_rules() {
    let engine = ValidationEngine::new()
        .field("name", presets::name())
        .field("keyValue", presets::api_key());
    let form = values(json!({
        "name": "",
        "keyValue": "AIzaSyA1234567890abcdefgh",
        "notes": "",
    }));

    let errors = engine.validate_all(&form);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("name").map(String::as_str), Some("Please enter a name"));
    assert!(!errors.contains_key("notes"));
}

#[test]
fn missing_field_is_validated_as_null() {
    let engine = ValidationEngine::new().field("password", presets::password());
    let errors = engine.validate_all(&FormValues::new());
    assert_eq!(
        errors.get("password").map(String::as_str),
        Some("Please enter the password")
    );
}

#[test]
fn cross_field_rule_sees_whole_form() {
    let engine = ValidationEngine::new().field("confirmPassword", presets::confirm_password());

    let mismatch = values(json!({"newPassword": "secret1", "confirmPassword": "secret2"}));
    assert_eq!(
        engine.validate_field("confirmPassword", &mismatch),
        Some("The two passwords do not match".to_string())
    );

    let matching = values(json!({"newPassword": "secret1", "confirmPassword": "secret1"}));
    assert_eq!(engine.validate_field("confirmPassword", &matching), None);
}

#[test]
fn field_without_rules_is_always_valid() {
    let engine = ValidationEngine::new();
    assert!(!engine.has_rules("anything"));
    assert_eq!(
        engine.validate_field("anything", &values(json!({"anything": ""}))),
        None
    );
}

#[test]
fn blank_detection_follows_truthiness() {
    assert!(rules::is_blank(&Value::Null));
    assert!(rules::is_blank(&json!(false)));
    assert!(rules::is_blank(&json!(0)));
    assert!(rules::is_blank(&json!("   ")));
    assert!(!rules::is_blank(&json!("x")));
    assert!(!rules::is_blank(&json!(3)));
    assert!(!rules::is_blank(&json!([])));
}

#[test]
fn length_rules_count_characters() {
    let form = FormValues::new();
    let min = rules::min_length(3, None);
    let max = rules::max_length(3, None);

    assert_eq!(min(&json!("密钥值"), &form), None);
    assert_eq!(min(&json!("ab"), &form), Some("At least 3 characters are required".to_string()));
    assert_eq!(max(&json!("abcd"), &form), Some("At most 3 characters are allowed".to_string()));
    assert_eq!(max(&Value::Null, &form), None);
    assert_eq!(min(&json!(12), &form), None);
}

#[test]
fn email_rule() {
    let form = FormValues::new();
    let check = rules::email("bad email");

    assert_eq!(check(&json!(""), &form), None);
    assert_eq!(check(&json!("ops@example.com"), &form), None);
    for bad in ["ops", "ops@", "@example.com", "ops@example", "o ps@example.com", "a@b@c.d", "ops@.com"] {
        assert_eq!(check(&json!(bad), &form), Some("bad email".to_string()), "{bad}");
    }
}

#[test]
fn api_key_rule() {
    let form = FormValues::new();
    let check = rules::api_key("bad key");

    assert_eq!(check(&json!(""), &form), None);
    assert_eq!(check(&json!("AIzaSy_abcdefghij-1234"), &form), None);
    assert_eq!(check(&json!("short"), &form), Some("bad key".to_string()));
    assert_eq!(check(&json!("AIzaSy abcdefghij 12345"), &form), Some("bad key".to_string()));
}
