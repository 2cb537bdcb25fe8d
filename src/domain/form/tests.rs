use super::*;
use crate::domain::validation::rules::{self, presets};
use crate::stores::models::{ChangePasswordRequest, CreateApiKeyRequest};
use serde_json::json;

fn password_form() -> FormController {
    let engine = ValidationEngine::new().field("password", [rules::required("required")]);
    let mut initial = FormValues::new();
    initial.insert("password".to_string(), json!(""));
    FormController::new(initial, engine)
}

#[test]
fn required_password_round_trip() {
    let mut form = password_form();

    assert!(!form.validate());
    assert_eq!(form.error("password"), Some("required"));
    assert!(!form.is_valid());

    form.set_field("password", "secret");
    assert!(form.validate_field("password"));
    assert_eq!(form.error("password"), None);
    assert!(form.is_valid());
}

#[test]
fn validate_field_leaves_other_errors_alone() {
    let engine = ValidationEngine::new()
        .field("a", [rules::required("a required")])
        .field("b", [rules::required("b required")]);
    let mut form = FormController::new(FormValues::new(), engine);

    assert!(!form.validate());
    assert_eq!(form.errors().len(), 2);

    form.set_field("a", "filled");
    form.validate_field("a");

    assert_eq!(form.error("a"), None);
    assert_eq!(form.error("b"), Some("b required"));
    assert!(!form.is_valid());
}

#[test]
fn validate_replaces_errors_wholesale() {
    let engine = ValidationEngine::new().field("name", presets::name());
    let mut form = FormController::new(FormValues::new(), engine);
    assert!(!form.validate());

    form.set_field("name", "primary");
    assert!(form.validate());
    assert!(form.errors().is_empty());
}

#[test]
fn validate_field_without_rules_clears_nothing_else() {
    let engine = ValidationEngine::new().field("name", [rules::required("required")]);
    let mut form = FormController::new(FormValues::new(), engine);
    form.validate();

    assert!(form.validate_field("notes"));
    assert_eq!(form.error("name"), Some("required"));
}

#[test]
fn touched_does_not_affect_validity() {
    let mut form = password_form();
    form.set_touched("password");
    assert!(form.is_touched("password"));
    assert!(form.is_valid());
}

#[test]
fn reset_restores_construction_snapshot() {
    let mut form = password_form();
    form.set_field("password", "changed");
    form.set_field("extra", 1);
    form.set_touched("password");
    form.validate();
    assert!(form.is_dirty());

    form.reset();

    assert_eq!(form.field("password"), Some(&json!("")));
    assert_eq!(form.field("extra"), None);
    assert!(form.errors().is_empty());
    assert!(form.touched().is_empty());
    assert!(!form.is_dirty());
}

#[test]
fn typed_model_binding() {
    let engine = ValidationEngine::new()
        .field("newPassword", presets::new_password())
        .field("confirmPassword", presets::confirm_password());
    let initial = ChangePasswordRequest {
        current_password: "admin".to_string(),
        new_password: String::new(),
    };
    let mut form = FormController::from_model(&initial, engine).unwrap();
    form.set_field("newPassword", "secret1");
    form.set_field("confirmPassword", "secret2");

    assert!(!form.validate());
    assert_eq!(form.error("confirmPassword"), Some("The two passwords do not match"));

    form.set_field("confirmPassword", "secret1");
    assert!(form.validate());

    let request: ChangePasswordRequest = form.to_model().unwrap();
    assert_eq!(request.current_password, "admin");
    assert_eq!(request.new_password, "secret1");
}

#[test]
fn from_model_rejects_non_objects() {
    assert!(FormController::from_model(&"plain", ValidationEngine::new()).is_err());
}

#[test]
fn to_model_reports_shape_mismatch() {
    let form = FormController::new(FormValues::new(), ValidationEngine::new());
    assert!(form.to_model::<CreateApiKeyRequest>().is_err());
}
