//! Usage: Reusable validation rules and the preset chains used by the console forms.

use super::{FormValues, Rule};
use serde_json::Value;
use std::sync::Arc;

pub fn rule(check: impl Fn(&Value, &FormValues) -> Option<String> + Send + Sync + 'static) -> Rule {
    Arc::new(check)
}

/// Missing, `null`, `false`, `0`, and blank strings count as empty.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

pub fn required(message: impl Into<String>) -> Rule {
    let message = message.into();
    rule(move |value, _| is_blank(value).then(|| message.clone()))
}

/// Empty values fail too; values without a length (numbers, objects) pass.
pub fn min_length(min: usize, message: Option<&str>) -> Rule {
    let message = message
        .map(str::to_string)
        .unwrap_or_else(|| format!("At least {min} characters are required"));
    rule(move |value, _| {
        if is_blank(value) {
            return Some(message.clone());
        }
        match length_of(value) {
            Some(len) if len < min => Some(message.clone()),
            _ => None,
        }
    })
}

pub fn max_length(max: usize, message: Option<&str>) -> Rule {
    let message = message
        .map(str::to_string)
        .unwrap_or_else(|| format!("At most {max} characters are allowed"));
    rule(move |value, _| match length_of(value) {
        Some(len) if len > max => Some(message.clone()),
        _ => None,
    })
}

/// `local@domain.tld` shape check; empty values are left to `required`.
pub fn email(message: impl Into<String>) -> Rule {
    let message = message.into();
    rule(move |value, _| {
        if is_blank(value) {
            return None;
        }
        let valid = value.as_str().is_some_and(looks_like_email);
        (!valid).then(|| message.clone())
    })
}

fn looks_like_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < domain.len())
}

/// Cross-field equality, e.g. a confirmation field against `newPassword`.
pub fn matches_field(other: impl Into<String>, message: impl Into<String>) -> Rule {
    let other = other.into();
    let message = message.into();
    rule(move |value, form| {
        let expected = form.get(&other).unwrap_or(&Value::Null);
        (value != expected).then(|| message.clone())
    })
}

/// At least 20 characters from `[A-Za-z0-9_-]`; empty values pass.
pub fn api_key(message: impl Into<String>) -> Rule {
    let message = message.into();
    rule(move |value, _| {
        if is_blank(value) {
            return None;
        }
        let valid = value.as_str().is_some_and(|key| {
            key.chars().count() >= 20
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });
        (!valid).then(|| message.clone())
    })
}

pub mod presets {
    use super::*;

    pub const PASSWORD_MIN_LENGTH: usize = 6;
    pub const NAME_MAX_LENGTH: usize = 50;

    pub fn password() -> Vec<Rule> {
        vec![
            required("Please enter the password"),
            min_length(PASSWORD_MIN_LENGTH, Some("Password must be at least 6 characters")),
        ]
    }

    pub fn new_password() -> Vec<Rule> {
        vec![
            required("Please enter a new password"),
            min_length(PASSWORD_MIN_LENGTH, Some("Password must be at least 6 characters")),
        ]
    }

    pub fn confirm_password() -> Vec<Rule> {
        vec![
            required("Please confirm the password"),
            matches_field("newPassword", "The two passwords do not match"),
        ]
    }

    pub fn api_key() -> Vec<Rule> {
        vec![
            required("Please enter an API key"),
            super::api_key("Please enter a valid API key"),
        ]
    }

    pub fn name() -> Vec<Rule> {
        vec![
            required("Please enter a name"),
            max_length(NAME_MAX_LENGTH, Some("Name must not exceed 50 characters")),
        ]
    }
}
