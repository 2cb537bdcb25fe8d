//! Usage: Form state (field values, touched set, error map) on top of `ValidationEngine`.

use super::validation::{ErrorMap, FormValues, ValidationEngine};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct FormController {
    initial: FormValues,
    form: FormValues,
    engine: ValidationEngine,
    errors: ErrorMap,
    touched: BTreeSet<String>,
}

impl FormController {
    /// Takes a snapshot of `initial`; later `reset()` calls restore exactly this.
    pub fn new(initial: FormValues, engine: ValidationEngine) -> Self {
        Self {
            form: initial.clone(),
            initial,
            engine,
            errors: ErrorMap::new(),
            touched: BTreeSet::new(),
        }
    }

    /// Builds a form from any struct that serializes to a JSON object.
    pub fn from_model<T: Serialize>(model: &T, engine: ValidationEngine) -> Result<Self, String> {
        match serde_json::to_value(model) {
            Ok(Value::Object(initial)) => Ok(Self::new(initial, engine)),
            Ok(other) => Err(format!("form model must serialize to an object, got {other}")),
            Err(e) => Err(format!("failed to serialize form model: {e}")),
        }
    }

    pub fn to_model<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(Value::Object(self.form.clone()))
            .map_err(|e| format!("failed to read form model: {e}"))
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.form.get(name)
    }

    /// The only way field values change. Does not validate.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.form.insert(name.into(), value.into());
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn touched(&self) -> &BTreeSet<String> {
        &self.touched
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn set_touched(&mut self, name: impl Into<String>) {
        self.touched.insert(name.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.form != self.initial
    }

    /// Replaces the whole error map. Returns whether the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = self.engine.validate_all(&self.form);
        self.is_valid()
    }

    /// Updates only `name`'s entry; other fields keep their errors.
    pub fn validate_field(&mut self, name: &str) -> bool {
        match self.engine.validate_field(name, &self.form) {
            Some(message) => {
                self.errors.insert(name.to_string(), message);
                false
            }
            None => {
                self.errors.remove(name);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.form = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
    }
}

#[cfg(test)]
mod tests;
