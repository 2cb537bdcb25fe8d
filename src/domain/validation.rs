//! Usage: Ordered per-field rule chains (first failing rule wins).

pub mod rules;

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Field name -> current value.
pub type FormValues = Map<String, Value>;

/// Field name -> error message. A missing key means the field is valid.
pub type ErrorMap = BTreeMap<String, String>;

/// A pure check of one value against the whole form. Rules may run many times
/// for the same value (full and per-field validation), so they must not have
/// side effects.
pub type Rule = Arc<dyn Fn(&Value, &FormValues) -> Option<String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ValidationEngine {
    fields: BTreeMap<String, Vec<Rule>>,
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .fields
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.len()))
            .collect();
        f.debug_struct("ValidationEngine")
            .field("fields", &counts)
            .finish()
    }
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rules` to the chain of `field`, keeping declaration order.
    pub fn field(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.entry(field.into()).or_default().extend(rules);
        self
    }

    pub fn has_rules(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|rules| !rules.is_empty())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Runs the chain of `field` against its value in `form`; absent values
    /// are checked as `null`.
    pub fn validate_field(&self, field: &str, form: &FormValues) -> Option<String> {
        let rules = self.fields.get(field)?;
        let value = form.get(field).unwrap_or(&Value::Null);
        rules.iter().find_map(|rule| rule(value, form))
    }

    /// Recomputes every declared field from scratch.
    pub fn validate_all(&self, form: &FormValues) -> ErrorMap {
        self.fields
            .keys()
            .filter_map(|field| {
                self.validate_field(field, form)
                    .map(|message| (field.clone(), message))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
