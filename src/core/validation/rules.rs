//! Declarative field rules over JSON objects
//!
//! [`FieldRules`] is a [`Schema`] built from the reusable
//! [validators](super::validators) and [filters](super::filters):
//!
//! ```rust,ignore
//! use this_validate::core::validation::{FieldRules, filters, validators};
//!
//! let rules = FieldRules::new()
//!     .filter("name", filters::trim())
//!     .field("name", validators::required())
//!     .field("name", validators::string_length(1, 50))
//!     .field("status", validators::in_list(vec!["active".into(), "archived".into()]));
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::issue::Issue;
use crate::core::schema::Schema;

type ValidatorFn = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;
type FilterFn = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

#[derive(Clone, Default)]
struct FieldSpec {
    filters: Vec<FilterFn>,
    validators: Vec<ValidatorFn>,
}

/// Ordered set of per-field filters and validators
#[derive(Clone, Default)]
pub struct FieldRules {
    fields: IndexMap<String, FieldSpec>,
    allow_unknown: bool,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to a field
    ///
    /// Fields are checked in the order they are first declared; a field stops
    /// at its first failing validator.
    pub fn field<V>(mut self, name: &str, validator: V) -> Self
    where
        V: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.fields
            .entry(name.to_string())
            .or_default()
            .validators
            .push(Arc::new(validator));
        self
    }

    /// Add a filter to a field, applied before its validators
    pub fn filter<F>(mut self, name: &str, filter: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.fields
            .entry(name.to_string())
            .or_default()
            .filters
            .push(Arc::new(filter));
        self
    }

    /// Keep fields that have no rules instead of dropping them
    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    /// Names of the declared fields, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Filter then validate an object, returning the filtered object
    pub fn validate_and_filter(&self, payload: &Value) -> Result<Value, Vec<Issue>> {
        let Some(object) = payload.as_object() else {
            return Err(vec![Issue::new("Expected an object")]);
        };

        let mut output = Map::new();
        let mut issues = Vec::new();

        if self.allow_unknown {
            for (key, value) in object {
                if !self.fields.contains_key(key) {
                    output.insert(key.clone(), value.clone());
                }
            }
        }

        for (name, spec) in &self.fields {
            let raw = object.get(name).cloned().unwrap_or(Value::Null);

            let value = match spec.filters.iter().try_fold(raw, |value, filter| filter(value)) {
                Ok(value) => value,
                Err(e) => {
                    issues.push(Issue::at(e.to_string(), [name.as_str()]));
                    continue;
                }
            };

            if let Some(message) = spec.validators.iter().find_map(|v| v(&value).err()) {
                issues.push(Issue::at(message, [name.as_str()]));
                continue;
            }

            if !value.is_null() {
                output.insert(name.clone(), value);
            }
        }

        if issues.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(issues)
        }
    }
}

impl Schema for FieldRules {
    type Output = Value;

    fn safe_parse(&self, input: &Value) -> Result<Value, Vec<Issue>> {
        self.validate_and_filter(input)
    }
}
