//! Schema contract and the built-in schema adapters
//!
//! Anything implementing [`Schema`] can guard a channel. The crate ships:
//!
//! - [`Typed`]: serde deserialization into a Rust type, optionally followed by
//!   `validator::Validate`
//! - [`FieldRules`](crate::core::validation::FieldRules): declarative rules over
//!   JSON objects
//! - [`schema_fn`]: any closure

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use std::borrow::Cow;
use std::marker::PhantomData;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::issue::{Issue, PathSegment};

/// A schema capable of a "safe parse": either typed data or a list of issues
///
/// Implementations must not panic on malformed input; every problem is
/// reported as an [`Issue`].
pub trait Schema: Send + Sync + 'static {
    /// Typed value produced on success
    type Output;

    fn safe_parse(&self, input: &Value) -> Result<Self::Output, Vec<Issue>>;
}

/// Schema backed by serde (and optionally `validator`)
///
/// # Usage
///
/// ```rust,ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(email)]
///     email: String,
/// }
///
/// let schemas = Schemas::new().body(Typed::<CreateUser>::new());
/// ```
pub struct Typed<T> {
    validate: Option<fn(&T) -> Result<(), ValidationErrors>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T>
where
    T: DeserializeOwned + Validate,
{
    /// Deserialize, then run the type's `validator` rules
    pub fn new() -> Self {
        Self {
            validate: Some(|value: &T| value.validate()),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Typed<T>
where
    T: DeserializeOwned + Validate,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Typed<T>
where
    T: DeserializeOwned,
{
    /// Deserialize only; the shape of `T` is the whole contract
    pub fn deserialize_only() -> Self {
        Self {
            validate: None,
            _marker: PhantomData,
        }
    }
}

impl<T> Schema for Typed<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    type Output = T;

    fn safe_parse(&self, input: &Value) -> Result<T, Vec<Issue>> {
        let value: T =
            serde_path_to_error::deserialize(input).map_err(|e| vec![issue_from_serde(&e)])?;

        if let Some(validate) = self.validate {
            validate(&value).map_err(|errors| issues_from_validator(&errors))?;
        }

        Ok(value)
    }
}

/// Map a serde error to an issue at the path where deserialization stopped
///
/// A missing field is reported as `Required` one level below that path, so
/// `{"address": {}}` points at `address.city`.
fn issue_from_serde(error: &serde_path_to_error::Error<serde_json::Error>) -> Issue {
    let mut path: Vec<PathSegment> = error
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(PathSegment::Index(*index)),
            Segment::Map { key } => Some(PathSegment::Key(key.clone())),
            Segment::Enum { variant } => Some(PathSegment::Key(variant.clone())),
            Segment::Unknown => None,
        })
        .collect();

    let message = error.inner().to_string();
    match message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        Some(field) => {
            path.push(PathSegment::Key(field.to_string()));
            Issue {
                message: "Required".to_string(),
                path,
            }
        }
        None => Issue { message, path },
    }
}

/// Flatten `validator` errors into issues, sorted by path
pub fn issues_from_validator(errors: &ValidationErrors) -> Vec<Issue> {
    let mut issues = Vec::new();
    collect_validator_issues(errors, &[], &mut issues);
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues
}

fn collect_validator_issues(
    errors: &ValidationErrors,
    prefix: &[PathSegment],
    out: &mut Vec<Issue>,
) {
    for (field, kind) in errors.errors() {
        let mut path = prefix.to_vec();
        // Struct-level validations are reported under `__all__`
        if field != "__all__" {
            path.push(PathSegment::Key(field.to_string()));
        }

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => default_message(&error.code),
                    };
                    out.push(Issue {
                        message,
                        path: path.clone(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validator_issues(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let mut item_path = path.clone();
                    item_path.push(PathSegment::Index(*index));
                    collect_validator_issues(nested, &item_path, out);
                }
            }
        }
    }
}

fn default_message(code: &Cow<'static, str>) -> String {
    match code.as_ref() {
        "email" => "Invalid email".to_string(),
        "url" => "Invalid url".to_string(),
        "length" => "Invalid length".to_string(),
        "range" => "Value out of range".to_string(),
        "required" => "Required".to_string(),
        "regex" => "Invalid format".to_string(),
        other => format!("Invalid value ({})", other),
    }
}

/// Schema built from a closure
pub struct SchemaFn<F> {
    f: F,
}

/// Wrap a closure as a [`Schema`]
///
/// ```rust,ignore
/// let tenant = schema_fn(|value: &Value| {
///     value["x-tenant"]
///         .as_str()
///         .map(str::to_string)
///         .ok_or_else(|| vec![Issue::at("Required", ["x-tenant"])])
/// });
/// ```
pub fn schema_fn<F, T>(f: F) -> SchemaFn<F>
where
    F: Fn(&Value) -> Result<T, Vec<Issue>> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    SchemaFn { f }
}

impl<F, T> Schema for SchemaFn<F>
where
    F: Fn(&Value) -> Result<T, Vec<Issue>> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    type Output = T;

    fn safe_parse(&self, input: &Value) -> Result<T, Vec<Issue>> {
        (self.f)(input)
    }
}
