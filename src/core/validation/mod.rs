//! Declarative validation and filtering
//!
//! Field-level [validators] and [filters] composed into [`FieldRules`], a
//! ready-made [`Schema`](crate::core::schema::Schema) for JSON objects.

pub mod filters;
pub mod rules;
pub mod validators;

pub use rules::FieldRules;
