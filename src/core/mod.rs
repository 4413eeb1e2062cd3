//! Core module: schema contract, issues, extraction and errors

pub mod error;
pub mod extract;
pub mod issue;
pub mod schema;
pub mod validation;

pub use error::{HandlerError, IssueReport, PreHandlerError, ValidationRejection};
pub use issue::{Channel, Issue, PathSegment, ValidationIssue};
pub use schema::{Schema, SchemaFn, Typed, schema_fn};
pub use validation::FieldRules;
