//! # This-Validate
//!
//! Per-channel request validation for axum route handlers.
//!
//! ## Features
//!
//! - **Four channels**: body (JSON), query string, route segments and headers
//! - **Pluggable schemas**: serde + `validator` types, declarative field rules, closures
//! - **Fail-fast or accumulate**: 400 on the first failure, or hand every issue to the handler
//! - **Pre-handlers**: auth-style checks with read access to the validated data
//! - **Typed bundle**: the handler receives `Validated<B, Q, S, H>`, shaped at configuration time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use this_validate::prelude::*;
//!
//! #[derive(Deserialize, Validate)]
//! struct CreateUser {
//!     #[validate(length(min = 1))]
//!     name: String,
//! }
//!
//! let config = ValidationConfig::new(Schemas::new().body(Typed::<CreateUser>::new()))
//!     .pre_handler_fn(|parts, _ctx, _bundle| match parts.headers.get("x-api-key") {
//!         Some(_) => Ok(()),
//!         None => Err(HandlerError::with_status("missing api key", StatusCode::UNAUTHORIZED).into()),
//!     });
//!
//! let app: Router = Router::new().route(
//!     "/users",
//!     post(wrap(config, |_req, _ctx, bundle: Validated<CreateUser>| async move {
//!         format!("created {}", bundle.body.map(|u| u.name).unwrap_or_default())
//!     })),
//! );
//! ```
//!
//! A failing channel answers `400` with
//! `{"type": "body", "status": "validation_error", "message": "...", "path": [...]}`.

pub mod config;
pub mod core;
pub mod handler;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{HandlerError, IssueReport, PreHandlerError, ValidationRejection},
        issue::{Channel, Issue, PathSegment, ValidationIssue},
        schema::{Schema, SchemaFn, Typed, schema_fn},
        validation::{FieldRules, filters, validators},
    };

    // === Handlers ===
    pub use crate::handler::{
        PreHandler, RouteContext, Schemas, Validated, ValidatedHandler, ValidationConfig, wrap,
    };

    // === Config ===
    pub use crate::config::ValidationOptions;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use validator::Validate;

    // === Axum ===
    pub use axum::{
        Json, Router,
        extract::Request,
        http::{StatusCode, request::Parts},
        response::{IntoResponse, Response},
        routing::{delete, get, patch, post, put},
    };
}
