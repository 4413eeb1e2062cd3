//! Typed errors and the responses they turn into
//!
//! # Error Categories
//!
//! - [`ValidationRejection`]: first failing channel in fail-fast mode (400)
//! - [`IssueReport`]: every accumulated issue, for handlers running without
//!   fail-fast (400)
//! - [`HandlerError`]: explicit rejection raised by a pre-handler
//! - [`PreHandlerError`]: everything a pre-handler can return
//!
//! # Example
//!
//! ```rust,ignore
//! async fn run(&self, parts: &Parts, _: &RouteContext<()>, _: &Validated) -> Result<(), PreHandlerError> {
//!     if parts.headers.get("authorization").is_none() {
//!         return Err(HandlerError::json(json!({ "error": "unauthorized" }), StatusCode::UNAUTHORIZED).into());
//!     }
//!     Ok(())
//! }
//! ```

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

use super::issue::{Channel, PathSegment, ValidationIssue};

/// Value of the `status` field in validation error payloads
pub const VALIDATION_ERROR: &str = "validation_error";

/// Value of the `status` field when a pre-handler fails without a message
pub const PRE_HANDLER_ERROR: &str = "pre_handler_error";

// =============================================================================
// Validation Errors
// =============================================================================

/// Fail-fast rejection naming the failing channel and its first issue
///
/// Serializes as `{type, status: "validation_error", message, path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRejection {
    #[serde(rename = "type")]
    pub channel: Channel,
    pub status: &'static str,
    pub message: String,
    pub path: Vec<PathSegment>,
}

impl ValidationRejection {
    pub fn new(channel: Channel, message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            channel,
            status: VALIDATION_ERROR,
            message: message.into(),
            path,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<ValidationIssue> for ValidationRejection {
    fn from(issue: ValidationIssue) -> Self {
        Self::new(issue.channel, issue.message, issue.path)
    }
}

impl fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.channel, self.message)
    }
}

impl std::error::Error for ValidationRejection {}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// All issues accumulated in a bundle
///
/// Serializes as `{status: "validation_error", issues: [{channel, message, path}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReport {
    pub status: &'static str,
    pub issues: Vec<ValidationIssue>,
}

impl IssueReport {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self {
            status: VALIDATION_ERROR,
            issues,
        }
    }
}

impl IntoResponse for IssueReport {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

// =============================================================================
// Pre-handler Errors
// =============================================================================

/// Error a pre-handler raises to reject the request with a specific response
///
/// The message is sent as JSON when it parses as JSON, as plain text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
    pub status: StatusCode,
}

impl HandlerError {
    /// Rejection with status 400
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_status(message, StatusCode::BAD_REQUEST)
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Rejection carrying a JSON payload
    pub fn json(payload: Value, status: StatusCode) -> Self {
        Self::with_status(payload.to_string(), status)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        message_response(self.status, self.message)
    }
}

/// Failure outcome of a pre-handler
#[derive(Debug, thiserror::Error)]
pub enum PreHandlerError {
    /// Explicit rejection: its own status and message
    #[error(transparent)]
    Rejected(#[from] HandlerError),

    /// Any other error: status 400 with the error's message
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl PreHandlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PreHandlerError::Rejected(e) => e.status_code(),
            PreHandlerError::Failed(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Response for a pre-handler that failed without producing an error value
    pub fn generic_response() -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": PRE_HANDLER_ERROR,
                "message": "Pre-handler failed"
            })),
        )
            .into_response()
    }
}

impl IntoResponse for PreHandlerError {
    fn into_response(self) -> Response {
        match self {
            PreHandlerError::Rejected(e) => e.into_response(),
            PreHandlerError::Failed(e) => message_response(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }
}

/// JSON body when the message parses as JSON, plain text otherwise
fn message_response(status: StatusCode, message: String) -> Response {
    match serde_json::from_str::<Value>(&message) {
        Ok(payload) => (status, Json(payload)).into_response(),
        Err(_) => (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response(),
    }
}
