//! Pre-handlers: checks that run after validation and before the handler
//!
//! A pre-handler sees the request head, the route context and the validated
//! bundle (read-only). Returning an error short-circuits the request:
//!
//! - `Err(HandlerError)` responds with its own status and message
//! - `Err(anyhow::Error)` responds 400 with the error message
//! - a panic responds 400 with a generic payload

use async_trait::async_trait;
use axum::http::request::Parts;
use serde_json::Value;

use super::bundle::{RouteContext, Validated};
use crate::core::error::PreHandlerError;

/// Async check run before the wrapped handler
///
/// # Example
///
/// ```rust,ignore
/// struct RequireApiKey;
///
/// #[async_trait]
/// impl PreHandler<CreateUser> for RequireApiKey {
///     async fn run(
///         &self,
///         request: &Parts,
///         _context: &RouteContext,
///         _bundle: &Validated<CreateUser>,
///     ) -> Result<(), PreHandlerError> {
///         match request.headers.get("x-api-key") {
///             Some(_) => Ok(()),
///             None => Err(HandlerError::with_status("missing api key", StatusCode::UNAUTHORIZED).into()),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait PreHandler<B = Value, Q = Value, S = Value, H = Value, St = ()>:
    Send + Sync + 'static
{
    async fn run(
        &self,
        request: &Parts,
        context: &RouteContext<St>,
        bundle: &Validated<B, Q, S, H>,
    ) -> Result<(), PreHandlerError>;
}

/// Pre-handler backed by a synchronous closure
pub struct PreHandlerFn<F> {
    f: F,
}

impl<F> PreHandlerFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, B, Q, S, H, St> PreHandler<B, Q, S, H, St> for PreHandlerFn<F>
where
    F: Fn(&Parts, &RouteContext<St>, &Validated<B, Q, S, H>) -> Result<(), PreHandlerError>
        + Send
        + Sync
        + 'static,
    B: Sync + 'static,
    Q: Sync + 'static,
    S: Sync + 'static,
    H: Sync + 'static,
    St: Sync + 'static,
{
    async fn run(
        &self,
        request: &Parts,
        context: &RouteContext<St>,
        bundle: &Validated<B, Q, S, H>,
    ) -> Result<(), PreHandlerError> {
        (self.f)(request, context, bundle)
    }
}
