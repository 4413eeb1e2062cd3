//! The validating handler wrapper
//!
//! [`wrap`] turns a [`ValidationConfig`] and a handler into a
//! [`ValidatedHandler`], which implements axum's [`Handler`] and mounts like
//! any other handler:
//!
//! ```rust,ignore
//! let config = ValidationConfig::new(
//!     Schemas::new()
//!         .body(Typed::<CreateUser>::new())
//!         .segment(Typed::<OrgPath>::deserialize_only()),
//! );
//!
//! let app = Router::new().route(
//!     "/orgs/{org}/users",
//!     post(wrap(config, |_req, _ctx, bundle: Validated<CreateUser, Value, OrgPath>| async move {
//!         Json(bundle.body)
//!     })),
//! );
//! ```
//!
//! Channels are processed in a fixed order: body, segment, query, headers.

use axum::body::Body;
use axum::extract::Request;
use axum::handler::Handler;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::bundle::{RouteContext, Validated};
use super::pre_handler::{PreHandler, PreHandlerFn};
use crate::config::ValidationOptions;
use crate::core::error::{PreHandlerError, ValidationRejection};
use crate::core::extract;
use crate::core::issue::{Channel, Issue, ValidationIssue};
use crate::core::schema::Schema;

type SchemaRef<T> = Arc<dyn Schema<Output = T>>;

/// Schemas per channel
///
/// Attaching a schema fixes the bundle's type for that channel, so the shape
/// of [`Validated`] is decided here rather than per request.
pub struct Schemas<B = Value, Q = Value, S = Value, H = Value> {
    body: Option<SchemaRef<B>>,
    query: Option<SchemaRef<Q>>,
    segment: Option<SchemaRef<S>>,
    headers: Option<SchemaRef<H>>,
}

impl Schemas {
    /// No channel validated
    pub fn new() -> Self {
        Self {
            body: None,
            query: None,
            segment: None,
            headers: None,
        }
    }
}

impl Default for Schemas {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, Q, S, H> Clone for Schemas<B, Q, S, H> {
    fn clone(&self) -> Self {
        Self {
            body: self.body.clone(),
            query: self.query.clone(),
            segment: self.segment.clone(),
            headers: self.headers.clone(),
        }
    }
}

impl<B, Q, S, H> Schemas<B, Q, S, H> {
    pub fn body<T: Schema>(self, schema: T) -> Schemas<T::Output, Q, S, H> {
        Schemas {
            body: Some(Arc::new(schema)),
            query: self.query,
            segment: self.segment,
            headers: self.headers,
        }
    }

    pub fn query<T: Schema>(self, schema: T) -> Schemas<B, T::Output, S, H> {
        Schemas {
            body: self.body,
            query: Some(Arc::new(schema)),
            segment: self.segment,
            headers: self.headers,
        }
    }

    pub fn segment<T: Schema>(self, schema: T) -> Schemas<B, Q, T::Output, H> {
        Schemas {
            body: self.body,
            query: self.query,
            segment: Some(Arc::new(schema)),
            headers: self.headers,
        }
    }

    pub fn headers<T: Schema>(self, schema: T) -> Schemas<B, Q, S, T::Output> {
        Schemas {
            body: self.body,
            query: self.query,
            segment: self.segment,
            headers: Some(Arc::new(schema)),
        }
    }

    /// Whether a schema is attached to `channel`
    pub fn has(&self, channel: Channel) -> bool {
        match channel {
            Channel::Body => self.body.is_some(),
            Channel::Query => self.query.is_some(),
            Channel::Segment => self.segment.is_some(),
            Channel::Headers => self.headers.is_some(),
        }
    }
}

/// Schemas, optional pre-handler and options for one route
pub struct ValidationConfig<B = Value, Q = Value, S = Value, H = Value, St = ()> {
    schemas: Schemas<B, Q, S, H>,
    pre_handler: Option<Arc<dyn PreHandler<B, Q, S, H, St>>>,
    options: ValidationOptions,
}

impl<B, Q, S, H, St> ValidationConfig<B, Q, S, H, St> {
    pub fn new(schemas: Schemas<B, Q, S, H>) -> Self {
        Self {
            schemas,
            pre_handler: None,
            options: ValidationOptions::default(),
        }
    }

    pub fn pre_handler<P>(mut self, pre_handler: P) -> Self
    where
        P: PreHandler<B, Q, S, H, St>,
    {
        self.pre_handler = Some(Arc::new(pre_handler));
        self
    }

    /// Use a synchronous closure as pre-handler
    pub fn pre_handler_fn<F>(self, f: F) -> Self
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
        self.pre_handler(PreHandlerFn::new(f))
    }

    pub fn options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for toggling `fail_fast_with_400`
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.options.fail_fast_with_400 = enabled;
        self
    }

    pub fn schemas(&self) -> &Schemas<B, Q, S, H> {
        &self.schemas
    }

    pub fn validation_options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Same as [`wrap`]
    pub fn wrap<F, Fut, R>(self, handler: F) -> ValidatedHandler<B, Q, S, H, St, F>
    where
        F: Fn(Request, RouteContext<St>, Validated<B, Q, S, H>) -> Fut
            + Clone
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        wrap(self, handler)
    }

    /// Store a channel outcome in its slot, or turn it into a rejection
    ///
    /// Returns `Err` only in fail-fast mode.
    fn record<T>(
        &self,
        channel: Channel,
        outcome: Result<T, Vec<Issue>>,
        slot: &mut Option<T>,
        issues: &mut Vec<ValidationIssue>,
    ) -> Result<(), ValidationRejection> {
        let mut found = match outcome {
            Ok(value) => {
                *slot = Some(value);
                return Ok(());
            }
            Err(found) => found,
        };

        if found.is_empty() {
            found.push(Issue::new("Invalid input"));
        }

        tracing::debug!(
            channel = %channel,
            path = ?found[0].path,
            issues = found.len(),
            "request validation failed"
        );

        if self.options.fail_fast_with_400 {
            let first = found.swap_remove(0);
            return Err(first.in_channel(channel).into());
        }

        issues.extend(found.into_iter().map(|issue| issue.in_channel(channel)));
        Ok(())
    }
}

/// Wrap `handler` so it only runs on requests that pass `config`
///
/// The handler receives the request (body re-attached if it was read), the
/// route context and the validated bundle.
pub fn wrap<B, Q, S, H, St, F, Fut, R>(
    config: ValidationConfig<B, Q, S, H, St>,
    handler: F,
) -> ValidatedHandler<B, Q, S, H, St, F>
where
    F: Fn(Request, RouteContext<St>, Validated<B, Q, S, H>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    ValidatedHandler {
        config: Arc::new(config),
        handler,
    }
}

/// Handler produced by [`wrap`]
pub struct ValidatedHandler<B, Q, S, H, St, F> {
    config: Arc<ValidationConfig<B, Q, S, H, St>>,
    handler: F,
}

impl<B, Q, S, H, St, F: Clone> Clone for ValidatedHandler<B, Q, S, H, St, F> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            handler: self.handler.clone(),
        }
    }
}

impl<B, Q, S, H, St, F, Fut, R> Handler<(), St> for ValidatedHandler<B, Q, S, H, St, F>
where
    B: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    S: Send + Sync + 'static,
    H: Send + Sync + 'static,
    St: Clone + Send + Sync + 'static,
    F: Fn(Request, RouteContext<St>, Validated<B, Q, S, H>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    type Future = BoxFuture<'static, Response>;

    fn call(self, req: Request, state: St) -> Self::Future {
        Box::pin(self.handle(req, state))
    }
}

impl<B, Q, S, H, St, F, Fut, R> ValidatedHandler<B, Q, S, H, St, F>
where
    B: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    S: Send + Sync + 'static,
    H: Send + Sync + 'static,
    St: Clone + Send + Sync + 'static,
    F: Fn(Request, RouteContext<St>, Validated<B, Q, S, H>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    async fn handle(self, req: Request, state: St) -> Response {
        let Self { config, handler } = self;
        let schemas = &config.schemas;

        let (mut parts, body) = req.into_parts();
        let params = extract::path_params(&mut parts, &state).await;
        let mut bundle = Validated::default();

        let body = match &schemas.body {
            Some(schema) => {
                // Unreadable bodies reject in both modes: there is nothing to re-attach
                let read = extract::json_body(body, config.options.body_limit).await;
                let (bytes, raw) = match read {
                    Ok(read) => read,
                    Err(issue) => {
                        tracing::debug!(channel = %Channel::Body, "request body could not be read");
                        return ValidationRejection::from(issue.in_channel(Channel::Body))
                            .into_response();
                    }
                };
                let outcome = raw.and_then(|value| schema.safe_parse(&value));
                if let Err(rejection) =
                    config.record(Channel::Body, outcome, &mut bundle.body, &mut bundle.issues)
                {
                    return rejection.into_response();
                }
                Body::from(bytes)
            }
            None => body,
        };

        if let Some(schema) = &schemas.segment {
            let outcome = extract::segment_value(&params).and_then(|value| schema.safe_parse(&value));
            if let Err(rejection) =
                config.record(Channel::Segment, outcome, &mut bundle.segment, &mut bundle.issues)
            {
                return rejection.into_response();
            }
        }

        if let Some(schema) = &schemas.query {
            let outcome = extract::query_value(&parts.uri).and_then(|value| schema.safe_parse(&value));
            if let Err(rejection) =
                config.record(Channel::Query, outcome, &mut bundle.query, &mut bundle.issues)
            {
                return rejection.into_response();
            }
        }

        if let Some(schema) = &schemas.headers {
            let outcome = schema.safe_parse(&extract::headers_value(&parts.headers));
            if let Err(rejection) =
                config.record(Channel::Headers, outcome, &mut bundle.headers, &mut bundle.issues)
            {
                return rejection.into_response();
            }
        }

        let context = RouteContext::new(state, params.unwrap_or_default());

        if let Some(pre_handler) = &config.pre_handler {
            let outcome = AssertUnwindSafe(pre_handler.run(&parts, &context, &bundle))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::debug!(status = %error.status_code(), "pre-handler rejected request");
                    return error.into_response();
                }
                Err(_) => {
                    tracing::warn!(uri = %parts.uri, "pre-handler panicked");
                    return PreHandlerError::generic_response();
                }
            }
        }

        let request = Request::from_parts(parts, body);
        handler(request, context, bundle).await.into_response()
    }
}
