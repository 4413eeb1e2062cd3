//! Raw data extraction per channel
//!
//! Each function turns one part of the request into the `serde_json::Value`
//! a schema parses. Query strings, segments and headers become flat objects
//! of strings; when a key repeats, the first value wins.
//!
//! Route params are always read, even without a segment schema, because
//! they also fill the handler's `RouteContext`.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequestParts, Query, RawPathParams};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};
use serde_json::{Map, Value};

use super::issue::Issue;

/// Buffer the body and parse it as JSON
///
/// The bytes are returned even when parsing fails so the request can be
/// rebuilt for the handler. `Err` means the body could not be read at all
/// (over `limit` or a transport error); nothing is left to hand back then.
pub async fn json_body(
    body: Body,
    limit: usize,
) -> Result<(Bytes, Result<Value, Vec<Issue>>), Issue> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| Issue::new(format!("Invalid JSON body: {}", e)))?;

    let parsed = serde_json::from_slice::<Value>(&bytes)
        .map_err(|e| vec![Issue::new(format!("Invalid JSON body: {}", e))]);
    Ok((bytes, parsed))
}

/// Dynamic route parameters matched by the router, in route order
pub async fn path_params<St>(parts: &mut Parts, state: &St) -> Result<Vec<(String, String)>, Issue>
where
    St: Send + Sync,
{
    let params = RawPathParams::from_request_parts(parts, state)
        .await
        .map_err(|e| Issue::new(e.body_text()))?;

    Ok(params
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect())
}

/// Route parameters as a flat object
pub fn segment_value(params: &Result<Vec<(String, String)>, Issue>) -> Result<Value, Vec<Issue>> {
    match params {
        Ok(params) => Ok(first_wins(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))),
        Err(issue) => Err(vec![issue.clone()]),
    }
}

/// Query string as a flat object
///
/// Repeated keys (`?tag=a&tag=b`) are not modeled as arrays: `a` is kept.
pub fn query_value(uri: &Uri) -> Result<Value, Vec<Issue>> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|e| vec![Issue::new(e.body_text())])?;

    Ok(first_wins(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
}

/// Headers as a flat object keyed by lower-case name
pub fn headers_value(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for (name, value) in headers {
        map.entry(name.as_str()).or_insert_with(|| {
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned())
        });
    }
    Value::Object(map)
}

fn first_wins<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Value {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.entry(key)
            .or_insert_with(|| Value::String(value.to_string()));
    }
    Value::Object(map)
}
