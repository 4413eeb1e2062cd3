//! Per-request data handed to pre-handlers and handlers

use serde_json::Value;

use crate::core::error::IssueReport;
use crate::core::issue::{Channel, ValidationIssue};

/// Validated request data, one slot per channel
///
/// A slot is `Some` only when the channel has a schema and its data passed
/// it. `issues` is only ever filled when fail-fast is disabled; in that mode
/// the handler receives whatever subset validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<B = Value, Q = Value, S = Value, H = Value> {
    pub body: Option<B>,
    pub query: Option<Q>,
    pub segment: Option<S>,
    pub headers: Option<H>,
    pub issues: Vec<ValidationIssue>,
}

impl<B, Q, S, H> Default for Validated<B, Q, S, H> {
    fn default() -> Self {
        Self {
            body: None,
            query: None,
            segment: None,
            headers: None,
            issues: Vec::new(),
        }
    }
}

impl<B, Q, S, H> Validated<B, Q, S, H> {
    /// True when no issue was accumulated
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_for(&self, channel: Channel) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.channel == channel)
    }

    /// A 400 response listing every issue, or `None` if the bundle is valid
    pub fn issue_report(&self) -> Option<IssueReport> {
        if self.is_valid() {
            None
        } else {
            Some(IssueReport::new(self.issues.clone()))
        }
    }
}

/// Router state and matched path parameters
#[derive(Debug, Clone)]
pub struct RouteContext<St = ()> {
    pub state: St,
    pub params: Vec<(String, String)>,
}

impl<St> RouteContext<St> {
    pub fn new(state: St, params: Vec<(String, String)>) -> Self {
        Self { state, params }
    }

    /// Raw value of a path parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
