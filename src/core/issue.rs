//! Channels and validation issues
//!
//! A schema reports [`Issue`]s; the handler wrapper tags them with the
//! [`Channel`] they came from and stores them as [`ValidationIssue`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four request parts that can be validated independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// JSON request payload
    Body,
    /// Dynamic route segments (`/users/{id}`)
    Segment,
    /// URL query string
    Query,
    /// Request headers
    Headers,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Body => "body",
            Channel::Segment => "segment",
            Channel::Query => "query",
            Channel::Headers => "headers",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step in the path to an invalid value
///
/// Serialized untagged, so a path renders as `["items", 0, "name"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => f.write_str(k),
        }
    }
}

/// Issue reported by a schema, before it is attributed to a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    #[serde(default)]
    pub path: Vec<PathSegment>,
}

impl Issue {
    /// Issue on the value itself (empty path)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }

    /// Issue on a nested value
    pub fn at<P>(message: impl Into<String>, path: impl IntoIterator<Item = P>) -> Self
    where
        P: Into<PathSegment>,
    {
        Self {
            message: message.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Prepend a segment, used when an issue bubbles up from a nested value
    pub fn prefixed(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Attribute this issue to a channel
    pub fn in_channel(self, channel: Channel) -> ValidationIssue {
        ValidationIssue {
            channel,
            message: self.message,
            path: self.path,
        }
    }
}

/// Issue accumulated in a [`Validated`](crate::handler::Validated) bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub channel: Channel,
    pub message: String,
    pub path: Vec<PathSegment>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.channel, self.message)
        } else {
            let path: Vec<String> = self.path.iter().map(|s| s.to_string()).collect();
            write!(f, "{}.{}: {}", self.channel, path.join("."), self.message)
        }
    }
}
