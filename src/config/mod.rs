//! Options for validated handlers and their loading

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default cap on buffered request bodies (2 MiB, same as axum's default)
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Options controlling how a validated handler reacts to failures
///
/// ```yaml
/// fail_fast_with_400: false
/// body_limit: 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Respond 400 on the first failing channel (default), or collect every
    /// issue in the bundle and still call the handler
    #[serde(default = "default_fail_fast")]
    pub fail_fast_with_400: bool,

    /// Maximum body size read when a body schema is configured
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

fn default_fail_fast() -> bool {
    true
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            fail_fast_with_400: default_fail_fast(),
            body_limit: default_body_limit(),
        }
    }
}

impl ValidationOptions {
    /// Load options from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load options from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(yaml)?;
        Ok(options)
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast_with_400 = enabled;
        self
    }

    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}
