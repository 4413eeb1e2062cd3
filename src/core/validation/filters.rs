//! Reusable field filters
//!
//! Filters transform a field value before its validators run. Non-matching
//! types pass through unchanged.

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(Value) -> Result<Value> + Send + Sync + Clone {
    |value: Value| match value {
        Value::String(s) => Ok(Value::String(s.trim().to_string())),
        other => Ok(other),
    }
}

/// Filter: convert string to uppercase
pub fn uppercase() -> impl Fn(Value) -> Result<Value> + Send + Sync + Clone {
    |value: Value| match value {
        Value::String(s) => Ok(Value::String(s.to_uppercase())),
        other => Ok(other),
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(Value) -> Result<Value> + Send + Sync + Clone {
    |value: Value| match value {
        Value::String(s) => Ok(Value::String(s.to_lowercase())),
        other => Ok(other),
    }
}

/// Filter: round number to specified decimal places
pub fn round_decimals(decimals: u32) -> impl Fn(Value) -> Result<Value> + Send + Sync + Clone {
    move |value: Value| {
        let Some(num) = value.as_f64() else {
            return Ok(value);
        };
        let factor = 10_f64.powi(decimals as i32);
        Ok(json!((num * factor).round() / factor))
    }
}

/// Filter: parse a numeric string into a JSON number
///
/// Useful on query and segment values, which always arrive as strings.
pub fn parse_number() -> impl Fn(Value) -> Result<Value> + Send + Sync + Clone {
    |value: Value| match value {
        Value::String(s) => {
            if let Ok(int) = s.parse::<i64>() {
                Ok(json!(int))
            } else {
                let float = s
                    .parse::<f64>()
                    .map_err(|_| anyhow!("Expected number, received '{}'", s))?;
                Ok(json!(float))
            }
        }
        other => Ok(other),
    }
}
