//! Reusable field validators
//!
//! A validator inspects one field value and returns the issue message on
//! failure. Type-specific validators let values of other types through so
//! they can be combined freely (`string()` is the one that enforces the type).

use regex::Regex;
use serde_json::Value;

/// Validator: field must be present and not null
pub fn required() -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    |value: &Value| {
        if value.is_null() {
            Err("Required".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: field is optional (always valid)
pub fn optional() -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &Value| Ok(())
}

/// Validator: value must be a string when present
pub fn string() -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    |value: &Value| match value {
        Value::Null | Value::String(_) => Ok(()),
        other => Err(format!("Expected string, received {}", type_name(other))),
    }
}

/// Validator: value must be an integer, or a string holding one
///
/// Query strings, segments and headers only carry strings, so `"42"` passes.
pub fn integer() -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    |value: &Value| match value {
        Value::Null => Ok(()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
        Value::String(s) if s.parse::<i64>().is_ok() => Ok(()),
        other => Err(format!("Expected integer, received {}", type_name(other))),
    }
}

/// Validator: number must be positive
pub fn positive() -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    |value: &Value| match value.as_f64() {
        Some(num) if num <= 0.0 => Err(format!("Must be positive (received {})", num)),
        _ => Ok(()),
    }
}

/// Validator: string length must be within range (in characters)
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    move |value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        let len = s.chars().count();
        if len < min {
            Err(format!("Must contain at least {} character(s)", min))
        } else if len > max {
            Err(format!("Must contain at most {} character(s)", max))
        } else {
            Ok(())
        }
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(max: f64) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    move |value: &Value| match value.as_f64() {
        Some(num) if num > max => Err(format!("Must be less than or equal to {}", max)),
        _ => Ok(()),
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    move |value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        if allowed.iter().any(|a| a == s) {
            Ok(())
        } else {
            Err(format!(
                "Invalid enum value. Expected {}, received '{}'",
                allowed
                    .iter()
                    .map(|a| format!("'{}'", a))
                    .collect::<Vec<_>>()
                    .join(" | "),
                s
            ))
        }
    }
}

/// Validator: date must match format
pub fn date_format(
    format: &'static str,
) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    move |value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        chrono::NaiveDate::parse_from_str(s, format)
            .map(|_| ())
            .map_err(|_| format!("Invalid date, expected format {}", format))
    }
}

/// Validator: string must match a regular expression
///
/// The pattern is compiled once, when the validator is built.
pub fn pattern(regex: Regex) -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    move |value: &Value| match value.as_str() {
        Some(s) if !regex.is_match(s) => Err(format!("Must match pattern {}", regex.as_str())),
        _ => Ok(()),
    }
}

/// Validator: string must be a UUID
pub fn uuid() -> impl Fn(&Value) -> Result<(), String> + Send + Sync + Clone {
    |value: &Value| match value.as_str() {
        Some(s) if uuid::Uuid::parse_str(s).is_err() => Err("Invalid uuid".to_string()),
        _ => Ok(()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === required() ===

    #[test]
    fn test_required_null_value_returns_error() {
        let v = required();
        assert_eq!(v(&json!(null)), Err("Required".to_string()));
    }

    #[test]
    fn test_required_string_value_returns_ok() {
        let v = required();
        assert!(v(&json!("hello")).is_ok());
    }

    #[test]
    fn test_required_empty_string_returns_ok() {
        let v = required();
        assert!(v(&json!("")).is_ok());
    }

    #[test]
    fn test_required_array_returns_ok() {
        let v = required();
        assert!(v(&json!([1, 2, 3])).is_ok());
    }

    // === optional() ===

    #[test]
    fn test_optional_always_ok() {
        let v = optional();
        assert!(v(&json!(null)).is_ok());
        assert!(v(&json!("value")).is_ok());
    }

    // === string() ===

    #[test]
    fn test_string_rejects_number() {
        let v = string();
        assert_eq!(
            v(&json!(42)),
            Err("Expected string, received number".to_string())
        );
    }

    #[test]
    fn test_string_lets_null_through() {
        let v = string();
        assert!(v(&json!(null)).is_ok());
        assert!(v(&json!("x")).is_ok());
    }

    // === integer() ===

    #[test]
    fn test_integer_accepts_numeric_strings() {
        let v = integer();
        assert!(v(&json!("42")).is_ok());
        assert!(v(&json!(-7)).is_ok());
    }

    #[test]
    fn test_integer_rejects_floats_and_words() {
        let v = integer();
        assert!(v(&json!(1.5)).is_err());
        assert!(v(&json!("abc")).is_err());
    }

    // === positive() ===

    #[test]
    fn test_positive_negative_number_returns_error() {
        let v = positive();
        let result = v(&json!(-5.0));
        assert!(result.unwrap_err().contains("positive"));
    }

    #[test]
    fn test_positive_zero_returns_error() {
        let v = positive();
        assert!(v(&json!(0)).is_err());
    }

    #[test]
    fn test_positive_non_number_passthrough() {
        let v = positive();
        assert!(v(&json!("hello")).is_ok());
    }

    // === string_length() ===

    #[test]
    fn test_string_length_too_short_returns_error() {
        let v = string_length(3, 50);
        assert!(v(&json!("ab")).unwrap_err().contains("at least 3"));
    }

    #[test]
    fn test_string_length_too_long_returns_error() {
        let v = string_length(1, 5);
        assert!(v(&json!("abcdef")).unwrap_err().contains("at most 5"));
    }

    #[test]
    fn test_string_length_counts_characters() {
        let v = string_length(1, 5);
        assert!(v(&json!("éééé")).is_ok());
    }

    #[test]
    fn test_string_length_bounds_inclusive() {
        let v = string_length(3, 5);
        assert!(v(&json!("abc")).is_ok());
        assert!(v(&json!("abcde")).is_ok());
    }

    // === max_value() ===

    #[test]
    fn test_max_value_over_returns_error() {
        let v = max_value(100.0);
        assert!(v(&json!(101.0)).unwrap_err().contains("100"));
    }

    #[test]
    fn test_max_value_equal_returns_ok() {
        let v = max_value(100.0);
        assert!(v(&json!(100)).is_ok());
    }

    // === in_list() ===

    #[test]
    fn test_in_list_value_in_list_returns_ok() {
        let v = in_list(vec!["active".into(), "inactive".into()]);
        assert!(v(&json!("active")).is_ok());
    }

    #[test]
    fn test_in_list_value_not_in_list_returns_error() {
        let v = in_list(vec!["active".into(), "inactive".into()]);
        assert_eq!(
            v(&json!("deleted")),
            Err("Invalid enum value. Expected 'active' | 'inactive', received 'deleted'".to_string())
        );
    }

    #[test]
    fn test_in_list_empty_list_always_error_for_strings() {
        let v = in_list(vec![]);
        assert!(v(&json!("anything")).is_err());
    }

    // === date_format() ===

    #[test]
    fn test_date_format_valid_date_returns_ok() {
        let v = date_format("%Y-%m-%d");
        assert!(v(&json!("2024-01-15")).is_ok());
    }

    #[test]
    fn test_date_format_wrong_format_returns_error() {
        let v = date_format("%d/%m/%Y");
        assert!(v(&json!("2024-01-15")).unwrap_err().contains("%d/%m/%Y"));
    }

    // === pattern() ===

    #[test]
    fn test_pattern_matches() {
        let v = pattern(Regex::new(r"^[a-z]+-[0-9]+$").unwrap());
        assert!(v(&json!("order-12")).is_ok());
        assert!(v(&json!("Order 12")).is_err());
    }

    // === uuid() ===

    #[test]
    fn test_uuid_validator() {
        let v = uuid();
        assert!(v(&json!("67e55044-10b1-426f-9247-bb680e5fe0c8")).is_ok());
        assert_eq!(v(&json!("42")), Err("Invalid uuid".to_string()));
    }
}
