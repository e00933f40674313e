//! Values bound to named query parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value bound to a `:name` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_text() {
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_untagged_serialization() {
        assert_eq!(serde_json::to_string(&Value::from(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&Value::from("a")).unwrap(), "\"a\"");

        let value: Value = serde_json::from_str("1.5").unwrap();
        assert_eq!(value, Value::Float(1.5));
    }
}
