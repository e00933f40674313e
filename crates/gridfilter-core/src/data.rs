//! Submitted filter values.

use gridfilter_query::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{FilterError, Result};

/// The value a form submits for a number-like filter: `{"type": 1, "value": 5}`.
///
/// `value` is kept as raw JSON so that a non-numeric submission turns the filter into a
/// no-op instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterData {
    /// Operator code; equality when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub operator_type: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
}

impl FilterData {
    pub fn new(operator_type: Option<i64>, value: impl Into<JsonValue>) -> Self {
        Self {
            operator_type,
            value: Some(value.into()),
        }
    }

    /// Decodes a payload.
    ///
    /// Only a JSON object is a payload; `null`, arrays and scalars decode to `None` so the
    /// filter stays inactive. Text that is not JSON at all, or an object whose fields have
    /// the wrong types, is an [`FilterError::InvalidPayload`].
    pub fn from_json(input: &str) -> Result<Option<Self>> {
        let value: JsonValue = serde_json::from_str(input)
            .map_err(|err| FilterError::InvalidPayload(err.to_string()))?;

        match value {
            JsonValue::Object(_) => {
                serde_json::from_value(value)
                    .map(Some)
                    .map_err(|err| FilterError::InvalidPayload(err.to_string()))
            }
            _ => Ok(None),
        }
    }

    /// The submitted value when it is numeric.
    pub fn numeric_value(&self) -> Option<Value> {
        self.value.as_ref().and_then(numeric)
    }
}

/// Converts a JSON number, or a string holding one, into a bindable value.
///
/// Strings are trimmed of leading whitespace only, and must parse to a finite number.
pub fn numeric(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Number(n) => {
            n.as_i64()
                .map(Value::Integer)
                .or_else(|| n.as_f64().map(Value::Float))
        }
        JsonValue::String(s) => {
            let s = s.trim_start();
            if s.is_empty() || s.ends_with(char::is_whitespace) {
                return None;
            }
            if let Ok(v) = s.parse::<i64>() {
                return Some(Value::Integer(v));
            }
            if !s
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
            {
                return None;
            }
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float)
        }
        _ => None,
    }
}
