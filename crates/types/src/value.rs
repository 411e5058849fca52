use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The declared or inferred type of a resolved cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellType {
    Numeric,
    Boolean,
    Date,
    String,
    /// Only ever declared explicitly; the value is a formula source string.
    Formula,
}

impl CellType {
    /// Probes the runtime kind of a raw value.
    ///
    /// Numbers, booleans, date-like strings and strings are recognized. Anything else
    /// (null, arrays, objects) is untyped and must be declared by the caller.
    pub fn infer(value: &Value) -> Option<CellType> {
        match value {
            Value::Number(_) => Some(CellType::Numeric),
            Value::Bool(_) => Some(CellType::Boolean),
            Value::String(s) if is_date_like(s) => Some(CellType::Date),
            Value::String(_) => Some(CellType::String),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

fn is_date_like(s: &str) -> bool {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
}

/// A resolved cell value together with its effective type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellValue {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<CellType>,
}

impl CellValue {
    /// An explicit type always wins over inference.
    pub fn new(value: Value, explicit_type: Option<CellType>) -> Self {
        let cell_type = explicit_type.or_else(|| CellType::infer(&value));
        Self { value, cell_type }
    }

    pub fn infer(value: Value) -> Self {
        Self::new(value, None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Plain text rendering used by text-oriented backends.
    pub fn to_text(&self) -> String {
        match &self.value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::infer(Value::String(value.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::infer(Value::String(value))
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        Self::infer(value)
    }
}
