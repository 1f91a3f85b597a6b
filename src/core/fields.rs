//! Structured key-value fields attached to log events

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Map(BTreeMap<String, FieldValue>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Map(map) => {
                // Compact JSON text (non-finite floats come out as null)
                match serde_json::to_string(map) {
                    Ok(text) => f.write_str(&text),
                    Err(_) => {
                        let pairs: Vec<String> =
                            map.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                        write!(f, "{{{}}}", pairs.join(" "))
                    }
                }
            }
        }
    }
}

impl FieldValue {
    /// Whether the value can be represented in a JSON log line
    pub fn is_encodable(&self) -> bool {
        match self {
            FieldValue::Float(f) => f.is_finite(),
            FieldValue::Map(map) => map.values().all(FieldValue::is_encodable),
            _ => true,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u64::from(u))
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(map: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Map(map)
    }
}

impl From<LogFields> for FieldValue {
    fn from(fields: LogFields) -> Self {
        FieldValue::Map(fields.fields)
    }
}

/// Structured fields for a single log event
///
/// Keys are kept sorted so rendered output is deterministic.
///
/// # Example
///
/// ```
/// use unilog::LogFields;
///
/// let fields = LogFields::new()
///     .with_field("user_id", 123)
///     .with_field("action", "login");
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogFields {
    fields: BTreeMap<String, FieldValue>,
}

impl LogFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LogFields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_builder() {
        let mut fields = LogFields::new().with_field("user_id", 42).with_field("ok", true);
        fields.add_field("ratio", 0.5);

        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("user_id"), Some(&FieldValue::Int(42)));
        assert_eq!(fields.get("ok"), Some(&FieldValue::Bool(true)));
        assert!(fields.get("missing").is_none());
    }

    #[test]
    fn test_fields_iterate_in_key_order() {
        let fields: LogFields = vec![("zeta", 1), ("alpha", 2), ("mid", 3)].into_iter().collect();
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from("text").to_string(), "text");
        assert_eq!(FieldValue::from(-7).to_string(), "-7");
        assert_eq!(FieldValue::from(false).to_string(), "false");

        let nested = LogFields::new().with_field("a", 1).with_field("b", "x");
        assert_eq!(FieldValue::from(nested).to_string(), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_encodable() {
        assert!(FieldValue::from(1.5).is_encodable());
        assert!(!FieldValue::from(f64::NAN).is_encodable());

        let nested = LogFields::new().with_field("inf", f64::INFINITY);
        assert!(!FieldValue::from(nested).is_encodable());
    }
}
