//! Typed attribute values and the equality used to diff them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Attribute name to value mapping, ordered by name.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Declared kind of an entity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Boolean,
    Integer,
    Float,
    Text,
    Binary,
    DateTime,
    /// Arbitrary serde-serializable data stored as a JSON tree.
    Json,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Boolean => "boolean",
            AttributeKind::Integer => "integer",
            AttributeKind::Float => "float",
            AttributeKind::Text => "text",
            AttributeKind::Binary => "binary",
            AttributeKind::DateTime => "datetime",
            AttributeKind::Json => "json",
        };
        f.write_str(name)
    }
}

/// A single attribute value read from a managed object.
///
/// Equality is defined per kind rather than derived:
///
/// - values of different kinds never compare equal, so `Integer(1) != Float(1.0)`;
/// - floats compare by bit pattern after folding `-0.0` into `0.0`, which makes
///   `NaN == NaN` and keeps an untouched NaN from showing up as a change;
/// - binary values compare byte for byte;
/// - date-times compare as instants;
/// - JSON values compare structurally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Binary(Vec<u8>),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
}

impl AttributeValue {
    /// Serializes `value` into a JSON attribute.
    ///
    /// Serialization failures are logged and produce `Null`, so describing an
    /// object never fails.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => AttributeValue::Json(json),
            Err(err) => {
                log::warn!("failed to serialize json attribute: {err}");
                AttributeValue::Null
            }
        }
    }

    /// Kind of the value, or `None` for `Null`.
    pub fn kind(&self) -> Option<AttributeKind> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::Boolean(_) => Some(AttributeKind::Boolean),
            AttributeValue::Integer(_) => Some(AttributeKind::Integer),
            AttributeValue::Float(_) => Some(AttributeKind::Float),
            AttributeValue::Text(_) => Some(AttributeKind::Text),
            AttributeValue::Binary(_) => Some(AttributeKind::Binary),
            AttributeValue::DateTime(_) => Some(AttributeKind::DateTime),
            AttributeValue::Json(_) => Some(AttributeKind::Json),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Binary(value) => Some(value),
            _ => None,
        }
    }
}

fn canonical_float_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        use AttributeValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => canonical_float_bits(*a) == canonical_float_bits(*b),
            (Text(a), Text(b)) => a == b,
            (Binary(a), Binary(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Json(a), Json(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttributeValue {}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => f.write_str("null"),
            AttributeValue::Boolean(value) => write!(f, "{value}"),
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::Float(value) => write!(f, "{value}"),
            AttributeValue::Text(value) => write!(f, "{value:?}"),
            AttributeValue::Binary(value) => write!(f, "<{} bytes>", value.len()),
            AttributeValue::DateTime(value) => f.write_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true)),
            AttributeValue::Json(value) => write!(f, "{value}"),
        }
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    AttributeValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for AttributeValue {
    fn from(value: isize) -> Self {
        AttributeValue::Integer(value as i64)
    }
}

// Unsigned values beyond i64::MAX fall back to a float rather than wrapping.
impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => AttributeValue::Integer(value),
            Err(_) => AttributeValue::Float(value as f64),
        }
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::from(value as u64)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(f64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Binary(value)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(value: &[u8]) -> Self {
        AttributeValue::Binary(value.to_vec())
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::DateTime(value)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        AttributeValue::Json(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn kinds_never_compare_equal_across_types() {
        assert_ne!(AttributeValue::Integer(1), AttributeValue::Float(1.0));
        assert_ne!(AttributeValue::Text("1".into()), AttributeValue::Integer(1));
        assert_ne!(AttributeValue::Null, AttributeValue::Json(serde_json::Value::Null));
    }

    #[test]
    fn float_equality_is_bitwise_with_folded_zero() {
        assert_eq!(AttributeValue::Float(f64::NAN), AttributeValue::Float(f64::NAN));
        assert_eq!(AttributeValue::Float(0.0), AttributeValue::Float(-0.0));
        assert_ne!(AttributeValue::Float(0.1 + 0.2), AttributeValue::Float(0.3));
    }

    #[test]
    fn binary_and_json_compare_by_content() {
        assert_eq!(AttributeValue::from(vec![1u8, 2, 3]), AttributeValue::Binary(vec![1, 2, 3]));
        assert_ne!(AttributeValue::from(vec![1u8, 2, 3]), AttributeValue::Binary(vec![1, 2]));
        assert_eq!(
            AttributeValue::Json(json!({"a": 1, "b": [true]})),
            AttributeValue::Json(json!({"b": [true], "a": 1}))
        );
    }

    #[test]
    fn conversions_pick_expected_kind() {
        assert_eq!(AttributeValue::from(7u8).kind(), Some(AttributeKind::Integer));
        assert_eq!(AttributeValue::from(u64::MAX).kind(), Some(AttributeKind::Float));
        assert_eq!(AttributeValue::from(2.5f32).as_f64(), Some(2.5));
        assert_eq!(AttributeValue::from("x").as_str(), Some("x"));
        assert_eq!(AttributeValue::from(None::<i32>), AttributeValue::Null);
        assert_eq!(AttributeValue::from(Some(3i32)), AttributeValue::Integer(3));
        assert!(AttributeValue::from(Option::<String>::None).kind().is_none());
    }

    #[test]
    fn display_is_compact() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(AttributeValue::from("hi").to_string(), "\"hi\"");
        assert_eq!(AttributeValue::Binary(vec![0; 4]).to_string(), "<4 bytes>");
        assert_eq!(AttributeValue::from(when).to_string(), "2024-05-01T12:00:00.000Z");
        assert_eq!(AttributeValue::Null.to_string(), "null");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let value = serde_json::to_value(AttributeValue::Integer(4)).unwrap();
        assert_eq!(value, json!({"kind": "integer", "value": 4}));
        let back: AttributeValue = serde_json::from_value(value).unwrap();
        assert_eq!(back, AttributeValue::Integer(4));
    }
}
