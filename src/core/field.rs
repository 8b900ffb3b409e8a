//! Typed key/value fields attached to log events
//!
//! The value side is a closed tagged variant rather than an open
//! method-per-type surface, so the encoder can dispatch exhaustively.

use crate::core::error::Result;
use crate::encoder::text::TextEncoder;
use chrono::{DateTime, Local};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Caller-supplied serialization for nested objects.
///
/// The callback receives a child accumulator and appends its own
/// key/value tokens; errors propagate out of the encode call.
pub trait ObjectMarshaler: Send + Sync {
    fn marshal(&self, enc: &mut TextEncoder) -> Result<()>;
}

impl<F> ObjectMarshaler for F
where
    F: Fn(&mut TextEncoder) -> Result<()> + Send + Sync,
{
    fn marshal(&self, enc: &mut TextEncoder) -> Result<()> {
        self(enc)
    }
}

/// Value of a structured logging field.
#[derive(Clone)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex { re: f64, im: f64 },
    Str(String),
    /// Quoted, escaped byte string
    Bytes(Vec<u8>),
    /// Base64-encoded binary blob
    Binary(Vec<u8>),
    Duration(Duration),
    Time(DateTime<Local>),
    Object(Arc<dyn ObjectMarshaler>),
    Array(Vec<FieldValue>),
    /// Arbitrary value serialized through the generic JSON path
    Reflected(serde_json::Value),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            FieldValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            FieldValue::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            FieldValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            FieldValue::Complex { re, im } => f
                .debug_struct("Complex")
                .field("re", re)
                .field("im", im)
                .finish(),
            FieldValue::Str(v) => f.debug_tuple("Str").field(v).finish(),
            FieldValue::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            FieldValue::Binary(v) => f.debug_tuple("Binary").field(v).finish(),
            FieldValue::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            FieldValue::Time(v) => f.debug_tuple("Time").field(v).finish(),
            FieldValue::Object(_) => f.write_str("Object(..)"),
            FieldValue::Array(v) => f.debug_tuple("Array").field(v).finish(),
            FieldValue::Reflected(v) => f.debug_tuple("Reflected").field(v).finish(),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {
        $(impl From<$ty> for FieldValue {
            fn from(v: $ty) -> Self {
                FieldValue::Int(v as i64)
            }
        })+
    };
}

macro_rules! impl_from_uint {
    ($($ty:ty),+) => {
        $(impl From<$ty> for FieldValue {
            fn from(v: $ty) -> Self {
                FieldValue::Uint(v as u64)
            }
        })+
    };
}

impl_from_int!(i8, i16, i32, i64);
impl_from_uint!(u8, u16, u32, u64, usize);

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<Duration> for FieldValue {
    fn from(v: Duration) -> Self {
        FieldValue::Duration(v)
    }
}

impl From<DateTime<Local>> for FieldValue {
    fn from(v: DateTime<Local>) -> Self {
        FieldValue::Time(v)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Reflected(v)
    }
}

/// One typed key/value pair attached to an event.
///
/// Fields are owned by the caller and consumed synchronously by the
/// encoder; nothing is retained after the encode call returns.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A quoted/escaped byte-string field.
    pub fn byte_string<K: Into<String>>(key: K, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Bytes(value.into()),
        }
    }

    /// A base64-encoded binary field.
    pub fn binary<K: Into<String>>(key: K, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Binary(value.into()),
        }
    }

    /// A complex-number field, rendered as `"<re>+<im>i"`.
    pub fn complex<K: Into<String>>(key: K, re: f64, im: f64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Complex { re, im },
        }
    }

    /// A nested object serialized through a caller-supplied marshaler.
    pub fn object<K: Into<String>>(key: K, marshaler: Arc<dyn ObjectMarshaler>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Object(marshaler),
        }
    }

    /// A nested array of values.
    pub fn array<K: Into<String>>(key: K, values: Vec<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Array(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert!(matches!(FieldValue::from(42i32), FieldValue::Int(42)));
        assert!(matches!(FieldValue::from(42u8), FieldValue::Uint(42)));
        assert!(matches!(FieldValue::from(true), FieldValue::Bool(true)));
        assert!(matches!(FieldValue::from("x"), FieldValue::Str(_)));
        assert!(matches!(
            FieldValue::from(Duration::from_secs(1)),
            FieldValue::Duration(_)
        ));
    }

    #[test]
    fn test_field_constructors() {
        let f = Field::new("port", 8080);
        assert_eq!(f.key, "port");
        assert!(matches!(f.value, FieldValue::Int(8080)));

        let f = Field::binary("payload", vec![0xde, 0xad]);
        assert!(matches!(f.value, FieldValue::Binary(_)));

        let f = Field::complex("z", 1.0, -2.0);
        assert!(matches!(f.value, FieldValue::Complex { .. }));
    }
}
