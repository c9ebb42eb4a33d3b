//! Typed payloads carried by annotated lines.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::timestamp::Timestamp;

/// A typed value on the decoded side of a line.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw, unconverted bytes.
    Bytes(Vec<u8>),
    /// Boolean; annotated as an integer.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE-754 double.
    Float(f64),
    /// Text (decoded from either `Unicode` or `ASCII`).
    Text(String),
    /// Timestamp.
    Time(Timestamp),
    /// Raw bytes still carrying the annotation they arrived with.
    Tagged { annotation: String, raw: Vec<u8> },
}

impl Value {
    /// Creates a tagged pass-through value.
    pub fn tagged(annotation: impl Into<String>, raw: impl Into<Vec<u8>>) -> Self {
        Self::Tagged {
            annotation: annotation.into(),
            raw: raw.into(),
        }
    }

    /// Returns the name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Time(_) => "time",
            Self::Tagged { .. } => "tagged",
        }
    }

    /// Returns true if the value is raw bytes.
    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }

    /// Returns the raw bytes, if this is a `Bytes` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float, if this is a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is a `Time` value.
    pub fn as_time(&self) -> Option<&Timestamp> {
        match self {
            Self::Time(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(bytes: &[u8; N]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Self::Time(t.into())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Self::Time(t.into())
    }
}

/// The value half of an encode input: bare, or with an explicit annotation.
///
/// `Tagged(None, v)` behaves like `Untagged(v)` and has its annotation
/// inferred from the value's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Untagged(Value),
    Tagged(Option<String>, Value),
}

impl Field {
    /// Creates a field with an explicit annotation.
    pub fn tagged(annotation: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Tagged(Some(annotation.into()), value.into())
    }

    /// Splits into `(annotation, value)`.
    ///
    /// An untagged `Value::Tagged` pass-through is unpacked into its
    /// annotation and raw bytes, so decoder output can be fed back as-is.
    pub fn into_parts(self) -> (Option<String>, Value) {
        match self {
            Self::Untagged(Value::Tagged { annotation, raw }) => {
                (Some(annotation), Value::Bytes(raw))
            }
            Self::Untagged(value) => (None, value),
            Self::Tagged(annotation, value) => (annotation, value),
        }
    }
}

macro_rules! untagged_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(value: $ty) -> Self {
                    Self::Untagged(value.into())
                }
            }
        )*
    };
}

untagged_from!(
    Value,
    Vec<u8>,
    &[u8],
    bool,
    i32,
    i64,
    f64,
    &str,
    String,
    Timestamp,
    NaiveDateTime,
    DateTime<FixedOffset>,
);

impl<const N: usize> From<&[u8; N]> for Field {
    fn from(bytes: &[u8; N]) -> Self {
        Self::Untagged(bytes.into())
    }
}
