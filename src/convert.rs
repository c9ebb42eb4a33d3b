//! Built-in converters and the default annotation tables.
//!
//! | Canonical | Short | Decoded value            |
//! |-----------|-------|--------------------------|
//! | `Int`     | `I`   | [`Value::Int`]           |
//! | `Float`   | `F`   | [`Value::Float`]         |
//! | `Unicode` | `U`   | [`Value::Text`] (UTF-8)  |
//! | `ASCII`   | `A`   | [`Value::Text`] (7-bit)  |
//! | `Time`    | `T`   | [`Value::Time`]          |

use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};
use crate::table::{DecodeTable, EncodeTable, SynonymSet, TypeTable};
use crate::timestamp::Timestamp;
use crate::value::Value;

pub const INT: [&str; 2] = ["Int", "I"];
pub const FLOAT: [&str; 2] = ["Float", "F"];
pub const UNICODE: [&str; 2] = ["Unicode", "U"];
pub const ASCII: [&str; 2] = ["ASCII", "A"];
pub const TIME: [&str; 2] = ["Time", "T"];

type BuiltinDecoder = fn(&[u8]) -> Result<Value>;
type BuiltinEncoder = fn(Value) -> Result<Value>;

const DECODERS: [([&str; 2], BuiltinDecoder); 5] = [
    (INT, decode_int),
    (FLOAT, decode_float),
    (UNICODE, decode_unicode),
    (ASCII, decode_ascii),
    (TIME, decode_time),
];

const ENCODERS: [([&str; 2], BuiltinEncoder); 5] = [
    (INT, encode_int),
    (FLOAT, encode_float),
    (UNICODE, encode_unicode),
    (ASCII, encode_ascii),
    (TIME, encode_time),
];

/// Returns a fresh table with the built-in decoders.
pub fn default_decoders() -> DecodeTable {
    let mut table = DecodeTable::new();
    for (names, decoder) in DECODERS {
        table.push(SynonymSet::new(names), Box::new(decoder));
    }
    table
}

/// Returns a fresh table with the built-in encoders.
pub fn default_encoders() -> EncodeTable {
    let mut table = EncodeTable::new();
    for (names, encoder) in ENCODERS {
        table.push(SynonymSet::new(names), Box::new(encoder));
    }
    table
}

/// Returns the default type table.
///
/// Booleans are matched by the integer entry, so they annotate as `I`.
pub fn default_types() -> TypeTable {
    let mut types = TypeTable::new();
    types.register(|v| matches!(v, Value::Int(_) | Value::Bool(_)), INT[1]);
    types.register(|v| matches!(v, Value::Float(_)), FLOAT[1]);
    types.register(|v| matches!(v, Value::Text(_)), UNICODE[1]);
    types.register(|v| matches!(v, Value::Time(_)), TIME[1]);
    types
}

pub(crate) fn shared_decoders() -> Arc<DecodeTable> {
    static SHARED: OnceLock<Arc<DecodeTable>> = OnceLock::new();
    Arc::clone(SHARED.get_or_init(|| Arc::new(default_decoders())))
}

pub(crate) fn shared_encoders() -> Arc<EncodeTable> {
    static SHARED: OnceLock<Arc<EncodeTable>> = OnceLock::new();
    Arc::clone(SHARED.get_or_init(|| Arc::new(default_encoders())))
}

pub(crate) fn shared_types() -> Arc<TypeTable> {
    static SHARED: OnceLock<Arc<TypeTable>> = OnceLock::new();
    Arc::clone(SHARED.get_or_init(|| Arc::new(default_types())))
}

/// UTF-8 text with surrounding ASCII whitespace removed.
fn trimmed(raw: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(raw)?.trim_matches(|c: char| c.is_ascii_whitespace()))
}

fn check_ascii(bytes: &[u8]) -> Result<()> {
    match bytes.iter().position(|b| !b.is_ascii()) {
        Some(position) => Err(Error::NonAscii {
            position,
            byte: bytes[position],
        }),
        None => Ok(()),
    }
}

/// Formats a float in its shortest round-trip form, e.g. `3.14`, `1.0`,
/// `1e+16`, `1e-05`.
///
/// Exponents carry an explicit sign and at least two digits.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

/// Decodes a base-10 integer.
pub fn decode_int(raw: &[u8]) -> Result<Value> {
    Ok(Value::Int(trimmed(raw)?.parse()?))
}

/// Decodes an IEEE-754 double.
pub fn decode_float(raw: &[u8]) -> Result<Value> {
    Ok(Value::Float(trimmed(raw)?.parse()?))
}

/// Decodes UTF-8 text.
pub fn decode_unicode(raw: &[u8]) -> Result<Value> {
    Ok(Value::Text(std::str::from_utf8(raw)?.to_string()))
}

/// Decodes strict 7-bit ASCII text.
pub fn decode_ascii(raw: &[u8]) -> Result<Value> {
    check_ascii(raw)?;
    Ok(Value::Text(std::str::from_utf8(raw)?.to_string()))
}

/// Decodes an ISO-8601 timestamp.
pub fn decode_time(raw: &[u8]) -> Result<Value> {
    Ok(Value::Time(Timestamp::parse(std::str::from_utf8(raw)?)?))
}

fn incompatible(annotation: &'static str, value: &Value) -> Error {
    Error::Incompatible {
        annotation,
        kind: value.kind(),
    }
}

/// Encodes an integer; booleans, floats (truncated) and numeric text coerce.
pub fn encode_int(value: Value) -> Result<Value> {
    // i64::MAX as f64 rounds up to 2^63
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    let int = match &value {
        Value::Int(i) => *i,
        Value::Bool(b) => i64::from(*b),
        Value::Float(f) if f.is_finite() && f.trunc() >= -LIMIT && f.trunc() < LIMIT => {
            f.trunc() as i64
        }
        Value::Text(s) => s.trim().parse()?,
        Value::Bytes(bytes) => trimmed(bytes)?.parse()?,
        _ => return Err(incompatible(INT[0], &value)),
    };
    Ok(Value::Bytes(int.to_string().into_bytes()))
}

/// Encodes a float; integers, booleans and numeric text coerce.
pub fn encode_float(value: Value) -> Result<Value> {
    let float = match &value {
        Value::Float(f) => *f,
        Value::Int(i) => *i as f64,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Text(s) => s.trim().parse()?,
        Value::Bytes(bytes) => trimmed(bytes)?.parse()?,
        _ => return Err(incompatible(FLOAT[0], &value)),
    };
    Ok(Value::Bytes(format_float(float).into_bytes()))
}

/// Encodes text as UTF-8.
pub fn encode_unicode(value: Value) -> Result<Value> {
    match value {
        Value::Text(s) => Ok(Value::Bytes(s.into_bytes())),
        other => Err(incompatible(UNICODE[0], &other)),
    }
}

/// Encodes text as strict 7-bit ASCII.
pub fn encode_ascii(value: Value) -> Result<Value> {
    match value {
        Value::Text(s) => {
            check_ascii(s.as_bytes())?;
            Ok(Value::Bytes(s.into_bytes()))
        }
        other => Err(incompatible(ASCII[0], &other)),
    }
}

/// Encodes a timestamp in ISO-8601 form.
pub fn encode_time(value: Value) -> Result<Value> {
    match value {
        Value::Time(t) => {
            t.check_representable()?;
            Ok(Value::Bytes(t.to_string().into_bytes()))
        }
        other => Err(incompatible(TIME[0], &other)),
    }
}
