//! Error types for typedkv operations.

use std::num::{ParseFloatError, ParseIntError};
use std::str::Utf8Error;

use thiserror::Error;

/// Result type for typedkv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for typedkv operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Annotation not recognized by the decode table.
    #[error("unrecognized annotation: {annotation}")]
    Decoding { annotation: String },

    /// Value did not end up as raw bytes after encoding.
    #[error("value {value} with annotation {annotation:?} is not encoded as bytes")]
    Encoding {
        annotation: Option<String>,
        value: String,
    },

    /// Stream ran out before a complete line was decoded.
    #[error("end of stream")]
    EndOfStream,

    /// Malformed integer text.
    #[error("invalid integer: {0}")]
    Int(#[from] ParseIntError),

    /// Malformed float text.
    #[error("invalid float: {0}")]
    Float(#[from] ParseFloatError),

    /// Invalid UTF-8 byte sequence.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    /// Byte outside the 7-bit ASCII range.
    #[error("non-ASCII byte 0x{byte:02x} at position {position}")]
    NonAscii { position: usize, byte: u8 },

    /// Unparsable timestamp.
    #[error("invalid timestamp: {0}")]
    Time(#[from] chrono::ParseError),

    /// Timestamp with no text form (year outside 1..=9999, sub-minute offset).
    #[error("timestamp out of range: {0}")]
    TimeOutOfRange(String),

    /// A built-in encoder cannot format this kind of value.
    #[error("cannot encode {kind} value as {annotation}")]
    Incompatible {
        annotation: &'static str,
        kind: &'static str,
    },

    /// Custom error message.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an unrecognized annotation error.
    pub fn decoding(annotation: impl Into<String>) -> Self {
        Self::Decoding {
            annotation: annotation.into(),
        }
    }

    /// Creates a not-encoded error.
    pub fn encoding(annotation: Option<&str>, value: impl std::fmt::Debug) -> Self {
        Self::Encoding {
            annotation: annotation.map(str::to_string),
            value: format!("{:?}", value),
        }
    }

    /// Creates a custom error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Returns true for the end-of-stream condition.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// Returns true if a recognized converter rejected its payload.
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            Self::Int(_)
                | Self::Float(_)
                | Self::Utf8(_)
                | Self::NonAscii { .. }
                | Self::Time(_)
                | Self::TimeOutOfRange(_)
                | Self::Incompatible { .. }
        )
    }
}
