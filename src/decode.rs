//! Typedkv line decoder.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::convert::shared_decoders;
use crate::error::{Error, Result};
use crate::line::{split_annotation, Line, RawLine};
use crate::stream::DecodeBlock;
use crate::table::DecodeTable;
use crate::value::Value;

/// Custom decode fallback: `(annotation, raw)` to a value.
pub type DecodeFallbackFn = dyn Fn(&str, Vec<u8>) -> Result<Value> + Send + Sync;

/// What to do with an annotation the decode table does not recognize.
#[derive(Clone, Default)]
pub enum DecodeFallback {
    /// Fail with [`Error::Decoding`].
    #[default]
    Raise,
    /// Return the raw bytes as [`Value::Tagged`].
    PassThrough,
    /// Call a user function.
    Custom(Arc<DecodeFallbackFn>),
}

impl DecodeFallback {
    /// Creates a custom fallback.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, Vec<u8>) -> Result<Value> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DecodeFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raise => f.write_str("Raise"),
            Self::PassThrough => f.write_str("PassThrough"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// LineDecoder turns annotated raw lines into typed lines.
///
/// Configuration is immutable once built; clones share the tables.
#[derive(Clone, Debug)]
pub struct LineDecoder {
    decoders: Option<Arc<DecodeTable>>,
    fallback: DecodeFallback,
}

impl LineDecoder {
    /// Creates a decoder with the built-in table and the raising fallback.
    pub fn new() -> Self {
        Self {
            decoders: Some(shared_decoders()),
            fallback: DecodeFallback::Raise,
        }
    }

    /// Creates a decoder with the given table.
    ///
    /// `None` disables decoding: every annotated value comes back as
    /// [`Value::Tagged`] and the fallback is never consulted.
    pub fn with_decoders(decoders: Option<DecodeTable>) -> Self {
        Self {
            decoders: decoders.map(Arc::new),
            fallback: DecodeFallback::Raise,
        }
    }

    /// Creates a decoder with decoding disabled.
    pub fn disabled() -> Self {
        Self::with_decoders(None)
    }

    /// Sets the fallback for unrecognized annotations.
    pub fn fallback(mut self, fallback: DecodeFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns the decode table, or `None` if decoding is disabled.
    pub fn decoders(&self) -> Option<&DecodeTable> {
        self.decoders.as_deref()
    }

    /// Decodes the next line pulled from `stream`.
    ///
    /// Returns `Line::Pending` when the stream has nothing yet, `Line::Blank`
    /// for a terminator, or the decoded key/value. Fails with
    /// [`Error::EndOfStream`] once the stream is exhausted.
    pub fn decode_line<I>(&self, stream: &mut I) -> Result<Line<Value>>
    where
        I: Iterator<Item = RawLine> + ?Sized,
    {
        match stream.next() {
            None => Err(Error::EndOfStream),
            Some(Line::Pending) => Ok(Line::Pending),
            Some(Line::Blank) => Ok(Line::Blank),
            Some(Line::KeyValue(key, raw)) => {
                let (key, value) = self.decode_record(key, raw)?;
                Ok(Line::KeyValue(key, value))
            }
        }
    }

    /// Decodes a single `(annotated key, raw)` record.
    pub fn decode_record(&self, key: String, raw: Vec<u8>) -> Result<(String, Value)> {
        let (key, annotation) = match split_annotation(&key) {
            (plain, Some(annotation)) => (plain.to_string(), annotation.to_string()),
            (_, None) => return Ok((key, Value::Bytes(raw))),
        };

        let Some(decoders) = &self.decoders else {
            trace!(target: "typedkv::decode", %key, %annotation, "decoding disabled, passing through");
            return Ok((key, Value::Tagged { annotation, raw }));
        };

        if let Some(decode) = decoders.lookup(&annotation) {
            return Ok((key, decode(raw.as_slice())?));
        }

        debug!(target: "typedkv::decode", %key, %annotation, fallback = ?self.fallback, "unrecognized annotation");
        let value = match &self.fallback {
            DecodeFallback::Raise => return Err(Error::decoding(annotation)),
            DecodeFallback::PassThrough => Value::Tagged { annotation, raw },
            DecodeFallback::Custom(f) => f(annotation.as_str(), raw)?,
        };
        Ok((key, value))
    }

    /// Returns an iterator decoding one block from `stream`.
    pub fn block<I>(&self, stream: I) -> DecodeBlock<I>
    where
        I: Iterator<Item = RawLine>,
    {
        DecodeBlock::new(self.clone(), stream)
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}
