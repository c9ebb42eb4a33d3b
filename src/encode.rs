//! Typedkv line encoder.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::convert::{shared_encoders, shared_types};
use crate::error::{Error, Result};
use crate::line::{annotate_key, Line, RawLine};
use crate::stream::EncodeBlock;
use crate::table::{EncodeTable, TypeTable};
use crate::value::{Field, Value};

/// Custom encode fallback: `(annotation, value)` to a final value.
pub type EncodeFallbackFn = dyn Fn(Option<&str>, Value) -> Result<Value> + Send + Sync;

/// Final step applied to every encoded value.
#[derive(Clone, Default)]
pub enum EncodeFallback {
    /// Require the value to already be [`Value::Bytes`].
    #[default]
    EnsureEncoded,
    /// Call a user function; its result must still be bytes.
    Custom(Arc<EncodeFallbackFn>),
}

impl EncodeFallback {
    /// Creates a custom fallback.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Option<&str>, Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl fmt::Debug for EncodeFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnsureEncoded => f.write_str("EnsureEncoded"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Checks that a value is raw bytes and unwraps it.
pub fn ensure_encoded(annotation: Option<&str>, value: Value) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        other => Err(Error::encoding(annotation, other)),
    }
}

/// LineEncoder turns typed lines into annotated raw lines.
#[derive(Clone, Debug)]
pub struct LineEncoder {
    encoders: Option<Arc<EncodeTable>>,
    types: Option<Arc<TypeTable>>,
    fallback: EncodeFallback,
}

impl LineEncoder {
    /// Creates an encoder with the built-in tables.
    pub fn new() -> Self {
        Self {
            encoders: Some(shared_encoders()),
            types: Some(shared_types()),
            fallback: EncodeFallback::EnsureEncoded,
        }
    }

    /// Sets the encode table; `None` skips conversion entirely.
    pub fn encoders(mut self, encoders: Option<EncodeTable>) -> Self {
        self.encoders = encoders.map(Arc::new);
        self
    }

    /// Sets the type table; `None` disables annotation inference.
    pub fn types(mut self, types: Option<TypeTable>) -> Self {
        self.types = types.map(Arc::new);
        self
    }

    /// Sets the final fallback step.
    pub fn fallback(mut self, fallback: EncodeFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Encodes one line. Markers pass through unchanged.
    pub fn encode_line(&self, line: Line<Field>) -> Result<RawLine> {
        match line {
            Line::Pending => Ok(Line::Pending),
            Line::Blank => Ok(Line::Blank),
            Line::KeyValue(key, field) => {
                let (key, raw) = self.encode_record(&key, field)?;
                Ok(Line::KeyValue(key, raw))
            }
        }
    }

    /// Encodes a single `(key, field)` record into `(annotated key, raw)`.
    pub fn encode_record(&self, key: &str, field: Field) -> Result<(String, Vec<u8>)> {
        let (mut annotation, mut value) = field.into_parts();

        if annotation.is_none() {
            annotation = self
                .types
                .as_deref()
                .and_then(|types| types.infer(&value))
                .map(str::to_string);
            trace!(target: "typedkv::encode", key, annotation = ?annotation, kind = value.kind(), "inferred annotation");
        }

        let encoder = match (&self.encoders, &annotation) {
            (Some(encoders), Some(annotation)) => encoders.lookup(annotation),
            _ => None,
        };
        if let Some(encode) = encoder {
            value = encode(value)?;
        }

        let annotation = annotation.as_deref();
        let value = match &self.fallback {
            EncodeFallback::EnsureEncoded => Value::Bytes(ensure_encoded(annotation, value)?),
            EncodeFallback::Custom(f) => f(annotation, value)?,
        };
        let raw = ensure_encoded(annotation, value)?;

        Ok((annotate_key(key, annotation), raw))
    }

    /// Returns an iterator encoding every line of `lines`.
    pub fn block<I>(&self, lines: I) -> EncodeBlock<I::IntoIter>
    where
        I: IntoIterator<Item = Line<Field>>,
    {
        EncodeBlock::new(self.clone(), lines.into_iter())
    }
}

impl Default for LineEncoder {
    fn default() -> Self {
        Self::new()
    }
}
