//! Block-level iteration over line streams.
//!
//! Both iterators are lazy: each call to `next` performs at most one line
//! of work and never blocks. `Line::Pending` markers from a non-blocking
//! transport are forwarded as-is so the caller can retry.
//!
//! # Example
//!
//! ```rust
//! use typedkv::stream::{DecodeBlock, EncodeBlock};
//! use typedkv::{Field, Line, LineDecoder, LineEncoder, Result, Value};
//!
//! fn main() -> Result<()> {
//!     let lines = vec![
//!         Line::KeyValue("n".to_string(), Field::from(42)),
//!         Line::KeyValue("pi".to_string(), Field::from(3.14)),
//!         Line::Blank,
//!     ];
//!     let raw = EncodeBlock::new(LineEncoder::new(), lines.into_iter())
//!         .collect::<Result<Vec<_>>>()?;
//!     assert_eq!(raw[0], Line::KeyValue("n!I".to_string(), b"42".to_vec()));
//!
//!     let decoded = DecodeBlock::new(LineDecoder::new(), raw.into_iter())
//!         .collect::<Result<Vec<_>>>()?;
//!     assert_eq!(decoded[1], Line::KeyValue("pi".to_string(), Value::Float(3.14)));
//!     assert_eq!(decoded[2], Line::Blank);
//!     Ok(())
//! }
//! ```

use std::iter::FusedIterator;

use tracing::debug;

use crate::decode::LineDecoder;
use crate::encode::LineEncoder;
use crate::error::Result;
use crate::line::{Line, RawLine};
use crate::value::{Field, Value};

/// Decodes lines until the block terminator or the end of the stream.
///
/// The terminator is yielded once and ends the block; the stream itself is
/// left positioned after it, so pass `&mut stream` to read the next block.
/// End of stream ends the iteration without an error. Any other error is
/// yielded once and ends the iteration.
pub struct DecodeBlock<I> {
    decoder: LineDecoder,
    stream: I,
    done: bool,
}

impl<I> DecodeBlock<I>
where
    I: Iterator<Item = RawLine>,
{
    /// Creates a block decoder over `stream`.
    pub fn new(decoder: LineDecoder, stream: I) -> Self {
        Self {
            decoder,
            stream,
            done: false,
        }
    }

    /// Consumes the iterator, returning the underlying stream.
    pub fn into_inner(self) -> I {
        self.stream
    }
}

impl<I> Iterator for DecodeBlock<I>
where
    I: Iterator<Item = RawLine>,
{
    type Item = Result<Line<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.decoder.decode_line(&mut self.stream) {
            Ok(Line::Blank) => {
                debug!(target: "typedkv::decode", "block terminated");
                self.done = true;
                Some(Ok(Line::Blank))
            }
            Ok(line) => Some(Ok(line)),
            Err(e) if e.is_end_of_stream() => {
                debug!(target: "typedkv::decode", "stream exhausted");
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<I> FusedIterator for DecodeBlock<I> where I: Iterator<Item = RawLine> {}

/// Encodes every line supplied, one result per input line.
///
/// An error is yielded once and ends the iteration.
pub struct EncodeBlock<I> {
    encoder: LineEncoder,
    lines: I,
    done: bool,
}

impl<I> EncodeBlock<I>
where
    I: Iterator<Item = Line<Field>>,
{
    /// Creates a block encoder over `lines`.
    pub fn new(encoder: LineEncoder, lines: I) -> Self {
        Self {
            encoder,
            lines,
            done: false,
        }
    }
}

impl<I> Iterator for EncodeBlock<I>
where
    I: Iterator<Item = Line<Field>>,
{
    type Item = Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.encoder.encode_line(self.lines.next()?);
        self.done = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (_, upper) = self.lines.size_hint();
        (0, upper)
    }
}

impl<I> FusedIterator for EncodeBlock<I> where I: Iterator<Item = Line<Field>> {}
