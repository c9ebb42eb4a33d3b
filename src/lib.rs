//! Typedkv - typed value annotations for line-oriented key/value streams
//!
//! A key may carry an annotation after a `!` separator (`count!I`,
//! `when!Time`) naming how its raw bytes convert to a typed [`Value`].
//! The transport that reads and writes the raw lines lives elsewhere; this
//! crate only maps [`RawLine`] records to typed lines and back.
//!
//! # Example
//!
//! ```rust
//! use typedkv::{Field, Line, LineDecoder, LineEncoder, Result, Value};
//!
//! fn main() -> Result<()> {
//!     // Encoding
//!     let encoder = LineEncoder::new();
//!     let line = encoder.encode_line(Line::KeyValue("x".to_string(), Field::from(3.14)))?;
//!     assert_eq!(line, Line::KeyValue("x!F".to_string(), b"3.14".to_vec()));
//!
//!     // Decoding
//!     let decoder = LineDecoder::new();
//!     let mut stream = vec![Line::Pending, line].into_iter();
//!     assert_eq!(decoder.decode_line(&mut stream)?, Line::Pending);
//!     assert_eq!(
//!         decoder.decode_line(&mut stream)?,
//!         Line::KeyValue("x".to_string(), Value::Float(3.14))
//!     );
//!     Ok(())
//! }
//! ```

pub mod convert;
mod decode;
mod encode;
mod error;
mod line;
pub mod stream;
mod table;
mod timestamp;
mod value;

pub use decode::{DecodeFallback, DecodeFallbackFn, LineDecoder};
pub use encode::{ensure_encoded, EncodeFallback, EncodeFallbackFn, LineEncoder};
pub use error::{Error, Result};
pub use line::{annotate_key, split_annotation, Line, RawLine, ANNOTATION_SEPARATOR};
pub use stream::{DecodeBlock, EncodeBlock};
pub use table::{
    ConversionTable, DecodeFn, DecodeTable, EncodeFn, EncodeTable, SynonymSet, TypeMatcher,
    TypeTable,
};
pub use timestamp::Timestamp;
pub use value::{Field, Value};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decodes the next line of `stream` with the default configuration.
pub fn decode_line<I>(stream: &mut I) -> Result<Line<Value>>
where
    I: Iterator<Item = RawLine> + ?Sized,
{
    LineDecoder::new().decode_line(stream)
}

/// Encodes one line with the default configuration.
pub fn encode_line(line: Line<Field>) -> Result<RawLine> {
    LineEncoder::new().encode_line(line)
}

/// Decodes one block of `stream` with the default configuration.
pub fn decode_block<I>(stream: I) -> DecodeBlock<I>
where
    I: Iterator<Item = RawLine>,
{
    DecodeBlock::new(LineDecoder::new(), stream)
}

/// Encodes every line of `lines` with the default configuration.
pub fn encode_block<I>(lines: I) -> EncodeBlock<I::IntoIter>
where
    I: IntoIterator<Item = Line<Field>>,
{
    EncodeBlock::new(LineEncoder::new(), lines.into_iter())
}
