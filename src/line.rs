//! Line records exchanged with the key/value transport.

/// Separator between a key and its annotation (`key!ANNOT`).
pub const ANNOTATION_SEPARATOR: char = '!';

/// One record of a line-oriented key/value stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<T> {
    /// The transport has no data yet; retry later.
    Pending,
    /// Blank-line terminator ending one block.
    Blank,
    /// A key and its payload.
    KeyValue(String, T),
}

/// A line as the transport reads or writes it.
pub type RawLine = Line<Vec<u8>>;

impl<T> Line<T> {
    /// Creates a key/value line.
    pub fn kv(key: impl Into<String>, value: impl Into<T>) -> Self {
        Self::KeyValue(key.into(), value.into())
    }

    /// Returns true for the not-ready marker.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true for the blank-line terminator.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Maps the payload of a key/value line, leaving markers untouched.
    pub fn map<U, F>(self, f: F) -> Line<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Pending => Line::Pending,
            Self::Blank => Line::Blank,
            Self::KeyValue(key, value) => Line::KeyValue(key, f(value)),
        }
    }
}

/// Splits a key on the first separator into `(key, annotation)`.
pub fn split_annotation(key: &str) -> (&str, Option<&str>) {
    match key.split_once(ANNOTATION_SEPARATOR) {
        Some((key, annotation)) => (key, Some(annotation)),
        None => (key, None),
    }
}

/// Appends `!annotation` to a key when an annotation is given.
pub fn annotate_key(key: &str, annotation: Option<&str>) -> String {
    match annotation {
        Some(annotation) => format!("{}{}{}", key, ANNOTATION_SEPARATOR, annotation),
        None => key.to_string(),
    }
}
