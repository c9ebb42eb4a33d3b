//! Ordered annotation tables for dispatching conversions.
//!
//! Lookups scan entries in insertion order and the first match wins.
//! Synonym sets within one conversion table never overlap, so for those
//! the order only matters for iteration; for the type table it decides
//! which annotation a value gets when several matchers accept it.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

/// Decoder function type: raw bytes to a typed value.
pub type DecodeFn = Box<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;

/// Encoder function type: a typed value to (normally) `Value::Bytes`.
pub type EncodeFn = Box<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Predicate deciding whether a value belongs to a registered type.
pub type TypeMatcher = fn(&Value) -> bool;

/// Table mapping annotations to decoders.
pub type DecodeTable = ConversionTable<DecodeFn>;

/// Table mapping annotations to encoders.
pub type EncodeTable = ConversionTable<EncodeFn>;

/// A group of interchangeable annotation names.
///
/// The first name is the canonical one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymSet {
    names: Vec<Cow<'static, str>>,
}

impl SynonymSet {
    /// Creates a synonym set from its names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `annotation` is one of the names.
    pub fn contains(&self, annotation: &str) -> bool {
        self.names.iter().any(|name| name == annotation)
    }

    /// Returns the canonical name.
    pub fn canonical(&self) -> Option<&str> {
        self.names.first().map(|name| name.as_ref())
    }

    /// Returns all names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_ref())
    }

    fn overlaps(&self, other: &SynonymSet) -> Option<&str> {
        self.names().find(|name| other.contains(name))
    }
}

/// Ordered mapping from synonym sets to converters.
pub struct ConversionTable<F> {
    entries: Vec<(SynonymSet, F)>,
}

impl<F> ConversionTable<F> {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    ///
    /// Fails if any name is already registered in another set.
    pub fn insert(&mut self, synonyms: SynonymSet, converter: F) -> Result<()> {
        if let Some(name) = self
            .entries
            .iter()
            .find_map(|(existing, _)| synonyms.overlaps(existing))
        {
            return Err(Error::custom(format!(
                "annotation already registered: {}",
                name
            )));
        }
        self.entries.push((synonyms, converter));
        Ok(())
    }

    /// Appends an entry the caller knows to be disjoint from the rest.
    pub(crate) fn push(&mut self, synonyms: SynonymSet, converter: F) {
        self.entries.push((synonyms, converter));
    }

    /// Removes the entry containing `annotation`, returning it.
    pub fn remove(&mut self, annotation: &str) -> Option<(SynonymSet, F)> {
        let index = self
            .entries
            .iter()
            .position(|(synonyms, _)| synonyms.contains(annotation))?;
        Some(self.entries.remove(index))
    }

    /// Finds the converter for `annotation`, first match in order.
    pub fn lookup(&self, annotation: &str) -> Option<&F> {
        self.entries
            .iter()
            .find(|(synonyms, _)| synonyms.contains(annotation))
            .map(|(_, converter)| converter)
    }

    /// Checks if an annotation is recognized.
    pub fn is_registered(&self, annotation: &str) -> bool {
        self.lookup(annotation).is_some()
    }

    /// Returns the synonym sets in order.
    pub fn synonyms(&self) -> impl Iterator<Item = &SynonymSet> {
        self.entries.iter().map(|(synonyms, _)| synonyms)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConversionTable<DecodeFn> {
    /// Registers a decoder under the given names.
    pub fn register<I, S, C>(&mut self, names: I, decoder: C) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
        C: Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(SynonymSet::new(names), Box::new(decoder))
    }
}

impl ConversionTable<EncodeFn> {
    /// Registers an encoder under the given names.
    pub fn register<I, S, C>(&mut self, names: I, encoder: C) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
        C: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(SynonymSet::new(names), Box::new(encoder))
    }
}

impl<F> Default for ConversionTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for ConversionTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.synonyms()).finish()
    }
}

/// Ordered mapping from value types to their canonical annotation.
#[derive(Clone, Default)]
pub struct TypeTable {
    entries: Vec<(TypeMatcher, Cow<'static, str>)>,
}

impl TypeTable {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a matcher and the annotation it implies.
    pub fn register(&mut self, matcher: TypeMatcher, annotation: impl Into<Cow<'static, str>>) {
        self.entries.push((matcher, annotation.into()));
    }

    /// Infers the annotation for a value, first match in order.
    pub fn infer(&self, value: &Value) -> Option<&str> {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher(value))
            .map(|(_, annotation)| annotation.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(_, annotation)| annotation))
            .finish()
    }
}
