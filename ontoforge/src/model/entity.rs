//! Common state shared by every named entity.

use crate::document::Value;
use crate::names::QName;

/// A cross-reference to another entity.
///
/// References load as raw name strings and are replaced with resolved
/// qualified names during the second pass; the two states are kept apart as a
/// sum type instead of overloading a plain string. An `Unresolved` value
/// surviving past resolution is either a recorded missing name or an
/// unreduced class-expression literal (multi-word-shaped text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    /// A raw name (or class-expression text) not yet resolved.
    Unresolved(String),
    /// A reference resolved against the entity table.
    Resolved(QName),
}

impl EntityRef {
    /// The resolved qualified name, if resolution has happened.
    #[must_use]
    pub fn resolved(&self) -> Option<&QName> {
        match self {
            EntityRef::Resolved(q) => Some(q),
            EntityRef::Unresolved(_) => None,
        }
    }

    /// The raw text of an unresolved reference.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            EntityRef::Unresolved(s) => Some(s),
            EntityRef::Resolved(_) => None,
        }
    }
}

/// An order-preserving multimap of property-name to values.
///
/// Assertion order is part of the observable behavior: multi-valued
/// assertions materialize as lists in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assertions {
    entries: Vec<(String, Vec<Value>)>,
}

impl Assertions {
    /// An empty assertion store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` under `key`, preserving insertion order.
    pub fn push(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key.to_string(), vec![value])),
        }
    }

    /// Replaces all values under `key`.
    pub fn set(&mut self, key: &str, values: Vec<Value>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key.to_string(), values)),
        }
    }

    /// The values asserted under `key`, in order.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterates `(key, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Whether no assertions are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State common to every named entity: its qualified name, its
/// property-assertion store, and its annotation store.
#[derive(Debug, Clone)]
pub struct EntityBase {
    /// Unique qualified name; the entity-table key.
    pub name: QName,
    /// Multi-valued property assertions, order preserved.
    pub property_values: Assertions,
    /// Annotation literals (`rdfs:label`, `rdfs:comment`, ...).
    pub annotations: Assertions,
}

impl EntityBase {
    /// Creates an entity base for a qualified name.
    #[must_use]
    pub fn new(name: QName) -> Self {
        EntityBase {
            name,
            property_values: Assertions::new(),
            annotations: Assertions::new(),
        }
    }

    /// Adds one property assertion.
    pub fn add_property_assertion(&mut self, property: &str, value: Value) {
        self.property_values.push(property, value);
    }

    /// Adds one annotation literal.
    pub fn add_annotation(&mut self, annotation: &str, value: Value) {
        self.annotations.push(annotation, value);
    }

    /// Adds an `rdfs:label`.
    pub fn add_label(&mut self, value: impl Into<String>) {
        self.add_annotation("rdfs:label", Value::Str(value.into()));
    }

    /// Adds an `rdfs:comment`.
    pub fn add_comment(&mut self, value: impl Into<String>) {
        self.add_annotation("rdfs:comment", Value::Str(value.into()));
    }
}
