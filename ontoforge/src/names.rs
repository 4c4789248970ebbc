//! Qualified-name utilities.
//!
//! Every entity is addressed by a qualified name of the form `prefix:local`
//! (e.g. `mao:Film`). The functions here convert between qualified and bare
//! local names and hold the fixed table of well-known namespace prefixes that
//! every ontology document inherits. They are pure and are used at every
//! boundary crossing: document keys, entity-table lookups, and backing-store
//! names (which disallow the separator character).

use std::fmt;

use crate::error::OntoforgeError;

/// The separator between a prefix and a local name.
pub const SEPARATOR: char = ':';

/// Returns `name` unchanged if it is already qualified, otherwise prefixes it
/// with `fallback_prefix`.
#[must_use]
pub fn absolutize(name: &str, fallback_prefix: &str) -> String {
    if name.contains(SEPARATOR) {
        name.to_string()
    } else {
        format!("{fallback_prefix}{SEPARATOR}{name}")
    }
}

/// Strips any `prefix:` from a name, returning the bare local name.
#[must_use]
pub fn shorten(name: &str) -> &str {
    match name.split_once(SEPARATOR) {
        Some((_, local)) => local,
        None => name,
    }
}

/// Heuristic used when a lookup misses: text containing embedded word
/// boundaries is an unreduced class expression, not a missing bare name.
#[must_use]
pub fn looks_like_expression(text: &str) -> bool {
    text.trim().contains(' ')
}

/// A parsed `prefix:local` qualified name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    /// Namespace prefix (e.g. `mao`).
    pub prefix: String,
    /// Local name within the namespace (e.g. `Film`).
    pub local: String,
}

impl QName {
    /// Parses a qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`OntoforgeError::InvalidName`] if `name` has no `:` separator
    /// or an empty prefix or local part.
    pub fn parse(name: &str) -> Result<Self, OntoforgeError> {
        match name.split_once(SEPARATOR) {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => Ok(QName {
                prefix: prefix.to_string(),
                local: local.to_string(),
            }),
            _ => Err(OntoforgeError::InvalidName(name.to_string())),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.prefix, self.local)
    }
}

/// The fixed set of well-known prefixes merged into every document's prefix
/// map at load time.
pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("swrl", "http://www.w3.org/2003/11/swrl#"),
    ("swrlb", "http://www.w3.org/2003/11/swrlb#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
];

/// Looks up a well-known prefix.
#[must_use]
pub fn well_known_iri(prefix: &str) -> Option<&'static str> {
    WELL_KNOWN_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, iri)| *iri)
}

/// Looks up the well-known prefix registered for an IRI.
#[must_use]
pub fn well_known_prefix(iri: &str) -> Option<&'static str> {
    WELL_KNOWN_PREFIXES
        .iter()
        .find(|(_, i)| *i == iri)
        .map(|(p, _)| *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_keeps_qualified_names() {
        assert_eq!(absolutize("mao:Film", "xyz"), "mao:Film");
        assert_eq!(absolutize("Film", "mao"), "mao:Film");
    }

    #[test]
    fn absolutize_shorten_round_trip() {
        let x = "mao:Film";
        assert_eq!(absolutize(shorten(x), "mao"), x);
        // The output always contains exactly one separator.
        assert_eq!(absolutize("Film", "mao").matches(SEPARATOR).count(), 1);
    }

    #[test]
    fn qname_parse_rejects_bare_names() {
        assert!(QName::parse("Film").is_err());
        assert!(QName::parse(":Film").is_err());
        let q = QName::parse("mao:Film").unwrap();
        assert_eq!(q.to_string(), "mao:Film");
    }

    #[test]
    fn expression_heuristic() {
        assert!(looks_like_expression("Dog and Cat"));
        assert!(!looks_like_expression("mao:Dog"));
    }
}
