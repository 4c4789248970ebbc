//! Serde data model of the declarative ontology document.
//!
//! The document is the YAML surface consumed by the converter and produced by
//! the exporter. Section keys mirror the RDF vocabulary they stand for
//! (`rdfs:subClassOf`, `owl:disjointWith`, ...); unknown keys are tolerated.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value appearing in relation maps and annotation lists.
///
/// The untagged ordering matters: YAML `true` must become [`Value::Bool`]
/// before it can be mistaken for a string, and integers must win over floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A floating-point literal.
    Float(f64),
    /// A string: a plain literal, a suffixed literal (`v^^xsd:integer`,
    /// `v^^rdfs:Literal@en`), or the name of another entity.
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

/// `owl:equivalentClass` accepts either a bare list of expression strings or
/// the same list nested under an `owl:Restriction` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EquivalentClasses {
    /// `equivalentClass: ["A and B"]`
    Expressions(Vec<String>),
    /// `equivalentClass: { owl:Restriction: ["A and B"] }`
    Restriction {
        /// The nested expression list.
        #[serde(rename = "owl:Restriction", default)]
        restriction: Vec<String>,
    },
}

impl EquivalentClasses {
    /// The expression strings regardless of nesting.
    #[must_use]
    pub fn expressions(&self) -> &[String] {
        match self {
            EquivalentClasses::Expressions(v) => v,
            EquivalentClasses::Restriction { restriction } => restriction,
        }
    }
}

/// Sub-document of one `Class` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSection {
    /// Parent class names.
    #[serde(rename = "rdfs:subClassOf", default, skip_serializing_if = "Vec::is_empty")]
    pub sub_class_of: Vec<String>,
    /// Mutually exclusive class names.
    #[serde(rename = "owl:disjointWith", default, skip_serializing_if = "Vec::is_empty")]
    pub disjoint_with: Vec<String>,
    /// Equivalent-class expression literals.
    #[serde(rename = "owl:equivalentClass", default, skip_serializing_if = "Option::is_none")]
    pub equivalent_class: Option<EquivalentClasses>,
    /// Annotation-property name to literal list.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Vec<Value>>,
    /// Names of object properties this class defines for its individuals.
    #[serde(rename = "objectProperty", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub object_properties: BTreeMap<String, serde_yaml::Value>,
    /// Names of data properties this class defines for its individuals.
    #[serde(rename = "dataProperty", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_properties: BTreeMap<String, serde_yaml::Value>,
}

/// Sub-document of one property entry (any of the three property kinds).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySection {
    /// Range names: class names for object properties, literal-type names
    /// for data properties.
    #[serde(rename = "rdfs:range", default, skip_serializing_if = "Vec::is_empty")]
    pub range: Vec<String>,
    /// Domain class names.
    #[serde(rename = "rdfs:domain", default, skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<String>,
    /// Characteristics (object properties only), e.g. `owl:FunctionalProperty`.
    #[serde(rename = "rdf:type", default, skip_serializing_if = "Vec::is_empty")]
    pub characteristics: Vec<String>,
    /// Single-element list naming the inverse object property.
    #[serde(rename = "owl:inverseOf", default, skip_serializing_if = "Vec::is_empty")]
    pub inverse_of: Vec<String>,
    /// Annotation-property name to literal list.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Vec<Value>>,
}

/// Sub-document of one `Individual` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualSection {
    /// Class names this individual is an instance of.
    #[serde(rename = "rdf:type", default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Property-name to value-list assertions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, Vec<Value>>,
    /// Annotation-property name to literal list.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Vec<Value>>,
}

/// The whole declarative document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Declared document format version (semantic version).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Base namespace IRI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    /// Prefix to IRI mappings, merged over the well-known set at load time.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, String>,
    /// Ontology-level annotations (label, title, license).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Vec<Value>>,
    /// Annotation-property declarations.
    #[serde(rename = "AnnotationProperty", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotation_properties: BTreeMap<String, PropertySection>,
    /// Data-property declarations.
    #[serde(rename = "DataProperty", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_properties: BTreeMap<String, PropertySection>,
    /// Object-property declarations.
    #[serde(rename = "ObjectProperty", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub object_properties: BTreeMap<String, PropertySection>,
    /// Class declarations.
    #[serde(rename = "Class", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub classes: BTreeMap<String, ClassSection>,
    /// Named-individual declarations.
    #[serde(rename = "Individual", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub individuals: BTreeMap<String, IndividualSection>,
    /// SWRL-style rules, name to rule text.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, String>,
}

impl Document {
    /// Parses a document from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OntoforgeError::Document`] on malformed YAML.
    pub fn from_yaml(text: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Serializes the document back to YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OntoforgeError::Document`] if serialization fails.
    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
