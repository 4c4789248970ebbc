//! Property subsystem: annotation, data, and object property entities.

use std::collections::BTreeSet;

use crate::model::entity::{EntityBase, EntityRef};
use crate::names::QName;

/// The fixed set of native literal types a data-property range can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiteralKind {
    /// `xsd:boolean`
    Bool,
    /// `xsd:string` (also `rdfs:Literal`)
    Str,
    /// `xsd:integer`
    Int,
    /// `xsd:float` / `xsd:decimal`
    Float,
    /// `xsd:date`
    Date,
    /// `xsd:dateTime`
    DateTime,
}

impl LiteralKind {
    /// Maps a datatype name from the document to a literal kind.
    #[must_use]
    pub fn from_datatype_name(name: &str) -> Option<Self> {
        match name {
            "xsd:boolean" | "boolean" => Some(LiteralKind::Bool),
            "xsd:string" | "string" | "rdfs:Literal" => Some(LiteralKind::Str),
            "xsd:integer" | "integer" => Some(LiteralKind::Int),
            "xsd:float" | "float" | "xsd:decimal" | "decimal" => Some(LiteralKind::Float),
            "xsd:date" | "date" => Some(LiteralKind::Date),
            "xsd:dateTime" | "dateTime" => Some(LiteralKind::DateTime),
            _ => None,
        }
    }

    /// The canonical datatype name written back on export.
    #[must_use]
    pub fn datatype_name(self) -> &'static str {
        match self {
            LiteralKind::Bool => "xsd:boolean",
            LiteralKind::Str => "xsd:string",
            LiteralKind::Int => "xsd:integer",
            LiteralKind::Float => "xsd:float",
            LiteralKind::Date => "xsd:date",
            LiteralKind::DateTime => "xsd:dateTime",
        }
    }
}

/// A property-level logical qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Characteristic {
    /// `owl:SymmetricProperty`
    Symmetric,
    /// `owl:TransitiveProperty`
    Transitive,
    /// `owl:FunctionalProperty`
    Functional,
    /// `owl:InverseFunctionalProperty`
    InverseFunctional,
    /// `owl:ReflexiveProperty`
    Reflexive,
    /// `owl:IrreflexiveProperty`
    Irreflexive,
    /// `owl:AsymmetricProperty`
    Asymmetric,
}

impl Characteristic {
    /// Maps a characteristic name from the document.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "owl:SymmetricProperty" => Some(Characteristic::Symmetric),
            "owl:TransitiveProperty" => Some(Characteristic::Transitive),
            "owl:FunctionalProperty" => Some(Characteristic::Functional),
            "owl:InverseFunctionalProperty" => Some(Characteristic::InverseFunctional),
            "owl:ReflexiveProperty" => Some(Characteristic::Reflexive),
            "owl:IrreflexiveProperty" => Some(Characteristic::Irreflexive),
            "owl:AsymmetricProperty" => Some(Characteristic::Asymmetric),
            _ => None,
        }
    }

    /// The qualified name written back on export.
    #[must_use]
    pub fn qualified_name(self) -> &'static str {
        match self {
            Characteristic::Symmetric => "owl:SymmetricProperty",
            Characteristic::Transitive => "owl:TransitiveProperty",
            Characteristic::Functional => "owl:FunctionalProperty",
            Characteristic::InverseFunctional => "owl:InverseFunctionalProperty",
            Characteristic::Reflexive => "owl:ReflexiveProperty",
            Characteristic::Irreflexive => "owl:IrreflexiveProperty",
            Characteristic::Asymmetric => "owl:AsymmetricProperty",
        }
    }
}

/// An `owl:AnnotationProperty` entity. Ranges are literal-typed; the default
/// is a plain string.
#[derive(Debug, Clone)]
pub struct AnnotationPropertyEntity {
    /// Shared entity state.
    pub base: EntityBase,
    /// Declared literal range.
    pub range: Vec<LiteralKind>,
}

impl AnnotationPropertyEntity {
    /// Creates an annotation property with the default string range.
    #[must_use]
    pub fn new(name: QName) -> Self {
        AnnotationPropertyEntity {
            base: EntityBase::new(name),
            range: vec![LiteralKind::Str],
        }
    }
}

/// An `owl:DatatypeProperty` entity.
#[derive(Debug, Clone)]
pub struct DataPropertyEntity {
    /// Shared entity state.
    pub base: EntityBase,
    /// Declared literal range, mapped through the fixed datatype table.
    pub range: Vec<LiteralKind>,
    /// Declared domain class names, resolved in pass 2.
    pub domain: Vec<EntityRef>,
    /// Whether `owl:FunctionalProperty` was declared.
    pub functional: bool,
}

impl DataPropertyEntity {
    /// Creates a data property with the default string range.
    #[must_use]
    pub fn new(name: QName) -> Self {
        DataPropertyEntity {
            base: EntityBase::new(name),
            range: vec![LiteralKind::Str],
            domain: Vec::new(),
            functional: false,
        }
    }
}

/// An `owl:ObjectProperty` entity carrying range, domain, inverse-name, and
/// characteristic metadata.
#[derive(Debug, Clone)]
pub struct ObjectPropertyEntity {
    /// Shared entity state.
    pub base: EntityBase,
    /// Raw range names straight from the document.
    pub range_names: Vec<String>,
    /// Raw domain names straight from the document.
    pub domain_names: Vec<String>,
    /// Range references, resolved in pass 2.
    pub range: Vec<EntityRef>,
    /// Domain references, resolved in pass 2.
    pub domain: Vec<EntityRef>,
    /// Raw inverse-property name, if declared.
    pub inverse_name: Option<String>,
    /// Inverse reference, resolved in pass 2.
    pub inverse: Option<EntityRef>,
    /// Declared characteristics.
    pub characteristics: BTreeSet<Characteristic>,
}

impl ObjectPropertyEntity {
    /// Creates an object property with no metadata.
    #[must_use]
    pub fn new(name: QName) -> Self {
        ObjectPropertyEntity {
            base: EntityBase::new(name),
            range_names: Vec::new(),
            domain_names: Vec::new(),
            range: Vec::new(),
            domain: Vec::new(),
            inverse_name: None,
            inverse: None,
            characteristics: BTreeSet::new(),
        }
    }

    /// Whether a single asserted value should materialize as a single
    /// (non-list) assignment.
    #[must_use]
    pub fn is_single_valued(&self) -> bool {
        self.characteristics.contains(&Characteristic::Functional)
            || self.characteristics.contains(&Characteristic::InverseFunctional)
    }
}
