//! Backing-store adapter: an arena of node records addressed by opaque
//! handles.
//!
//! Materialization builds one [`NodeRecord`] per named entity inside a
//! [`World`]. The world owns the materialization cache (qualified name to
//! handle), so multiple independent ontologies coexist in one process by
//! owning distinct worlds. "Shape" (bases, characteristics, assertions)
//! lives in the record; "identity" is the [`NodeId`] handle.

pub mod actualize;
pub mod turtle;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{OntoforgeError, Result};
use crate::expression::CardinalityKind;
use crate::model::{Characteristic, LiteralKind};
use crate::names;

pub use actualize::Actualizer;

/// Opaque handle to a node record in a [`World`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// What a node record stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An `owl:Class` (including forward-declared placeholder classes).
    Class,
    /// An `owl:ObjectProperty`.
    ObjectProperty,
    /// An `owl:DatatypeProperty`.
    DataProperty,
    /// An `owl:AnnotationProperty`.
    AnnotationProperty,
    /// An `owl:NamedIndividual`.
    Individual,
}

/// Constraint facet on a literal datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    /// `>`
    MinExclusive,
    /// `>=`
    MinInclusive,
    /// `<`
    MaxExclusive,
    /// `<=`
    MaxInclusive,
    /// `pattern`
    Pattern,
}

impl Facet {
    /// Maps a constraint operator from expression text.
    #[must_use]
    pub fn from_operator(op: &str) -> Option<Self> {
        match op {
            ">" => Some(Facet::MinExclusive),
            ">=" => Some(Facet::MinInclusive),
            "<" => Some(Facet::MaxExclusive),
            "<=" => Some(Facet::MaxInclusive),
            "pattern" => Some(Facet::Pattern),
            _ => None,
        }
    }
}

/// An evaluated class-expression construct over arena handles.
#[derive(Debug, Clone, PartialEq)]
pub enum Construct {
    /// A named class or property node.
    Node(NodeId),
    /// Conjunction.
    Intersection(Vec<Construct>),
    /// Disjunction.
    Union(Vec<Construct>),
    /// Negation.
    Complement(Box<Construct>),
    /// Existential restriction `property.some(filler)`.
    SomeValues {
        /// The restricting property.
        property: NodeId,
        /// The filler construct.
        filler: Box<Construct>,
    },
    /// Universal restriction `property.only(filler)`.
    OnlyValues {
        /// The restricting property.
        property: NodeId,
        /// The filler construct.
        filler: Box<Construct>,
    },
    /// Value restriction resolving to a materialized individual.
    HasValue {
        /// The restricting property.
        property: NodeId,
        /// The individual.
        individual: NodeId,
    },
    /// Cardinality restriction.
    Cardinality {
        /// min/max/exactly.
        kind: CardinalityKind,
        /// The restricting property.
        property: NodeId,
        /// The count.
        count: u32,
        /// The filler construct.
        filler: Box<Construct>,
    },
    /// Enumeration over materialized individuals, order preserved.
    OneOf(Vec<NodeId>),
    /// A range-constrained literal datatype, e.g. `integer[>= 40]`.
    ConstrainedLiteral {
        /// The base literal type.
        kind: LiteralKind,
        /// The constraint facet.
        facet: Facet,
        /// Raw constraint value text.
        value: String,
    },
    /// A bare literal datatype (reserved word `integer`).
    Datatype(LiteralKind),
    /// Reserved `True`/`False`.
    Bool(bool),
    /// A pure-digit atom.
    Integer(i64),
}

/// A concrete literal carried by a property assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Plain string.
    Str(String),
    /// Language-tagged string (`v^^rdfs:Literal@en`).
    LangStr {
        /// The text.
        value: String,
        /// The language tag.
        lang: String,
    },
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// ISO date, kept textual.
    Date(String),
    /// ISO date-time, kept textual.
    DateTime(String),
    /// Object-valued: another node in the same world.
    Node(NodeId),
}

/// How an assertion materializes: a functional property given exactly one
/// value gets a single (non-list) assignment, everything else an ordered
/// list.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertedValue {
    /// Single assignment.
    Single(Literal),
    /// Ordered multi-valued assignment.
    Many(Vec<Literal>),
}

/// A property range entry: a class node or a literal kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeValue {
    /// Object range.
    Node(NodeId),
    /// Literal range.
    Literal(LiteralKind),
}

/// One materialized entity.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    /// The qualified name this node was built for.
    pub qualified_name: String,
    /// Full IRI.
    pub iri: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Whether this node was declared as a forward-reference placeholder
    /// and still awaits its real declaration.
    pub placeholder: bool,
    /// Superclasses (classes) or super-properties; empty means the
    /// kind-specific default base.
    pub bases: Vec<NodeId>,
    /// Expression-valued superclasses.
    pub super_constructs: Vec<Construct>,
    /// Equivalent-class constructs; re-synced on repeated actualization.
    pub equivalents: Vec<Construct>,
    /// Property characteristics.
    pub characteristics: BTreeSet<Characteristic>,
    /// Domain classes (properties only).
    pub domain: Vec<NodeId>,
    /// Range entries (properties only).
    pub range: Vec<RangeValue>,
    /// Inverse object property, wired both ways.
    pub inverse: Option<NodeId>,
    /// Classes this individual is an instance of (individuals only).
    pub types: Vec<NodeId>,
    /// Relation assertions in application order.
    pub assertions: Vec<(String, AssertedValue)>,
    /// Annotation-property values, kept apart from relation assertions.
    pub annotations: Vec<(String, Literal)>,
}

impl NodeRecord {
    fn new(qualified_name: String, iri: String, kind: NodeKind) -> Self {
        NodeRecord {
            qualified_name,
            iri,
            kind,
            placeholder: false,
            bases: Vec::new(),
            super_constructs: Vec::new(),
            equivalents: Vec::new(),
            characteristics: BTreeSet::new(),
            domain: Vec::new(),
            range: Vec::new(),
            inverse: None,
            types: Vec::new(),
            assertions: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

/// The backing store: node arena, materialization cache, bound prefixes.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Base namespace IRI new nodes are anchored in.
    pub base_iri: String,
    /// Prefix associated with `base_iri`.
    pub base_prefix: String,
    /// Document format version carried into the saved artifact.
    pub version: Option<String>,
    prefixes: BTreeMap<String, String>,
    nodes: Vec<NodeRecord>,
    cache: HashMap<String, NodeId>,
    locals: HashMap<String, NodeId>,
    /// All-disjoint groups asserted during actualization.
    pub disjoint_groups: Vec<Vec<NodeId>>,
    /// Ontology-level annotations.
    pub annotations: Vec<(String, Literal)>,
    /// Prepared rules (name, text).
    pub rules: Vec<(String, String)>,
}

impl World {
    /// Creates an empty world anchored at `base_iri`.
    #[must_use]
    pub fn new(base_iri: impl Into<String>, base_prefix: impl Into<String>) -> Self {
        let base_iri = base_iri.into();
        let base_prefix = base_prefix.into();
        let mut world = World {
            base_iri: base_iri.clone(),
            base_prefix: base_prefix.clone(),
            ..World::default()
        };
        world.prefixes.insert(base_prefix, base_iri);
        world
    }

    /// Binds `prefix` to `iri` in the saved artifact.
    pub fn bind_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// The bound prefix map.
    #[must_use]
    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    /// The record behind a handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.0]
    }

    /// Mutable record access.
    pub fn node_mut(&mut self, id: NodeId) -> &mut NodeRecord {
        &mut self.nodes[id.0]
    }

    /// Iterates `(handle, record)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeRecord)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Number of materialized nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cache lookup by qualified name.
    #[must_use]
    pub fn lookup(&self, qualified_name: &str) -> Option<NodeId> {
        self.cache.get(qualified_name).copied()
    }

    /// Cache lookup by bare local name (the form backing-store names use,
    /// since they disallow the separator).
    #[must_use]
    pub fn lookup_local(&self, local: &str) -> Option<NodeId> {
        self.locals.get(local).copied()
    }

    /// The handle for an already-actualized entity.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::NotActualized`] if the name was never materialized.
    pub fn handle(&self, qualified_name: &str) -> Result<NodeId> {
        self.lookup(qualified_name)
            .ok_or_else(|| OntoforgeError::NotActualized(qualified_name.to_string()))
    }

    /// Declares a new node, registering it in both caches. The caller is the
    /// actualizer, which guarantees at-most-once declaration per qualified
    /// name.
    pub fn declare(&mut self, qualified_name: &str, iri: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(NodeRecord::new(qualified_name.to_string(), iri, kind));
        self.cache.insert(qualified_name.to_string(), id);
        self.locals
            .insert(names::shorten(qualified_name).to_string(), id);
        id
    }

    /// Declares a forward-reference placeholder anchored in the base
    /// namespace.
    pub fn declare_placeholder(&mut self, local: &str, kind: NodeKind) -> NodeId {
        let qualified = names::absolutize(local, &self.base_prefix);
        let iri = format!("{}{}", self.base_iri, local);
        let id = self.declare(&qualified, iri, kind);
        self.nodes[id.0].placeholder = true;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_registers_both_caches() {
        let mut world = World::new("http://example.org/mao#", "mao");
        let id = world.declare("mao:Film", "http://example.org/mao#Film".to_string(), NodeKind::Class);
        assert_eq!(world.lookup("mao:Film"), Some(id));
        assert_eq!(world.lookup_local("Film"), Some(id));
        assert!(world.lookup("mao:Actor").is_none());
        assert!(world.handle("mao:Actor").is_err());
    }

    #[test]
    fn facet_operator_map() {
        assert_eq!(Facet::from_operator(">"), Some(Facet::MinExclusive));
        assert_eq!(Facet::from_operator(">="), Some(Facet::MinInclusive));
        assert_eq!(Facet::from_operator("<"), Some(Facet::MaxExclusive));
        assert_eq!(Facet::from_operator("<="), Some(Facet::MaxInclusive));
        assert_eq!(Facet::from_operator("pattern"), Some(Facet::Pattern));
        assert_eq!(Facet::from_operator("=="), None);
    }
}
