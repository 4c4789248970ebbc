//! Class subsystem.

use crate::model::entity::{EntityBase, EntityRef};
use crate::names::QName;

/// An `owl:Class` entity: its typed individuals and its super/disjoint/
/// equivalent relationships.
///
/// The `*_names` lists hold the raw strings copied from the document in pass
/// 1; the [`EntityRef`] lists are filled by the class-description pass.
/// Equivalent-class expressions stay raw strings until actualization, when
/// they are parsed just-in-time.
#[derive(Debug, Clone)]
pub struct ClassEntity {
    /// Shared entity state.
    pub base: EntityBase,
    /// Raw parent names straight from `rdfs:subClassOf`.
    pub parent_names: Vec<String>,
    /// Raw disjoint names straight from `owl:disjointWith`.
    pub disjoint_names: Vec<String>,
    /// Equivalent-class expression literals, parsed lazily.
    pub equivalent_expressions: Vec<String>,
    /// Parent references, resolved in pass 2. A parent that is itself an
    /// expression literal stays [`EntityRef::Unresolved`].
    pub parents: Vec<EntityRef>,
    /// Disjoint-class references, resolved in pass 2.
    pub disjoints: Vec<EntityRef>,
    /// Qualified names of individuals typed by this class.
    pub individuals: Vec<QName>,
    /// Properties this class defines for its individuals, seeded from the
    /// nested `objectProperty`/`dataProperty` maps.
    pub defined_properties: Vec<QName>,
}

impl ClassEntity {
    /// Creates a class entity with empty relationship lists.
    #[must_use]
    pub fn new(name: QName) -> Self {
        ClassEntity {
            base: EntityBase::new(name),
            parent_names: Vec::new(),
            disjoint_names: Vec::new(),
            equivalent_expressions: Vec::new(),
            parents: Vec::new(),
            disjoints: Vec::new(),
            individuals: Vec::new(),
            defined_properties: Vec::new(),
        }
    }

    /// Records a resolved superclass reference. `None` (the top type) is
    /// ignored.
    pub fn add_superclass(&mut self, parent: Option<EntityRef>) {
        if let Some(r) = parent {
            self.parents.push(r);
        }
    }

    /// Records a resolved disjoint-class reference. `None` is ignored.
    pub fn add_disjoint_class(&mut self, disjoint: Option<EntityRef>) {
        if let Some(r) = disjoint {
            self.disjoints.push(r);
        }
    }

    /// Records an equivalent-class expression literal for lazy parsing.
    pub fn add_equivalent_class_expression(&mut self, expression: impl Into<String>) {
        self.equivalent_expressions.push(expression.into());
    }
}
