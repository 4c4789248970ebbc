//! In-memory entity graph.
//!
//! Entities are created during loading (pass 1) with unresolved name lists,
//! cross-referenced during the class-description pass (pass 2), and
//! materialized during export. The [`Entity`] enum is what the ontology's
//! entity table stores; each variant carries the shared [`EntityBase`].

pub mod class;
pub mod entity;
pub mod individual;
pub mod property;

pub use class::ClassEntity;
pub use entity::{Assertions, EntityBase, EntityRef};
pub use individual::IndividualEntity;
pub use property::{
    AnnotationPropertyEntity, Characteristic, DataPropertyEntity, LiteralKind,
    ObjectPropertyEntity,
};

use crate::names::QName;

/// A named thing in the entity table: one of the four declared kinds plus
/// named individuals.
#[derive(Debug, Clone)]
pub enum Entity {
    /// An `owl:Class`.
    Class(ClassEntity),
    /// An `owl:ObjectProperty`.
    ObjectProperty(ObjectPropertyEntity),
    /// An `owl:DatatypeProperty`.
    DataProperty(DataPropertyEntity),
    /// An `owl:AnnotationProperty`.
    AnnotationProperty(AnnotationPropertyEntity),
    /// An `owl:NamedIndividual`.
    Individual(IndividualEntity),
}

impl Entity {
    /// The shared entity state.
    #[must_use]
    pub fn base(&self) -> &EntityBase {
        match self {
            Entity::Class(c) => &c.base,
            Entity::ObjectProperty(p) => &p.base,
            Entity::DataProperty(p) => &p.base,
            Entity::AnnotationProperty(p) => &p.base,
            Entity::Individual(i) => &i.base,
        }
    }

    /// Mutable access to the shared entity state.
    pub fn base_mut(&mut self) -> &mut EntityBase {
        match self {
            Entity::Class(c) => &mut c.base,
            Entity::ObjectProperty(p) => &mut p.base,
            Entity::DataProperty(p) => &mut p.base,
            Entity::AnnotationProperty(p) => &mut p.base,
            Entity::Individual(i) => &mut i.base,
        }
    }

    /// The entity's qualified name.
    #[must_use]
    pub fn name(&self) -> &QName {
        &self.base().name
    }

    /// The section keyword this entity kind is declared under.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Entity::Class(_) => "Class",
            Entity::ObjectProperty(_) => "ObjectProperty",
            Entity::DataProperty(_) => "DataProperty",
            Entity::AnnotationProperty(_) => "AnnotationProperty",
            Entity::Individual(_) => "Individual",
        }
    }

    /// Whether this is a property of any kind.
    #[must_use]
    pub fn is_property(&self) -> bool {
        matches!(
            self,
            Entity::ObjectProperty(_) | Entity::DataProperty(_) | Entity::AnnotationProperty(_)
        )
    }
}
