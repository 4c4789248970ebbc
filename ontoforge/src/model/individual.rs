//! Named individuals.

use crate::model::entity::{EntityBase, EntityRef};
use crate::names::QName;

/// An `owl:NamedIndividual`: type assertions plus (possibly multi-valued,
/// possibly cross-referencing) property assertions held on the shared base.
#[derive(Debug, Clone)]
pub struct IndividualEntity {
    /// Shared entity state; `base.property_values` holds the relation map.
    pub base: EntityBase,
    /// Classes this individual is an instance of, resolved at load time.
    pub types: Vec<EntityRef>,
}

impl IndividualEntity {
    /// Creates an individual with no types or assertions.
    #[must_use]
    pub fn new(name: QName) -> Self {
        IndividualEntity {
            base: EntityBase::new(name),
            types: Vec::new(),
        }
    }

    /// Declares this individual an instance of `class_ref`.
    pub fn be_type_of(&mut self, class_ref: EntityRef) {
        self.types.push(class_ref);
    }
}
