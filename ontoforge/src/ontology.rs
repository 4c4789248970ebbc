//! Ontology container.
//!
//! Holds the entity table keyed by qualified name, the prefix registry,
//! top-level annotations, and rules. The container is passive data; loading
//! is the converter's job and materialization the actualizer's.

use std::collections::BTreeMap;

use crate::document::Value;
use crate::error::{OntoforgeError, Result};
use crate::model::entity::Assertions;
use crate::model::Entity;
use crate::names::{self, QName};

/// The in-memory ontology: entity table, prefix map, annotations, rules.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    /// Base namespace IRI for entities declared without a foreign prefix.
    pub base_iri: String,
    /// Prefix associated with `base_iri`.
    pub base_prefix: String,
    prefixes: BTreeMap<String, String>,
    /// Ontology-level annotations (label, title, license).
    pub annotations: Assertions,
    /// Entity table; qualified names are unique and every lookup uses them.
    pub entities: BTreeMap<String, Entity>,
    /// SWRL-style rules, raw text keyed by rule name.
    pub rules: BTreeMap<String, String>,
}

impl Ontology {
    /// Creates an ontology rooted at `base_iri` with `base_prefix` bound to
    /// it.
    #[must_use]
    pub fn new(base_iri: impl Into<String>, base_prefix: impl Into<String>) -> Self {
        let base_iri = base_iri.into();
        let base_prefix = base_prefix.into();
        let mut onto = Ontology {
            base_iri: base_iri.clone(),
            base_prefix: base_prefix.clone(),
            ..Ontology::default()
        };
        onto.prefixes.insert(base_prefix, base_iri);
        onto
    }

    /// Associates `prefix` with `iri`.
    ///
    /// # Errors
    ///
    /// With `allow_update` false, remapping an already-registered prefix is
    /// a [`OntoforgeError::PrefixResolution`] error.
    pub fn define_prefix(
        &mut self,
        prefix: impl Into<String>,
        iri: impl Into<String>,
        allow_update: bool,
    ) -> Result<()> {
        let prefix = prefix.into();
        if !allow_update && self.prefixes.contains_key(&prefix) {
            return Err(OntoforgeError::PrefixResolution(prefix));
        }
        self.prefixes.insert(prefix, iri.into());
        Ok(())
    }

    /// The registered prefix map (well-known prefixes not included).
    #[must_use]
    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    /// Returns the IRI registered for `prefix`, consulting the local map
    /// first and the well-known set second.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::PrefixResolution`] if the prefix is unmapped.
    pub fn lookup_iri(&self, prefix: &str) -> Result<&str> {
        self.prefixes
            .get(prefix)
            .map(String::as_str)
            .or_else(|| names::well_known_iri(prefix))
            .ok_or_else(|| OntoforgeError::PrefixResolution(prefix.to_string()))
    }

    /// Returns the prefix registered for `iri`, if any.
    #[must_use]
    pub fn lookup_prefix(&self, iri: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, i)| i.as_str() == iri)
            .map(|(p, _)| p.as_str())
            .or_else(|| names::well_known_prefix(iri))
    }

    /// The full IRI of a qualified name.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::PrefixResolution`] if the name's prefix is unmapped.
    pub fn full_iri(&self, name: &QName) -> Result<String> {
        Ok(format!("{}{}", self.lookup_iri(&name.prefix)?, name.local))
    }

    /// Inserts an entity under its qualified name. A second insert of the
    /// same name replaces the first.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.name().to_string(), entity);
    }

    /// Looks up an entity by qualified name.
    #[must_use]
    pub fn entity(&self, qualified_name: &str) -> Option<&Entity> {
        self.entities.get(qualified_name)
    }

    /// Mutable entity lookup.
    pub fn entity_mut(&mut self, qualified_name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(qualified_name)
    }

    /// Adds a rule by name; the text is carried raw and prepared only at
    /// materialization.
    pub fn add_rule(&mut self, name: impl Into<String>, rule: impl Into<String>) {
        self.rules.insert(name.into(), rule.into());
    }

    /// Rule text with the light substitutions applied: the ontology's own
    /// prefix and the `swrlb:` builtin prefix stripped, the ` ^ ` conjunction
    /// marker translated to a comma separator.
    #[must_use]
    pub fn prepared_rule(&self, text: &str) -> String {
        text.replace(&format!("{}:", self.base_prefix), "")
            .replace("swrlb:", "")
            .replace(" ^ ", ", ")
    }

    /// Adds an ontology-level annotation.
    pub fn add_annotation(&mut self, annotation: &str, value: Value) {
        self.annotations.push(annotation, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_lookup_falls_back_to_well_known() {
        let onto = Ontology::new("http://example.org/mao#", "mao");
        assert_eq!(onto.lookup_iri("mao").unwrap(), "http://example.org/mao#");
        assert_eq!(
            onto.lookup_iri("owl").unwrap(),
            "http://www.w3.org/2002/07/owl#"
        );
        assert!(onto.lookup_iri("nope").is_err());
    }

    #[test]
    fn define_prefix_guards_remapping() {
        let mut onto = Ontology::new("http://example.org/mao#", "mao");
        assert!(onto.define_prefix("mao", "http://other/", false).is_err());
        assert!(onto.define_prefix("mao", "http://other/", true).is_ok());
    }

    #[test]
    fn rule_substitution() {
        let onto = Ontology::new("http://example.org/mao#", "mao");
        let prepared = onto.prepared_rule(
            "mao:ActingSituation(?p) ^ mao:hasActor(?p, ?a) ^ swrlb:equal(?a, ?b)",
        );
        assert_eq!(prepared, "ActingSituation(?p), hasActor(?p, ?a), equal(?a, ?b)");
    }
}
