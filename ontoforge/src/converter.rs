//! Two-pass document loading and world export.
//!
//! Pass 1 walks the four kind sections in a fixed order (annotation
//! properties, data properties, object properties, classes) and creates one
//! entity per declaration, copying cross-reference names raw. Individuals
//! are loaded next, with their declared types resolved immediately. Pass 2
//! resolves the raw names collected in pass 1, so forward references across
//! sections cost nothing. Names that resolve nowhere accumulate in a missing
//! set reported as a single diagnostic by the terminal consistency gate.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::document::{Document, Value};
use crate::error::{OntoforgeError, Result};
use crate::model::{
    AnnotationPropertyEntity, Characteristic, ClassEntity, DataPropertyEntity, Entity, EntityRef,
    IndividualEntity, LiteralKind, ObjectPropertyEntity,
};
use crate::names::{self, QName};
use crate::ontology::Ontology;
use crate::world::actualize::parse_literal;
use crate::world::{Actualizer, Literal, World};

/// Highest document format version this crate accepts.
pub const SUPPORTED_VERSION: &str = "1.0.0";

/// Loads a declarative document into an [`Ontology`] and exports it to a
/// [`World`].
#[derive(Debug)]
pub struct OntologyConverter {
    ontology: Ontology,
    version: Option<String>,
    missing: BTreeSet<String>,
}

impl OntologyConverter {
    /// Loads a document from YAML text.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::Document`] on malformed YAML plus everything
    /// `load_from_document` reports.
    pub fn load_from_str(text: &str) -> Result<Self> {
        Self::load_from_document(&Document::from_yaml(text)?)
    }

    /// Loads a document from a YAML file.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::Io`] on read failure plus everything
    /// `load_from_str` reports.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_str(&std::fs::read_to_string(path)?)
    }

    /// Loads a parsed document.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::VersionTooNew`] when the declared format version is
    /// above [`SUPPORTED_VERSION`], [`OntoforgeError::PrefixResolution`]
    /// when no prefix maps to the base IRI, and
    /// [`OntoforgeError::RestrictionViolation`] when an individual's
    /// assertion falls outside its property's declared range.
    pub fn load_from_document(document: &Document) -> Result<Self> {
        if let Some(declared) = &document.version {
            let found = semver::Version::parse(declared)?;
            let supported = semver::Version::parse(SUPPORTED_VERSION)?;
            if found > supported {
                return Err(OntoforgeError::VersionTooNew {
                    found: found.to_string(),
                    supported: supported.to_string(),
                });
            }
        }

        let base_iri = document.iri.clone().unwrap_or_default();
        let base_prefix = document
            .prefixes
            .iter()
            .find(|(_, iri)| **iri == base_iri)
            .map(|(p, _)| p.clone())
            .ok_or_else(|| OntoforgeError::PrefixResolution(base_iri.clone()))?;

        let mut converter = OntologyConverter {
            ontology: Ontology::new(base_iri, base_prefix),
            version: document.version.clone(),
            missing: BTreeSet::new(),
        };
        converter.load(document)?;
        Ok(converter)
    }

    /// The loaded ontology.
    #[must_use]
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    /// The document format version the source declared.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn load(&mut self, document: &Document) -> Result<()> {
        for (prefix, iri) in &document.prefixes {
            self.ontology.define_prefix(prefix.clone(), iri.clone(), true)?;
        }
        for (name, values) in &document.annotations {
            for value in values {
                self.ontology.add_annotation(name, value.clone());
            }
        }

        // Pass 1: fixed section order, properties before the classes that
        // mention them.
        for (name, section) in &document.annotation_properties {
            let mut entity = AnnotationPropertyEntity::new(self.qualify(name)?);
            if let Some(range) = literal_range(&section.range) {
                entity.range = range;
            }
            copy_annotations(&mut entity.base, &section.annotations);
            self.ontology.add_entity(Entity::AnnotationProperty(entity));
        }
        for (name, section) in &document.data_properties {
            let mut entity = DataPropertyEntity::new(self.qualify(name)?);
            if let Some(range) = literal_range(&section.range) {
                entity.range = range;
            }
            entity.domain = section
                .domain
                .iter()
                .map(|d| EntityRef::Unresolved(d.clone()))
                .collect();
            entity.functional = section
                .characteristics
                .iter()
                .any(|c| c == "owl:FunctionalProperty");
            copy_annotations(&mut entity.base, &section.annotations);
            self.ontology.add_entity(Entity::DataProperty(entity));
        }
        for (name, section) in &document.object_properties {
            let mut entity = ObjectPropertyEntity::new(self.qualify(name)?);
            entity.range_names = section.range.clone();
            entity.domain_names = section.domain.clone();
            entity.inverse_name = section.inverse_of.first().cloned();
            for c in &section.characteristics {
                match Characteristic::from_name(c) {
                    Some(characteristic) => {
                        entity.characteristics.insert(characteristic);
                    }
                    None => warn!(name = c.as_str(), "unknown property characteristic ignored"),
                }
            }
            copy_annotations(&mut entity.base, &section.annotations);
            self.ontology.add_entity(Entity::ObjectProperty(entity));
        }
        for (name, section) in &document.classes {
            // The implicit top type is built in; only the exact owl key is
            // skipped, other namespaces may name their own Thing.
            if name == "owl:Thing" || name == "Thing" {
                continue;
            }
            let mut entity = ClassEntity::new(self.qualify(name)?);
            entity.parent_names = section.sub_class_of.clone();
            entity.disjoint_names = section.disjoint_with.clone();
            if let Some(equivalent) = &section.equivalent_class {
                for expression in equivalent.expressions() {
                    entity.add_equivalent_class_expression(expression);
                }
            }
            for property in section
                .object_properties
                .keys()
                .chain(section.data_properties.keys())
            {
                entity.defined_properties.push(self.qualify(property)?);
            }
            copy_annotations(&mut entity.base, &section.annotations);
            self.ontology.add_entity(Entity::Class(entity));
        }

        self.load_individuals(document)?;
        self.resolve_references()?;

        for (name, rule) in &document.rules {
            self.ontology.add_rule(name.clone(), rule.clone());
        }
        debug!(
            entities = self.ontology.entities.len(),
            missing = self.missing.len(),
            "document loaded"
        );
        Ok(())
    }

    fn load_individuals(&mut self, document: &Document) -> Result<()> {
        for (name, section) in &document.individuals {
            let qname = self.qualify(name)?;
            let mut entity = IndividualEntity::new(qname.clone());

            for type_name in &section.types {
                let Some(reference) = self.get_entity(type_name) else {
                    continue;
                };
                if let EntityRef::Resolved(class_name) = &reference {
                    let class_name = class_name.to_string();
                    if let Some(Entity::Class(class)) = self.ontology.entity_mut(&class_name) {
                        class.individuals.push(qname.clone());
                    }
                }
                entity.be_type_of(reference);
            }

            for (property, values) in &section.relations {
                let property = names::absolutize(property, &self.ontology.base_prefix);
                self.check_range(&property, values)?;
                for value in values {
                    entity.base.add_property_assertion(&property, value.clone());
                }
            }
            copy_annotations(&mut entity.base, &section.annotations);
            self.ontology.add_entity(Entity::Individual(entity));
        }
        Ok(())
    }

    /// Rejects literal assertions that fall outside the property's declared
    /// range. Object-valued properties are left to materialization, where
    /// their targets exist.
    fn check_range(&self, property: &str, values: &[Value]) -> Result<()> {
        let Some(Entity::DataProperty(data_property)) = self.ontology.entity(property) else {
            return Ok(());
        };
        for value in values {
            let accepted = data_property
                .range
                .iter()
                .any(|kind| value_matches(*kind, value));
            if !accepted {
                return Err(OntoforgeError::RestrictionViolation {
                    property: property.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Pass 2: replace raw names with resolved references.
    fn resolve_references(&mut self) -> Result<()> {
        let class_names: Vec<String> = self
            .ontology
            .entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Class(_)))
            .map(|(name, _)| name.clone())
            .collect();
        for name in class_names {
            let Some(Entity::Class(class)) = self.ontology.entity(&name) else {
                continue;
            };
            let parent_names = class.parent_names.clone();
            let disjoint_names = class.disjoint_names.clone();
            let parents: Vec<Option<EntityRef>> =
                parent_names.iter().map(|n| self.get_entity(n)).collect();
            let disjoints: Vec<Option<EntityRef>> =
                disjoint_names.iter().map(|n| self.get_entity(n)).collect();
            if let Some(Entity::Class(class)) = self.ontology.entity_mut(&name) {
                class.parents.clear();
                class.disjoints.clear();
                for parent in parents {
                    class.add_superclass(parent);
                }
                for disjoint in disjoints {
                    class.add_disjoint_class(disjoint);
                }
            }
        }

        let property_names: Vec<String> = self
            .ontology
            .entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::ObjectProperty(_) | Entity::DataProperty(_)))
            .map(|(name, _)| name.clone())
            .collect();
        for name in property_names {
            match self.ontology.entity(&name) {
                Some(Entity::ObjectProperty(property)) => {
                    let range_names = property.range_names.clone();
                    let domain_names = property.domain_names.clone();
                    let inverse_name = property.inverse_name.clone();
                    let range: Vec<EntityRef> =
                        range_names.iter().filter_map(|n| self.get_entity(n)).collect();
                    let domain: Vec<EntityRef> =
                        domain_names.iter().filter_map(|n| self.get_entity(n)).collect();
                    let inverse = inverse_name.as_deref().and_then(|n| self.get_entity(n));
                    if let Some(Entity::ObjectProperty(property)) = self.ontology.entity_mut(&name)
                    {
                        property.range = range;
                        property.domain = domain;
                        property.inverse = inverse;
                    }
                }
                Some(Entity::DataProperty(property)) => {
                    let raw: Vec<String> = property
                        .domain
                        .iter()
                        .filter_map(|r| r.raw().map(ToString::to_string))
                        .collect();
                    let domain: Vec<EntityRef> =
                        raw.iter().filter_map(|n| self.get_entity(n)).collect();
                    if let Some(Entity::DataProperty(property)) = self.ontology.entity_mut(&name) {
                        property.domain = domain;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Resolves a name against the entity table under the base prefix.
    ///
    /// `owl:Thing` (the implicit top type) resolves to `None` without being
    /// recorded. A miss records the name in the missing set, except when the
    /// text is shaped like an unreduced class expression, which is carried
    /// through as an [`EntityRef::Unresolved`] placeholder.
    pub fn get_entity(&mut self, name: &str) -> Option<EntityRef> {
        let base_prefix = self.ontology.base_prefix.clone();
        self.get_entity_with_prefix(name, &base_prefix)
    }

    /// [`Self::get_entity`] with an explicit fallback prefix.
    pub fn get_entity_with_prefix(&mut self, name: &str, prefix: &str) -> Option<EntityRef> {
        if name == "owl:Thing" || name == "Thing" {
            return None;
        }
        if names::looks_like_expression(name) {
            return Some(EntityRef::Unresolved(name.to_string()));
        }
        let qualified = names::absolutize(name, prefix);
        if self.ontology.entities.contains_key(&qualified) {
            let qname = QName::parse(&qualified).ok()?;
            Some(EntityRef::Resolved(qname))
        } else {
            self.missing.insert(qualified);
            None
        }
    }

    /// Terminal consistency gate.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::MissingEntities`] enumerating every name that was
    /// referenced but never defined.
    pub fn check_missing_definitions(&self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(OntoforgeError::MissingEntities(
                self.missing.iter().cloned().collect(),
            ))
        }
    }

    /// Materializes the loaded ontology into an existing world. Safe to call
    /// repeatedly; reruns converge on the same handles.
    ///
    /// # Errors
    ///
    /// The missing-definition gate first, then any materialization error.
    pub fn sync_with_world(&self, world: &mut World) -> Result<()> {
        self.check_missing_definitions()?;
        world.version = self.version.clone();
        Actualizer::new(&self.ontology).run(world)
    }

    /// Materializes the loaded ontology into a fresh world.
    ///
    /// # Errors
    ///
    /// Same as [`Self::sync_with_world`].
    pub fn export_to_world(&self) -> Result<World> {
        let mut world = World::new(
            self.ontology.base_iri.clone(),
            self.ontology.base_prefix.clone(),
        );
        self.sync_with_world(&mut world)?;
        Ok(world)
    }

    fn qualify(&self, name: &str) -> Result<QName> {
        QName::parse(&names::absolutize(name, &self.ontology.base_prefix))
    }
}

/// Maps declared range names through the datatype table, `None` when nothing
/// maps (the entity keeps its default string range).
fn literal_range(names: &[String]) -> Option<Vec<LiteralKind>> {
    let kinds: Vec<LiteralKind> = names
        .iter()
        .filter_map(|n| LiteralKind::from_datatype_name(n))
        .collect();
    if kinds.is_empty() {
        None
    } else {
        Some(kinds)
    }
}

fn copy_annotations(
    base: &mut crate::model::EntityBase,
    annotations: &std::collections::BTreeMap<String, Vec<Value>>,
) {
    for (name, values) in annotations {
        for value in values {
            base.add_annotation(name, value.clone());
        }
    }
}

/// Any-of range matching: a value is accepted if one declared kind admits
/// it. A suffixed literal carries its own type and must parse to something
/// the declared kind admits.
fn value_matches(kind: LiteralKind, value: &Value) -> bool {
    if let Value::Str(s) = value {
        if s.contains("^^") {
            return matches!(
                (kind, parse_literal(s)),
                (LiteralKind::Int, Literal::Int(_))
                    | (LiteralKind::Float, Literal::Int(_) | Literal::Float(_))
                    | (LiteralKind::Bool, Literal::Bool(_))
                    | (LiteralKind::Date, Literal::Date(_))
                    | (LiteralKind::DateTime, Literal::DateTime(_))
                    | (LiteralKind::Str, Literal::Str(_) | Literal::LangStr { .. })
            );
        }
    }
    matches!(
        (kind, value),
        (LiteralKind::Bool, Value::Bool(_))
            | (LiteralKind::Int, Value::Int(_))
            | (LiteralKind::Float, Value::Float(_) | Value::Int(_))
            | (
                LiteralKind::Str | LiteralKind::Date | LiteralKind::DateTime,
                Value::Str(_),
            )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
version: 1.0.0
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
annotations:
  rdfs:label: ["Movie Acting Ontology"]
DataProperty:
  mao:hasAge:
    rdfs:range: [xsd:integer]
    rdf:type: [owl:FunctionalProperty]
ObjectProperty:
  mao:hasActor:
    rdfs:domain: [ActingSituation]
    rdfs:range: [Actor]
    owl:inverseOf: [actedIn]
  mao:actedIn:
    owl:inverseOf: [hasActor]
Class:
  mao:ActingSituation:
    rdfs:subClassOf: [Situation]
  mao:Situation: {}
  mao:Actor:
    rdfs:subClassOf: [owl:Thing]
Individual:
  mao:SongKangHo:
    rdf:type: [Actor]
    relations:
      mao:hasAge: [55]
"#;

    #[test]
    fn forward_references_resolve_to_table_entries() {
        let converter = OntologyConverter::load_from_str(DOC).unwrap();
        converter.check_missing_definitions().unwrap();
        let Some(Entity::Class(acting)) = converter.ontology().entity("mao:ActingSituation")
        else {
            panic!("class missing");
        };
        assert_eq!(
            acting.parents,
            vec![EntityRef::Resolved(QName::parse("mao:Situation").unwrap())]
        );
        // owl:Thing parents vanish instead of resolving.
        let Some(Entity::Class(actor)) = converter.ontology().entity("mao:Actor") else {
            panic!("class missing");
        };
        assert!(actor.parents.is_empty());
        assert_eq!(actor.individuals.len(), 1);
    }

    #[test]
    fn missing_names_are_enumerated() {
        let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
Class:
  mao:Film:
    rdfs:subClassOf: [CreativeWork]
"#;
        let converter = OntologyConverter::load_from_str(doc).unwrap();
        let err = converter.check_missing_definitions().unwrap_err();
        match err {
            OntoforgeError::MissingEntities(names) => {
                assert_eq!(names, vec!["mao:CreativeWork".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn version_gate() {
        let doc = "version: 2.0.0\niri: http://x#\nprefixes:\n  x: http://x#\n";
        let err = OntologyConverter::load_from_str(doc).unwrap_err();
        assert!(matches!(err, OntoforgeError::VersionTooNew { .. }));
    }

    #[test]
    fn range_violation_is_fatal() {
        let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
DataProperty:
  mao:hasAge:
    rdfs:range: [xsd:integer]
Individual:
  mao:SongKangHo:
    relations:
      mao:hasAge: [not a number]
"#;
        let err = OntologyConverter::load_from_str(doc).unwrap_err();
        assert!(matches!(
            err,
            OntoforgeError::RestrictionViolation { .. }
        ));
    }

    #[test]
    fn suffixed_literal_must_satisfy_the_declared_range() {
        let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
DataProperty:
  mao:hasAge:
    rdfs:range: [xsd:integer]
Individual:
  mao:SongKangHo:
    relations:
      mao:hasAge: ["abc^^xsd:integer"]
"#;
        let err = OntologyConverter::load_from_str(doc).unwrap_err();
        assert!(matches!(
            err,
            OntoforgeError::RestrictionViolation { .. }
        ));

        // A suffix of the wrong type fails even though its payload parses.
        let wrong_type = doc.replace("abc^^xsd:integer", "true^^xsd:boolean");
        assert!(OntologyConverter::load_from_str(&wrong_type).is_err());

        let well_typed = doc.replace("abc^^xsd:integer", "55^^xsd:integer");
        OntologyConverter::load_from_str(&well_typed).unwrap();
    }

    #[test]
    fn only_the_owl_top_class_is_skipped() {
        let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
Class:
  owl:Thing: {}
  mao:Thing: {}
"#;
        let converter = OntologyConverter::load_from_str(doc).unwrap();
        assert!(converter.ontology().entity("mao:Thing").is_some());
        assert!(converter.ontology().entity("owl:Thing").is_none());
    }

    #[test]
    fn expression_shaped_parents_stay_unresolved() {
        let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
ObjectProperty:
  mao:hasActor: {}
Class:
  mao:Actor: {}
  mao:ActingSituation:
    rdfs:subClassOf: ["hasActor some Actor"]
"#;
        let converter = OntologyConverter::load_from_str(doc).unwrap();
        converter.check_missing_definitions().unwrap();
        let Some(Entity::Class(class)) = converter.ontology().entity("mao:ActingSituation")
        else {
            panic!("class missing");
        };
        assert_eq!(
            class.parents,
            vec![EntityRef::Unresolved("hasActor some Actor".to_string())]
        );
    }
}
