//! Reconstruction of a declarative document from a materialized world.
//!
//! The round trip is structure-preserving, not expression-preserving:
//! expression-derived superclasses and composite equivalences have no named
//! surface form and are dropped; everything named survives. Entities whose
//! namespace has no registered prefix cannot be shortened and are skipped.

use std::collections::BTreeMap;

use tracing::warn;

use crate::document::{
    ClassSection, Document, EquivalentClasses, IndividualSection, PropertySection, Value,
};
use crate::world::{AssertedValue, Construct, Literal, NodeId, NodeKind, World};

/// Rebuilds the declarative document for a world.
#[must_use]
pub fn export_document(world: &World) -> Document {
    let mut document = Document {
        version: world.version.clone(),
        iri: Some(world.base_iri.clone()),
        prefixes: world.prefixes().clone(),
        ..Document::default()
    };

    for (name, value) in &world.annotations {
        document
            .annotations
            .entry(name.clone())
            .or_default()
            .push(literal_to_value(value, world));
    }

    // Shortened names per node, None when the namespace is unregistered.
    let names: Vec<Option<String>> = world
        .iter()
        .map(|(_, record)| {
            let shortened = shorten_iri(world, &record.iri);
            if shortened.is_none() {
                warn!(iri = record.iri.as_str(), "no prefix registered for namespace, entity skipped");
            }
            shortened
        })
        .collect();
    let name_of = |id: NodeId| names[id.0].clone();

    for (id, record) in world.iter() {
        let Some(name) = name_of(id) else { continue };
        match record.kind {
            NodeKind::Class => {
                let mut section = ClassSection {
                    sub_class_of: record
                        .bases
                        .iter()
                        .filter_map(|b| name_of(*b))
                        .collect(),
                    annotations: annotations_map(&record.annotations, world),
                    ..ClassSection::default()
                };
                for group in &world.disjoint_groups {
                    if group.first() == Some(&id) {
                        section
                            .disjoint_with
                            .extend(group[1..].iter().filter_map(|d| name_of(*d)));
                    }
                }
                let named_equivalents: Vec<String> = record
                    .equivalents
                    .iter()
                    .filter_map(|e| match e {
                        Construct::Node(n) => name_of(*n),
                        _ => None,
                    })
                    .collect();
                if !named_equivalents.is_empty() {
                    section.equivalent_class =
                        Some(EquivalentClasses::Expressions(named_equivalents));
                }
                document.classes.insert(name, section);
            }
            NodeKind::ObjectProperty | NodeKind::DataProperty | NodeKind::AnnotationProperty => {
                let mut section = PropertySection {
                    domain: record.domain.iter().filter_map(|d| name_of(*d)).collect(),
                    annotations: annotations_map(&record.annotations, world),
                    ..PropertySection::default()
                };
                for range in &record.range {
                    match range {
                        crate::world::RangeValue::Node(n) => {
                            if let Some(target) = name_of(*n) {
                                section.range.push(target);
                            }
                        }
                        crate::world::RangeValue::Literal(kind) => {
                            section.range.push(kind.datatype_name().to_string());
                        }
                    }
                }
                section.characteristics = record
                    .characteristics
                    .iter()
                    .map(|c| c.qualified_name().to_string())
                    .collect();
                if let Some(inverse) = record.inverse.and_then(name_of) {
                    section.inverse_of.push(inverse);
                }
                let target = match record.kind {
                    NodeKind::ObjectProperty => &mut document.object_properties,
                    NodeKind::DataProperty => &mut document.data_properties,
                    _ => &mut document.annotation_properties,
                };
                target.insert(name, section);
            }
            NodeKind::Individual => {
                let mut section = IndividualSection {
                    types: record.types.iter().filter_map(|t| name_of(*t)).collect(),
                    annotations: annotations_map(&record.annotations, world),
                    ..IndividualSection::default()
                };
                for (property, value) in &record.assertions {
                    let values = match value {
                        AssertedValue::Single(lit) => vec![literal_to_value(lit, world)],
                        AssertedValue::Many(lits) => {
                            lits.iter().map(|l| literal_to_value(l, world)).collect()
                        }
                    };
                    section.relations.insert(property.clone(), values);
                }
                document.individuals.insert(name, section);
            }
        }
    }

    document.rules = world.rules.iter().cloned().collect();
    document
}

fn shorten_iri(world: &World, iri: &str) -> Option<String> {
    world
        .prefixes()
        .iter()
        .find(|(_, namespace)| iri.starts_with(namespace.as_str()))
        .map(|(prefix, namespace)| format!("{prefix}:{}", &iri[namespace.len()..]))
}

fn literal_to_value(literal: &Literal, world: &World) -> Value {
    match literal {
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::LangStr { value, lang } => Value::Str(format!("{value}^^xsd:string@{lang}")),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Date(d) | Literal::DateTime(d) => Value::Str(d.clone()),
        Literal::Node(id) => Value::Str(world.node(*id).qualified_name.clone()),
    }
}

fn annotations_map(
    annotations: &[(String, Literal)],
    world: &World,
) -> BTreeMap<String, Vec<Value>> {
    let mut map: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for (name, literal) in annotations {
        map.entry(name.clone())
            .or_default()
            .push(literal_to_value(literal, world));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_unregistered_namespaces() {
        let mut world = World::new("http://example.org/mao#", "mao");
        world.declare(
            "mao:Film",
            "http://example.org/mao#Film".to_string(),
            NodeKind::Class,
        );
        world.declare(
            "ext:Thing",
            "http://elsewhere.org/ns#Thing".to_string(),
            NodeKind::Class,
        );
        let document = export_document(&world);
        assert!(document.classes.contains_key("mao:Film"));
        assert_eq!(document.classes.len(), 1);
    }

    #[test]
    fn individual_annotations_stay_apart_from_relations() {
        let mut world = World::new("http://example.org/mao#", "mao");
        let id = world.declare(
            "mao:Parasite",
            "http://example.org/mao#Parasite".to_string(),
            NodeKind::Individual,
        );
        world.node_mut(id).annotations.push((
            "rdfs:label".to_string(),
            Literal::Str("Parasite".to_string()),
        ));
        world.node_mut(id).assertions.push((
            "mao:hasReleaseYear".to_string(),
            AssertedValue::Single(Literal::Int(2019)),
        ));
        let document = export_document(&world);
        let section = &document.individuals["mao:Parasite"];
        assert_eq!(
            section.annotations["rdfs:label"],
            vec![Value::Str("Parasite".to_string())]
        );
        assert!(!section.relations.contains_key("rdfs:label"));
        assert_eq!(
            section.relations["mao:hasReleaseYear"],
            vec![Value::Int(2019)]
        );
    }

    #[test]
    fn language_tagged_literals_keep_their_tag() {
        let mut world = World::new("http://example.org/mao#", "mao");
        let id = world.declare(
            "mao:Parasite",
            "http://example.org/mao#Parasite".to_string(),
            NodeKind::Individual,
        );
        world.node_mut(id).assertions.push((
            "mao:hasTitle".to_string(),
            AssertedValue::Many(vec![Literal::LangStr {
                value: "Parasite".to_string(),
                lang: "en".to_string(),
            }]),
        ));
        let document = export_document(&world);
        let section = &document.individuals["mao:Parasite"];
        assert_eq!(
            section.relations["mao:hasTitle"],
            vec![Value::Str("Parasite^^xsd:string@en".to_string())]
        );
    }
}
