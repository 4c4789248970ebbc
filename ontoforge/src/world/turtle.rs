//! Turtle 1.1 serializer for a materialized world.
//!
//! Produces the persisted artifact: namespace declarations, the ontology
//! header, class, property, and individual definitions. Expression-derived
//! axioms are written only where they reduce to named terms; the artifact is
//! structure-preserving, not expression-preserving.

use std::path::Path;

use crate::error::Result;
use crate::world::{
    AssertedValue, Construct, Literal, NodeKind, NodeRecord, RangeValue, World,
};

/// Serializes the world to a Turtle string.
#[must_use]
pub fn to_turtle(world: &World) -> String {
    let mut out = String::with_capacity(16 * 1024);

    for (prefix, iri) in world.prefixes() {
        if matches!(prefix.as_str(), "owl" | "rdf" | "rdfs" | "xsd") {
            continue;
        }
        out.push_str(&format!("@prefix {prefix}: <{iri}> .\n"));
    }
    out.push_str("@prefix owl: <http://www.w3.org/2002/07/owl#> .\n");
    out.push_str("@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n");
    out.push_str("@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n");
    out.push_str("@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n");
    out.push('\n');

    out.push_str(&format!("<{}>\n  a owl:Ontology", world.base_iri));
    if let Some(version) = &world.version {
        out.push_str(&format!(" ;\n  owl:versionInfo {}", turtle_string(version)));
    }
    for (name, value) in &world.annotations {
        out.push_str(&format!(" ;\n  {name} {}", literal_to_turtle(value, world)));
    }
    out.push_str(" .\n\n");

    for (_, record) in world.iter() {
        match record.kind {
            NodeKind::Class => write_class(&mut out, world, record),
            NodeKind::ObjectProperty
            | NodeKind::DataProperty
            | NodeKind::AnnotationProperty => write_property(&mut out, world, record),
            NodeKind::Individual => write_individual(&mut out, world, record),
        }
    }

    out
}

/// Serializes the world and writes it to `path`.
///
/// # Errors
///
/// Propagates the underlying write error.
pub fn save_to_file(world: &World, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, to_turtle(world))?;
    Ok(())
}

fn write_class(out: &mut String, world: &World, record: &NodeRecord) {
    out.push_str(&format!("{}\n  a owl:Class", record.qualified_name));
    for base in &record.bases {
        out.push_str(&format!(
            " ;\n  rdfs:subClassOf {}",
            world.node(*base).qualified_name
        ));
    }
    for equivalent in &record.equivalents {
        // Named equivalences only; composite constructs stay in memory.
        if let Construct::Node(id) = equivalent {
            out.push_str(&format!(
                " ;\n  owl:equivalentClass {}",
                world.node(*id).qualified_name
            ));
        }
    }
    for group in &world.disjoint_groups {
        if group.first().map(|id| world.node(*id).qualified_name.as_str())
            == Some(record.qualified_name.as_str())
        {
            for other in &group[1..] {
                out.push_str(&format!(
                    " ;\n  owl:disjointWith {}",
                    world.node(*other).qualified_name
                ));
            }
        }
    }
    write_annotations(out, world, record);
    write_assertions(out, world, record);
    out.push_str(" .\n\n");
}

fn write_property(out: &mut String, world: &World, record: &NodeRecord) {
    let kind = match record.kind {
        NodeKind::ObjectProperty => "owl:ObjectProperty",
        NodeKind::DataProperty => "owl:DatatypeProperty",
        _ => "owl:AnnotationProperty",
    };
    out.push_str(&format!("{}\n  a {kind}", record.qualified_name));
    for characteristic in &record.characteristics {
        out.push_str(&format!(" , {}", characteristic.qualified_name()));
    }
    for domain in &record.domain {
        out.push_str(&format!(
            " ;\n  rdfs:domain {}",
            world.node(*domain).qualified_name
        ));
    }
    for range in &record.range {
        let target = match range {
            RangeValue::Node(id) => world.node(*id).qualified_name.clone(),
            RangeValue::Literal(kind) => kind.datatype_name().to_string(),
        };
        out.push_str(&format!(" ;\n  rdfs:range {target}"));
    }
    if let Some(inverse) = record.inverse {
        out.push_str(&format!(
            " ;\n  owl:inverseOf {}",
            world.node(inverse).qualified_name
        ));
    }
    write_annotations(out, world, record);
    write_assertions(out, world, record);
    out.push_str(" .\n\n");
}

fn write_individual(out: &mut String, world: &World, record: &NodeRecord) {
    out.push_str(&format!("{}\n  a owl:NamedIndividual", record.qualified_name));
    for t in &record.types {
        out.push_str(&format!(" , {}", world.node(*t).qualified_name));
    }
    write_annotations(out, world, record);
    write_assertions(out, world, record);
    out.push_str(" .\n\n");
}

fn write_annotations(out: &mut String, world: &World, record: &NodeRecord) {
    for (property, value) in &record.annotations {
        out.push_str(&format!(" ;\n  {property} {}", literal_to_turtle(value, world)));
    }
}

fn write_assertions(out: &mut String, world: &World, record: &NodeRecord) {
    for (property, value) in &record.assertions {
        let rendered = match value {
            AssertedValue::Single(lit) => literal_to_turtle(lit, world),
            AssertedValue::Many(lits) => lits
                .iter()
                .map(|l| literal_to_turtle(l, world))
                .collect::<Vec<_>>()
                .join(" , "),
        };
        if !rendered.is_empty() {
            out.push_str(&format!(" ;\n  {property} {rendered}"));
        }
    }
}

fn turtle_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn literal_to_turtle(literal: &Literal, world: &World) -> String {
    match literal {
        Literal::Str(s) => turtle_string(s),
        Literal::LangStr { value, lang } => format!("{}@{lang}", turtle_string(value)),
        Literal::Bool(b) => format!("\"{b}\"^^xsd:boolean"),
        Literal::Int(i) => format!("\"{i}\"^^xsd:integer"),
        Literal::Float(f) => format!("\"{f}\"^^xsd:float"),
        Literal::Date(d) => format!("{}^^xsd:date", turtle_string(d)),
        Literal::DateTime(d) => format!("{}^^xsd:dateTime", turtle_string(d)),
        Literal::Node(id) => world.node(*id).qualified_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Characteristic;
    use crate::world::NodeId;

    fn sample_world() -> World {
        let mut world = World::new("http://example.org/mao#", "mao");
        world.version = Some("1.0.0".to_string());
        let film = world.declare(
            "mao:Film",
            "http://example.org/mao#Film".to_string(),
            NodeKind::Class,
        );
        let parasite = world.declare(
            "mao:Parasite",
            "http://example.org/mao#Parasite".to_string(),
            NodeKind::Individual,
        );
        world.node_mut(parasite).types.push(film);
        world.node_mut(parasite).assertions.push((
            "mao:hasTitle".to_string(),
            AssertedValue::Many(vec![Literal::LangStr {
                value: "Parasite".to_string(),
                lang: "en".to_string(),
            }]),
        ));
        world
    }

    #[test]
    fn produces_prefixes_header_and_definitions() {
        let world = sample_world();
        let turtle = to_turtle(&world);
        assert!(turtle.contains("@prefix mao: <http://example.org/mao#> ."));
        assert!(turtle.contains("@prefix owl:"));
        assert!(turtle.contains("a owl:Ontology"));
        assert!(turtle.contains("owl:versionInfo \"1.0.0\""));
        assert!(turtle.contains("mao:Film\n  a owl:Class"));
        assert!(turtle.contains("a owl:NamedIndividual , mao:Film"));
        assert!(turtle.contains("mao:hasTitle \"Parasite\"@en"));
    }

    #[test]
    fn inverse_and_characteristics_render_on_properties() {
        let mut world = sample_world();
        let has_actor = world.declare(
            "mao:hasActor",
            "http://example.org/mao#hasActor".to_string(),
            NodeKind::ObjectProperty,
        );
        let acted_in = world.declare(
            "mao:actedIn",
            "http://example.org/mao#actedIn".to_string(),
            NodeKind::ObjectProperty,
        );
        world.node_mut(has_actor).inverse = Some(acted_in);
        world
            .node_mut(has_actor)
            .characteristics
            .insert(Characteristic::InverseFunctional);
        world.node_mut(has_actor).domain.push(NodeId(0));
        let turtle = to_turtle(&world);
        assert!(turtle.contains("mao:hasActor\n  a owl:ObjectProperty , owl:InverseFunctionalProperty"));
        assert!(turtle.contains("owl:inverseOf mao:actedIn"));
        assert!(turtle.contains("rdfs:domain mao:Film"));
    }
}
