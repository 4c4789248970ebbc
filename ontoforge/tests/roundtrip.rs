//! End-to-end coverage: load a document, materialize it, save Turtle, and
//! rebuild the document from the world.

use ontoforge::document::Value;
use ontoforge::export_document;
use ontoforge::world::{AssertedValue, Literal, NodeKind};
use ontoforge::{to_turtle, OntoforgeError, OntologyConverter};

const MOVIE_DOC: &str = r#"
version: 1.0.0
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
annotations:
  rdfs:label: ["Movie Acting Ontology"]
  dcterms:license: ["https://creativecommons.org/licenses/by/4.0/"]
AnnotationProperty:
  mao:hasSynopsis:
    rdfs:range: [rdfs:Literal]
DataProperty:
  mao:hasTitle:
    rdfs:range: [xsd:string]
  mao:hasReleaseYear:
    rdfs:range: [xsd:integer]
    rdf:type: [owl:FunctionalProperty]
ObjectProperty:
  mao:hasActor:
    rdfs:domain: [ActingSituation]
    rdfs:range: [Actor]
    owl:inverseOf: [actedIn]
  mao:actedIn:
    rdfs:domain: [Actor]
    rdfs:range: [ActingSituation]
    owl:inverseOf: [hasActor]
Class:
  mao:Situation: {}
  mao:ActingSituation:
    rdfs:subClassOf: [Situation]
    owl:equivalentClass: ["hasActor some Actor"]
  mao:Film:
    rdfs:subClassOf: [ActingSituation]
    owl:disjointWith: [Actor]
  mao:Actor:
    rdfs:subClassOf: [owl:Thing]
Individual:
  mao:Parasite:
    rdf:type: [Film]
    relations:
      mao:hasTitle: ["Parasite^^rdfs:Literal@en", "Gisaengchung^^rdfs:Literal@ko"]
      mao:hasReleaseYear: [2019]
      mao:hasActor: [SongKangHo]
    annotations:
      rdfs:label: ["Parasite (2019)"]
  mao:SongKangHo:
    rdf:type: [Actor]
rules:
  costars: "mao:Film(?f) ^ mao:hasActor(?f, ?a) ^ swrlb:notEqual(?a, ?b)"
"#;

#[test]
fn full_pipeline_materializes_every_declaration() {
    let converter = OntologyConverter::load_from_str(MOVIE_DOC).unwrap();
    converter.check_missing_definitions().unwrap();
    let world = converter.export_to_world().unwrap();

    for name in [
        "mao:hasSynopsis",
        "mao:hasTitle",
        "mao:hasReleaseYear",
        "mao:hasActor",
        "mao:actedIn",
        "mao:Situation",
        "mao:ActingSituation",
        "mao:Film",
        "mao:Actor",
        "mao:Parasite",
        "mao:SongKangHo",
    ] {
        assert!(world.lookup(name).is_some(), "{name} not materialized");
    }

    // Inverse pair wired both ways.
    let has_actor = world.lookup("mao:hasActor").unwrap();
    let acted_in = world.lookup("mao:actedIn").unwrap();
    assert_eq!(world.node(has_actor).inverse, Some(acted_in));
    assert_eq!(world.node(acted_in).inverse, Some(has_actor));

    // Rules carry the prepared text.
    assert_eq!(
        world.rules,
        vec![(
            "costars".to_string(),
            "Film(?f), hasActor(?f, ?a), notEqual(?a, ?b)".to_string()
        )]
    );
}

#[test]
fn actualization_is_idempotent() {
    let converter = OntologyConverter::load_from_str(MOVIE_DOC).unwrap();
    let mut world = converter.export_to_world().unwrap();
    let film_before = world.lookup("mao:Film").unwrap();
    let count_before = world.len();

    converter.sync_with_world(&mut world).unwrap();
    assert_eq!(world.lookup("mao:Film").unwrap(), film_before);
    assert_eq!(world.len(), count_before);

    // Equivalents re-sync instead of accumulating.
    let acting = world.lookup("mao:ActingSituation").unwrap();
    assert_eq!(world.node(acting).equivalents.len(), 1);
    assert_eq!(world.disjoint_groups.len(), 1);
}

#[test]
fn forward_reference_resolves_to_the_same_node() {
    // Film subclasses ActingSituation, declared later in the section map.
    let converter = OntologyConverter::load_from_str(MOVIE_DOC).unwrap();
    let world = converter.export_to_world().unwrap();
    let film = world.lookup("mao:Film").unwrap();
    let acting = world.lookup("mao:ActingSituation").unwrap();
    assert_eq!(world.node(film).bases, vec![acting]);
}

#[test]
fn multiplicity_and_functional_single_value() {
    let converter = OntologyConverter::load_from_str(MOVIE_DOC).unwrap();
    let world = converter.export_to_world().unwrap();
    let parasite = world.lookup("mao:Parasite").unwrap();
    let assertions = &world.node(parasite).assertions;

    let titles = assertions
        .iter()
        .find(|(p, _)| p == "mao:hasTitle")
        .map(|(_, v)| v)
        .unwrap();
    assert_eq!(
        *titles,
        AssertedValue::Many(vec![
            Literal::LangStr {
                value: "Parasite".to_string(),
                lang: "en".to_string(),
            },
            Literal::LangStr {
                value: "Gisaengchung".to_string(),
                lang: "ko".to_string(),
            },
        ])
    );

    let year = assertions
        .iter()
        .find(|(p, _)| p == "mao:hasReleaseYear")
        .map(|(_, v)| v)
        .unwrap();
    assert_eq!(*year, AssertedValue::Single(Literal::Int(2019)));

    let song = world.lookup("mao:SongKangHo").unwrap();
    let actors = assertions
        .iter()
        .find(|(p, _)| p == "mao:hasActor")
        .map(|(_, v)| v)
        .unwrap();
    assert_eq!(*actors, AssertedValue::Many(vec![Literal::Node(song)]));
}

#[test]
fn individuals_register_with_their_classes() {
    let converter = OntologyConverter::load_from_str(MOVIE_DOC).unwrap();
    let world = converter.export_to_world().unwrap();
    let parasite = world.lookup("mao:Parasite").unwrap();
    let film = world.lookup("mao:Film").unwrap();
    assert_eq!(world.node(parasite).types, vec![film]);
    assert_eq!(world.node(parasite).kind, NodeKind::Individual);
}

#[test]
fn missing_definitions_block_export() {
    let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
Class:
  mao:Film:
    rdfs:subClassOf: [CreativeWork]
"#;
    let converter = OntologyConverter::load_from_str(doc).unwrap();
    let err = converter.export_to_world().unwrap_err();
    match err {
        OntoforgeError::MissingEntities(names) => {
            assert_eq!(names, vec!["mao:CreativeWork".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn turtle_artifact_contains_the_materialized_graph() {
    let converter = OntologyConverter::load_from_str(MOVIE_DOC).unwrap();
    let world = converter.export_to_world().unwrap();
    let turtle = to_turtle(&world);

    assert!(turtle.contains("@prefix mao: <http://example.org/mao#> ."));
    assert!(turtle.contains("<http://example.org/mao#>\n  a owl:Ontology"));
    assert!(turtle.contains("owl:versionInfo \"1.0.0\""));
    assert!(turtle.contains("mao:Film\n  a owl:Class ;\n  rdfs:subClassOf mao:ActingSituation"));
    assert!(turtle.contains("owl:disjointWith mao:Actor"));
    assert!(turtle.contains("owl:inverseOf mao:actedIn"));
    assert!(turtle.contains("\"Parasite\"@en"));
    assert!(turtle.contains("\"2019\"^^xsd:integer"));
}

#[test]
fn exported_document_round_trips_structure() {
    let converter = OntologyConverter::load_from_str(MOVIE_DOC).unwrap();
    let world = converter.export_to_world().unwrap();
    let document = export_document(&world);

    assert_eq!(document.version.as_deref(), Some("1.0.0"));
    assert_eq!(document.iri.as_deref(), Some("http://example.org/mao#"));
    assert!(document.classes.contains_key("mao:Film"));
    assert_eq!(
        document.classes["mao:Film"].sub_class_of,
        vec!["mao:ActingSituation".to_string()]
    );
    assert_eq!(
        document.classes["mao:Film"].disjoint_with,
        vec!["mao:Actor".to_string()]
    );
    assert!(document.object_properties.contains_key("mao:hasActor"));
    assert_eq!(
        document.object_properties["mao:hasActor"].inverse_of,
        vec!["mao:actedIn".to_string()]
    );
    assert_eq!(
        document.data_properties["mao:hasReleaseYear"].range,
        vec!["xsd:integer".to_string()]
    );
    assert_eq!(
        document.individuals["mao:Parasite"].types,
        vec!["mao:Film".to_string()]
    );

    // Annotation values keep their own surface, away from relations.
    let parasite = &document.individuals["mao:Parasite"];
    assert_eq!(
        parasite.annotations["rdfs:label"],
        vec![Value::Str("Parasite (2019)".to_string())]
    );
    assert!(!parasite.relations.contains_key("rdfs:label"));

    // The rebuilt document loads again.
    let yaml = document.to_yaml().unwrap();
    let reloaded = OntologyConverter::load_from_str(&yaml).unwrap();
    reloaded.check_missing_definitions().unwrap();
}

#[test]
fn top_properties_are_skipped_quietly() {
    let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
DataProperty:
  mao:topDataProperty: {}
ObjectProperty:
  mao:topObjectProperty: {}
  mao:hasActor: {}
Class:
  mao:Actor: {}
"#;
    let converter = OntologyConverter::load_from_str(doc).unwrap();
    let world = converter.export_to_world().unwrap();
    assert!(world.lookup("mao:topObjectProperty").is_none());
    assert!(world.lookup("mao:topDataProperty").is_none());
    assert!(world.lookup("mao:hasActor").is_some());
    assert!(world.lookup("mao:Actor").is_some());
}

#[test]
fn cyclic_superclasses_are_rejected() {
    let doc = r#"
iri: http://example.org/mao#
prefixes:
  mao: http://example.org/mao#
Class:
  mao:A:
    rdfs:subClassOf: [B]
  mao:B:
    rdfs:subClassOf: [A]
"#;
    let converter = OntologyConverter::load_from_str(doc).unwrap();
    let err = converter.export_to_world().unwrap_err();
    assert!(matches!(err, OntoforgeError::CyclicReference(_)));
}
