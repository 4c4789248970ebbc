//! Declarative ontology authoring: load a YAML document, resolve it into an
//! entity graph, materialize the graph into a world of OWL nodes, and save
//! the result as Turtle.
//!
//! # Entry Point
//!
//! ```no_run
//! use ontoforge::OntologyConverter;
//!
//! # fn main() -> ontoforge::Result<()> {
//! let converter = OntologyConverter::load_from_file("movie.yaml")?;
//! converter.check_missing_definitions()?;
//! let world = converter.export_to_world()?;
//! ontoforge::world::turtle::save_to_file(&world, "movie.ttl")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Round Trip
//!
//! A materialized world can be turned back into a document with
//! [`export_document`]. The reconstruction is structure-preserving, not
//! expression-preserving: named axioms survive, expression-derived ones
//! stay behind in the world.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod converter;
pub mod document;
pub mod error;
pub mod export;
pub mod expression;
pub mod model;
pub mod names;
pub mod ontology;
pub mod world;

pub use converter::{OntologyConverter, SUPPORTED_VERSION};
pub use document::Document;
pub use error::{OntoforgeError, Result};
pub use export::export_document;
pub use expression::{ClassExpression, ExpressionError};
pub use ontology::Ontology;
pub use world::{World, turtle::to_turtle};
