//! Idempotent materialization of an [`Ontology`] into a [`World`].
//!
//! Every entity materializes at most once per world; repeated actualization
//! returns the cached handle and re-synchronizes equivalent-class constructs
//! so reruns converge instead of accumulating. Dependencies are actualized
//! depth-first: class parents before the class, a property's domain and
//! range classes before the property, an individual's first classes before
//! the individual. A visiting set catches reference cycles; the
//! object-property inverse pair is the one sanctioned 2-cycle and
//! terminates through the cache instead.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::document::Value;
use crate::error::{OntoforgeError, Result};
use crate::expression::eval::Evaluator;
use crate::expression::parser;
use crate::model::entity::Assertions;
use crate::model::{
    Characteristic, ClassEntity, Entity, EntityRef, IndividualEntity, LiteralKind,
    ObjectPropertyEntity,
};
use crate::names;
use crate::ontology::Ontology;
use crate::world::{AssertedValue, Literal, NodeId, NodeKind, RangeValue, World};

/// Materializes entities from one ontology into a world.
pub struct Actualizer<'a> {
    ontology: &'a Ontology,
    visiting: HashSet<String>,
}

impl<'a> Actualizer<'a> {
    /// Binds the actualizer to its source ontology.
    #[must_use]
    pub fn new(ontology: &'a Ontology) -> Self {
        Actualizer {
            ontology,
            visiting: HashSet::new(),
        }
    }

    /// Materializes every entity, the ontology annotations, and the
    /// prepared rules into `world`. Safe to run repeatedly against the same
    /// world.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::CyclicReference`] on a reference cycle and any
    /// expression error raised while evaluating equivalent-class literals.
    pub fn run(&mut self, world: &mut World) -> Result<()> {
        for (prefix, iri) in self.ontology.prefixes() {
            world.bind_prefix(prefix.clone(), iri.clone());
        }

        let names: Vec<String> = self.ontology.entities.keys().cloned().collect();
        for name in &names {
            // The top properties are built into every world and never
            // materialize as user nodes.
            if is_top_property(name) {
                continue;
            }
            self.actualize(world, name)?;
        }

        world.annotations.clear();
        for (key, values) in self.ontology.annotations.iter() {
            for value in values {
                world
                    .annotations
                    .push((key.to_string(), value_to_literal(value, None)));
            }
        }

        world.rules = self
            .ontology
            .rules
            .iter()
            .map(|(name, text)| (name.clone(), self.ontology.prepared_rule(text)))
            .collect();
        debug!(nodes = world.len(), rules = world.rules.len(), "materialization complete");
        Ok(())
    }

    /// Materializes one entity by qualified name, returning its handle.
    ///
    /// # Errors
    ///
    /// [`OntoforgeError::NotActualized`] for names absent from the entity
    /// table and [`OntoforgeError::CyclicReference`] on a dependency cycle.
    pub fn actualize(&mut self, world: &mut World, qualified_name: &str) -> Result<NodeId> {
        if is_top_property(qualified_name) {
            return Err(OntoforgeError::NotActualized(qualified_name.to_string()));
        }
        let ontology = self.ontology;
        let entity = ontology
            .entity(qualified_name)
            .ok_or_else(|| OntoforgeError::NotActualized(qualified_name.to_string()))?;

        // A placeholder left by a forward reference still needs its real
        // declaration; anything else is a genuine cache hit.
        if let Some(id) = world.lookup(qualified_name) {
            if !world.node(id).placeholder {
                if let Entity::Class(c) = entity {
                    self.sync_equivalents(world, id, c)?;
                }
                return Ok(id);
            }
        }

        match entity {
            Entity::Class(c) => self.actualize_class(world, qualified_name, c),
            Entity::ObjectProperty(p) => self.actualize_object_property(world, qualified_name, p),
            Entity::DataProperty(p) => {
                let mut domain = Vec::new();
                for r in &p.domain {
                    if let Some(id) = self.resolve_ref(world, r)? {
                        domain.push(id);
                    }
                }
                let id = self.declare(world, qualified_name, NodeKind::DataProperty)?;
                let record = world.node_mut(id);
                record.domain = domain;
                record.range = p.range.iter().copied().map(RangeValue::Literal).collect();
                if p.functional {
                    record.characteristics.insert(Characteristic::Functional);
                }
                apply_annotations(world, id, &p.base.annotations);
                Ok(id)
            }
            Entity::AnnotationProperty(p) => {
                let id = self.declare(world, qualified_name, NodeKind::AnnotationProperty)?;
                world.node_mut(id).range =
                    p.range.iter().copied().map(RangeValue::Literal).collect();
                apply_annotations(world, id, &p.base.annotations);
                Ok(id)
            }
            Entity::Individual(i) => self.actualize_individual(world, qualified_name, i),
        }
    }

    fn actualize_class(
        &mut self,
        world: &mut World,
        qualified_name: &str,
        class: &'a ClassEntity,
    ) -> Result<NodeId> {
        if !self.visiting.insert(qualified_name.to_string()) {
            return Err(OntoforgeError::CyclicReference(qualified_name.to_string()));
        }

        let mut bases = Vec::new();
        let mut super_constructs = Vec::new();
        for parent in &class.parents {
            match parent {
                EntityRef::Resolved(q) => bases.push(self.actualize(world, &q.to_string())?),
                EntityRef::Unresolved(text) => {
                    let expr = parser::parse(text)?;
                    super_constructs.push(Evaluator::new(world).evaluate(&expr)?);
                }
            }
        }

        let id = self.declare(world, qualified_name, NodeKind::Class)?;
        self.visiting.remove(qualified_name);
        {
            let record = world.node_mut(id);
            record.bases = bases;
            record.super_constructs = super_constructs;
        }
        apply_annotations(world, id, &class.base.annotations);

        // Disjointness only once all named siblings are materialized.
        let mut group = vec![id];
        for disjoint in &class.disjoints {
            if let Some(other) = self.resolve_ref(world, disjoint)? {
                group.push(other);
            }
        }
        if group.len() > 1 {
            world.disjoint_groups.push(group);
        }

        self.sync_equivalents(world, id, class)?;

        let individuals: Vec<String> = class.individuals.iter().map(ToString::to_string).collect();
        for individual in &individuals {
            self.actualize(world, individual)?;
        }
        Ok(id)
    }

    fn actualize_object_property(
        &mut self,
        world: &mut World,
        qualified_name: &str,
        property: &'a ObjectPropertyEntity,
    ) -> Result<NodeId> {
        // Declared before any recursion so the inverse 2-cycle terminates
        // through the cache.
        let id = self.declare(world, qualified_name, NodeKind::ObjectProperty)?;
        world.node_mut(id).characteristics = property.characteristics.clone();

        let mut domain = Vec::new();
        for r in &property.domain {
            if let Some(node) = self.resolve_ref(world, r)? {
                domain.push(node);
            }
        }
        let mut range = Vec::new();
        for r in &property.range {
            if let Some(node) = self.resolve_ref(world, r)? {
                range.push(RangeValue::Node(node));
            }
        }
        {
            let record = world.node_mut(id);
            record.domain = domain;
            record.range = range;
        }

        if let Some(EntityRef::Resolved(q)) = &property.inverse {
            let partner = self.actualize(world, &q.to_string())?;
            world.node_mut(id).inverse = Some(partner);
            // The partner's back-pointer belongs to its own declaration; fill
            // it only when that declaration left it empty.
            if world.node(partner).inverse.is_none() {
                world.node_mut(partner).inverse = Some(id);
            }
        }

        apply_annotations(world, id, &property.base.annotations);
        Ok(id)
    }

    fn actualize_individual(
        &mut self,
        world: &mut World,
        qualified_name: &str,
        individual: &'a IndividualEntity,
    ) -> Result<NodeId> {
        let mut types = Vec::new();
        for t in &individual.types {
            if let Some(id) = self.resolve_ref(world, t)? {
                types.push(id);
            }
        }
        // Actualizing a class pulls in its typed individuals, so this very
        // individual may have landed in the cache during the loop above.
        if let Some(id) = world.lookup(qualified_name) {
            return Ok(id);
        }

        let id = self.declare(world, qualified_name, NodeKind::Individual)?;
        world.node_mut(id).types = types;
        apply_annotations(world, id, &individual.base.annotations);

        let assertions: Vec<(String, Vec<Value>)> = individual
            .base
            .property_values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect();
        for (property_name, values) in assertions {
            let asserted = self.assert_values(world, &property_name, &values)?;
            world.node_mut(id).assertions.push((property_name, asserted));
        }
        Ok(id)
    }

    /// Converts one relation's asserted values, resolving object-valued
    /// names to handles and literal values through the property's declared
    /// range.
    fn assert_values(
        &mut self,
        world: &mut World,
        property_name: &str,
        values: &[Value],
    ) -> Result<AssertedValue> {
        let ontology = self.ontology;
        let property = ontology.entity(property_name);
        let mut single_valued = false;
        let mut range_kind = None;
        let mut object_valued = false;
        match property {
            Some(Entity::ObjectProperty(p)) => {
                object_valued = true;
                single_valued = p.is_single_valued();
            }
            Some(Entity::DataProperty(p)) => {
                single_valued = p.functional;
                range_kind = p.range.first().copied();
            }
            Some(Entity::AnnotationProperty(p)) => {
                range_kind = p.range.first().copied();
            }
            _ => {}
        }

        let mut literals = Vec::with_capacity(values.len());
        for value in values {
            if object_valued {
                let target = names::absolutize(&value.to_string(), &world.base_prefix);
                if ontology.entity(&target).is_some() {
                    literals.push(Literal::Node(self.actualize(world, &target)?));
                } else {
                    warn!(property = property_name, value = %target, "relation target not in entity table, kept textual");
                    literals.push(value_to_literal(value, None));
                }
            } else {
                literals.push(value_to_literal(value, range_kind));
            }
        }

        Ok(if single_valued && literals.len() == 1 {
            AssertedValue::Single(literals.remove(0))
        } else {
            AssertedValue::Many(literals)
        })
    }

    fn sync_equivalents(
        &mut self,
        world: &mut World,
        id: NodeId,
        class: &ClassEntity,
    ) -> Result<()> {
        let mut constructs = Vec::with_capacity(class.equivalent_expressions.len());
        for text in &class.equivalent_expressions {
            let expr = parser::parse(text)?;
            constructs.push(Evaluator::new(world).evaluate(&expr)?);
        }
        world.node_mut(id).equivalents = constructs;
        Ok(())
    }

    fn resolve_ref(&mut self, world: &mut World, r: &EntityRef) -> Result<Option<NodeId>> {
        match r {
            EntityRef::Resolved(q) => Ok(Some(self.actualize(world, &q.to_string())?)),
            EntityRef::Unresolved(text) => {
                warn!(reference = text, "unresolved reference skipped during materialization");
                Ok(None)
            }
        }
    }

    /// Declares a node, or fleshes out the placeholder a forward reference
    /// left behind.
    fn declare(&mut self, world: &mut World, qualified_name: &str, kind: NodeKind) -> Result<NodeId> {
        if let Some(id) = world.lookup(qualified_name) {
            let record = world.node_mut(id);
            record.placeholder = false;
            record.kind = kind;
            return Ok(id);
        }
        let q = names::QName::parse(qualified_name)?;
        let iri = self.ontology.full_iri(&q)?;
        Ok(world.declare(qualified_name, iri, kind))
    }
}

fn is_top_property(qualified_name: &str) -> bool {
    matches!(
        names::shorten(qualified_name),
        "topObjectProperty" | "topDataProperty"
    )
}

/// Parses a literal with an optional `^^type` / `^^type@lang` suffix.
#[must_use]
pub fn parse_literal(text: &str) -> Literal {
    let Some((value, suffix)) = text.rsplit_once("^^") else {
        return Literal::Str(text.to_string());
    };
    if let Some((_type_name, lang)) = suffix.split_once('@') {
        return Literal::LangStr {
            value: value.to_string(),
            lang: lang.to_string(),
        };
    }
    match LiteralKind::from_datatype_name(suffix) {
        Some(LiteralKind::Int) => value
            .parse()
            .map_or_else(|_| Literal::Str(text.to_string()), Literal::Int),
        Some(LiteralKind::Float) => value
            .parse()
            .map_or_else(|_| Literal::Str(text.to_string()), Literal::Float),
        Some(LiteralKind::Bool) => match value {
            "true" | "True" => Literal::Bool(true),
            "false" | "False" => Literal::Bool(false),
            _ => Literal::Str(text.to_string()),
        },
        Some(LiteralKind::Date) => Literal::Date(value.to_string()),
        Some(LiteralKind::DateTime) => Literal::DateTime(value.to_string()),
        Some(LiteralKind::Str) => Literal::Str(value.to_string()),
        None => Literal::Str(text.to_string()),
    }
}

fn value_to_literal(value: &Value, range: Option<LiteralKind>) -> Literal {
    match value {
        Value::Bool(b) => Literal::Bool(*b),
        Value::Int(i) => Literal::Int(*i),
        Value::Float(f) => Literal::Float(*f),
        Value::Str(s) if s.contains("^^") => parse_literal(s),
        Value::Str(s) => match range {
            Some(LiteralKind::Date) => Literal::Date(s.clone()),
            Some(LiteralKind::DateTime) => Literal::DateTime(s.clone()),
            Some(LiteralKind::Int) => {
                s.parse().map_or_else(|_| Literal::Str(s.clone()), Literal::Int)
            }
            Some(LiteralKind::Float) => s
                .parse()
                .map_or_else(|_| Literal::Str(s.clone()), Literal::Float),
            Some(LiteralKind::Bool) => match s.as_str() {
                "true" | "True" => Literal::Bool(true),
                "false" | "False" => Literal::Bool(false),
                _ => Literal::Str(s.clone()),
            },
            _ => Literal::Str(s.clone()),
        },
    }
}

fn apply_annotations(world: &mut World, id: NodeId, annotations: &Assertions) {
    for (key, values) in annotations.iter() {
        for value in values {
            let literal = value_to_literal(value, None);
            world.node_mut(id).annotations.push((key.to_string(), literal));
        }
    }
}
