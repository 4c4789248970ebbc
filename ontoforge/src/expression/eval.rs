//! Evaluation of parsed class expressions against a [`World`].
//!
//! Atoms are classified in a fixed order: bracketed datatype constraints,
//! pure-digit integers, already-materialized nodes by local name, the
//! reserved literal words, and finally forward-reference placeholders
//! declared in the base namespace.

use crate::expression::parser;
use crate::expression::{ClassExpression, ExpressionError};
use crate::model::LiteralKind;
use crate::world::{Construct, Facet, NodeId, NodeKind, World};

/// Parses `text` and evaluates it into a [`Construct`] over `world`.
///
/// # Errors
///
/// Syntax errors from the parser, plus the classification errors documented
/// on [`Evaluator::evaluate`].
pub fn evaluate_text(world: &mut World, text: &str) -> Result<Construct, ExpressionError> {
    let expr = parser::parse(text)?;
    Evaluator::new(world).evaluate(&expr)
}

/// Evaluates class expressions into constructs, declaring placeholders for
/// names not yet materialized.
pub struct Evaluator<'w> {
    world: &'w mut World,
}

impl<'w> Evaluator<'w> {
    /// Binds the evaluator to a world.
    pub fn new(world: &'w mut World) -> Self {
        Evaluator { world }
    }

    /// Evaluates one expression tree.
    ///
    /// # Errors
    ///
    /// [`ExpressionError::AmbiguousAtom`] when a class-position atom names a
    /// materialized individual, [`ExpressionError::UnknownIndividual`] when a
    /// value restriction or enumeration names an unmaterialized individual,
    /// [`ExpressionError::UnreducibleAtom`] when a property-position atom
    /// names a non-property node, and the constraint errors for malformed
    /// bracketed atoms.
    pub fn evaluate(&mut self, expr: &ClassExpression) -> Result<Construct, ExpressionError> {
        match expr {
            ClassExpression::Atom(name) => self.class_atom(name),
            ClassExpression::Not(inner) => {
                Ok(Construct::Complement(Box::new(self.evaluate(inner)?)))
            }
            ClassExpression::And(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(self.evaluate(item)?);
                }
                Ok(Construct::Intersection(parts))
            }
            ClassExpression::Or(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(self.evaluate(item)?);
                }
                Ok(Construct::Union(parts))
            }
            ClassExpression::SomeValues { property, filler } => Ok(Construct::SomeValues {
                property: self.property_atom(property)?,
                filler: Box::new(self.evaluate(filler)?),
            }),
            ClassExpression::OnlyValues { property, filler } => Ok(Construct::OnlyValues {
                property: self.property_atom(property)?,
                filler: Box::new(self.evaluate(filler)?),
            }),
            ClassExpression::HasValue {
                property,
                individual,
            } => Ok(Construct::HasValue {
                property: self.property_atom(property)?,
                individual: self.individual_atom(individual)?,
            }),
            ClassExpression::Cardinality {
                kind,
                property,
                count,
                filler,
            } => Ok(Construct::Cardinality {
                kind: *kind,
                property: self.property_atom(property)?,
                count: *count,
                filler: Box::new(self.evaluate(filler)?),
            }),
            ClassExpression::OneOf(names) => {
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    ids.push(self.individual_atom(name)?);
                }
                Ok(Construct::OneOf(ids))
            }
        }
    }

    fn class_atom(&mut self, name: &str) -> Result<Construct, ExpressionError> {
        if name.contains('[') {
            return constrained_literal(name);
        }
        if name.chars().all(|c| c.is_ascii_digit()) && !name.is_empty() {
            let value: i64 = name
                .parse()
                .map_err(|_| ExpressionError::UnreducibleAtom(name.to_string()))?;
            return Ok(Construct::Integer(value));
        }
        let local = crate::names::shorten(name);
        if let Some(id) = self.world.lookup_local(local) {
            if self.world.node(id).kind == NodeKind::Individual {
                return Err(ExpressionError::AmbiguousAtom(name.to_string()));
            }
            return Ok(Construct::Node(id));
        }
        match name {
            "True" => return Ok(Construct::Bool(true)),
            "False" => return Ok(Construct::Bool(false)),
            _ => {}
        }
        if let Some(kind) = LiteralKind::from_datatype_name(name) {
            return Ok(Construct::Datatype(kind));
        }
        // Forward reference: anchor a placeholder class in the base
        // namespace so class declaration order stays flexible.
        Ok(Construct::Node(
            self.world.declare_placeholder(local, NodeKind::Class),
        ))
    }

    fn property_atom(&mut self, name: &str) -> Result<NodeId, ExpressionError> {
        let local = crate::names::shorten(name);
        if let Some(id) = self.world.lookup_local(local) {
            let node = self.world.node(id);
            return match node.kind {
                NodeKind::ObjectProperty | NodeKind::DataProperty => Ok(id),
                // A placeholder's real kind is still unknown.
                _ if node.placeholder => Ok(id),
                _ => Err(ExpressionError::UnreducibleAtom(name.to_string())),
            };
        }
        Ok(self.world.declare_placeholder(local, NodeKind::ObjectProperty))
    }

    fn individual_atom(&mut self, name: &str) -> Result<NodeId, ExpressionError> {
        let local = crate::names::shorten(name);
        match self.world.lookup_local(local) {
            Some(id) if self.world.node(id).kind == NodeKind::Individual => Ok(id),
            _ => Err(ExpressionError::UnknownIndividual(name.to_string())),
        }
    }
}

/// Parses a bracketed constraint atom such as `integer[>= 40]` or
/// `string[pattern "[A-Z].*"]`.
fn constrained_literal(atom: &str) -> Result<Construct, ExpressionError> {
    let (type_name, rest) = atom
        .split_once('[')
        .ok_or_else(|| ExpressionError::MalformedConstraint(atom.to_string()))?;
    let body = rest
        .strip_suffix(']')
        .ok_or_else(|| ExpressionError::MalformedConstraint(atom.to_string()))?;
    let kind = LiteralKind::from_datatype_name(type_name)
        .ok_or_else(|| ExpressionError::MalformedConstraint(atom.to_string()))?;
    let (operator, value) = body
        .trim()
        .split_once(' ')
        .ok_or_else(|| ExpressionError::MalformedConstraint(atom.to_string()))?;
    let facet = Facet::from_operator(operator)
        .ok_or_else(|| ExpressionError::UnsupportedFacet(operator.to_string()))?;
    let value = value.trim().trim_matches('"').to_string();
    if value.is_empty() {
        return Err(ExpressionError::MalformedConstraint(atom.to_string()));
    }
    Ok(Construct::ConstrainedLiteral { kind, facet, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new("http://example.org/mao#", "mao")
    }

    #[test]
    fn named_atoms_resolve_through_the_cache() {
        let mut w = world();
        let film = w.declare("mao:Film", "http://example.org/mao#Film".into(), NodeKind::Class);
        let construct = evaluate_text(&mut w, "Film").unwrap();
        assert_eq!(construct, Construct::Node(film));
    }

    #[test]
    fn forward_references_become_placeholders() {
        let mut w = world();
        let construct = evaluate_text(&mut w, "Documentary").unwrap();
        let id = w.lookup("mao:Documentary").unwrap();
        assert_eq!(construct, Construct::Node(id));
        assert_eq!(w.node(id).kind, NodeKind::Class);
    }

    #[test]
    fn restriction_property_placeholder_is_an_object_property() {
        let mut w = world();
        let construct = evaluate_text(&mut w, "hasActor some Actor").unwrap();
        let prop = w.lookup("mao:hasActor").unwrap();
        assert_eq!(w.node(prop).kind, NodeKind::ObjectProperty);
        match construct {
            Construct::SomeValues { property, .. } => assert_eq!(property, prop),
            other => panic!("unexpected construct: {other:?}"),
        }
    }

    #[test]
    fn individual_in_class_position_is_rejected() {
        let mut w = world();
        w.declare("mao:Tom", "http://example.org/mao#Tom".into(), NodeKind::Individual);
        let err = evaluate_text(&mut w, "Tom and Actor").unwrap_err();
        assert_eq!(err, ExpressionError::AmbiguousAtom("Tom".to_string()));
    }

    #[test]
    fn one_of_requires_materialized_individuals() {
        let mut w = world();
        w.declare("mao:Tom", "http://example.org/mao#Tom".into(), NodeKind::Individual);
        let err = evaluate_text(&mut w, "{Tom, Nicole}").unwrap_err();
        assert_eq!(err, ExpressionError::UnknownIndividual("Nicole".to_string()));

        w.declare("mao:Nicole", "http://example.org/mao#Nicole".into(), NodeKind::Individual);
        let construct = evaluate_text(&mut w, "{Tom, Nicole}").unwrap();
        match construct {
            Construct::OneOf(ids) => assert_eq!(ids.len(), 2),
            other => panic!("unexpected construct: {other:?}"),
        }
    }

    #[test]
    fn constrained_literal_atoms() {
        let mut w = world();
        let construct = evaluate_text(&mut w, "hasAge some integer[>= 18]").unwrap();
        match construct {
            Construct::SomeValues { filler, .. } => assert_eq!(
                *filler,
                Construct::ConstrainedLiteral {
                    kind: LiteralKind::Int,
                    facet: Facet::MinInclusive,
                    value: "18".to_string(),
                }
            ),
            other => panic!("unexpected construct: {other:?}"),
        }

        let err = evaluate_text(&mut w, "hasAge some integer[== 18]").unwrap_err();
        assert_eq!(err, ExpressionError::UnsupportedFacet("==".to_string()));
    }

    #[test]
    fn reserved_words_and_digits() {
        let mut w = world();
        assert_eq!(evaluate_text(&mut w, "True").unwrap(), Construct::Bool(true));
        assert_eq!(
            evaluate_text(&mut w, "hasTenant value John").unwrap_err(),
            ExpressionError::UnknownIndividual("John".to_string()),
        );
        match evaluate_text(&mut w, "hasSeats some integer").unwrap() {
            Construct::SomeValues { filler, .. } => {
                assert_eq!(*filler, Construct::Datatype(LiteralKind::Int));
            }
            other => panic!("unexpected construct: {other:?}"),
        }
    }
}
