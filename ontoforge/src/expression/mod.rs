//! Class-expression literals.
//!
//! Equivalent-class declarations embed a compact boolean/restriction
//! expression language (the subset of Manchester syntax actually exercised:
//! `and`/`or`/`not`, `some`/`only`, `value`, `min`/`max`/`exactly`, literal
//! range constraints `type[op value]`, and `{a, b, c}` enumeration). The
//! subsystem is an explicit tokenizer ([`lexer`]) plus a recursive-descent
//! parser ([`parser`]) over the token stream; evaluation against a
//! materialization cache lives in [`eval`].
//!
//! Precedence is flat and parenthesis-driven: `or` is looser than `and`,
//! restrictions bind tighter than both, and `not` takes exactly one
//! parenthesized group or one atom, never an unparenthesized chain.

pub mod eval;
pub mod lexer;
pub mod parser;

use std::fmt;

use thiserror::Error;

use crate::names::shorten;

pub use parser::parse;

/// Failure to reduce expression text to a construct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// The expression ended mid-production.
    #[error("unexpected end of class expression")]
    UnexpectedEnd,
    /// A token that no production accepts at this point.
    #[error("unexpected `{0}` in class expression")]
    UnexpectedToken(String),
    /// A keyword operator without exactly one space on each side.
    #[error("operator `{0}` must be surrounded by exactly one space")]
    BadSpacing(String),
    /// The left side of a restriction must be a bare property name.
    #[error("restriction `{op}` needs a property name on its left")]
    PropertyPosition {
        /// The restriction keyword involved.
        op: String,
    },
    /// A cardinality keyword not followed by a count.
    #[error("cardinality `{0}` needs a non-negative integer count")]
    MissingCount(String),
    /// A character the tokenizer does not recognize.
    #[error("stray character `{0}` in class expression")]
    StrayCharacter(char),
    /// A bracketed literal constraint that does not follow `type[op value]`.
    #[error("malformed literal constraint `{0}`")]
    MalformedConstraint(String),
    /// A constraint operator outside `<`, `<=`, `>`, `>=`, `pattern`.
    #[error("unsupported constraint operator `{0}`")]
    UnsupportedFacet(String),
    /// A class-position atom resolving to an already-materialized individual
    /// of the same local name; ambiguous, so rejected.
    #[error("`{0}` names an individual where a class is required")]
    AmbiguousAtom(String),
    /// A `value` or enumeration member naming a never-materialized
    /// individual.
    #[error("individual `{0}` has yet to be materialized")]
    UnknownIndividual(String),
    /// An atom that no classification rule accepts.
    #[error("cannot reduce `{0}` to a construct")]
    UnreducibleAtom(String),
}

/// Cardinality restriction flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityKind {
    /// `min n C`
    Min,
    /// `max n C`
    Max,
    /// `exactly n C`
    Exactly,
}

impl CardinalityKind {
    /// The surface keyword.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            CardinalityKind::Min => "min",
            CardinalityKind::Max => "max",
            CardinalityKind::Exactly => "exactly",
        }
    }
}

/// Parsed class expression.
///
/// Atoms keep their raw text (possibly prefixed, possibly carrying a
/// bracketed literal constraint); classification happens at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassExpression {
    /// A bare name, number, reserved word, or `type[op value]` constraint.
    Atom(String),
    /// `not E`
    Not(Box<ClassExpression>),
    /// `A and B and ...`, flattened.
    And(Vec<ClassExpression>),
    /// `A or B or ...`, flattened.
    Or(Vec<ClassExpression>),
    /// `prop some E`
    SomeValues {
        /// Property name.
        property: String,
        /// Restricting expression.
        filler: Box<ClassExpression>,
    },
    /// `prop only E`
    OnlyValues {
        /// Property name.
        property: String,
        /// Restricting expression.
        filler: Box<ClassExpression>,
    },
    /// `prop value individual`
    HasValue {
        /// Property name.
        property: String,
        /// Individual name.
        individual: String,
    },
    /// `prop min/max/exactly n E`
    Cardinality {
        /// min/max/exactly.
        kind: CardinalityKind,
        /// Property name.
        property: String,
        /// The count.
        count: u32,
        /// Restricting expression.
        filler: Box<ClassExpression>,
    },
    /// `{a, b, c}`, order preserved.
    OneOf(Vec<String>),
}

impl ClassExpression {
    /// Whether rendering this operand inside a boolean chain needs
    /// parentheses.
    fn is_composite(&self) -> bool {
        matches!(self, ClassExpression::And(_) | ClassExpression::Or(_))
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_composite() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for ClassExpression {
    /// Renders the construct notation used throughout the tests:
    /// `∧`/`∨`/`¬`, `prop.some(..)`, `prop.exactly(1, ..)`, prefixes
    /// stripped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassExpression::Atom(name) => write!(f, "{}", shorten(name)),
            ClassExpression::Not(inner) => {
                write!(f, "¬")?;
                inner.fmt_operand(f)
            }
            ClassExpression::And(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ∧ ")?;
                    }
                    item.fmt_operand(f)?;
                }
                Ok(())
            }
            ClassExpression::Or(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ∨ ")?;
                    }
                    item.fmt_operand(f)?;
                }
                Ok(())
            }
            ClassExpression::SomeValues { property, filler } => {
                write!(f, "{}.some({filler})", shorten(property))
            }
            ClassExpression::OnlyValues { property, filler } => {
                write!(f, "{}.only({filler})", shorten(property))
            }
            ClassExpression::HasValue {
                property,
                individual,
            } => write!(f, "{}.value({})", shorten(property), shorten(individual)),
            ClassExpression::Cardinality {
                kind,
                property,
                count,
                filler,
            } => write!(f, "{}.{}({count}, {filler})", shorten(property), kind.keyword()),
            ClassExpression::OneOf(members) => {
                write!(f, "{{")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", shorten(m))?;
                }
                write!(f, "}}")
            }
        }
    }
}
