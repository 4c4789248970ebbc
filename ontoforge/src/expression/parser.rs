//! Recursive-descent parser over the token stream.

use super::lexer::{tokenize, Token};
use super::{CardinalityKind, ClassExpression, ExpressionError};

/// Parses a class-expression literal into its construct tree.
///
/// # Errors
///
/// Any [`ExpressionError`] from tokenization or a production mismatch.
pub fn parse(input: &str) -> Result<ClassExpression, ExpressionError> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
    };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(ExpressionError::UnexpectedToken(format!("{tok:?}"))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Token) -> Result<(), ExpressionError> {
        match self.next() {
            Some(t) if &t == tok => Ok(()),
            Some(t) => Err(ExpressionError::UnexpectedToken(format!("{t:?}"))),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    fn parse_or(&mut self) -> Result<ClassExpression, ExpressionError> {
        let mut items = Vec::new();
        push_flattened(&mut items, self.parse_and()?, is_or);
        while self.eat(&Token::Or) {
            push_flattened(&mut items, self.parse_and()?, is_or);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            ClassExpression::Or(items)
        })
    }

    fn parse_and(&mut self) -> Result<ClassExpression, ExpressionError> {
        let mut items = Vec::new();
        push_flattened(&mut items, self.parse_restriction()?, is_and);
        while self.eat(&Token::And) {
            push_flattened(&mut items, self.parse_restriction()?, is_and);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            ClassExpression::And(items)
        })
    }

    /// `prop some E`, `prop only E`, `prop value i`, `prop min/max/exactly n E`,
    /// or just a unary operand.
    fn parse_restriction(&mut self) -> Result<ClassExpression, ExpressionError> {
        let lhs = self.parse_unary()?;
        let Some(op) = self.peek().cloned() else {
            return Ok(lhs);
        };
        match op {
            Token::Some | Token::Only => {
                let property = property_name(lhs, "some/only")?;
                self.pos += 1;
                let filler = Box::new(self.parse_unary()?);
                Ok(if op == Token::Some {
                    ClassExpression::SomeValues { property, filler }
                } else {
                    ClassExpression::OnlyValues { property, filler }
                })
            }
            Token::Value => {
                let property = property_name(lhs, "value")?;
                self.pos += 1;
                match self.next() {
                    Some(Token::Ident(individual)) => Ok(ClassExpression::HasValue {
                        property,
                        individual,
                    }),
                    Some(t) => Err(ExpressionError::UnexpectedToken(format!("{t:?}"))),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            Token::Min | Token::Max | Token::Exactly => {
                let kind = match op {
                    Token::Min => CardinalityKind::Min,
                    Token::Max => CardinalityKind::Max,
                    _ => CardinalityKind::Exactly,
                };
                let property = property_name(lhs, kind.keyword())?;
                self.pos += 1;
                let count = match self.next() {
                    Some(Token::Int(n)) => n,
                    _ => return Err(ExpressionError::MissingCount(kind.keyword().to_string())),
                };
                let filler = Box::new(self.parse_unary()?);
                Ok(ClassExpression::Cardinality {
                    kind,
                    property,
                    count,
                    filler,
                })
            }
            _ => Ok(lhs),
        }
    }

    /// `not` binds only to a parenthesized group or a single atom.
    fn parse_unary(&mut self) -> Result<ClassExpression, ExpressionError> {
        if self.eat(&Token::Not) {
            let inner = self.parse_primary()?;
            Ok(ClassExpression::Not(Box::new(inner)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<ClassExpression, ExpressionError> {
        match self.next() {
            Some(Token::LParen) => {
                let expr = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Some(Token::LBrace) => {
                let mut members = Vec::new();
                loop {
                    match self.next() {
                        Some(Token::Ident(name)) => members.push(name),
                        Some(t) => {
                            return Err(ExpressionError::UnexpectedToken(format!("{t:?}")))
                        }
                        None => return Err(ExpressionError::UnexpectedEnd),
                    }
                    if self.eat(&Token::Comma) {
                        continue;
                    }
                    self.expect(&Token::RBrace)?;
                    break;
                }
                Ok(ClassExpression::OneOf(members))
            }
            Some(Token::Ident(name)) => Ok(ClassExpression::Atom(name)),
            Some(Token::Int(n)) => Ok(ClassExpression::Atom(n.to_string())),
            Some(t) => Err(ExpressionError::UnexpectedToken(format!("{t:?}"))),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}

fn is_and(e: &ClassExpression) -> Option<&[ClassExpression]> {
    match e {
        ClassExpression::And(items) => Some(items),
        _ => None,
    }
}

fn is_or(e: &ClassExpression) -> Option<&[ClassExpression]> {
    match e {
        ClassExpression::Or(items) => Some(items),
        _ => None,
    }
}

/// Same-operator operands merge into one flat chain, matching the behavior
/// of the associative conjunction/disjunction constructs downstream.
fn push_flattened(
    items: &mut Vec<ClassExpression>,
    expr: ClassExpression,
    same_op: fn(&ClassExpression) -> Option<&[ClassExpression]>,
) {
    if let Some(sub) = same_op(&expr) {
        items.extend(sub.iter().cloned());
    } else {
        items.push(expr);
    }
}

fn property_name(lhs: ClassExpression, op: &str) -> Result<String, ExpressionError> {
    match lhs {
        ClassExpression::Atom(name) => Ok(name),
        _ => Err(ExpressionError::PropertyPosition { op: op.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    #[test]
    fn boolean_chain_with_groups() {
        assert_eq!(
            rendered("(mao:Dog and mao:Croc) or mao:Cat or (mao:Person and mao:Film)"),
            "(Dog ∧ Croc) ∨ Cat ∨ (Person ∧ Film)"
        );
    }

    #[test]
    fn negated_group() {
        assert_eq!(rendered("(not(Dog or Cat)) and (Horse)"), "¬(Dog ∨ Cat) ∧ Horse");
        assert_eq!(rendered("(Horse) and (not(Dog or Cat))"), "Horse ∧ ¬(Dog ∨ Cat)");
    }

    #[test]
    fn quantified_restriction() {
        assert_eq!(
            rendered("Ding and (hasPet some (Cat or Dog))"),
            "Ding ∧ hasPet.some(Cat ∨ Dog)"
        );
    }

    #[test]
    fn cardinality_restriction() {
        assert_eq!(
            rendered("Mai and (hasPet exactly 1 Cat)"),
            "Mai ∧ hasPet.exactly(1, Cat)"
        );
    }

    #[test]
    fn enumeration_preserves_order() {
        assert_eq!(
            parse("{Male, Female, NonBinary}").unwrap(),
            ClassExpression::OneOf(vec![
                "Male".to_string(),
                "Female".to_string(),
                "NonBinary".to_string()
            ])
        );
    }

    #[test]
    fn flat_and_chain_flattens() {
        assert_eq!(
            rendered("(Cat and Horse and Dog) and Chicken"),
            "Cat ∧ Horse ∧ Dog ∧ Chicken"
        );
    }

    #[test]
    fn value_restriction() {
        assert_eq!(rendered("hasDirector value BongJoonHo"), "hasDirector.value(BongJoonHo)");
    }

    #[test]
    fn not_never_takes_unparenthesized_chain() {
        // `not Dog or Cat` parses as (not Dog) or Cat.
        assert_eq!(rendered("not Dog or Cat"), "¬Dog ∨ Cat");
    }

    #[test]
    fn restriction_needs_a_property_name() {
        assert!(matches!(
            parse("(A and B) some Cat"),
            Err(ExpressionError::PropertyPosition { .. })
        ));
    }

    #[test]
    fn trailing_garbage_rejected() {
        assert!(parse("Dog Cat").is_err());
    }
}
