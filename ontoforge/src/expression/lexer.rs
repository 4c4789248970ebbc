//! Tokenizer for class-expression literals.
//!
//! The policy that keyword operators must be surrounded by exactly one space
//! is enforced here: each token records the length of the whitespace run that
//! preceded it, and a validation pass rejects keywords with any other
//! spacing. `not` is exempt on the right so `not(...)` keeps working.

use super::ExpressionError;

/// One lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A name, number-free word, or `type[op value]` constraint atom.
    Ident(String),
    /// A bare non-negative integer (cardinality count or digit atom).
    Int(u32),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `not`
    Not,
    /// `and`
    And,
    /// `or`
    Or,
    /// `some`
    Some,
    /// `only`
    Only,
    /// `value`
    Value,
    /// `min`
    Min,
    /// `max`
    Max,
    /// `exactly`
    Exactly,
}

impl Token {
    /// The surface keyword, for binary operators.
    fn keyword(&self) -> Option<&'static str> {
        match self {
            Token::And => Some("and"),
            Token::Or => Some("or"),
            Token::Some => Some("some"),
            Token::Only => Some("only"),
            Token::Value => Some("value"),
            Token::Min => Some("min"),
            Token::Max => Some("max"),
            Token::Exactly => Some("exactly"),
            _ => None,
        }
    }
}

fn keyword_token(word: &str) -> Option<Token> {
    match word {
        "not" => Some(Token::Not),
        "and" => Some(Token::And),
        "or" => Some(Token::Or),
        "some" => Some(Token::Some),
        "only" => Some(Token::Only),
        "value" => Some(Token::Value),
        "min" => Some(Token::Min),
        "max" => Some(Token::Max),
        "exactly" => Some(Token::Exactly),
        _ => None,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ':' | '_' | '-' | '.' | '#' | '<' | '>')
}

/// Tokenizes an expression.
///
/// # Errors
///
/// [`ExpressionError::StrayCharacter`] on unrecognized input and
/// [`ExpressionError::BadSpacing`] when a keyword operator is not surrounded
/// by exactly one space.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens: Vec<(Token, usize)> = Vec::new();
    let mut chars = input.chars().peekable();
    let mut ws_run = 0usize;

    while let Some(&c) = chars.peek() {
        if c == ' ' {
            chars.next();
            ws_run += 1;
            continue;
        }
        let tok = match c {
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            '{' => {
                chars.next();
                Token::LBrace
            }
            '}' => {
                chars.next();
                Token::RBrace
            }
            ',' => {
                chars.next();
                Token::Comma
            }
            _ if is_ident_char(c) => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if is_ident_char(c) {
                        word.push(c);
                        chars.next();
                    } else if c == '[' {
                        // A bracketed literal constraint stays part of the atom.
                        for c in chars.by_ref() {
                            word.push(c);
                            if c == ']' {
                                break;
                            }
                        }
                    } else {
                        break;
                    }
                }
                if let Some(kw) = keyword_token(&word) {
                    kw
                } else if word.chars().all(|c| c.is_ascii_digit()) {
                    word.parse::<u32>()
                        .map(Token::Int)
                        .map_err(|_| ExpressionError::UnreducibleAtom(word))?
                } else {
                    Token::Ident(word)
                }
            }
            other => return Err(ExpressionError::StrayCharacter(other)),
        };
        tokens.push((tok, ws_run));
        ws_run = 0;
    }

    check_spacing(&tokens)?;
    Ok(tokens.into_iter().map(|(t, _)| t).collect())
}

/// Binary keywords need exactly one leading and one trailing space.
fn check_spacing(tokens: &[(Token, usize)]) -> Result<(), ExpressionError> {
    for (i, (tok, ws_before)) in tokens.iter().enumerate() {
        let Some(kw) = tok.keyword() else { continue };
        if i == 0 || *ws_before != 1 {
            return Err(ExpressionError::BadSpacing(kw.to_string()));
        }
        match tokens.get(i + 1) {
            None => return Err(ExpressionError::UnexpectedEnd),
            Some((_, ws_after)) if *ws_after != 1 => {
                return Err(ExpressionError::BadSpacing(kw.to_string()))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_boolean_chain() {
        let tokens = tokenize("(mao:Dog and mao:Croc) or mao:Cat").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                Token::Ident("mao:Dog".to_string()),
                Token::And,
                Token::Ident("mao:Croc".to_string()),
                Token::RParen,
                Token::Or,
                Token::Ident("mao:Cat".to_string()),
            ]
        );
    }

    #[test]
    fn constraint_atom_is_one_token() {
        let tokens = tokenize("integer[>= 40]").unwrap();
        assert_eq!(tokens, vec![Token::Ident("integer[>= 40]".to_string())]);
    }

    #[test]
    fn cardinality_count_lexes_as_int() {
        let tokens = tokenize("hasPet exactly 1 Cat").unwrap();
        assert_eq!(tokens[1], Token::Exactly);
        assert_eq!(tokens[2], Token::Int(1));
    }

    #[test]
    fn not_binds_without_space() {
        let tokens = tokenize("not(Dog or Cat)").unwrap();
        assert_eq!(tokens[0], Token::Not);
        assert_eq!(tokens[1], Token::LParen);
    }

    #[test]
    fn double_space_around_operator_rejected() {
        assert_eq!(
            tokenize("Dog  and Cat"),
            Err(ExpressionError::BadSpacing("and".to_string()))
        );
        assert_eq!(
            tokenize("Dog and  Cat"),
            Err(ExpressionError::BadSpacing("and".to_string()))
        );
    }

    #[test]
    fn missing_space_rejected() {
        assert_eq!(
            tokenize("Dog and(Cat)"),
            Err(ExpressionError::BadSpacing("and".to_string()))
        );
    }
}
