//! Hand-tokenized, recursive-descent parser for the Sigma `condition`
//! grammar (spec §4.1/§9: "do not embed a general expression evaluator").
//!
//! Grammar:
//! ```text
//! expr      := or_expr
//! or_expr   := and_expr ( "or" and_expr )*
//! and_expr  := not_expr ( "and" not_expr )*
//! not_expr  := "not" not_expr | atom
//! atom      := "(" expr ")" | of_expr | IDENT
//! of_expr   := ("1" | "all") "of" ( "them" | IDENT )
//! ```

use crate::error::{Error, Result};
use crate::model::{ConditionExpr, OfTarget, Quantifier};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Of,
    One,
    All,
    Them,
    Ident(String),
}

fn tokenize(path: &str, input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                if word.is_empty() {
                    return Err(Error::invalid_sigma(path, "empty token in condition"));
                }
                tokens.push(match word.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "of" => Token::Of,
                    "1" => Token::One,
                    "all" => Token::All,
                    "them" => Token::Them,
                    _ => Token::Ident(word),
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    path: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.advance() {
            Some(ref t) if t == expected => Ok(()),
            other => Err(Error::invalid_sigma(
                self.path,
                format!("expected {expected:?}, found {other:?}"),
            )),
        }
    }

    fn parse_expr(&mut self) -> Result<ConditionExpr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<ConditionExpr> {
        let mut terms = vec![self.parse_and()?];
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 {
            terms.into_iter().next().expect("checked len")
        } else {
            ConditionExpr::Or(terms)
        })
    }

    fn parse_and(&mut self) -> Result<ConditionExpr> {
        let mut terms = vec![self.parse_not()?];
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            terms.push(self.parse_not()?);
        }
        Ok(if terms.len() == 1 {
            terms.into_iter().next().expect("checked len")
        } else {
            ConditionExpr::And(terms)
        })
    }

    fn parse_not(&mut self) -> Result<ConditionExpr> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            return Ok(ConditionExpr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<ConditionExpr> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::One) => {
                self.advance();
                self.parse_of(Quantifier::One)
            }
            Some(Token::All) => {
                // `all` may start an `all of ...` expression, or may itself
                // be the selection name `all` (not valid Sigma, but we only
                // commit to the `of` reading when `of` actually follows).
                if matches!(self.tokens.get(self.pos + 1), Some(Token::Of)) {
                    self.advance();
                    self.parse_of(Quantifier::All)
                } else {
                    self.advance();
                    Ok(ConditionExpr::Selection("all".to_string()))
                }
            }
            Some(Token::Ident(_)) => {
                let Some(Token::Ident(name)) = self.advance() else {
                    unreachable!()
                };
                Ok(ConditionExpr::Selection(name))
            }
            other => Err(Error::invalid_sigma(
                self.path,
                format!("unexpected token in condition: {other:?}"),
            )),
        }
    }

    fn parse_of(&mut self, quantifier: Quantifier) -> Result<ConditionExpr> {
        self.expect(&Token::Of)?;
        let target = match self.advance() {
            Some(Token::Them) => OfTarget::Them,
            Some(Token::Ident(name)) => {
                if let Some(prefix) = name.strip_suffix('*') {
                    OfTarget::Prefix(prefix.to_string())
                } else {
                    OfTarget::Name(name)
                }
            }
            other => {
                return Err(Error::invalid_sigma(
                    self.path,
                    format!("expected selection target after `of`, found {other:?}"),
                ))
            }
        };
        Ok(ConditionExpr::Of(quantifier, target))
    }
}

/// Parse a Sigma `condition:` string into a `ConditionExpr` tree.
pub fn parse_condition(path: &str, input: &str) -> Result<ConditionExpr> {
    if input.trim().is_empty() {
        return Err(Error::invalid_sigma(path, "empty condition"));
    }
    let tokens = tokenize(path, input)?;
    let mut parser = Parser {
        path,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(Error::invalid_sigma(
            path,
            format!("trailing tokens after condition at position {}", parser.pos),
        ));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_selection() {
        let expr = parse_condition("detection.condition", "selection").unwrap();
        assert_eq!(expr, ConditionExpr::Selection("selection".to_string()));
    }

    #[test]
    fn parses_and_or_not_with_parens() {
        let expr = parse_condition("c", "selection1 and (selection2 or not selection3)").unwrap();
        assert_eq!(
            expr,
            ConditionExpr::And(vec![
                ConditionExpr::Selection("selection1".to_string()),
                ConditionExpr::Or(vec![
                    ConditionExpr::Selection("selection2".to_string()),
                    ConditionExpr::Not(Box::new(ConditionExpr::Selection(
                        "selection3".to_string()
                    ))),
                ]),
            ])
        );
    }

    #[test]
    fn parses_1_of_wildcard() {
        let expr = parse_condition("c", "1 of selection_*").unwrap();
        assert_eq!(
            expr,
            ConditionExpr::Of(Quantifier::One, OfTarget::Prefix("selection_".to_string()))
        );
    }

    #[test]
    fn parses_all_of_them() {
        let expr = parse_condition("c", "all of them").unwrap();
        assert_eq!(expr, ConditionExpr::Of(Quantifier::All, OfTarget::Them));
    }

    #[test]
    fn rejects_empty_condition() {
        assert!(parse_condition("c", "").is_err());
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert!(parse_condition("c", "(selection").is_err());
    }
}
