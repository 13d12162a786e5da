//! Recursive-descent parser turning the token stream into a `Query`, mirroring
//! the shape of the Sigma condition parser (`parser::condition`) but reading
//! SPL boolean syntax (infix `AND`/`OR`, prefix `NOT`, explicit parens, and
//! implicit `AND` by adjacency) instead of Sigma's.

use crate::error::{Error, Result};
use crate::model::{Literal, Match, MatchOp, Query};

use super::tokenize::{Atom, Tok};

pub(super) struct Parser<'a> {
    path: &'a str,
    tokens: Vec<Tok>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(path: &'a str, tokens: Vec<Tok>) -> Self {
        Self { path, tokens, pos: 0 }
    }

    pub(super) fn parse_all(&mut self) -> Result<Query> {
        if self.tokens.is_empty() {
            return Err(Error::unsupported_spl("empty predicate", 0));
        }
        let query = self.parse_or()?;
        if self.pos != self.tokens.len() {
            return Err(Error::unsupported_spl(format!("{}: trailing tokens after predicate", self.path), self.pos));
        }
        Ok(query)
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn parse_or(&mut self) -> Result<Query> {
        let mut terms = vec![self.parse_and()?];
        while matches!(self.peek(), Some(Tok::Or)) {
            self.bump();
            terms.push(self.parse_and()?);
        }
        Ok(Query::or(terms))
    }

    fn parse_and(&mut self) -> Result<Query> {
        let mut terms = vec![self.parse_not()?];
        loop {
            match self.peek() {
                Some(Tok::And) => {
                    self.bump();
                    terms.push(self.parse_not()?);
                }
                // Implicit AND: SPL joins adjacent predicates with a space.
                Some(Tok::LParen | Tok::Not | Tok::Atom(_)) => {
                    terms.push(self.parse_not()?);
                }
                _ => break,
            }
        }
        Ok(Query::and(terms))
    }

    fn parse_not(&mut self) -> Result<Query> {
        if matches!(self.peek(), Some(Tok::Not)) {
            self.bump();
            return Ok(Query::Not(Box::new(self.parse_not()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Query> {
        match self.bump() {
            Some(Tok::LParen) => {
                let inner = self.parse_or()?;
                match self.bump() {
                    Some(Tok::RParen) => Ok(inner),
                    _ => Err(Error::unsupported_spl(format!("{}: expected closing paren", self.path), self.pos)),
                }
            }
            Some(Tok::Atom(atom)) => Ok(atom_to_query(atom)),
            _ => Err(Error::unsupported_spl(format!("{}: expected a predicate", self.path), self.pos)),
        }
    }
}

fn atom_to_query(atom: Atom) -> Query {
    match atom {
        Atom::Cmp { field, raw_value } => {
            let (op, value) = classify_wildcards(&raw_value);
            Query::Match(Match {
                field,
                op,
                value: Literal::Str(value),
                case_insensitive: true,
            })
        }
        Atom::CidrMatch { field, value } => Query::Match(Match {
            field,
            op: MatchOp::CidrIn,
            value: Literal::Str(value),
            case_insensitive: true,
        }),
        Atom::Regex { field, value } => Query::Match(Match {
            field,
            op: MatchOp::Regex,
            value: Literal::Str(value),
            case_insensitive: true,
        }),
        Atom::Numeric { field, op, value } => Query::Match(Match {
            field,
            op: MatchOp::NumericCmp(op),
            value: Literal::Int(value.parse().unwrap_or(0)),
            case_insensitive: true,
        }),
    }
}

/// Inverse of the emitter's `format_equals`/wildcard wrapping: `*x*` is
/// Contains, `*x` is EndsWith, `x*` is StartsWith, otherwise Equals.
fn classify_wildcards(raw_value: &str) -> (MatchOp, String) {
    let starts = raw_value.starts_with('*');
    let ends = raw_value.ends_with('*') && raw_value.len() > 1;
    match (starts, ends) {
        (true, true) => (MatchOp::Contains, raw_value[1..raw_value.len() - 1].to_string()),
        (true, false) => (MatchOp::EndsWith, raw_value[1..].to_string()),
        (false, true) => (MatchOp::StartsWith, raw_value[..raw_value.len() - 1].to_string()),
        (false, false) => (MatchOp::Equals, raw_value.to_string()),
    }
}
