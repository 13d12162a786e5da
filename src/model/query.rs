//! The normalized boolean Query AST produced by the condition compiler (C4)
//! and consumed by the SPL emitter (C5) and the reverse recognizer (C9).

use serde::{Deserialize, Serialize};

/// A resolved match operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl NumericOp {
    #[must_use]
    pub const fn as_spl(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    Regex,
    CidrIn,
    NumericCmp(NumericOp),
    In,
}

/// A literal value in the Query AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
    List(Vec<Literal>),
}

impl Literal {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A single field/operator/value test. `field` is the *target* (resolved)
/// field name, or the original Sigma name when resolution produced
/// `missing` — gap status is tracked separately in the gap list, not in the
/// AST (see `model::conversion::MappingResult`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub field: String,
    pub op: MatchOp,
    pub value: Literal,
    /// Sigma string matches are case-insensitive unless `|cased` is present;
    /// `|cased` is a documented no-op (DESIGN.md Open Question 1), so this
    /// is always `true` in practice today, but is modeled explicitly so a
    /// future decision can flip it.
    pub case_insensitive: bool,
}

/// The boolean query AST in normal form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    And(Vec<Query>),
    Or(Vec<Query>),
    Not(Box<Query>),
    Match(Match),
    /// `field` is absent from the event (Sigma `null` value semantics).
    NotExists(String),
}

impl Query {
    #[must_use]
    pub fn and(terms: Vec<Query>) -> Self {
        if terms.len() == 1 {
            terms.into_iter().next().expect("len checked above")
        } else {
            Self::And(terms)
        }
    }

    #[must_use]
    pub fn or(terms: Vec<Query>) -> Self {
        if terms.len() == 1 {
            terms.into_iter().next().expect("len checked above")
        } else {
            Self::Or(terms)
        }
    }

    /// Collect every `Match`/`NotExists` leaf field name, in tree order.
    pub fn walk_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::And(terms) | Self::Or(terms) => {
                for t in terms {
                    t.walk_fields(out);
                }
            }
            Self::Not(inner) => inner.walk_fields(out),
            Self::Match(m) => out.push(&m.field),
            Self::NotExists(f) => out.push(f),
        }
    }

    /// Structural equality up to associativity/commutativity of `And`/`Or`
    /// and deduplication of `Match` leaves — the relation invariant 1
    /// (round-trip safety) is stated in terms of.
    #[must_use]
    pub fn equiv(&self, other: &Self) -> bool {
        normal_multiset(self) == normal_multiset(other)
    }
}

/// A canonical, order-independent, duplicate-free representation used only
/// to compare two queries for `equiv`. Not part of the public AST.
fn normal_multiset(q: &Query) -> NormalForm {
    match q {
        Query::And(terms) => {
            let mut items: Vec<NormalForm> = terms.iter().map(normal_multiset).collect();
            items.sort();
            items.dedup();
            NormalForm::And(items)
        }
        Query::Or(terms) => {
            let mut items: Vec<NormalForm> = terms.iter().map(normal_multiset).collect();
            items.sort();
            items.dedup();
            NormalForm::Or(items)
        }
        Query::Not(inner) => NormalForm::Not(Box::new(normal_multiset(inner))),
        Query::Match(m) => NormalForm::Leaf(format!("{:?}", m)),
        Query::NotExists(f) => NormalForm::Leaf(format!("NotExists({f})")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum NormalForm {
    And(Vec<NormalForm>),
    Or(Vec<NormalForm>),
    Not(Box<NormalForm>),
    Leaf(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(field: &str) -> Query {
        Query::Match(Match {
            field: field.to_string(),
            op: MatchOp::Equals,
            value: Literal::Str("v".into()),
            case_insensitive: true,
        })
    }

    #[test]
    fn equiv_ignores_and_order() {
        let a = Query::And(vec![m("a"), m("b")]);
        let b = Query::And(vec![m("b"), m("a")]);
        assert!(a.equiv(&b));
    }

    #[test]
    fn equiv_dedups_match_leaves() {
        let a = Query::Or(vec![m("a"), m("a")]);
        let b = m("a");
        assert!(a.equiv(&b));
    }

    #[test]
    fn equiv_rejects_structural_difference() {
        let a = Query::And(vec![m("a"), m("b")]);
        let b = Query::Or(vec![m("a"), m("b")]);
        assert!(!a.equiv(&b));
    }
}
