//! Lexer for the restricted SPL grammar C9 accepts: field comparisons,
//! boolean keywords, parens, and the three pipe clauses the emitter (C5)
//! produces (`cidrmatch`, `regex`, numeric `where`).

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::NumericOp;

#[derive(Debug, Clone)]
pub(super) enum Tok {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Atom(Atom),
}

#[derive(Debug, Clone)]
pub(super) enum Atom {
    /// An unclassified `field="value"` comparison; the parser decides
    /// Equals/Contains/StartsWith/EndsWith from the wildcard wrapping.
    Cmp { field: String, raw_value: String },
    CidrMatch { field: String, value: String },
    Regex { field: String, value: String },
    Numeric { field: String, op: NumericOp, value: String },
}

pub(super) fn tokenize(path: &str, input: &str) -> Result<Vec<Tok>> {
    let lparen = Regex::new(r"^\(").expect("static pattern");
    let rparen = Regex::new(r"^\)").expect("static pattern");
    let and_kw = Regex::new(r"(?i)^AND\b").expect("static pattern");
    let or_kw = Regex::new(r"(?i)^OR\b").expect("static pattern");
    let not_kw = Regex::new(r"(?i)^NOT\b").expect("static pattern");
    let cidr_re =
        Regex::new(r#"^\|\s*where\s+cidrmatch\(\s*"((?:[^"\\]|\\.)*)"\s*,\s*(\w+)\s*\)"#).expect("static pattern");
    let regex_re = Regex::new(r#"^\|\s*regex\s+(\w+)\s*=\s*"((?:[^"\\]|\\.)*)""#).expect("static pattern");
    let numeric_re = Regex::new(r"^\|\s*where\s+(\w+)\s*(<=|>=|<|>)\s*(-?\d+)").expect("static pattern");
    let cmp_re = Regex::new(r#"^(\w+)\s*=\s*"((?:[^"\\]|\\.)*)""#).expect("static pattern");

    let mut tokens = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        if let Some(m) = lparen.find(rest) {
            tokens.push(Tok::LParen);
            rest = rest[m.end()..].trim_start();
            continue;
        }
        if let Some(m) = rparen.find(rest) {
            tokens.push(Tok::RParen);
            rest = rest[m.end()..].trim_start();
            continue;
        }
        if let Some(m) = and_kw.find(rest) {
            tokens.push(Tok::And);
            rest = rest[m.end()..].trim_start();
            continue;
        }
        if let Some(m) = or_kw.find(rest) {
            tokens.push(Tok::Or);
            rest = rest[m.end()..].trim_start();
            continue;
        }
        if let Some(m) = not_kw.find(rest) {
            tokens.push(Tok::Not);
            rest = rest[m.end()..].trim_start();
            continue;
        }
        if let Some(caps) = cidr_re.captures(rest) {
            let value = unescape(&caps[1]);
            let field = caps[2].to_string();
            let end = caps.get(0).expect("whole match").end();
            tokens.push(Tok::Atom(Atom::CidrMatch { field, value }));
            rest = rest[end..].trim_start();
            continue;
        }
        if let Some(caps) = regex_re.captures(rest) {
            let field = caps[1].to_string();
            let value = unescape(&caps[2]);
            let end = caps.get(0).expect("whole match").end();
            tokens.push(Tok::Atom(Atom::Regex { field, value }));
            rest = rest[end..].trim_start();
            continue;
        }
        if let Some(caps) = numeric_re.captures(rest) {
            let field = caps[1].to_string();
            let op = match &caps[2] {
                "<" => NumericOp::Lt,
                "<=" => NumericOp::Lte,
                ">" => NumericOp::Gt,
                ">=" => NumericOp::Gte,
                other => return Err(Error::unsupported_spl(format!("numeric operator {other}"), 0)),
            };
            let value = caps[3].to_string();
            let end = caps.get(0).expect("whole match").end();
            tokens.push(Tok::Atom(Atom::Numeric { field, op, value }));
            rest = rest[end..].trim_start();
            continue;
        }
        if let Some(caps) = cmp_re.captures(rest) {
            let field = caps[1].to_string();
            let raw_value = unescape(&caps[2]);
            let end = caps.get(0).expect("whole match").end();
            tokens.push(Tok::Atom(Atom::Cmp { field, raw_value }));
            rest = rest[end..].trim_start();
            continue;
        }
        return Err(Error::unsupported_spl(format!("{path}: {rest}"), input.len() - rest.len()));
    }
    Ok(tokens)
}

fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"").replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_and_clause() {
        let tokens = tokenize("spl", r#"CommandLine="*foo*" AND Image="*cmd.exe""#).unwrap();
        assert!(matches!(tokens[0], Tok::Atom(Atom::Cmp { .. })));
        assert!(matches!(tokens[1], Tok::And));
        assert!(matches!(tokens[2], Tok::Atom(Atom::Cmp { .. })));
    }

    #[test]
    fn tokenizes_cidrmatch_clause() {
        let tokens = tokenize("spl", r#"| where cidrmatch("10.0.0.0/8", DestinationIp)"#).unwrap();
        assert!(matches!(tokens[0], Tok::Atom(Atom::CidrMatch { .. })));
    }

    #[test]
    fn rejects_unsupported_fragment() {
        assert!(tokenize("spl", "eval foo=bar").is_err());
    }
}
