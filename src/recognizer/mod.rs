//! Reverse Recognizer (C9): parses a restricted subset of SPL back into the
//! `Query` AST, reverses target field names against a profile's inverse
//! mapping index, and renders a best-effort Sigma YAML document.

mod parse;
mod render;
mod tokenize;

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::Result;
use crate::model::{LogSource, Profile, Query};

use parse::Parser;
use tokenize::tokenize;

/// What `recognize` hands back: the best-effort Sigma document plus every
/// note about a fragment that couldn't be reversed precisely. Notes are
/// never silent (spec §4.9): a dropped `NOT`, an ambiguous reverse mapping,
/// or a carried-over health check all produce one.
#[derive(Debug, Clone)]
pub struct RecognizedRule {
    pub sigma_yaml: String,
    pub logsource: LogSource,
    pub correlation_notes: Vec<String>,
}

/// Parse `spl` (the text the emitter would have produced: a preamble line,
/// optionally followed by `### `-prefixed health check lines) back into a
/// Sigma document.
pub fn recognize(spl: &str, profile: &Profile) -> Result<RecognizedRule> {
    tracing::debug!(profile = %profile.name, "recognizing SPL");
    let mut lines = spl.lines();
    let first_line = lines.next().unwrap_or("");
    let health_checks: Vec<String> = lines
        .filter_map(|l| l.strip_prefix("### "))
        .map(str::to_string)
        .collect();

    let (head, stats_part) = match first_line.find("| stats") {
        Some(idx) => (first_line[..idx].trim_end(), Some(&first_line[idx..])),
        None => (first_line, None),
    };

    let (logsource, predicate_text) = parse_preamble(head);

    let tokens = tokenize("spl", predicate_text.trim())?;
    let mut parser = Parser::new("spl", tokens);
    let mut query = parser.parse_all()?;

    let mut correlation_notes = Vec::new();
    reverse_fields(&mut query, profile, &mut correlation_notes);

    let stats_fields = stats_part.map(parse_stats_fields).unwrap_or_default();
    let mut rendered = render::render_sigma(&query, &logsource, &stats_fields);
    rendered.correlation_notes.append(&mut correlation_notes);
    rendered
        .correlation_notes
        .extend(health_checks.iter().map(|hc| format!("health check carried over verbatim: {hc}")));

    Ok(RecognizedRule {
        sigma_yaml: rendered.sigma_yaml,
        logsource,
        correlation_notes: rendered.correlation_notes,
    })
}

/// Strip the optional `search index=... sourcetype=... earliest=-...`
/// preamble, returning logsource defaults inferred from it plus whatever
/// text remains as the predicate.
fn parse_preamble(head: &str) -> (LogSource, String) {
    let mut rest = head.trim();
    if let Some(stripped) = rest.strip_prefix("search") {
        rest = stripped.trim_start();
    }

    let mut index = None;
    let mut sourcetype = None;
    loop {
        if let Some(value) = rest.strip_prefix("index=") {
            let (token, remainder) = split_first_word(value);
            index = Some(token.to_string());
            rest = remainder.trim_start();
            continue;
        }
        if let Some(value) = rest.strip_prefix("sourcetype=") {
            let (token, remainder) = split_first_word(value);
            sourcetype = Some(token.to_string());
            rest = remainder.trim_start();
            continue;
        }
        if let Some(value) = rest.strip_prefix("earliest=") {
            let (_, remainder) = split_first_word(value);
            rest = remainder.trim_start();
            continue;
        }
        break;
    }

    let product = if sourcetype.as_deref() == Some("WinEventLog:*") || index.as_deref() == Some("wineventlog") {
        Some("windows".to_string())
    } else {
        None
    };

    (
        LogSource {
            product,
            service: None,
            category: None,
            definition: None,
        },
        rest.to_string(),
    )
}

fn split_first_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

fn parse_stats_fields(stats_part: &str) -> Vec<String> {
    let Some(idx) = stats_part.find(" by ") else {
        return Vec::new();
    };
    stats_part[idx + 4..]
        .split(',')
        .map(|s| s.trim().trim_start_matches('`').trim_end_matches('`').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rewrite every `Match`/`NotExists` target field name back to the Sigma
/// field that maps to it, per the profile's mappings. When more than one
/// Sigma field maps to the same target, the first in insertion order wins
/// and the ambiguity is recorded once per target field.
fn reverse_fields(query: &mut Query, profile: &Profile, notes: &mut Vec<String>) {
    let mut candidates: IndexMap<String, Vec<String>> = IndexMap::new();
    for mapping in &profile.mappings {
        candidates
            .entry(mapping.target_field.clone())
            .or_default()
            .push(mapping.sigma_field.clone());
    }

    let mut noted: HashSet<String> = HashSet::new();
    rewrite(query, &candidates, &mut noted, notes);
}

fn rewrite(
    query: &mut Query,
    candidates: &IndexMap<String, Vec<String>>,
    noted: &mut HashSet<String>,
    notes: &mut Vec<String>,
) {
    match query {
        Query::And(terms) | Query::Or(terms) => {
            for t in terms {
                rewrite(t, candidates, noted, notes);
            }
        }
        Query::Not(inner) => rewrite(inner, candidates, noted, notes),
        Query::Match(m) => reverse_one(&mut m.field, candidates, noted, notes),
        Query::NotExists(field) => reverse_one(field, candidates, noted, notes),
    }
}

fn reverse_one(
    field: &mut String,
    candidates: &IndexMap<String, Vec<String>>,
    noted: &mut HashSet<String>,
    notes: &mut Vec<String>,
) {
    let Some(sigma_fields) = candidates.get(field.as_str()) else {
        return;
    };
    if sigma_fields.len() > 1 && noted.insert(field.clone()) {
        notes.push(format!(
            "target field `{field}` maps from multiple Sigma fields ({}); the first, `{}`, was used",
            sigma_fields.join(", "),
            sigma_fields[0]
        ));
    }
    *field = sigma_fields[0].clone();
}
