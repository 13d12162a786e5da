//! SPL Emitter (C5): renders the compiled `Query` AST plus preamble
//! (index/sourcetype/time) and postamble (`| stats`, health checks) into SPL
//! text. Quoting/escaping is bit-exact (spec §4.5): tests pin literal SPL,
//! so every rendering rule here is a direct transcription of that contract.

use std::collections::{HashMap, HashSet};

use crate::model::{LogSource, Literal, MappingResult, Match, MatchOp, Profile, Query, Transform};

/// Per-request overrides for the preamble. `None` falls through to the
/// profile default, then the logsource-derived default.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub index: Option<String>,
    pub sourcetype: Option<String>,
    pub time_range: Option<String>,
}

const DEFAULT_STATS_FIELDS: &[&str] = &["user", "process", "CommandLine"];

/// Render a compiled query to SPL text. `mappings` is the resolver output
/// for the same query (used to filter the `| stats` default field list to
/// fields actually resolved); `health_checks` are C6's pre-synthesized
/// verification queries, appended as `###` comment lines.
#[must_use]
pub fn emit(
    query: &Query,
    profile: &Profile,
    logsource: &LogSource,
    mappings: &[MappingResult],
    health_checks: &[String],
    options: &EmitOptions,
) -> String {
    tracing::debug!(mappings = mappings.len(), health_checks = health_checks.len(), "emitting SPL");
    let transforms = resolve_transforms(mappings);
    let mut line = preamble(profile, logsource, options);
    let predicate = render_top(query, &transforms);
    if !predicate.is_empty() {
        line.push(' ');
        line.push_str(&predicate);
    }
    line.push_str(&postamble(profile, logsource, mappings));

    let mut out = line;
    for check in health_checks {
        out.push('\n');
        out.push_str("### ");
        out.push_str(check);
    }
    out
}

fn preamble(profile: &Profile, logsource: &LogSource, options: &EmitOptions) -> String {
    let index = options
        .index
        .clone()
        .or_else(|| profile.default_index.clone())
        .unwrap_or_else(|| default_index(logsource));
    let sourcetype = options
        .sourcetype
        .clone()
        .or_else(|| profile.default_sourcetype.clone())
        .unwrap_or_else(|| default_sourcetype(logsource));

    let mut out = format!("search index={index} sourcetype={sourcetype}");
    if let Some(range) = &options.time_range {
        out.push_str(&format!(" earliest=-{range}"));
    }
    out
}

fn default_index(logsource: &LogSource) -> String {
    match logsource.product.as_deref() {
        Some("windows") => "wineventlog".to_string(),
        _ => "main".to_string(),
    }
}

fn default_sourcetype(logsource: &LogSource) -> String {
    match logsource.product.as_deref() {
        Some("windows") => "WinEventLog:*".to_string(),
        _ => "*".to_string(),
    }
}

/// `target_field -> Transform` for every mapping carrying a recognized
/// transform name, keyed by the field name that ends up in the rendered
/// `Match` (spec §3: "`transform`, when present, is a named function
/// applied at emit time").
fn resolve_transforms(mappings: &[MappingResult]) -> HashMap<&str, Transform> {
    mappings
        .iter()
        .filter_map(|m| {
            let transform = Transform::parse(m.transform.as_deref()?)?;
            Some((m.target_field.as_str(), transform))
        })
        .collect()
}

/// `And` at top level renders as space-separated terms (SPL's implicit
/// AND); every other shape (including a top-level `Or`) renders the same
/// way it would nested.
fn render_top(query: &Query, transforms: &HashMap<&str, Transform>) -> String {
    match query {
        Query::And(terms) => terms.iter().map(|t| render(t, transforms)).collect::<Vec<_>>().join(" "),
        other => render(other, transforms),
    }
}

fn render(query: &Query, transforms: &HashMap<&str, Transform>) -> String {
    match query {
        Query::And(terms) => format!(
            "({})",
            terms.iter().map(|t| render(t, transforms)).collect::<Vec<_>>().join(" AND ")
        ),
        Query::Or(terms) => format!(
            "({})",
            terms.iter().map(|t| render(t, transforms)).collect::<Vec<_>>().join(" OR ")
        ),
        Query::Not(inner) => format!("NOT ({})", render(inner, transforms)),
        Query::Match(m) => render_match(m, transforms),
        Query::NotExists(field) => format!("NOT {field}=*"),
    }
}

fn render_match(m: &Match, transforms: &HashMap<&str, Transform>) -> String {
    let field = &m.field;
    let transform = transforms.get(field.as_str()).copied();
    match &m.op {
        MatchOp::Equals => format_equals(field, &m.value, transform),
        MatchOp::Contains => format!("{field}=\"*{}*\"", escape(&literal_display(&m.value, transform))),
        MatchOp::StartsWith => format!("{field}=\"{}*\"", escape(&literal_display(&m.value, transform))),
        MatchOp::EndsWith => format!("{field}=\"*{}\"", escape(&literal_display(&m.value, transform))),
        MatchOp::Regex => format!("| regex {field}=\"{}\"", escape(&literal_display(&m.value, transform))),
        MatchOp::CidrIn => {
            format!("| where cidrmatch(\"{}\", {field})", escape(&literal_display(&m.value, transform)))
        }
        MatchOp::NumericCmp(op) => format!("| where {field}{}{}", op.as_spl(), literal_display(&m.value, transform)),
        MatchOp::In => render_in(field, &m.value, transform),
    }
}

fn format_equals(field: &str, value: &Literal, transform: Option<Transform>) -> String {
    match value {
        Literal::Int(i) => format!("{field}={i}"),
        Literal::Bool(b) => format!("{field}={b}"),
        other => format!("{field}=\"{}\"", escape(&literal_display(other, transform))),
    }
}

fn render_in(field: &str, value: &Literal, transform: Option<Transform>) -> String {
    match value {
        Literal::List(items) => {
            let terms: Vec<String> = items.iter().map(|i| format_equals(field, i, transform)).collect();
            format!("({})", terms.join(" OR "))
        }
        other => format_equals(field, other, transform),
    }
}

fn literal_display(value: &Literal, transform: Option<Transform>) -> String {
    let display = match value {
        Literal::Str(s) => s.clone(),
        Literal::Int(i) => i.to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Null => String::new(),
        Literal::List(items) => items.iter().map(|i| literal_display(i, transform)).collect::<Vec<_>>().join(","),
    };
    match transform {
        Some(t) => t.apply(&display),
        None => display,
    }
}

/// Escape order matters: backslashes first, then quotes, so an escaped
/// quote is never re-escaped as a backslash pair.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn postamble(profile: &Profile, logsource: &LogSource, mappings: &[MappingResult]) -> String {
    let resolved: HashSet<&str> = mappings.iter().map(|m| m.target_field.as_str()).collect();
    let mut fields = vec!["_time", "host"];
    fields.extend(DEFAULT_STATS_FIELDS.iter().filter(|f| resolved.contains(*f)));

    let mut out = format!(" | stats count by {}", fields.join(", "));
    if let Some(category) = &logsource.category {
        if let Some(macro_name) = profile.macros.get(category) {
            out.push_str(&format!(" `{macro_name}`"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::model::ResolutionStatus;
    use crate::parser::parse_sigma_yaml;

    const MIMIKATZ: &str = r#"
title: Mimikatz
logsource: {category: process_creation, product: windows}
detection:
  selection: {CommandLine|contains: ['sekurlsa::logonpasswords','lsadump::sam']}
  condition: selection
level: critical
"#;

    #[test]
    fn mimikatz_preamble_and_predicate_match_spec_prefix() {
        let rule = parse_sigma_yaml(MIMIKATZ).unwrap();
        let profile = Profile::new("default");
        let (query, mappings) = compile(&rule, &profile).unwrap();
        let spl = emit(&query, &profile, &rule.logsource, &mappings, &[], &EmitOptions::default());
        assert!(spl.starts_with(
            "search index=wineventlog sourcetype=WinEventLog:* (CommandLine=\"*sekurlsa::logonpasswords*\" OR CommandLine=\"*lsadump::sam*\")"
        ));
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        let m = Match {
            field: "Image".to_string(),
            op: MatchOp::EndsWith,
            value: Literal::Str("\\powershell.exe".to_string()),
            case_insensitive: true,
        };
        assert_eq!(render_match(&m, &HashMap::new()), "Image=\"*\\\\powershell.exe\"");
    }

    #[test]
    fn not_renders_as_not_wrapped() {
        let q = Query::Not(Box::new(Query::Match(Match {
            field: "User".to_string(),
            op: MatchOp::Equals,
            value: Literal::Str("SYSTEM".to_string()),
            case_insensitive: true,
        })));
        assert_eq!(render(&q, &HashMap::new()), "NOT (User=\"SYSTEM\")");
    }

    #[test]
    fn numeric_equals_is_unquoted() {
        let m = Match {
            field: "EventID".to_string(),
            op: MatchOp::Equals,
            value: Literal::Int(1),
            case_insensitive: true,
        };
        assert_eq!(render_match(&m, &HashMap::new()), "EventID=1");
    }

    #[test]
    fn lower_transform_is_applied_to_the_rendered_literal() {
        let mappings = vec![MappingResult {
            sigma_field: "Image".to_string(),
            target_field: "process_path".to_string(),
            status: ResolutionStatus::Ok,
            transform: Some("lower".to_string()),
            note: None,
            location: "detection.selection.Image".to_string(),
        }];
        let transforms = resolve_transforms(&mappings);
        let m = Match {
            field: "process_path".to_string(),
            op: MatchOp::EndsWith,
            value: Literal::Str("POWERSHELL.EXE".to_string()),
            case_insensitive: true,
        };
        assert_eq!(render_match(&m, &transforms), "process_path=\"*powershell.exe\"");
    }

    #[test]
    fn unknown_transform_name_leaves_the_literal_unchanged() {
        let mappings = vec![MappingResult {
            sigma_field: "Image".to_string(),
            target_field: "process_path".to_string(),
            status: ResolutionStatus::Suggested,
            transform: Some("reverse".to_string()),
            note: Some("unknown transform 'reverse'; using raw target".to_string()),
            location: "detection.selection.Image".to_string(),
        }];
        let transforms = resolve_transforms(&mappings);
        assert!(transforms.is_empty());
        let m = Match {
            field: "process_path".to_string(),
            op: MatchOp::EndsWith,
            value: Literal::Str("PowerShell.exe".to_string()),
            case_insensitive: true,
        };
        assert_eq!(render_match(&m, &transforms), "process_path=\"*PowerShell.exe\"");
    }

    #[test]
    fn stats_postamble_filters_to_resolved_fields() {
        let profile = Profile::new("default");
        let logsource = LogSource {
            product: Some("windows".to_string()),
            category: Some("process_creation".to_string()),
            ..Default::default()
        };
        let mappings = vec![MappingResult {
            sigma_field: "CommandLine".to_string(),
            target_field: "CommandLine".to_string(),
            status: ResolutionStatus::Ok,
            transform: None,
            note: None,
            location: "detection.selection.CommandLine".to_string(),
        }];
        let out = postamble(&profile, &logsource, &mappings);
        assert_eq!(out, " | stats count by _time, host, CommandLine");
    }
}
