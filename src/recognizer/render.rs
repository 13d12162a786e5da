//! Renders a `Query` back into a best-effort Sigma YAML document: one
//! `selection`/`selection_2`/... per top-level OR branch, an AND'd mapping of
//! field/modifier keys within each, and a `condition` built from the branch
//! names. Never a full round-trip of the original rule text — just enough to
//! let an analyst continue from it.

use crate::model::{Literal, LogSource, MatchOp, Query};

pub(super) struct Rendered {
    pub(super) sigma_yaml: String,
    pub(super) correlation_notes: Vec<String>,
}

pub(super) fn render_sigma(query: &Query, logsource: &LogSource, stats_fields: &[String]) -> Rendered {
    let mut notes = Vec::new();
    let branches: Vec<&Query> = match query {
        Query::Or(terms) => terms.iter().collect(),
        other => vec![other],
    };

    let mut yaml = String::new();
    yaml.push_str("title: Recovered from SPL\n");
    yaml.push_str("status: experimental\n");
    yaml.push_str("level: medium\n");
    yaml.push_str("logsource:\n");
    if let Some(p) = &logsource.product {
        yaml.push_str(&format!("  product: {p}\n"));
    }
    if let Some(c) = &logsource.category {
        yaml.push_str(&format!("  category: {c}\n"));
    }
    yaml.push_str("detection:\n");

    let mut selection_names = Vec::new();
    for (i, branch) in branches.iter().enumerate() {
        let name = if i == 0 {
            "selection".to_string()
        } else {
            format!("selection_{}", i + 1)
        };
        let mut entries = Vec::new();
        flatten(branch, &mut notes, &mut entries);
        yaml.push_str(&format!("  {name}:\n"));
        if entries.is_empty() {
            yaml.push_str("    {}\n");
        }
        for (field, modifier, value) in &entries {
            let key = if modifier.is_empty() {
                field.clone()
            } else {
                format!("{field}|{modifier}")
            };
            yaml.push_str(&format!("    {key}: {}\n", render_yaml_literal(value)));
        }
        selection_names.push(name);
    }
    yaml.push_str(&format!("  condition: {}\n", selection_names.join(" or ")));

    if !stats_fields.is_empty() {
        yaml.push_str("fields:\n");
        for f in stats_fields {
            yaml.push_str(&format!("  - {f}\n"));
        }
    }

    Rendered {
        sigma_yaml: yaml,
        correlation_notes: notes,
    }
}

/// Flatten a branch into `(field, modifier, value)` triples, assuming it's
/// the implicit-AND shape the emitter produces. Anything that doesn't fit —
/// a nested OR, a bare NOT — is dropped with a correlation note rather than
/// silently misrepresented.
fn flatten(query: &Query, notes: &mut Vec<String>, out: &mut Vec<(String, &'static str, Literal)>) {
    match query {
        Query::And(terms) => {
            for t in terms {
                flatten(t, notes, out);
            }
        }
        Query::Match(m) => out.push((m.field.clone(), modifier_for(&m.op), m.value.clone())),
        Query::NotExists(field) => out.push((field.clone(), "", Literal::Null)),
        Query::Or(terms) => {
            notes.push("an OR predicate nested inside an AND branch was flattened into one selection; verify manually".to_string());
            for t in terms {
                flatten(t, notes, out);
            }
        }
        Query::Not(inner) => {
            notes.push(format!(
                "a NOT predicate could not be reversed into Sigma syntax and was dropped: {inner:?}"
            ));
        }
    }
}

fn modifier_for(op: &MatchOp) -> &'static str {
    use crate::model::NumericOp;
    match op {
        MatchOp::Equals | MatchOp::In => "",
        MatchOp::Contains => "contains",
        MatchOp::StartsWith => "startswith",
        MatchOp::EndsWith => "endswith",
        MatchOp::Regex => "re",
        MatchOp::CidrIn => "cidr",
        MatchOp::NumericCmp(NumericOp::Lt) => "lt",
        MatchOp::NumericCmp(NumericOp::Lte) => "lte",
        MatchOp::NumericCmp(NumericOp::Gt) => "gt",
        MatchOp::NumericCmp(NumericOp::Gte) => "gte",
    }
}

fn render_yaml_literal(value: &Literal) -> String {
    match value {
        Literal::Null => "null".to_string(),
        Literal::Str(s) => s.clone(),
        Literal::Int(i) => i.to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::List(items) => format!(
            "[{}]",
            items.iter().map(render_yaml_literal).collect::<Vec<_>>().join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Match;

    fn m(field: &str, op: MatchOp, value: &str) -> Query {
        Query::Match(Match {
            field: field.to_string(),
            op,
            value: Literal::Str(value.to_string()),
            case_insensitive: true,
        })
    }

    #[test]
    fn single_and_branch_becomes_one_selection() {
        let q = Query::And(vec![
            m("CommandLine", MatchOp::Contains, "whoami"),
            m("Image", MatchOp::EndsWith, "cmd.exe"),
        ]);
        let rendered = render_sigma(&q, &LogSource::default(), &[]);
        assert!(rendered.sigma_yaml.contains("CommandLine|contains: whoami"));
        assert!(rendered.sigma_yaml.contains("Image|endswith: cmd.exe"));
        assert!(rendered.sigma_yaml.contains("condition: selection\n"));
        assert!(rendered.correlation_notes.is_empty());
    }

    #[test]
    fn or_branches_become_numbered_selections() {
        let q = Query::Or(vec![
            m("CommandLine", MatchOp::Contains, "a"),
            m("CommandLine", MatchOp::Contains, "b"),
        ]);
        let rendered = render_sigma(&q, &LogSource::default(), &[]);
        assert!(rendered.sigma_yaml.contains("selection:"));
        assert!(rendered.sigma_yaml.contains("selection_2:"));
        assert!(rendered.sigma_yaml.contains("condition: selection or selection_2\n"));
    }

    #[test]
    fn dropped_not_predicate_produces_a_note() {
        let q = Query::Not(Box::new(m("User", MatchOp::Equals, "SYSTEM")));
        let rendered = render_sigma(&q, &LogSource::default(), &[]);
        assert_eq!(rendered.correlation_notes.len(), 1);
    }
}
