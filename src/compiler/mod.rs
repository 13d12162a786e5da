//! Condition Compiler (C4): lowers a Sigma `detection` block into the
//! normalized `Query` AST, using the Field Resolver (C3) for every field
//! reference it touches.

mod transform;

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::model::{
    ConditionExpr, FieldRef, Literal, Match, MatchOp, MappingResult, Modifier, NumericOp, OfTarget,
    Profile, Quantifier, Query, Selection, SelectionMap, SigmaRule, SigmaValue,
};
use crate::parser::parse_condition;
use crate::resolver::Resolver;

/// Compile a rule's `detection` block against `profile`. Returns the query
/// AST plus every field resolution performed along the way, in AST order —
/// the gap analyzer (C7) consumes the latter directly.
pub fn compile(rule: &SigmaRule, profile: &Profile) -> Result<(Query, Vec<MappingResult>)> {
    tracing::debug!(title = %rule.title, profile = %profile.name, "compiling detection block");
    let path = "detection.condition";
    let expr = parse_condition(path, &rule.detection.condition)?;
    let expanded = expand_of(expr, &rule.detection.selections, path)?;

    let mut resolver = Resolver::new(profile, &rule.logsource);
    let mut mappings = Vec::new();
    let mut cache = HashMap::new();

    let query = compile_expr(
        &expanded,
        &rule.detection.selections,
        &mut resolver,
        &mut mappings,
        &mut cache,
    )?;
    Ok((query, mappings))
}

/// Rewrite every `Of(quantifier, target)` node into the `Or`/`And` it
/// denotes over matching selection names, before any field resolution runs
/// (spec step 4: "`1 of`/`all of` expansions happen before step 1").
fn expand_of(
    expr: ConditionExpr,
    selections: &IndexMap<String, Selection>,
    path: &str,
) -> Result<ConditionExpr> {
    match expr {
        ConditionExpr::Of(quantifier, target) => {
            let names = matching_selection_names(&target, selections, path)?;
            let terms: Vec<ConditionExpr> = names.into_iter().map(ConditionExpr::Selection).collect();
            Ok(match quantifier {
                Quantifier::One => ConditionExpr::Or(terms),
                Quantifier::All => ConditionExpr::And(terms),
            })
        }
        ConditionExpr::And(terms) => Ok(ConditionExpr::And(
            terms
                .into_iter()
                .map(|t| expand_of(t, selections, path))
                .collect::<Result<Vec<_>>>()?,
        )),
        ConditionExpr::Or(terms) => Ok(ConditionExpr::Or(
            terms
                .into_iter()
                .map(|t| expand_of(t, selections, path))
                .collect::<Result<Vec<_>>>()?,
        )),
        ConditionExpr::Not(inner) => Ok(ConditionExpr::Not(Box::new(expand_of(
            *inner, selections, path,
        )?))),
        selection @ ConditionExpr::Selection(_) => Ok(selection),
    }
}

fn matching_selection_names(
    target: &OfTarget,
    selections: &IndexMap<String, Selection>,
    path: &str,
) -> Result<Vec<String>> {
    match target {
        OfTarget::Them => Ok(selections.keys().cloned().collect()),
        OfTarget::Name(name) => {
            if selections.contains_key(name) {
                Ok(vec![name.clone()])
            } else {
                Err(Error::unresolved_selection(path, name))
            }
        }
        OfTarget::Prefix(prefix) => {
            let names: Vec<String> = selections
                .keys()
                .filter(|k| k.starts_with(prefix.as_str()))
                .cloned()
                .collect();
            if names.is_empty() {
                Err(Error::unresolved_selection(path, format!("{prefix}*")))
            } else {
                Ok(names)
            }
        }
    }
}

fn compile_expr(
    expr: &ConditionExpr,
    selections: &IndexMap<String, Selection>,
    resolver: &mut Resolver<'_>,
    mappings: &mut Vec<MappingResult>,
    cache: &mut HashMap<String, Query>,
) -> Result<Query> {
    match expr {
        ConditionExpr::Selection(name) => {
            compile_selection(name, selections, resolver, mappings, cache)
        }
        ConditionExpr::And(terms) => Ok(Query::and(
            terms
                .iter()
                .map(|t| compile_expr(t, selections, resolver, mappings, cache))
                .collect::<Result<Vec<_>>>()?,
        )),
        ConditionExpr::Or(terms) => Ok(Query::or(
            terms
                .iter()
                .map(|t| compile_expr(t, selections, resolver, mappings, cache))
                .collect::<Result<Vec<_>>>()?,
        )),
        ConditionExpr::Not(inner) => Ok(Query::Not(Box::new(compile_expr(
            inner, selections, resolver, mappings, cache,
        )?))),
        ConditionExpr::Of(..) => unreachable!("expand_of removes every Of node before compile_expr runs"),
    }
}

/// Compile a named selection, memoizing by name: a selection referenced
/// twice (e.g. by both a `condition` clause and an `of` expansion) is
/// resolved and reported once, at its first occurrence.
fn compile_selection(
    name: &str,
    selections: &IndexMap<String, Selection>,
    resolver: &mut Resolver<'_>,
    mappings: &mut Vec<MappingResult>,
    cache: &mut HashMap<String, Query>,
) -> Result<Query> {
    if let Some(cached) = cache.get(name) {
        return Ok(cached.clone());
    }
    let path = format!("detection.{name}");
    let selection = selections
        .get(name)
        .ok_or_else(|| Error::unresolved_selection(&path, name))?;

    let query = match selection {
        Selection::Map(map) => compile_selection_map(&path, map, resolver, mappings)?,
        Selection::List(maps) => {
            if maps.is_empty() {
                return Err(Error::invalid_sigma(&path, "empty selection"));
            }
            Query::or(
                maps.iter()
                    .enumerate()
                    .map(|(i, m)| compile_selection_map(&format!("{path}[{i}]"), m, resolver, mappings))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
    };
    cache.insert(name.to_string(), query.clone());
    Ok(query)
}

fn compile_selection_map(
    path: &str,
    map: &SelectionMap,
    resolver: &mut Resolver<'_>,
    mappings: &mut Vec<MappingResult>,
) -> Result<Query> {
    if map.entries.is_empty() {
        return Err(Error::invalid_sigma(path, "empty selection"));
    }
    let terms = map
        .entries
        .iter()
        .map(|(field_ref, value)| compile_entry(path, field_ref, value, resolver, mappings))
        .collect::<Result<Vec<_>>>()?;
    Ok(Query::and(terms))
}

fn compile_entry(
    path: &str,
    field_ref: &FieldRef,
    value: &SigmaValue,
    resolver: &mut Resolver<'_>,
    mappings: &mut Vec<MappingResult>,
) -> Result<Query> {
    let location = format!("{path}.{}", field_ref.field);
    let resolved = resolver.resolve(&field_ref.field, &location);
    let target_field = resolved.target_field.clone();
    mappings.push(resolved);

    let (op, list_mode) = classify_modifiers(&field_ref.modifiers);
    let terms: Vec<Query> = flatten_values(value)
        .into_iter()
        .map(|v| compile_value(&target_field, op.clone(), v, &field_ref.modifiers))
        .collect();

    Ok(match list_mode {
        ListMode::Or => Query::or(terms),
        ListMode::And => Query::and(terms),
    })
}

#[derive(Clone, Copy)]
enum ListMode {
    Or,
    And,
}

/// Fold the modifier chain into the resolved match operator and the
/// OR/AND relationship between list values. `base64`/`base64offset`/
/// `wide`/`utf16`/`cased` act on the value or are recognized no-ops, not on
/// `op`/list-mode, and are handled in `compile_value`.
fn classify_modifiers(modifiers: &[Modifier]) -> (MatchOp, ListMode) {
    let mut op = MatchOp::Equals;
    let mut list_mode = ListMode::Or;
    for m in modifiers {
        match m {
            Modifier::Contains => op = MatchOp::Contains,
            Modifier::Startswith => op = MatchOp::StartsWith,
            Modifier::Endswith => op = MatchOp::EndsWith,
            Modifier::Re => op = MatchOp::Regex,
            Modifier::Cidr => op = MatchOp::CidrIn,
            Modifier::Lt => op = MatchOp::NumericCmp(NumericOp::Lt),
            Modifier::Lte => op = MatchOp::NumericCmp(NumericOp::Lte),
            Modifier::Gt => op = MatchOp::NumericCmp(NumericOp::Gt),
            Modifier::Gte => op = MatchOp::NumericCmp(NumericOp::Gte),
            Modifier::All => list_mode = ListMode::And,
            Modifier::Base64 | Modifier::Base64offset | Modifier::Wide | Modifier::Utf16 | Modifier::Cased => {}
        }
    }
    (op, list_mode)
}

fn flatten_values(value: &SigmaValue) -> Vec<SigmaValue> {
    match value {
        SigmaValue::List(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Sigma `null` matches field-absence, regardless of operator or modifiers.
/// Otherwise apply the base64/wide encoding chain (string values only) and
/// build the `Match` node — `base64offset` fans out into its three
/// alignment variants, OR'd, since they are alternate encodings of the same
/// value rather than distinct list values.
fn compile_value(field: &str, op: MatchOp, value: SigmaValue, modifiers: &[Modifier]) -> Query {
    if matches!(value, SigmaValue::Null) {
        return Query::NotExists(field.to_string());
    }

    if let SigmaValue::Str(s) = &value {
        if modifiers.contains(&Modifier::Base64offset) {
            let terms = transform::base64_offset_variants(s)
                .into_iter()
                .map(|v| match_query(field, op.clone(), Literal::Str(v)))
                .collect();
            return Query::or(terms);
        }
        let mut encoded = s.clone();
        if modifiers.contains(&Modifier::Base64) {
            encoded = transform::base64_encode(&encoded);
        }
        if modifiers.contains(&Modifier::Wide) || modifiers.contains(&Modifier::Utf16) {
            encoded = transform::utf16le_hex(&encoded);
        }
        return match_query(field, op, Literal::Str(encoded));
    }

    match_query(field, op, sigma_value_to_literal(&value))
}

fn match_query(field: &str, op: MatchOp, value: Literal) -> Query {
    Query::Match(Match {
        field: field.to_string(),
        op,
        value,
        // Sigma strings compare case-insensitively by default; `|cased` is
        // recognized but a documented no-op (DESIGN.md Open Question 1).
        case_insensitive: true,
    })
}

fn sigma_value_to_literal(value: &SigmaValue) -> Literal {
    match value {
        SigmaValue::Null => Literal::Null,
        SigmaValue::Bool(b) => Literal::Bool(*b),
        SigmaValue::Int(i) => Literal::Int(*i),
        SigmaValue::Str(s) => Literal::Str(s.clone()),
        SigmaValue::List(items) => Literal::List(items.iter().map(sigma_value_to_literal).collect()),
    }
}
