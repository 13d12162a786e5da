//! Sigma YAML loading (C1): generic document -> projected, typed AST.
//!
//! Per spec §9 ("Dynamic YAML"): accept a generic `serde_yaml::Value` at the
//! boundary, immediately project onto the closed `SigmaRule` type, and
//! reject anything malformed so the rest of the crate only ever sees closed
//! types.

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::model::{
    Detection, Level, LogSource, Selection, SelectionMap, SigmaRule, SigmaValue,
};

use super::field::parse_field_ref;

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &[
    "id",
    "title",
    "description",
    "level",
    "status",
    "author",
    "date",
    "modified",
    "references",
    "tags",
    "logsource",
    "detection",
    "fields",
    "falsepositives",
    "related",
];

/// Parse Sigma YAML text into a validated `SigmaRule`.
pub fn parse_sigma_yaml(text: &str) -> Result<SigmaRule> {
    let doc: Value = serde_yaml::from_str(text)?;
    let mapping = doc
        .as_mapping()
        .ok_or_else(|| Error::invalid_sigma("$", "top-level document must be a mapping"))?;

    for key in mapping.keys() {
        if let Some(key) = key.as_str() {
            if !KNOWN_TOP_LEVEL_KEYS.contains(&key) {
                tracing::warn!(key, "unknown top-level Sigma key; accepting document");
            }
        }
    }

    let title = str_field(mapping, "title")
        .ok_or_else(|| Error::invalid_sigma("title", "required field `title` missing"))?
        .to_string();

    let logsource_value = mapping
        .get("logsource")
        .ok_or_else(|| Error::invalid_sigma("logsource", "required field `logsource` missing"))?;
    let logsource = parse_logsource(logsource_value)?;
    if logsource.is_empty() {
        return Err(Error::invalid_sigma(
            "logsource",
            "at least one of product/service/category/definition must be present",
        ));
    }

    let detection_value = mapping
        .get("detection")
        .ok_or_else(|| Error::invalid_sigma("detection", "required field `detection` missing"))?;
    let detection_mapping = detection_value
        .as_mapping()
        .ok_or_else(|| Error::invalid_sigma("detection", "`detection` must be a mapping"))?;
    let detection = parse_detection(detection_mapping)?;
    if detection.condition.trim().is_empty() {
        return Err(Error::invalid_sigma(
            "detection.condition",
            "required field `condition` missing",
        ));
    }

    Ok(SigmaRule {
        id: str_field(mapping, "id").map(str::to_string),
        title,
        description: str_field(mapping, "description").map(str::to_string),
        level: str_field(mapping, "level").and_then(parse_level),
        status: str_field(mapping, "status").map(str::to_string),
        author: str_field(mapping, "author").map(str::to_string),
        date: str_field(mapping, "date").map(str::to_string),
        references: string_seq(mapping, "references"),
        tags: string_seq(mapping, "tags"),
        logsource,
        detection,
        fields: string_seq(mapping, "fields"),
        falsepositives: string_seq(mapping, "falsepositives"),
    })
}

fn parse_level(s: &str) -> Option<Level> {
    Some(match s {
        "informational" => Level::Informational,
        "low" => Level::Low,
        "medium" => Level::Medium,
        "high" => Level::High,
        "critical" => Level::Critical,
        _ => return None,
    })
}

fn str_field<'a>(mapping: &'a serde_yaml::Mapping, key: &str) -> Option<&'a str> {
    mapping.get(key).and_then(Value::as_str)
}

fn string_seq(mapping: &serde_yaml::Mapping, key: &str) -> Vec<String> {
    mapping
        .get(key)
        .and_then(Value::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_logsource(value: &Value) -> Result<LogSource> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| Error::invalid_sigma("logsource", "`logsource` must be a mapping"))?;
    Ok(LogSource {
        product: str_field(mapping, "product").map(str::to_string),
        service: str_field(mapping, "service").map(str::to_string),
        category: str_field(mapping, "category").map(str::to_string),
        definition: str_field(mapping, "definition").map(str::to_string),
    })
}

fn parse_detection(mapping: &serde_yaml::Mapping) -> Result<Detection> {
    let mut selections = IndexMap::new();
    let mut condition = String::new();

    for (key, value) in mapping {
        let key = key
            .as_str()
            .ok_or_else(|| Error::invalid_sigma("detection", "non-string detection key"))?;
        if key == "condition" {
            condition = value
                .as_str()
                .ok_or_else(|| Error::invalid_sigma("detection.condition", "must be a string"))?
                .to_string();
            continue;
        }
        let path = format!("detection.{key}");
        let selection = parse_selection(&path, value)?;
        selections.insert(key.to_string(), selection);
    }

    Ok(Detection {
        selections,
        condition,
    })
}

fn parse_selection(path: &str, value: &Value) -> Result<Selection> {
    match value {
        Value::Mapping(m) => Ok(Selection::Map(parse_selection_map(path, m)?)),
        Value::Sequence(seq) => {
            if seq.is_empty() {
                return Err(Error::invalid_sigma(path, "empty selection"));
            }
            let mut maps = Vec::with_capacity(seq.len());
            for (i, item) in seq.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                let m = item
                    .as_mapping()
                    .ok_or_else(|| Error::invalid_sigma(&item_path, "list item must be a mapping"))?;
                maps.push(parse_selection_map(&item_path, m)?);
            }
            Ok(Selection::List(maps))
        }
        _ => Err(Error::invalid_sigma(
            path,
            "selection must be a mapping or a list of mappings",
        )),
    }
}

fn parse_selection_map(path: &str, mapping: &serde_yaml::Mapping) -> Result<SelectionMap> {
    if mapping.is_empty() {
        return Err(Error::invalid_sigma(path, "empty selection"));
    }
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let raw_field = key
            .as_str()
            .ok_or_else(|| Error::invalid_sigma(path, "non-string field key"))?;
        let field_ref = parse_field_ref(path, raw_field)?;
        entries.push((field_ref, yaml_to_sigma_value(value)));
    }
    Ok(SelectionMap { entries })
}

fn yaml_to_sigma_value(value: &Value) -> SigmaValue {
    match value {
        Value::Null => SigmaValue::Null,
        Value::Bool(b) => SigmaValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SigmaValue::Int(i)
            } else {
                SigmaValue::Str(n.to_string())
            }
        }
        Value::String(s) => SigmaValue::Str(s.clone()),
        Value::Sequence(seq) => SigmaValue::List(seq.iter().map(yaml_to_sigma_value).collect()),
        // Nested mappings are not valid Sigma selection values; represent
        // opaquely so validation downstream can still produce a message.
        Value::Mapping(_) | Value::Tagged(_) => SigmaValue::Str(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIMIKATZ: &str = r#"
title: Mimikatz
logsource: {category: process_creation, product: windows}
detection:
  selection: {CommandLine|contains: ['sekurlsa::logonpasswords','lsadump::sam']}
  condition: selection
level: critical
"#;

    #[test]
    fn parses_mimikatz_rule() {
        let rule = parse_sigma_yaml(MIMIKATZ).unwrap();
        assert_eq!(rule.title, "Mimikatz");
        assert_eq!(rule.logsource.category.as_deref(), Some("process_creation"));
        assert_eq!(rule.detection.condition, "selection");
        assert!(rule.detection.selections.contains_key("selection"));
        assert_eq!(rule.level, Some(Level::Critical));
    }

    #[test]
    fn rejects_missing_title() {
        let text = "logsource: {product: windows}\ndetection:\n  selection: {A: b}\n  condition: selection\n";
        let err = parse_sigma_yaml(text).unwrap_err();
        assert!(matches!(err, Error::InvalidSigma { .. }));
    }

    #[test]
    fn rejects_empty_logsource() {
        let text = "title: t\nlogsource: {}\ndetection:\n  selection: {A: b}\n  condition: selection\n";
        assert!(parse_sigma_yaml(text).is_err());
    }

    #[test]
    fn rejects_unknown_modifier() {
        let text = "title: t\nlogsource: {product: windows}\ndetection:\n  selection: {A|bogus: b}\n  condition: selection\n";
        let err = parse_sigma_yaml(text).unwrap_err();
        assert!(matches!(err, Error::UnknownModifier { .. }));
    }

    #[test]
    fn accepts_unknown_top_level_key_with_warning() {
        let text = "title: t\nextra_vendor_key: whatever\nlogsource: {product: windows}\ndetection:\n  selection: {A: b}\n  condition: selection\n";
        assert!(parse_sigma_yaml(text).is_ok());
    }

    #[test]
    fn parses_list_selection_as_implicit_or() {
        let text = "title: t\nlogsource: {product: windows}\ndetection:\n  selection:\n    - {A: b}\n    - {C: d}\n  condition: selection\n";
        let rule = parse_sigma_yaml(text).unwrap();
        match rule.detection.selections.get("selection").unwrap() {
            Selection::List(maps) => assert_eq!(maps.len(), 2),
            Selection::Map(_) => panic!("expected list selection"),
        }
    }
}
