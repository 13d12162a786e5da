//! The Sigma rule AST produced by the loader/parser (C1).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Severity level of a Sigma rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// `logsource` block: at least one field must be present (enforced at parse time).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSource {
    pub product: Option<String>,
    pub service: Option<String>,
    pub category: Option<String>,
    pub definition: Option<String>,
}

impl LogSource {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product.is_none()
            && self.service.is_none()
            && self.category.is_none()
            && self.definition.is_none()
    }
}

/// A recognized Sigma field modifier, in the order it appeared after `|`.
///
/// Order matters: modifiers are folded left to right by the condition
/// compiler (C4), so `CommandLine|base64|contains` first base64-encodes the
/// value, then applies a contains match on the encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Contains,
    Startswith,
    Endswith,
    Re,
    Cidr,
    Base64,
    Base64offset,
    Wide,
    Utf16,
    All,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Recognized but currently a documented no-op (see DESIGN.md Open
    /// Question 1): every string match is case-insensitive regardless.
    Cased,
}

impl Modifier {
    /// Parse a single modifier token, or `None` for an unrecognized one —
    /// the caller turns that into `Error::UnknownModifier`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "contains" => Self::Contains,
            "startswith" => Self::Startswith,
            "endswith" => Self::Endswith,
            "re" => Self::Re,
            "cidr" => Self::Cidr,
            "base64" => Self::Base64,
            "base64offset" => Self::Base64offset,
            "wide" => Self::Wide,
            "utf16" => Self::Utf16,
            "all" => Self::All,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "cased" => Self::Cased,
            _ => return None,
        })
    }
}

/// A field reference split into its base name and ordered modifier chain,
/// e.g. `CommandLine|base64|contains` -> `{field: "CommandLine", modifiers:
/// [Base64, Contains]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub field: String,
    pub modifiers: Vec<Modifier>,
}

/// A scalar value in a Sigma detection mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SigmaValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<SigmaValue>),
}

/// A selection's body: an *implicit AND* over its field/value entries.
///
/// Preserves source order (`IndexMap`) so `1 of`/`all of` wildcard
/// expansion and emitted SPL terms are deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionMap {
    pub entries: Vec<(FieldRef, SigmaValue)>,
}

/// A selection value: either a single AND-mapping, or a list of them
/// (*implicit OR* between list elements).
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Map(SelectionMap),
    List(Vec<SelectionMap>),
}

/// The `detection` block: named selections plus the `condition` string.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub selections: IndexMap<String, Selection>,
    pub condition: String,
}

/// A fully parsed and validated Sigma rule.
#[derive(Debug, Clone)]
pub struct SigmaRule {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub level: Option<Level>,
    pub status: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub references: Vec<String>,
    pub tags: Vec<String>,
    pub logsource: LogSource,
    pub detection: Detection,
    pub fields: Vec<String>,
    pub falsepositives: Vec<String>,
}

impl SigmaRule {
    /// ATT&CK tags, i.e. tags of the form `attack.t\d+` or `attack.<tactic>`.
    #[must_use]
    pub fn attack_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| t.starts_with("attack."))
    }
}
