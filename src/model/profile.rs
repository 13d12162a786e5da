//! Field-mapping profiles (C2 data model).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named function applied to a resolved value at emit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Lower,
    Upper,
    Basename,
    StripQuotes,
    CidrToSubnet,
}

impl Transform {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "lower" => Self::Lower,
            "upper" => Self::Upper,
            "basename" => Self::Basename,
            "strip_quotes" => Self::StripQuotes,
            "cidr_to_subnet" => Self::CidrToSubnet,
            _ => return None,
        })
    }

    /// Apply the transform. Pure; never fails — an input the transform does
    /// not understand passes through unchanged.
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Lower => value.to_lowercase(),
            Self::Upper => value.to_uppercase(),
            Self::Basename => value
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or(value)
                .to_string(),
            Self::StripQuotes => value.trim_matches('"').to_string(),
            Self::CidrToSubnet => value.split('/').next().unwrap_or(value).to_string(),
        }
    }
}

/// A single field mapping rule within a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    pub sigma_field: String,
    pub target_field: String,
    pub transform: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl Mapping {
    #[must_use]
    pub fn new(sigma_field: impl Into<String>, target_field: impl Into<String>) -> Self {
        Self {
            sigma_field: sigma_field.into(),
            target_field: target_field.into(),
            transform: None,
            category: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }
}

/// A named field-mapping profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub default_index: Option<String>,
    pub default_sourcetype: Option<String>,
    pub cim_enabled: bool,
    pub is_default: bool,
    /// SPL macro expansions, keyed by logsource category.
    pub macros: IndexMap<String, String>,
    /// Open Question 2 resolution: per semantic role (e.g. "user") the
    /// preferred CIM target field, disambiguating e.g. `user` vs
    /// `src_user` vs `dest_user` at the profile level instead of
    /// hard-coding a single choice in the built-in CIM table.
    pub cim_preferences: IndexMap<String, String>,
    /// Ordered mapping rules; `sigma_field` is unique within a profile.
    pub mappings: Vec<Mapping>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            default_index: None,
            default_sourcetype: None,
            cim_enabled: false,
            is_default: false,
            macros: IndexMap::new(),
            cim_preferences: IndexMap::new(),
            mappings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a mapping by exact, case-sensitive `sigma_field` name.
    #[must_use]
    pub fn find_mapping(&self, sigma_field: &str) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.sigma_field == sigma_field)
    }
}
