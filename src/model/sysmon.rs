//! Sysmon configuration state (consulted by the coverage checker, C8).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysmonRule {
    pub event_id: u32,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysmonConfig {
    pub id: Uuid,
    pub name: String,
    pub version: String,
    pub schema_version: String,
    pub enabled_event_ids: BTreeSet<u32>,
    pub disabled_event_ids: BTreeSet<u32>,
    pub rules: Vec<SysmonRule>,
    pub is_active: bool,
}

impl SysmonConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            version: version.into(),
            schema_version: "4.90".to_string(),
            enabled_event_ids: BTreeSet::new(),
            disabled_event_ids: BTreeSet::new(),
            rules: Vec::new(),
            is_active: false,
        }
    }
}
