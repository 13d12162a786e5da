//! Windows audit policy configuration state (consulted by C8).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AuditSubcategory {
    pub success: bool,
    pub failure: bool,
}

impl AuditSubcategory {
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.success || self.failure
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub id: Uuid,
    pub name: String,
    /// category -> subcategory name -> flags.
    pub categories: IndexMap<String, IndexMap<String, AuditSubcategory>>,
    pub is_active: bool,
}

impl AuditConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            categories: IndexMap::new(),
            is_active: false,
        }
    }

    /// True if the named subcategory exists anywhere and has success or
    /// failure auditing turned on.
    #[must_use]
    pub fn is_subcategory_enabled(&self, subcategory: &str) -> bool {
        self.categories
            .values()
            .filter_map(|subs| subs.get(subcategory))
            .any(|flags| flags.is_enabled())
    }
}
