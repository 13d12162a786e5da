//! In-memory Windows audit-policy configuration repository (C2). Mirrors
//! `SysmonStore`'s single-active-record invariant.

use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::AuditConfig;

#[derive(Default)]
pub struct AuditStore {
    configs: RwLock<Vec<AuditConfig>>,
}

impl AuditStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn list(&self) -> Vec<AuditConfig> {
        self.configs.read().expect("lock poisoned").clone()
    }

    pub fn get(&self, id: Uuid) -> Result<AuditConfig> {
        self.configs
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("audit config {id}")))
    }

    #[must_use]
    pub fn active(&self) -> Option<AuditConfig> {
        self.configs.read().expect("lock poisoned").iter().find(|c| c.is_active).cloned()
    }

    pub fn create(&self, config: AuditConfig) -> Result<AuditConfig> {
        let mut configs = self.configs.write().expect("lock poisoned");
        if configs.iter().any(|c| c.name == config.name) {
            return Err(Error::conflict(format!("audit config named '{}' already exists", config.name)));
        }
        configs.push(config.clone());
        Ok(config)
    }

    /// Atomically make `id` the sole active configuration.
    pub fn activate(&self, id: Uuid) -> Result<AuditConfig> {
        let mut configs = self.configs.write().expect("lock poisoned");
        if !configs.iter().any(|c| c.id == id) {
            return Err(Error::not_found(format!("audit config {id}")));
        }
        for c in configs.iter_mut() {
            c.is_active = c.id == id;
        }
        Ok(configs.iter().find(|c| c.id == id).cloned().expect("checked above"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_demotes_previously_active_config() {
        let store = AuditStore::new();
        let a = store.create(AuditConfig::new("a")).unwrap();
        let b = store.create(AuditConfig::new("b")).unwrap();
        store.activate(a.id).unwrap();
        store.activate(b.id).unwrap();
        assert!(!store.get(a.id).unwrap().is_active);
        assert!(store.get(b.id).unwrap().is_active);
    }
}
