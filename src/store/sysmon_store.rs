//! In-memory Sysmon configuration repository (C2). At most one config is
//! ever `is_active`; `activate` flips the set atomically under one guard.

use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::SysmonConfig;

#[derive(Default)]
pub struct SysmonStore {
    configs: RwLock<Vec<SysmonConfig>>,
}

impl SysmonStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn list(&self) -> Vec<SysmonConfig> {
        self.configs.read().expect("lock poisoned").clone()
    }

    pub fn get(&self, id: Uuid) -> Result<SysmonConfig> {
        self.configs
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("sysmon config {id}")))
    }

    #[must_use]
    pub fn active(&self) -> Option<SysmonConfig> {
        self.configs.read().expect("lock poisoned").iter().find(|c| c.is_active).cloned()
    }

    pub fn create(&self, config: SysmonConfig) -> Result<SysmonConfig> {
        let mut configs = self.configs.write().expect("lock poisoned");
        if configs.iter().any(|c| c.name == config.name) {
            return Err(Error::conflict(format!("sysmon config named '{}' already exists", config.name)));
        }
        configs.push(config.clone());
        Ok(config)
    }

    /// Atomically make `id` the sole active configuration.
    pub fn activate(&self, id: Uuid) -> Result<SysmonConfig> {
        let mut configs = self.configs.write().expect("lock poisoned");
        if !configs.iter().any(|c| c.id == id) {
            return Err(Error::not_found(format!("sysmon config {id}")));
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
        let store = SysmonStore::new();
        let a = store.create(SysmonConfig::new("a", "14.16")).unwrap();
        let b = store.create(SysmonConfig::new("b", "14.16")).unwrap();
        store.activate(a.id).unwrap();
        store.activate(b.id).unwrap();
        assert!(!store.get(a.id).unwrap().is_active);
        assert!(store.get(b.id).unwrap().is_active);
    }

    #[test]
    fn no_active_config_initially() {
        let store = SysmonStore::new();
        store.create(SysmonConfig::new("a", "14.16")).unwrap();
        assert!(store.active().is_none());
    }
}
