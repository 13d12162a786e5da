//! In-memory Profile repository (C2).

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Mapping, Profile};
use crate::resolver;

#[derive(Default)]
pub struct ProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl ProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn list(&self) -> Vec<Profile> {
        self.profiles.read().expect("lock poisoned").clone()
    }

    pub fn get(&self, id: Uuid) -> Result<Profile> {
        self.profiles
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("profile {id}")))
    }

    pub fn get_by_name(&self, name: &str) -> Result<Profile> {
        self.profiles
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("profile '{name}'")))
    }

    #[must_use]
    pub fn default_profile(&self) -> Option<Profile> {
        self.profiles.read().expect("lock poisoned").iter().find(|p| p.is_default).cloned()
    }

    /// Insert a new profile, rejecting a duplicate name. The first profile
    /// ever created becomes the default regardless of its `is_default` flag.
    pub fn create(&self, mut profile: Profile) -> Result<Profile> {
        let mut profiles = self.profiles.write().expect("lock poisoned");
        if profiles.iter().any(|p| p.name == profile.name) {
            return Err(Error::conflict(format!("profile named '{}' already exists", profile.name)));
        }
        let make_default = profile.is_default || profiles.is_empty();
        profile.is_default = make_default;
        if make_default {
            for p in profiles.iter_mut() {
                p.is_default = false;
            }
        }
        profiles.push(profile.clone());
        Ok(profile)
    }

    pub fn update(&self, updated: Profile) -> Result<Profile> {
        let mut profiles = self.profiles.write().expect("lock poisoned");
        let idx = profiles
            .iter()
            .position(|p| p.id == updated.id)
            .ok_or_else(|| Error::not_found(format!("profile {}", updated.id)))?;
        profiles[idx] = updated.clone();
        Ok(updated)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        let mut profiles = self.profiles.write().expect("lock poisoned");
        let idx = profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::not_found(format!("profile {id}")))?;
        profiles.remove(idx);
        Ok(())
    }

    /// Atomically make `id` the sole default profile.
    pub fn set_default(&self, id: Uuid) -> Result<Profile> {
        let mut profiles = self.profiles.write().expect("lock poisoned");
        if !profiles.iter().any(|p| p.id == id) {
            return Err(Error::not_found(format!("profile {id}")));
        }
        for p in profiles.iter_mut() {
            p.is_default = p.id == id;
        }
        Ok(profiles.iter().find(|p| p.id == id).cloned().expect("checked above"))
    }

    fn with_profile<T>(&self, id: Uuid, f: impl FnOnce(&mut Profile) -> Result<T>) -> Result<T> {
        let mut profiles = self.profiles.write().expect("lock poisoned");
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found(format!("profile {id}")))?;
        let result = f(profile)?;
        profile.updated_at = chrono::Utc::now();
        Ok(result)
    }

    /// Append a single mapping rule, rejecting a duplicate `sigma_field`
    /// (spec §3: "`sigma_field` is unique within a profile").
    pub fn add_mapping(&self, id: Uuid, mapping: Mapping) -> Result<Profile> {
        self.with_profile(id, |profile| {
            if profile.find_mapping(&mapping.sigma_field).is_some() {
                return Err(Error::conflict(format!(
                    "profile {id} already has a mapping for '{}'",
                    mapping.sigma_field
                )));
            }
            profile.mappings.push(mapping);
            Ok(profile.clone())
        })
    }

    /// Remove the mapping for `sigma_field`, if any.
    pub fn remove_mapping(&self, id: Uuid, sigma_field: &str) -> Result<Profile> {
        self.with_profile(id, |profile| {
            let idx = profile
                .mappings
                .iter()
                .position(|m| m.sigma_field == sigma_field)
                .ok_or_else(|| Error::not_found(format!("mapping '{sigma_field}' on profile {id}")))?;
            profile.mappings.remove(idx);
            Ok(profile.clone())
        })
    }

    /// Replace every mapping rule on the profile with `mappings`, rejecting
    /// the batch outright if it contains a duplicate `sigma_field`.
    pub fn replace_mappings(&self, id: Uuid, mappings: Vec<Mapping>) -> Result<Profile> {
        reject_duplicate_sigma_fields(&mappings)?;
        self.with_profile(id, |profile| {
            profile.mappings = mappings;
            Ok(profile.clone())
        })
    }

    /// Merge `mappings` into the profile's existing rules: a `sigma_field`
    /// already present is overwritten in place (preserving its original
    /// position), everything else is appended.
    pub fn import_mappings(&self, id: Uuid, mappings: Vec<Mapping>) -> Result<Profile> {
        reject_duplicate_sigma_fields(&mappings)?;
        self.with_profile(id, |profile| {
            for incoming in mappings {
                match profile.mappings.iter().position(|m| m.sigma_field == incoming.sigma_field) {
                    Some(idx) => profile.mappings[idx] = incoming,
                    None => profile.mappings.push(incoming),
                }
            }
            Ok(profile.clone())
        })
    }

    /// C2's `suggest`: heuristic CIM-only field-name suggestions, empty
    /// unless the profile has `cim_enabled`.
    pub fn suggest(&self, id: Uuid, sigma_fields: &[String]) -> Result<HashMap<String, String>> {
        let profile = self.get(id)?;
        Ok(resolver::suggest_cim_fields(&profile, sigma_fields))
    }
}

fn reject_duplicate_sigma_fields(mappings: &[Mapping]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for mapping in mappings {
        if !seen.insert(mapping.sigma_field.as_str()) {
            return Err(Error::conflict(format!("duplicate mapping for '{}' in batch", mapping.sigma_field)));
        }
    }
    Ok(())
}
