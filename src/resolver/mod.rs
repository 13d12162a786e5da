//! Field Resolver (C3).
//!
//! Modeled as a tagged resolution strategy chain (spec §9): a plain ordered
//! sequence of layers evaluated in turn, not virtual dispatch — the same
//! shape as a fuzzy-matching layered strategy, generalized from component
//! identity matching to field-name resolution.

mod builtin;
mod cim;

use std::collections::HashMap;

use crate::model::{LogSource, MappingResult, Profile, ResolutionStatus, Transform};

/// Resolves Sigma field names against a fixed `(profile, logsource)`
/// context. Deterministic; the per-request memo table is an optimization,
/// not a correctness requirement (spec §4.3: "no global cache between
/// requests").
pub struct Resolver<'a> {
    profile: &'a Profile,
    logsource: &'a LogSource,
    memo: HashMap<String, MappingResult>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(profile: &'a Profile, logsource: &'a LogSource) -> Self {
        Self {
            profile,
            logsource,
            memo: HashMap::new(),
        }
    }

    /// Resolve `sigma_field`, recording `location` (a dotted AST path) on
    /// the result for the gap analyzer (C7) to use verbatim.
    pub fn resolve(&mut self, sigma_field: &str, location: &str) -> MappingResult {
        if let Some(cached) = self.memo.get(sigma_field) {
            let mut result = cached.clone();
            result.location = location.to_string();
            return result;
        }
        let result = self.resolve_uncached(sigma_field, location);
        self.memo.insert(sigma_field.to_string(), result.clone());
        result
    }

    fn resolve_uncached(&self, sigma_field: &str, location: &str) -> MappingResult {
        // Layer 1: exact profile mapping. An unrecognized transform name
        // demotes the result to `suggested` rather than failing outright.
        if let Some(mapping) = self.profile.find_mapping(sigma_field) {
            let (status, note) = match &mapping.transform {
                Some(name) if Transform::parse(name).is_none() => (
                    ResolutionStatus::Suggested,
                    Some(format!("unknown transform '{name}'; using raw target")),
                ),
                _ => (ResolutionStatus::Ok, None),
            };
            return MappingResult {
                sigma_field: sigma_field.to_string(),
                target_field: mapping.target_field.clone(),
                status,
                transform: mapping.transform.clone(),
                note,
                location: location.to_string(),
            };
        }

        // Layer 2: CIM table, if enabled. Profile-level role preference
        // (Open Question 2) overrides the table's own default.
        if self.profile.cim_enabled {
            if let Some(preferred) = self.profile.cim_preferences.get(sigma_field) {
                return MappingResult {
                    sigma_field: sigma_field.to_string(),
                    target_field: preferred.clone(),
                    status: ResolutionStatus::Suggested,
                    transform: None,
                    note: Some("profile CIM preference".to_string()),
                    location: location.to_string(),
                };
            }
            if let Some(target) = cim::lookup_default(self.logsource, sigma_field) {
                return MappingResult {
                    sigma_field: sigma_field.to_string(),
                    target_field: target.to_string(),
                    status: ResolutionStatus::Suggested,
                    transform: None,
                    note: Some("CIM default".to_string()),
                    location: location.to_string(),
                };
            }
        }

        // Layer 3: built-in Windows process-creation defaults.
        if let Some(target) = builtin::lookup(sigma_field) {
            return MappingResult {
                sigma_field: sigma_field.to_string(),
                target_field: target.to_string(),
                status: ResolutionStatus::Suggested,
                transform: None,
                note: Some("built-in default".to_string()),
                location: location.to_string(),
            };
        }

        // Layer 4: identity fallback.
        MappingResult {
            sigma_field: sigma_field.to_string(),
            target_field: sigma_field.to_string(),
            status: ResolutionStatus::Missing,
            transform: None,
            note: None,
            location: location.to_string(),
        }
    }
}

/// C2's `suggest(profile_id, [sigma_field])`: heuristic CIM-only lookup,
/// independent of any logsource context. Empty unless `profile.cim_enabled`.
/// A profile-level `cim_preferences` entry wins over the built-in table.
#[must_use]
pub fn suggest_cim_fields(profile: &Profile, sigma_fields: &[String]) -> HashMap<String, String> {
    if !profile.cim_enabled {
        return HashMap::new();
    }
    sigma_fields
        .iter()
        .filter_map(|field| {
            let target = profile
                .cim_preferences
                .get(field)
                .cloned()
                .or_else(|| cim::lookup_any(field).map(str::to_string))?;
            Some((field.clone(), target))
        })
        .collect()
}

/// Every Sigma field name the built-in tables (CIM + Windows defaults)
/// recognize, for the gap analyzer's (C7) similar-name suggestions.
#[must_use]
pub fn known_sigma_fields() -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = builtin::known_fields().to_vec();
    fields.extend(cim::known_fields());
    fields.sort_unstable();
    fields.dedup();
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mapping;

    #[test]
    fn profile_mapping_wins_over_cim_and_builtin() {
        let mut profile = Profile::new("p");
        profile.cim_enabled = true;
        profile.mappings.push(Mapping::new("Image", "proc_name"));
        let ls = LogSource {
            category: Some("process_creation".into()),
            ..Default::default()
        };
        let mut resolver = Resolver::new(&profile, &ls);
        let result = resolver.resolve("Image", "detection.selection.Image");
        assert_eq!(result.target_field, "proc_name");
        assert_eq!(result.status, ResolutionStatus::Ok);
    }

    #[test]
    fn cim_suggested_when_enabled_and_no_profile_mapping() {
        let mut profile = Profile::new("p");
        profile.cim_enabled = true;
        let ls = LogSource {
            category: Some("process_creation".into()),
            ..Default::default()
        };
        let mut resolver = Resolver::new(&profile, &ls);
        let result = resolver.resolve("Image", "loc");
        assert_eq!(result.target_field, "process");
        assert_eq!(result.status, ResolutionStatus::Suggested);
    }

    #[test]
    fn builtin_default_when_cim_disabled() {
        let profile = Profile::new("p");
        let ls = LogSource::default();
        let mut resolver = Resolver::new(&profile, &ls);
        let result = resolver.resolve("CommandLine", "loc");
        assert_eq!(result.target_field, "CommandLine");
        assert_eq!(result.status, ResolutionStatus::Suggested);
    }

    #[test]
    fn identity_fallback_is_missing() {
        let profile = Profile::new("p");
        let ls = LogSource::default();
        let mut resolver = Resolver::new(&profile, &ls);
        let result = resolver.resolve("FakeField", "loc");
        assert_eq!(result.target_field, "FakeField");
        assert_eq!(result.status, ResolutionStatus::Missing);
    }

    #[test]
    fn unknown_transform_name_is_suggested_not_ok() {
        let mut profile = Profile::new("p");
        profile.mappings.push(Mapping::new("Image", "process_path").with_transform("reverse"));
        let ls = LogSource::default();
        let mut resolver = Resolver::new(&profile, &ls);
        let result = resolver.resolve("Image", "loc");
        assert_eq!(result.status, ResolutionStatus::Suggested);
        assert_eq!(result.target_field, "process_path");
        assert!(result.note.unwrap().contains("unknown transform"));
    }

    #[test]
    fn known_transform_name_stays_ok() {
        let mut profile = Profile::new("p");
        profile.mappings.push(Mapping::new("Image", "process_path").with_transform("lower"));
        let ls = LogSource::default();
        let mut resolver = Resolver::new(&profile, &ls);
        let result = resolver.resolve("Image", "loc");
        assert_eq!(result.status, ResolutionStatus::Ok);
        assert!(result.note.is_none());
    }

    #[test]
    fn suggest_is_empty_when_cim_disabled() {
        let profile = Profile::new("p");
        let result = suggest_cim_fields(&profile, &["Image".to_string()]);
        assert!(result.is_empty());
    }

    #[test]
    fn suggest_returns_cim_targets_when_enabled() {
        let mut profile = Profile::new("p");
        profile.cim_enabled = true;
        let result = suggest_cim_fields(&profile, &["Image".to_string(), "User".to_string(), "NoSuchField".to_string()]);
        assert_eq!(result.get("Image"), Some(&"process".to_string()));
        assert_eq!(result.get("User"), Some(&"user".to_string()));
        assert!(!result.contains_key("NoSuchField"));
    }

    #[test]
    fn suggest_prefers_profile_cim_preference() {
        let mut profile = Profile::new("p");
        profile.cim_enabled = true;
        profile.cim_preferences.insert("User".to_string(), "src_user".to_string());
        let result = suggest_cim_fields(&profile, &["User".to_string()]);
        assert_eq!(result.get("User"), Some(&"src_user".to_string()));
    }

    #[test]
    fn resolution_is_deterministic_across_calls() {
        let profile = Profile::new("p");
        let ls = LogSource::default();
        let mut resolver = Resolver::new(&profile, &ls);
        let a = resolver.resolve("CommandLine", "loc1");
        let b = resolver.resolve("CommandLine", "loc2");
        assert_eq!(a.target_field, b.target_field);
        assert_eq!(a.status, b.status);
    }
}
