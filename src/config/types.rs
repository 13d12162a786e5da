//! Configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration, aggregating every ambient concern
/// that isn't part of a single conversion request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub emitter: EmitterDefaults,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Overlay `other` on top of `self`: any non-default field in `other`
    /// wins. Used to apply CLI overrides on top of a loaded config file.
    pub fn merge(&mut self, other: &Self) {
        if other.logging.level != LoggingConfig::default().level {
            self.logging.level = other.logging.level.clone();
        }
        if other.store.seed_file.is_some() {
            self.store.seed_file = other.store.seed_file.clone();
        }
        if other.emitter.default_index.is_some() {
            self.emitter.default_index = other.emitter.default_index.clone();
        }
        if other.emitter.default_sourcetype.is_some() {
            self.emitter.default_sourcetype = other.emitter.default_sourcetype.clone();
        }
    }
}

/// `tracing`/`tracing-subscriber` verbosity, expressed as an `EnvFilter`
/// directive string (e.g. `"info"`, `"sigma_translate=debug"`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Optional seed data for the in-memory profile/Sysmon/audit stores, loaded
/// once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StoreConfig {
    pub seed_file: Option<PathBuf>,
}

/// Fallback index/sourcetype used by the emitter when neither the request
/// nor the active profile specifies one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmitterDefaults {
    pub default_index: Option<String>,
    pub default_sourcetype: Option<String>,
}

/// Fluent builder for `AppConfig`, mirroring CLI flag wiring.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn seed_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.store.seed_file = file;
        self
    }

    pub fn default_index(mut self, index: Option<String>) -> Self {
        self.config.emitter.default_index = index;
        self
    }

    pub fn default_sourcetype(mut self, sourcetype: Option<String>) -> Self {
        self.config.emitter.default_sourcetype = sourcetype;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_requested_fields_and_leaves_rest_default() {
        let config = AppConfig::builder().log_level("debug").build();
        assert_eq!(config.logging.level, "debug");
        assert!(config.store.seed_file.is_none());
    }

    #[test]
    fn merge_overlays_non_default_fields() {
        let mut base = AppConfig::default();
        let override_cfg = AppConfig::builder().log_level("trace").build();
        base.merge(&override_cfg);
        assert_eq!(base.logging.level, "trace");
    }
}
