//! Application configuration: logging level, an optional store seed file,
//! and emitter defaults. Loaded from CLI args or a `.sigma-translate.yaml`
//! file, with CLI taking precedence.

mod file;
mod types;

pub use file::{discover_config_file, load_config_file, load_or_default, ConfigFileError};
pub use types::{AppConfig, AppConfigBuilder, EmitterDefaults, LoggingConfig, StoreConfig};

/// Generate the JSON Schema for `AppConfig`, surfaced by `cli config-schema`.
#[must_use]
pub fn generate_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(AppConfig)
}
