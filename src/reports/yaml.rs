//! YAML report generator. Same shape as the JSON reporter, for consumers
//! that prefer YAML output.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::model::ConversionResponse;

pub struct YamlReporter;

impl YamlReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for YamlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for YamlReporter {
    fn generate(&self, response: &ConversionResponse) -> Result<String, ReportError> {
        serde_yaml::to_string(response).map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Yaml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::tests_support::sample_response;

    #[test]
    fn renders_valid_yaml() {
        let reporter = YamlReporter::new();
        let out = reporter.generate(&sample_response()).unwrap();
        assert!(serde_yaml::from_str::<serde_yaml::Value>(&out).is_ok());
    }
}
