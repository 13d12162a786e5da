//! JSON report generator.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::model::ConversionResponse;

pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, response: &ConversionResponse) -> Result<String, ReportError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(response)
        } else {
            serde_json::to_string(response)
        };
        result.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::tests_support::sample_response;

    #[test]
    fn renders_valid_json() {
        let reporter = JsonReporter::new();
        let out = reporter.generate(&sample_response()).unwrap();
        assert!(out.contains("\"name\""));
        assert!(serde_json::from_str::<serde_json::Value>(&out).is_ok());
    }
}
