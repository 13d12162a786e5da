//! Report generation for conversion results.
//!
//! Three output formats, picked at the CLI boundary:
//! - JSON: structured data for programmatic integration
//! - YAML: same shape, for consumers that prefer it
//! - Summary: compact, human-readable shell output

mod json;
mod summary;
mod yaml;

pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use yaml::YamlReporter;

use thiserror::Error;

use crate::model::ConversionResponse;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Output format selector, named by the CLI's `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
    Summary,
}

impl ReportFormat {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "summary" | "text" => Some(Self::Summary),
            _ => None,
        }
    }
}

/// Renders a `ConversionResponse` in one output format.
pub trait ReportGenerator {
    fn generate(&self, response: &ConversionResponse) -> Result<String, ReportError>;
    fn format(&self) -> ReportFormat;
}

/// Pick the reporter for a format name, as the CLI does for its `--format`
/// flag.
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Yaml => Box::new(YamlReporter::new()),
        ReportFormat::Summary => Box::new(SummaryReporter::new()),
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use crate::model::{ConversionResponse, ConversionType, PrerequisiteReport};
    use chrono::Utc;

    pub(crate) fn sample_response() -> ConversionResponse {
        ConversionResponse {
            id: 1,
            name: "Mimikatz Credential Dump".to_string(),
            conversion_type: ConversionType::SigmaToSpl,
            profile_id: None,
            input_content: "title: test\n".to_string(),
            output_sigma: None,
            output_spl: Some(r#"search index=main CommandLine="*sekurlsa*""#.to_string()),
            prerequisites: PrerequisiteReport {
                required_logs: Vec::new(),
                event_ids: vec![1],
                channels: Vec::new(),
                configuration: Vec::new(),
                has_alternatives: false,
            },
            mappings: Vec::new(),
            gaps: Vec::new(),
            health_checks: Vec::new(),
            correlation_notes: Vec::new(),
            llm_used: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_format_names() {
        assert_eq!(ReportFormat::parse("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("yml"), Some(ReportFormat::Yaml));
        assert_eq!(ReportFormat::parse("bogus"), None);
    }
}
