//! Summary report generator for shell output: a compact, human-readable
//! digest of a conversion result.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::model::{ConversionResponse, ConversionType};

fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if !colored {
        return text.to_string();
    }
    match color {
        "red" => format!("\x1b[31m{text}\x1b[0m"),
        "green" => format!("\x1b[32m{text}\x1b[0m"),
        "yellow" => format!("\x1b[33m{text}\x1b[0m"),
        "cyan" => format!("\x1b[36m{text}\x1b[0m"),
        "bold" => format!("\x1b[1m{text}\x1b[0m"),
        _ => text.to_string(),
    }
}

pub struct SummaryReporter {
    colored: bool,
}

impl SummaryReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(&self, response: &ConversionResponse) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        let kind = match response.conversion_type {
            ConversionType::SigmaToSpl => "Sigma -> SPL",
            ConversionType::SplToSigma => "SPL -> Sigma",
            ConversionType::TextToSigma => "Text -> Sigma",
        };
        lines.push(self.color(&format!("{kind}: {}", response.name), "bold"));

        if let Some(spl) = &response.output_spl {
            lines.push(format!("  {}", self.color("SPL:", "cyan")));
            lines.push(format!("    {spl}"));
        }
        if let Some(sigma) = &response.output_sigma {
            lines.push(format!("  {}", self.color("Sigma:", "cyan")));
            for line in sigma.lines() {
                lines.push(format!("    {line}"));
            }
        }

        if !response.prerequisites.event_ids.is_empty() {
            lines.push(format!(
                "  {} {:?}",
                self.color("Required event IDs:", "yellow"),
                response.prerequisites.event_ids
            ));
        }

        if response.gaps.is_empty() {
            lines.push(format!("  {}", self.color("Gaps: none", "green")));
        } else {
            lines.push(format!("  {} {}", self.color("Gaps:", "red"), response.gaps.len()));
            for gap in &response.gaps {
                lines.push(format!("    - {} ({})", gap.field, gap.impact));
            }
        }

        for note in &response.correlation_notes {
            lines.push(format!("  {} {note}", self.color("note:", "yellow")));
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::tests_support::sample_response;

    #[test]
    fn renders_headline_and_spl() {
        let reporter = SummaryReporter::new().no_color();
        let out = reporter.generate(&sample_response()).unwrap();
        assert!(out.contains("Sigma -> SPL"));
        assert!(out.contains("sekurlsa"));
        assert!(out.contains("Gaps: none"));
    }
}
