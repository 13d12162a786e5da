//! Orchestrator (C10): the three library entry points a caller actually
//! drives — `sigma_to_spl`, `spl_to_sigma`, `text_to_sigma` — each wiring
//! the parser/resolver/compiler/emitter/prereq/gaps/coverage/recognizer
//! pipeline against the process-wide stores and recording the result.

use uuid::Uuid;

use crate::compiler;
use crate::coverage;
use crate::emitter::{self, EmitOptions};
use crate::error::{Error, Result};
use crate::gaps;
use crate::llm::LlmAdapter;
use crate::model::{ConversionRecord, ConversionResponse, ConversionType, LogSource, PrerequisiteReport, Profile};
use crate::parser;
use crate::prereq;
use crate::recognizer;
use crate::store::{AuditStore, HistoryStore, ProfileStore, SysmonStore};

pub struct Orchestrator<'a> {
    profiles: &'a ProfileStore,
    sysmon: &'a SysmonStore,
    audit: &'a AuditStore,
    history: &'a HistoryStore,
    llm: Option<&'a dyn LlmAdapter>,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(profiles: &'a ProfileStore, sysmon: &'a SysmonStore, audit: &'a AuditStore, history: &'a HistoryStore) -> Self {
        Self {
            profiles,
            sysmon,
            audit,
            history,
            llm: None,
        }
    }

    #[must_use]
    pub fn with_llm(mut self, llm: &'a dyn LlmAdapter) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Convert a Sigma YAML rule into an SPL search, against `profile_id`
    /// (or the store's default profile).
    pub fn sigma_to_spl(&self, yaml: &str, profile_id: Option<Uuid>, options: &EmitOptions) -> Result<ConversionResponse> {
        let rule = parser::parse_sigma_yaml(yaml)?;
        tracing::debug!(title = %rule.title, "parsed Sigma rule");

        let profile = self.resolve_profile(profile_id)?;
        let (query, mappings) = compiler::compile(&rule, &profile)?;
        tracing::info!(title = %rule.title, "compiled condition to normal-form query");

        let prerequisites = prereq::analyze(&rule.logsource);
        let gap_items = gaps::analyze(&mappings, &profile);
        let coverage_result = self.check_coverage(&prerequisites, &rule.logsource);
        let health_checks = build_health_checks(&prerequisites, &rule.logsource);

        let mut correlation_notes = Vec::new();
        if !coverage_result.overall_covered {
            correlation_notes.extend(coverage_result.recommendations.clone());
        }

        let spl = emitter::emit(&query, &profile, &rule.logsource, &mappings, &health_checks, options);
        tracing::info!(title = %rule.title, "emitted SPL");

        let record = ConversionRecord {
            id: 0,
            name: rule.title.clone(),
            conversion_type: ConversionType::SigmaToSpl,
            profile_id: Some(profile.id),
            input_content: yaml.to_string(),
            output_sigma: None,
            output_spl: Some(spl),
            prerequisites,
            mappings,
            gaps: gap_items,
            health_checks,
            correlation_notes,
            llm_used: false,
            created_at: chrono::Utc::now(),
        };
        Ok(self.history.record(record))
    }

    /// Parse a restricted SPL search back into best-effort Sigma YAML.
    pub fn spl_to_sigma(&self, spl: &str, profile_id: Option<Uuid>) -> Result<ConversionResponse> {
        let profile = self.resolve_profile(profile_id)?;
        let recognized = recognizer::recognize(spl, &profile)?;
        tracing::info!("recognized SPL into a candidate Sigma rule");

        let rule = parser::parse_sigma_yaml(&recognized.sigma_yaml)?;
        let (_, mappings) = compiler::compile(&rule, &profile)?;
        let prerequisites = prereq::analyze(&recognized.logsource);
        let gap_items = gaps::analyze(&mappings, &profile);

        let record = ConversionRecord {
            id: 0,
            name: rule.title.clone(),
            conversion_type: ConversionType::SplToSigma,
            profile_id: Some(profile.id),
            input_content: spl.to_string(),
            output_sigma: Some(recognized.sigma_yaml),
            output_spl: None,
            prerequisites,
            mappings,
            gaps: gap_items,
            health_checks: Vec::new(),
            correlation_notes: recognized.correlation_notes,
            llm_used: false,
            created_at: chrono::Utc::now(),
        };
        Ok(self.history.record(record))
    }

    /// Draft a Sigma rule from a free-text description via the configured
    /// LLM adapter. Fails with `Error::LlmUnavailable` if none is set.
    pub fn text_to_sigma(&self, text: &str, profile_id: Option<Uuid>) -> Result<ConversionResponse> {
        let llm = self.llm.ok_or(Error::LlmUnavailable)?;
        let profile = self.resolve_profile(profile_id)?;

        let sigma_yaml = llm.generate(
            text,
            "Generate a Sigma detection rule in YAML with title, logsource, and detection blocks.",
        )?;
        let rule = parser::parse_sigma_yaml(&sigma_yaml)?;
        let (_, mappings) = compiler::compile(&rule, &profile)?;
        let prerequisites = prereq::analyze(&rule.logsource);
        let gap_items = gaps::analyze(&mappings, &profile);

        let record = ConversionRecord {
            id: 0,
            name: rule.title.clone(),
            conversion_type: ConversionType::TextToSigma,
            profile_id: Some(profile.id),
            input_content: text.to_string(),
            output_sigma: Some(sigma_yaml),
            output_spl: None,
            prerequisites,
            mappings,
            gaps: gap_items,
            health_checks: Vec::new(),
            correlation_notes: Vec::new(),
            llm_used: true,
            created_at: chrono::Utc::now(),
        };
        Ok(self.history.record(record))
    }

    fn resolve_profile(&self, profile_id: Option<Uuid>) -> Result<Profile> {
        match profile_id {
            Some(id) => self.profiles.get(id),
            None => self
                .profiles
                .default_profile()
                .ok_or_else(|| Error::not_found("no default profile is configured")),
        }
    }

    fn check_coverage(&self, prerequisites: &PrerequisiteReport, logsource: &LogSource) -> crate::model::CoverageCheckResult {
        let sysmon = self.sysmon.active();
        let audit = self.audit.active();
        coverage::check(&prerequisites.event_ids, logsource.category.as_deref(), sysmon.as_ref(), audit.as_ref())
    }
}

/// Synthesize one verification search per required event id, so an analyst
/// can confirm telemetry is actually arriving before trusting a detection.
fn build_health_checks(prerequisites: &PrerequisiteReport, logsource: &LogSource) -> Vec<String> {
    let index = if logsource.product.as_deref() == Some("windows") {
        "wineventlog"
    } else {
        "main"
    };
    prerequisites
        .event_ids
        .iter()
        .map(|id| format!("verify telemetry: index={index} EventCode={id} | stats count"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mapping, Profile};

    fn profile_with_mapping() -> Profile {
        let mut profile = Profile::new("default");
        profile.mappings.push(Mapping::new("Image", "process_path"));
        profile.mappings.push(Mapping::new("CommandLine", "process_cmdline"));
        profile
    }

    const RULE_YAML: &str = "title: Suspicious whoami\nlogsource:\n  category: process_creation\ndetection:\n  selection:\n    CommandLine|contains: whoami\n  condition: selection\n";

    #[test]
    fn sigma_to_spl_records_and_returns_a_conversion() {
        let profiles = ProfileStore::new();
        let profile = profiles.create(profile_with_mapping()).unwrap();
        let sysmon = SysmonStore::new();
        let audit = AuditStore::new();
        let history = HistoryStore::new();
        let orchestrator = Orchestrator::new(&profiles, &sysmon, &audit, &history);

        let response = orchestrator.sigma_to_spl(RULE_YAML, Some(profile.id), &EmitOptions::default()).unwrap();
        assert_eq!(response.id, 1);
        assert!(response.output_spl.unwrap().contains("process_cmdline"));
        assert!(!response.prerequisites.event_ids.is_empty());
    }

    #[test]
    fn text_to_sigma_without_an_adapter_is_unavailable() {
        let profiles = ProfileStore::new();
        profiles.create(profile_with_mapping()).unwrap();
        let sysmon = SysmonStore::new();
        let audit = AuditStore::new();
        let history = HistoryStore::new();
        let orchestrator = Orchestrator::new(&profiles, &sysmon, &audit, &history);

        let err = orchestrator.text_to_sigma("detect whoami usage", None).unwrap_err();
        assert!(matches!(err, Error::LlmUnavailable));
    }

    #[test]
    fn spl_to_sigma_round_trips_through_the_recognizer() {
        let profiles = ProfileStore::new();
        let profile = profiles.create(profile_with_mapping()).unwrap();
        let sysmon = SysmonStore::new();
        let audit = AuditStore::new();
        let history = HistoryStore::new();
        let orchestrator = Orchestrator::new(&profiles, &sysmon, &audit, &history);

        let forward = orchestrator.sigma_to_spl(RULE_YAML, Some(profile.id), &EmitOptions::default()).unwrap();
        let spl = forward.output_spl.unwrap();
        let back = orchestrator.spl_to_sigma(&spl, Some(profile.id)).unwrap();
        assert!(back.output_sigma.unwrap().contains("CommandLine"));
    }
}
