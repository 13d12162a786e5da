//! Cross-component result types: resolution results, gaps, prerequisites,
//! coverage, and the top-level conversion record/response (C6–C10 outputs,
//! plus §3's `Conversion record`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field resolution status (C3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    Ok,
    Missing,
    Suggested,
}

/// Result of resolving a single Sigma field (C3 output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingResult {
    pub sigma_field: String,
    pub target_field: String,
    pub status: ResolutionStatus,
    pub transform: Option<String>,
    pub note: Option<String>,
    /// Dotted path locating the field in the Sigma AST, e.g.
    /// `detection.selection.Image`. Used by the gap analyzer (C7).
    pub location: String,
}

/// A single unresolved/heuristically-resolved field surfaced to the caller
/// (C7 output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapItem {
    pub field: String,
    pub location: String,
    pub impact: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventIdRef {
    pub id: u32,
    pub name: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeLogSource {
    pub name: String,
    pub description: String,
    pub windows_channel: Option<String>,
    pub event_ids: Vec<EventIdRef>,
    pub setup_instructions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredLogSource {
    pub name: String,
    pub description: String,
    pub windows_channel: Option<String>,
    pub splunk_sourcetype: Option<String>,
    pub event_ids: Vec<EventIdRef>,
    pub setup_instructions: Vec<String>,
    pub alternatives: Vec<AlternativeLogSource>,
}

/// C6 output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrerequisiteReport {
    pub required_logs: Vec<RequiredLogSource>,
    pub event_ids: Vec<u32>,
    pub channels: Vec<String>,
    pub configuration: Vec<String>,
    pub has_alternatives: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysmonCoverage {
    pub enabled_ids: Vec<u32>,
    pub missing_ids: Vec<u32>,
    pub covered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditCoverage {
    pub enabled_policies: Vec<String>,
    pub covered: bool,
}

/// C8 output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageCheckResult {
    pub sysmon_coverage: SysmonCoverage,
    pub audit_coverage: AuditCoverage,
    pub overall_covered: bool,
    pub recommendations: Vec<String>,
}

/// Which orchestrator entry point produced a `ConversionRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionType {
    SigmaToSpl,
    SplToSigma,
    TextToSigma,
}

/// What the orchestrator returns (C10) and what persistence would store
/// (persistence itself is out of scope; this is the snapshot a caller holds
/// on to).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Monotonically assigned by `store::history_store`.
    pub id: u64,
    pub name: String,
    pub conversion_type: ConversionType,
    pub profile_id: Option<Uuid>,
    pub input_content: String,
    pub output_sigma: Option<String>,
    pub output_spl: Option<String>,
    pub prerequisites: PrerequisiteReport,
    pub mappings: Vec<MappingResult>,
    pub gaps: Vec<GapItem>,
    pub health_checks: Vec<String>,
    pub correlation_notes: Vec<String>,
    pub llm_used: bool,
    pub created_at: DateTime<Utc>,
}

/// The full response handed back by an orchestrator entry point. Identical
/// in shape to `ConversionRecord` minus the assigned history id, since a
/// conversion need not be persisted to be returned.
pub type ConversionResponse = ConversionRecord;
