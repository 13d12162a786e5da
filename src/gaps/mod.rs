//! Gap Analyzer (C7): turns every non-`ok` field resolution into a
//! `GapItem` with canned impact text and remediation suggestions.

use strsim::levenshtein;

use crate::model::{GapItem, MappingResult, Profile, ResolutionStatus};
use crate::resolver;

/// Normalized Levenshtein distance ceiling for a "similar field name"
/// suggestion (spec §4.7).
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Collect one `GapItem` per `MappingResult` whose status isn't `ok`, in
/// the order the resolutions occurred (invariant 3: gap completeness).
#[must_use]
pub fn analyze(mappings: &[MappingResult], profile: &Profile) -> Vec<GapItem> {
    mappings
        .iter()
        .filter(|m| m.status != ResolutionStatus::Ok)
        .map(|m| build_gap(m, profile))
        .collect()
}

fn build_gap(mapping: &MappingResult, profile: &Profile) -> GapItem {
    let (impact, suggestions) = match mapping.status {
        ResolutionStatus::Missing => (
            "No mapping exists; query uses raw Sigma field name which may not resolve in Splunk"
                .to_string(),
            similar_field_names(&mapping.sigma_field, profile),
        ),
        ResolutionStatus::Suggested => (
            "Using CIM/heuristic mapping; verify against your schema".to_string(),
            vec![mapping
                .note
                .clone()
                .unwrap_or_else(|| "heuristic mapping".to_string())],
        ),
        ResolutionStatus::Ok => unreachable!("filtered out by analyze"),
    };

    GapItem {
        field: mapping.sigma_field.clone(),
        location: mapping.location.clone(),
        impact,
        suggestions,
    }
}

/// Candidate names come from the owning profile's own mappings plus the
/// built-in CIM/Windows-default tables, ranked by distance then
/// alphabetically for a stable order.
fn similar_field_names(field: &str, profile: &Profile) -> Vec<String> {
    let mut candidates: Vec<String> = profile.mappings.iter().map(|m| m.sigma_field.clone()).collect();
    candidates.extend(resolver::known_sigma_fields().into_iter().map(str::to_string));
    candidates.sort();
    candidates.dedup();

    let mut scored: Vec<(usize, String)> = candidates
        .into_iter()
        .filter(|c| c != field)
        .map(|c| (levenshtein(field, &c), c))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, name)| name).collect()
}
