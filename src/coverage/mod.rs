//! Coverage Checker (C8): compares a rule's required Sysmon event IDs and
//! Windows audit subcategories against the currently active Sysmon/audit
//! configuration.

use crate::model::{AuditConfig, AuditCoverage, CoverageCheckResult, SysmonConfig, SysmonCoverage};

/// `(logsource category, relevant Windows audit subcategory names)`.
const CATEGORY_AUDIT_SUBCATEGORIES: &[(&str, &[&str])] = &[
    ("process_creation", &["Process Creation"]),
    ("network_connection", &["Filtering Platform Connection"]),
    ("file_event", &["File System"]),
    ("registry_event", &["Registry"]),
    ("logon", &["Logon"]),
];

/// Compute coverage. `required_event_ids` and `category` come from the
/// prerequisite analyzer's (C6) output for the same rule.
#[must_use]
pub fn check(
    required_event_ids: &[u32],
    category: Option<&str>,
    sysmon: Option<&SysmonConfig>,
    audit: Option<&AuditConfig>,
) -> CoverageCheckResult {
    let sysmon_coverage = check_sysmon(required_event_ids, sysmon);
    let audit_coverage = check_audit(category, audit);
    let overall_covered = sysmon_coverage.covered || audit_coverage.covered;
    tracing::debug!(overall_covered, ?category, "coverage check complete");
    let recommendations = if overall_covered {
        Vec::new()
    } else {
        build_recommendations(&sysmon_coverage, &audit_coverage)
    };

    CoverageCheckResult {
        sysmon_coverage,
        audit_coverage,
        overall_covered,
        recommendations,
    }
}

fn check_sysmon(required_event_ids: &[u32], sysmon: Option<&SysmonConfig>) -> SysmonCoverage {
    match sysmon {
        Some(cfg) if cfg.is_active => {
            let enabled_ids: Vec<u32> = required_event_ids
                .iter()
                .copied()
                .filter(|id| cfg.enabled_event_ids.contains(id))
                .collect();
            let missing_ids: Vec<u32> = required_event_ids
                .iter()
                .copied()
                .filter(|id| !cfg.enabled_event_ids.contains(id))
                .collect();
            let covered = missing_ids.is_empty();
            SysmonCoverage {
                enabled_ids,
                missing_ids,
                covered,
            }
        }
        _ => SysmonCoverage {
            enabled_ids: Vec::new(),
            missing_ids: required_event_ids.to_vec(),
            covered: required_event_ids.is_empty(),
        },
    }
}

fn check_audit(category: Option<&str>, audit: Option<&AuditConfig>) -> AuditCoverage {
    let (Some(category), Some(audit)) = (category, audit) else {
        return AuditCoverage {
            enabled_policies: Vec::new(),
            covered: false,
        };
    };
    let Some((_, subcategories)) = CATEGORY_AUDIT_SUBCATEGORIES.iter().find(|(c, _)| *c == category) else {
        return AuditCoverage {
            enabled_policies: Vec::new(),
            covered: false,
        };
    };

    let enabled: Vec<String> = subcategories
        .iter()
        .filter(|name| audit.is_subcategory_enabled(name))
        .map(|name| (*name).to_string())
        .collect();
    let covered = enabled.len() == subcategories.len();

    AuditCoverage {
        enabled_policies: enabled,
        covered,
    }
}

fn build_recommendations(sysmon: &SysmonCoverage, audit: &AuditCoverage) -> Vec<String> {
    let mut out: Vec<String> = sysmon
        .missing_ids
        .iter()
        .map(|id| format!("Enable Sysmon Event ID {id} in the active Sysmon configuration"))
        .collect();
    if !audit.covered {
        out.push(
            "Enable the required Windows audit subcategories (success and/or failure) for this logsource category"
                .to_string(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sysmon_coverage_reports_missing_id_and_recommendation() {
        let mut sysmon = SysmonConfig::new("default", "14.16");
        sysmon.is_active = true;
        sysmon.enabled_event_ids.insert(1);

        let result = check(&[1, 3], Some("process_creation"), Some(&sysmon), None);
        assert_eq!(result.sysmon_coverage.missing_ids, vec![3]);
        assert!(!result.overall_covered);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("Event ID 3")));
    }

    #[test]
    fn full_sysmon_coverage_is_overall_covered_with_no_recommendations() {
        let mut sysmon = SysmonConfig::new("default", "14.16");
        sysmon.is_active = true;
        sysmon.enabled_event_ids.insert(1);
        sysmon.enabled_event_ids.insert(3);

        let result = check(&[1, 3], Some("process_creation"), Some(&sysmon), None);
        assert!(result.overall_covered);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn no_active_sysmon_config_reports_all_ids_missing() {
        let result = check(&[1], Some("process_creation"), None, None);
        assert_eq!(result.sysmon_coverage.missing_ids, vec![1]);
        assert!(!result.sysmon_coverage.covered);
    }

    #[test]
    fn audit_coverage_alone_can_satisfy_overall_covered() {
        use crate::model::AuditSubcategory;
        use indexmap::IndexMap;

        let mut categories = IndexMap::new();
        let mut subs = IndexMap::new();
        subs.insert(
            "Process Creation".to_string(),
            AuditSubcategory {
                success: true,
                failure: false,
            },
        );
        categories.insert("Detailed Tracking".to_string(), subs);
        let mut audit = AuditConfig::new("default");
        audit.categories = categories;
        audit.is_active = true;

        let result = check(&[1], Some("process_creation"), None, Some(&audit));
        assert!(result.audit_coverage.covered);
        assert!(result.overall_covered);
    }
}
