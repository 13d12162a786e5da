//! Prerequisite Analyzer (C6): from a rule's logsource, compute the
//! required Sysmon/Windows-native log sources, event IDs, channels, and
//! setup instructions (spec §4.6).

use crate::model::{AlternativeLogSource, EventIdRef, LogSource, PrerequisiteReport, RequiredLogSource};

struct WindowsAlternativeSpec {
    event_id: u32,
    channel: &'static str,
    name: &'static str,
    setup_instructions: &'static [&'static str],
}

struct CategorySpec {
    category: &'static str,
    sysmon_event_ids: &'static [u32],
    windows_alternative: Option<WindowsAlternativeSpec>,
}

const CATEGORY_TABLE: &[CategorySpec] = &[
    CategorySpec {
        category: "process_creation",
        sysmon_event_ids: &[1],
        windows_alternative: Some(WindowsAlternativeSpec {
            event_id: 4688,
            channel: "Security",
            name: "Windows Security Auditing",
            setup_instructions: &[
                "Enable \"Audit Process Creation\" in the Advanced Audit Policy",
                "Enable the \"Include command line in process creation events\" GPO",
            ],
        }),
    },
    CategorySpec {
        category: "network_connection",
        sysmon_event_ids: &[3],
        windows_alternative: None,
    },
    CategorySpec {
        category: "image_load",
        sysmon_event_ids: &[7],
        windows_alternative: None,
    },
    CategorySpec {
        category: "file_event",
        sysmon_event_ids: &[11],
        windows_alternative: None,
    },
    CategorySpec {
        category: "registry_event",
        sysmon_event_ids: &[12, 13, 14],
        windows_alternative: None,
    },
    CategorySpec {
        category: "dns",
        sysmon_event_ids: &[22],
        windows_alternative: None,
    },
];

/// Compute the prerequisite report for a rule's logsource. A category with
/// no table entry (or an absent category) yields an empty report rather
/// than an error — prerequisite analysis is best-effort, not a gate.
#[must_use]
pub fn analyze(logsource: &LogSource) -> PrerequisiteReport {
    let empty = PrerequisiteReport {
        required_logs: Vec::new(),
        event_ids: Vec::new(),
        channels: Vec::new(),
        configuration: Vec::new(),
        has_alternatives: false,
    };
    let Some(category) = logsource.category.as_deref() else {
        return empty;
    };
    let Some(spec) = CATEGORY_TABLE.iter().find(|c| c.category == category) else {
        tracing::debug!(category, "no prerequisite table entry for category");
        return empty;
    };

    let sysmon_event_ids: Vec<EventIdRef> = spec
        .sysmon_event_ids
        .iter()
        .map(|id| EventIdRef {
            id: *id,
            name: format!("Sysmon Event ID {id}"),
            source: "Sysmon".to_string(),
        })
        .collect();

    let mut alternatives = Vec::new();
    let mut configuration = vec![format!(
        "Deploy Sysmon with a configuration enabling Event ID(s) {}",
        format_ids(spec.sysmon_event_ids)
    )];

    if let Some(alt) = &spec.windows_alternative {
        alternatives.push(AlternativeLogSource {
            name: alt.name.to_string(),
            description: format!("Windows native auditing via the {} channel", alt.channel),
            windows_channel: Some(alt.channel.to_string()),
            event_ids: vec![EventIdRef {
                id: alt.event_id,
                name: format!("Event ID {}", alt.event_id),
                source: "Windows Security".to_string(),
            }],
            setup_instructions: alt.setup_instructions.iter().map(|s| (*s).to_string()).collect(),
        });
        configuration.extend(alt.setup_instructions.iter().map(|s| (*s).to_string()));
    }

    let required = RequiredLogSource {
        name: "Sysmon".to_string(),
        description: format!("Sysmon telemetry for logsource category `{category}`"),
        windows_channel: Some("Microsoft-Windows-Sysmon/Operational".to_string()),
        splunk_sourcetype: Some("XmlWinEventLog:Microsoft-Windows-Sysmon/Operational".to_string()),
        event_ids: sysmon_event_ids,
        setup_instructions: vec![format!(
            "Install Sysmon and enable Event ID(s) {}",
            format_ids(spec.sysmon_event_ids)
        )],
        alternatives,
    };

    let mut event_ids: Vec<u32> = required
        .event_ids
        .iter()
        .map(|e| e.id)
        .chain(required.alternatives.iter().flat_map(|a| a.event_ids.iter().map(|e| e.id)))
        .collect();
    event_ids.sort_unstable();
    event_ids.dedup();

    let mut channels: Vec<String> = required
        .windows_channel
        .iter()
        .cloned()
        .chain(required.alternatives.iter().filter_map(|a| a.windows_channel.clone()))
        .collect();
    channels.sort();
    channels.dedup();

    let has_alternatives = !required.alternatives.is_empty();

    PrerequisiteReport {
        required_logs: vec![required],
        event_ids,
        channels,
        configuration,
        has_alternatives,
    }
}

fn format_ids(ids: &[u32]) -> String {
    ids.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_creation_yields_sysmon_and_windows_native_alternative() {
        let logsource = LogSource {
            product: Some("windows".to_string()),
            category: Some("process_creation".to_string()),
            ..Default::default()
        };
        let report = analyze(&logsource);
        assert!(report.event_ids.contains(&1));
        assert!(report.event_ids.contains(&4688));
        assert!(report.has_alternatives);
    }

    #[test]
    fn network_connection_has_no_native_alternative() {
        let logsource = LogSource {
            category: Some("network_connection".to_string()),
            ..Default::default()
        };
        let report = analyze(&logsource);
        assert_eq!(report.event_ids, vec![3]);
        assert!(!report.has_alternatives);
    }

    #[test]
    fn unknown_category_yields_empty_report() {
        let logsource = LogSource {
            category: Some("nonexistent".to_string()),
            ..Default::default()
        };
        let report = analyze(&logsource);
        assert!(report.required_logs.is_empty());
    }

    #[test]
    fn registry_event_lists_all_three_ids() {
        let logsource = LogSource {
            category: Some("registry_event".to_string()),
            ..Default::default()
        };
        let report = analyze(&logsource);
        assert_eq!(report.event_ids, vec![12, 13, 14]);
    }
}
