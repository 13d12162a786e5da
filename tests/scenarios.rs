//! End-to-end scenarios exercising the full pipeline through the
//! orchestrator's public entry points.

use sigma_translate::emitter::EmitOptions;
use sigma_translate::model::{Mapping, Profile};
use sigma_translate::orchestrator::Orchestrator;
use sigma_translate::store::{AuditStore, HistoryStore, ProfileStore, SysmonStore};

struct Harness {
    profiles: ProfileStore,
    sysmon: SysmonStore,
    audit: AuditStore,
    history: HistoryStore,
}

impl Harness {
    fn new() -> Self {
        Self {
            profiles: ProfileStore::new(),
            sysmon: SysmonStore::new(),
            audit: AuditStore::new(),
            history: HistoryStore::new(),
        }
    }

    fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.profiles, &self.sysmon, &self.audit, &self.history)
    }
}

const MIMIKATZ: &str = "
title: Mimikatz Credential Dump
logsource:
  category: process_creation
  product: windows
detection:
  selection:
    CommandLine|contains:
      - 'sekurlsa::logonpasswords'
      - 'lsadump::sam'
  condition: selection
level: critical
";

#[test]
fn s1_mimikatz_sekurlsa_forward() {
    let harness = Harness::new();
    let profile = harness.profiles.create(Profile::new("default")).unwrap();

    let response = harness
        .orchestrator()
        .sigma_to_spl(MIMIKATZ, Some(profile.id), &EmitOptions::default())
        .unwrap();

    let spl = response.output_spl.unwrap();
    assert!(spl.starts_with(
        r#"search index=wineventlog sourcetype=WinEventLog:* (CommandLine="*sekurlsa::logonpasswords*" OR CommandLine="*lsadump::sam*")"#
    ));
    assert!(response.prerequisites.event_ids.contains(&1));
    assert!(response.prerequisites.event_ids.contains(&4688));
    assert!(response.prerequisites.has_alternatives);
}

const BASE64_RULE: &str = "
title: Base64 whoami
logsource:
  category: process_creation
detection:
  selection:
    CommandLine|base64|contains: whoami
  condition: selection
";

#[test]
fn s2_base64_modifier_encodes_before_emission() {
    let harness = Harness::new();
    let profile = harness.profiles.create(Profile::new("default")).unwrap();

    let response = harness
        .orchestrator()
        .sigma_to_spl(BASE64_RULE, Some(profile.id), &EmitOptions::default())
        .unwrap();

    let spl = response.output_spl.unwrap();
    assert!(spl.contains("d2hvYW1p"));
    assert!(!spl.contains("whoami"));
}

const ONE_OF_WILDCARD: &str = "
title: One of selection wildcard
logsource:
  category: process_creation
detection:
  selection_a:
    Image|endswith: cmd.exe
  selection_b:
    Image|endswith: powershell.exe
  condition: 1 of selection_*
";

#[test]
fn s3_one_of_selection_wildcard_expands_to_or() {
    let harness = Harness::new();
    let profile = harness.profiles.create(Profile::new("default")).unwrap();

    let response = harness
        .orchestrator()
        .sigma_to_spl(ONE_OF_WILDCARD, Some(profile.id), &EmitOptions::default())
        .unwrap();

    let spl = response.output_spl.unwrap();
    assert!(spl.contains(r#"Image="*cmd.exe""#));
    assert!(spl.contains(r#"Image="*powershell.exe""#));
    assert!(spl.contains(" OR "));
}

const UNMAPPED_FIELD: &str = "
title: Unmapped field reference
logsource:
  category: process_creation
detection:
  selection:
    FakeField: something
  condition: selection
";

#[test]
fn s4_gap_reporting_surfaces_unmapped_field() {
    let harness = Harness::new();
    let mut profile = Profile::new("default");
    profile.mappings.push(Mapping::new("FakerField", "faker_field"));
    let profile = harness.profiles.create(profile).unwrap();

    let response = harness
        .orchestrator()
        .sigma_to_spl(UNMAPPED_FIELD, Some(profile.id), &EmitOptions::default())
        .unwrap();

    assert_eq!(response.gaps.len(), 1);
    let gap = &response.gaps[0];
    assert_eq!(gap.field, "FakeField");
    assert!(gap.suggestions.iter().any(|s| s == "FakerField"));
}

#[test]
fn s5_reverse_round_trip_recovers_and_of_two_fields() {
    let harness = Harness::new();
    let profile = harness.profiles.create(Profile::new("default")).unwrap();

    let spl = r#"index=wineventlog (Image="*\powershell.exe" AND CommandLine="*-enc*")"#;
    let response = harness.orchestrator().spl_to_sigma(spl, Some(profile.id)).unwrap();

    let sigma = response.output_sigma.unwrap();
    assert!(sigma.contains(r"Image|endswith: \powershell.exe"));
    assert!(sigma.contains("CommandLine|contains: -enc"));
    assert!(sigma.contains("condition: selection\n"));
}

#[test]
fn s6_coverage_reports_missing_event_id_and_recommendation() {
    use sigma_translate::model::SysmonConfig;

    let harness = Harness::new();
    let profile = harness.profiles.create(Profile::new("default")).unwrap();
    let mut sysmon = SysmonConfig::new("default", "14.16");
    sysmon.is_active = true;
    sysmon.enabled_event_ids.insert(1);
    harness.sysmon.create(sysmon.clone()).unwrap();
    harness.sysmon.activate(sysmon.id).unwrap();

    let rule = "
title: Network connection from suspicious process
logsource:
  category: network_connection
detection:
  selection:
    Image|endswith: cmd.exe
  condition: selection
";
    let response = harness
        .orchestrator()
        .sigma_to_spl(rule, Some(profile.id), &EmitOptions::default())
        .unwrap();

    assert!(response
        .correlation_notes
        .iter()
        .any(|n| n.contains("Event ID 3")));
}
