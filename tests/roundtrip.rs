//! Invariant 1 (round-trip safety): emitting a compiled query to SPL and
//! recognizing it back reproduces an equivalent query, modulo
//! associativity/commutativity/dedup of `And`/`Or`.

use sigma_translate::compiler::compile;
use sigma_translate::emitter::{emit, EmitOptions};
use sigma_translate::model::Profile;
use sigma_translate::parser::parse_sigma_yaml;
use sigma_translate::recognizer::recognize;

fn round_trip(yaml: &str) -> bool {
    let profile = Profile::new("default");
    let rule = parse_sigma_yaml(yaml).unwrap();
    let (query, mappings) = compile(&rule, &profile).unwrap();
    let spl = emit(&query, &profile, &rule.logsource, &mappings, &[], &EmitOptions::default());

    let recognized = recognize(&spl, &profile).unwrap();
    let reparsed = parse_sigma_yaml(&recognized.sigma_yaml).unwrap();
    let (reconstructed_query, _) = compile(&reparsed, &profile).unwrap();

    query.equiv(&reconstructed_query)
}

#[test]
fn single_match_round_trips() {
    let yaml = "
title: Single field match
logsource:
  category: process_creation
detection:
  selection:
    Image|endswith: powershell.exe
  condition: selection
";
    assert!(round_trip(yaml));
}

#[test]
fn conjunction_round_trips_regardless_of_term_order() {
    let yaml = "
title: Two field conjunction
logsource:
  category: process_creation
detection:
  selection:
    Image|endswith: powershell.exe
    CommandLine|contains: '-enc'
  condition: selection
";
    assert!(round_trip(yaml));
}

#[test]
fn disjunction_round_trips() {
    let yaml = "
title: Two value disjunction
logsource:
  category: process_creation
detection:
  selection:
    CommandLine|contains:
      - 'sekurlsa::logonpasswords'
      - 'lsadump::sam'
  condition: selection
";
    assert!(round_trip(yaml));
}

#[test]
fn multi_selection_and_round_trips() {
    let yaml = "
title: Two selections ANDed
logsource:
  category: process_creation
detection:
  selection1:
    Image|endswith: cmd.exe
  selection2:
    ParentImage|endswith: explorer.exe
  condition: selection1 and selection2
";
    assert!(round_trip(yaml));
}
