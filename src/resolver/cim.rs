//! Built-in Splunk CIM (Common Information Model) field table, consulted by
//! C3 layer 2 when a profile has `cim_enabled`.

use crate::model::LogSource;

/// `(category, sigma_field, cim_field)`. `category: None` matches any
/// category — checked only after a category-specific entry misses.
const CIM_TABLE: &[(Option<&str>, &str, &str)] = &[
    (Some("process_creation"), "Image", "process"),
    (Some("process_creation"), "CommandLine", "process"),
    (Some("process_creation"), "ParentImage", "parent_process"),
    (Some("process_creation"), "ParentCommandLine", "parent_process"),
    (Some("network_connection"), "DestinationIp", "dest_ip"),
    (Some("network_connection"), "DestinationPort", "dest_port"),
    (Some("network_connection"), "SourceIp", "src_ip"),
    (Some("network_connection"), "SourcePort", "src_port"),
    (Some("dns"), "QueryName", "query"),
    (Some("dns"), "QueryResults", "answer"),
    (Some("file_event"), "TargetFilename", "file_path"),
    (Some("registry_event"), "TargetObject", "registry_path"),
    (Some("registry_event"), "Details", "registry_value_data"),
    (None, "User", "user"),
    (None, "ComputerName", "dest"),
    (None, "EventID", "signature_id"),
];

/// Look up the built-in default CIM target for a field, ignoring any
/// profile-level preference. Category-specific entries win over the
/// category-agnostic fallback.
#[must_use]
pub fn lookup_default(logsource: &LogSource, sigma_field: &str) -> Option<&'static str> {
    let category = logsource.category.as_deref();
    CIM_TABLE
        .iter()
        .find(|(cat, field, _)| *field == sigma_field && *cat == category)
        .or_else(|| {
            CIM_TABLE
                .iter()
                .find(|(cat, field, _)| *field == sigma_field && cat.is_none())
        })
        .map(|(_, _, target)| *target)
}

/// Sigma field names this table recognizes, for the gap analyzer's (C7)
/// similar-name suggestions.
pub(crate) fn known_fields() -> Vec<&'static str> {
    CIM_TABLE.iter().map(|(_, field, _)| *field).collect()
}

/// Look up the built-in CIM target for a field without a logsource context
/// (C2's profile-level `suggest` operation, which has no category to narrow
/// by): the first table entry for `sigma_field` wins, category-specific
/// entries before the category-agnostic ones.
pub(crate) fn lookup_any(sigma_field: &str) -> Option<&'static str> {
    CIM_TABLE.iter().find(|(_, field, _)| *field == sigma_field).map(|(_, _, target)| *target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_category_specific_entry() {
        let ls = LogSource {
            category: Some("process_creation".into()),
            ..Default::default()
        };
        assert_eq!(lookup_default(&ls, "Image"), Some("process"));
    }

    #[test]
    fn falls_back_to_category_agnostic_entry() {
        let ls = LogSource::default();
        assert_eq!(lookup_default(&ls, "ComputerName"), Some("dest"));
    }

    #[test]
    fn unknown_field_misses() {
        let ls = LogSource::default();
        assert_eq!(lookup_default(&ls, "NoSuchField"), None);
    }
}
