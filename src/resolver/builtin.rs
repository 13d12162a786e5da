//! Built-in default table for common Windows process-creation fields (C3
//! layer 3), used regardless of `cim_enabled`. These are native Splunk
//! Windows TA field names, so the default mapping is identity — but it is
//! still a `suggested`, not `ok`, resolution: it did not come from a
//! profile the caller owns.

const BUILTIN_FIELDS: &[&str] = &[
    "Image",
    "CommandLine",
    "ParentImage",
    "ParentCommandLine",
    "User",
    "ComputerName",
    "EventID",
];

#[must_use]
pub fn lookup(sigma_field: &str) -> Option<&'static str> {
    BUILTIN_FIELDS.iter().find(|f| **f == sigma_field).copied()
}

/// Sigma field names this table recognizes, for the gap analyzer's (C7)
/// similar-name suggestions.
pub(crate) fn known_fields() -> &'static [&'static str] {
    BUILTIN_FIELDS
}
