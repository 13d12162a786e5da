//! Field-with-modifiers tokenizing (`<name>|<mod1>|<mod2>...`).

use crate::error::{Error, Result};
use crate::model::{FieldRef, Modifier};

/// Split `field|mod1|mod2` into a base field name and ordered modifier
/// chain. Modifier order is preserved: it is significant to the condition
/// compiler's left-to-right fold (C4).
pub fn parse_field_ref(path: &str, raw: &str) -> Result<FieldRef> {
    let mut parts = raw.split('|');
    // A field name containing a dot (e.g. `EventData.ParentImage`) is a
    // single opaque token per spec §4.4; splitting on `|` alone is correct
    // since `.` is not a separator here.
    let field = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::invalid_sigma(path, "empty field name"))?
        .to_string();

    let mut modifiers = Vec::new();
    for token in parts {
        match Modifier::parse(token) {
            Some(m) => modifiers.push(m),
            None => return Err(Error::unknown_modifier(path, &field, token)),
        }
    }

    Ok(FieldRef { field, modifiers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Modifier;

    #[test]
    fn parses_bare_field() {
        let r = parse_field_ref("p", "CommandLine").unwrap();
        assert_eq!(r.field, "CommandLine");
        assert!(r.modifiers.is_empty());
    }

    #[test]
    fn preserves_modifier_order() {
        let r = parse_field_ref("p", "CommandLine|base64|contains").unwrap();
        assert_eq!(r.modifiers, vec![Modifier::Base64, Modifier::Contains]);
    }

    #[test]
    fn opaque_dotted_field_name() {
        let r = parse_field_ref("p", "EventData.ParentImage|contains").unwrap();
        assert_eq!(r.field, "EventData.ParentImage");
    }

    #[test]
    fn rejects_unknown_modifier() {
        let err = parse_field_ref("p", "Field|bogus").unwrap_err();
        assert!(matches!(err, Error::UnknownModifier { .. }));
    }
}
