//! Pure value transforms applied during the modifier fold (`base64`,
//! `base64offset`, `wide`/`utf16`). Kept as free functions so the fold in
//! `compile_value` stays a simple left-to-right composition over the enum.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// `|base64`: encode the raw value.
#[must_use]
pub fn base64_encode(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// `|base64offset`: the three byte-alignment variants, so a substring match
/// against a base64 blob is found regardless of which byte boundary the
/// plaintext starts on. Leading padding shifts the alignment; the matching
/// number of garbage leading characters is then dropped.
#[must_use]
pub fn base64_offset_variants(value: &str) -> Vec<String> {
    const LEADING_SKIP: [usize; 3] = [0, 2, 3];
    (0..3usize)
        .map(|offset| {
            let padded = format!("{}{value}", "A".repeat(offset));
            let encoded = STANDARD.encode(padded.as_bytes());
            encoded.chars().skip(LEADING_SKIP[offset]).collect()
        })
        .collect()
}

/// `|wide` / `|utf16`: UTF-16LE hex encoding.
#[must_use]
pub fn utf16le_hex(value: &str) -> String {
    value
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_encodes_whoami() {
        assert_eq!(base64_encode("whoami"), "d2hvYW1p");
    }

    #[test]
    fn base64_offset_produces_three_variants() {
        assert_eq!(base64_offset_variants("whoami").len(), 3);
    }

    #[test]
    fn utf16le_hex_doubles_then_doubles_again() {
        // 2 ASCII chars -> 4 UTF-16LE bytes -> 8 hex digits.
        assert_eq!(utf16le_hex("ab").len(), 8);
    }
}
