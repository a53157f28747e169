//! Redaction token formatting and buffer splicing.
//!
//! The token text format `<ENTITY_TYPE:hex-digest>` is part of the
//! system's observable contract: entity type in upper-snake case,
//! digest of fixed length, stable across runs with the same secret key.

use crate::hash::KeyMaterial;
use crate::normalize::normalize;
use scrub_common::{EntityCandidate, Result, ScrubError};
use std::collections::BTreeMap;

pub use crate::hash::DIGEST_TRUNCATION_BYTES;

/// Hex characters in an emitted digest.
pub const DIGEST_DISPLAY_BYTES: usize = DIGEST_TRUNCATION_BYTES * 2;

/// Convert an entity type name to upper-snake case for token display.
pub fn upper_snake(entity_type: &str) -> String {
    entity_type
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive the replacement token for a winning span's substring.
///
/// The substring is normalized first, so equivalent surface forms of
/// the same value produce the same token.
pub fn format_token(key: &KeyMaterial, entity_type: &str, span_text: &str) -> String {
    let digest = key.digest(&normalize(span_text));
    format!("<{}:{}>", upper_snake(entity_type), digest)
}

/// Splice tokens into `text` for an already-resolved, start-sorted,
/// non-overlapping winner set. Returns the redacted text and the
/// per-entity-type counts.
///
/// Replacements are applied in descending start order so earlier
/// offsets stay valid while later spans are substituted.
pub fn apply_redactions(
    key: &KeyMaterial,
    text: &str,
    winners: &[EntityCandidate],
) -> Result<(String, BTreeMap<String, u64>)> {
    // Char offset -> byte offset, with the one-past-the-end sentinel.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut redacted = text.to_string();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for winner in winners.iter().rev() {
        let (byte_start, byte_end) = match (
            boundaries.get(winner.start).copied(),
            boundaries.get(winner.end).copied(),
        ) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(ScrubError::InvalidSpan {
                    entity_type: winner.entity_type.clone(),
                    start: winner.start,
                    end: winner.end,
                })
            }
        };
        let token = format_token(key, &winner.entity_type, &text[byte_start..byte_end]);
        redacted.replace_range(byte_start..byte_end, &token);
        *counts.entry(winner.entity_type.clone()).or_insert(0) += 1;
    }

    Ok((redacted, counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> KeyMaterial {
        KeyMaterial::new("test-secret").unwrap()
    }

    #[test]
    fn test_upper_snake() {
        assert_eq!(upper_snake("us_ssn"), "US_SSN");
        assert_eq!(upper_snake("Email-Address"), "EMAIL_ADDRESS");
        assert_eq!(upper_snake("PERSON"), "PERSON");
    }

    #[test]
    fn test_token_format() {
        let token = format_token(&key(), "person", "John Smith");
        assert!(token.starts_with("<PERSON:"));
        assert!(token.ends_with('>'));
        assert_eq!(token.len(), "<PERSON:>".len() + DIGEST_DISPLAY_BYTES);
    }

    #[test]
    fn test_token_normalizes_before_hashing() {
        let k = key();
        assert_eq!(
            format_token(&k, "PERSON", "John Smith"),
            format_token(&k, "PERSON", "JOHN   SMITH")
        );
    }

    #[test]
    fn test_apply_single_span() {
        let text = "SSN: 123-45-6789";
        let winners = vec![EntityCandidate::new("US_SSN", 5, 16, 0.9)];
        let (redacted, counts) = apply_redactions(&key(), text, &winners).unwrap();
        assert!(redacted.starts_with("SSN: <US_SSN:"));
        assert!(!redacted.contains("123-45-6789"));
        assert_eq!(counts["US_SSN"], 1);
    }

    #[test]
    fn test_apply_multiple_spans_preserves_between() {
        let text = "Patient: John Smith, SSN: 123-45-6789";
        let winners = vec![
            EntityCandidate::new("PERSON", 9, 19, 0.85),
            EntityCandidate::new("US_SSN", 26, 37, 0.9),
        ];
        let (redacted, counts) = apply_redactions(&key(), text, &winners).unwrap();
        assert!(redacted.starts_with("Patient: <PERSON:"));
        assert!(redacted.contains(", SSN: <US_SSN:"));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_apply_multibyte_text() {
        // "José" is 4 chars, 5 bytes
        let text = "Name: José here";
        let winners = vec![EntityCandidate::new("PERSON", 6, 10, 0.9)];
        let (redacted, _) = apply_redactions(&key(), text, &winners).unwrap();
        assert!(redacted.starts_with("Name: <PERSON:"));
        assert!(redacted.ends_with("> here"));
    }

    #[test]
    fn test_apply_span_at_buffer_end() {
        let text = "id 12345678";
        let winners = vec![EntityCandidate::new("ACCOUNT_NUMBER", 3, 11, 0.9)];
        let (redacted, _) = apply_redactions(&key(), text, &winners).unwrap();
        assert!(redacted.starts_with("id <ACCOUNT_NUMBER:"));
        assert!(redacted.ends_with('>'));
    }

    #[test]
    fn test_apply_out_of_bounds_rejected() {
        let winners = vec![EntityCandidate::new("PERSON", 0, 99, 0.9)];
        assert!(apply_redactions(&key(), "short", &winners).is_err());
    }

    #[test]
    fn test_empty_winner_set_returns_input() {
        let (redacted, counts) = apply_redactions(&key(), "unchanged", &[]).unwrap();
        assert_eq!(redacted, "unchanged");
        assert!(counts.is_empty());
    }
}
