//! Span normalization for stable hashing.
//!
//! Normalizes a winning span's substring (never the surrounding
//! document) before hashing, so that "John Smith", "JOHN SMITH", and
//! "john   smith" all produce the same token.
//!
//! Applied in order:
//! 1. Collapse whitespace runs to a single space
//! 2. Trim leading/trailing whitespace
//! 3. Case-fold to lowercase
//! 4. Transliterate to ASCII per the fixed table below; other
//!    non-ASCII characters are dropped
//!
//! The output alphabet is printable lowercase ASCII with single spaces,
//! so normalization is idempotent.

/// Normalize a span substring for hashing.
pub fn normalize(input: &str) -> String {
    let mut collapsed = String::with_capacity(input.len());
    let mut pending_space = false;
    let mut piece = String::new();
    for ch in input.chars() {
        if ch.is_whitespace() {
            pending_space = !collapsed.is_empty();
            continue;
        }
        piece.clear();
        for lower in ch.to_lowercase() {
            transliterate(lower, &mut piece);
        }
        // A fully-dropped character must not flush the pending space,
        // or "a X b" with X dropped would yield a double space.
        if piece.is_empty() {
            continue;
        }
        if pending_space {
            collapsed.push(' ');
            pending_space = false;
        }
        collapsed.push_str(&piece);
    }
    collapsed
}

/// Fixed transliteration table: Latin accents and common Unicode
/// punctuation map to ASCII; everything else non-ASCII is dropped.
///
/// Inputs are already lowercased, so only lowercase forms appear here.
fn transliterate(ch: char, out: &mut String) {
    if ch.is_ascii() {
        out.push(ch);
        return;
    }
    let mapped: &str = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        'š' => "s",
        'ž' => "z",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201c}' | '\u{201d}' => "\"",
        '\u{2013}' | '\u{2014}' => "-",
        '\u{2026}' => "...",
        _ => return,
    };
    out.push_str(mapped);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_collapse() {
        assert_eq!(normalize("  John    Smith  "), "john smith");
    }

    #[test]
    fn test_case_fold() {
        assert_eq!(normalize("JOHN SMITH"), "john smith");
        assert_eq!(normalize("John Smith"), "john smith");
    }

    #[test]
    fn test_tabs_and_newlines_collapse() {
        assert_eq!(normalize("john\t\nsmith"), "john smith");
    }

    #[test]
    fn test_accents_transliterated() {
        assert_eq!(normalize("José Nuñez"), "jose nunez");
        assert_eq!(normalize("Müller"), "muller");
        assert_eq!(normalize("Straße"), "strasse");
    }

    #[test]
    fn test_curly_quotes_and_dashes() {
        assert_eq!(normalize("O\u{2019}Brien"), "o'brien");
        assert_eq!(normalize("1999\u{2013}2001"), "1999-2001");
    }

    #[test]
    fn test_unmapped_non_ascii_dropped() {
        assert_eq!(normalize("john\u{4e16}smith"), "johnsmith");
        assert_eq!(normalize("a \u{4e16} b"), "a b");
    }

    #[test]
    fn test_idempotence() {
        for input in [
            "  John    Smith  ",
            "José Nuñez",
            "123-45-6789",
            "MRN: 12345678",
            "",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n "), "");
    }

    #[test]
    fn test_equivalent_values_collide() {
        assert_eq!(normalize("John Smith"), normalize("JOHN   SMITH"));
        assert_eq!(normalize(" jóhn smith"), normalize("john smith"));
    }
}
