//! Lookup key normalization
//!
//! Every name, symbol and alias is indexed under two keys: an exact key
//! (case and surrounding whitespace ignored) and a rough key that also
//! forgives plurals, doubled letters, hyphens and spacing. The same
//! functions are used when indexing and when looking up.

/// Exact lookup key: trimmed and lowercased
pub fn exact_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Rough lookup key.
///
/// After lowercasing and trimming, runs of a repeated character collapse to
/// one, an `s` ending a word is dropped, and everything that is not an ASCII
/// letter, digit or underscore is removed:
/// `"KILO-watts per   hours"` becomes `"kilowatperhour"`.
pub fn rough_key(s: &str) -> String {
    let mut collapsed: Vec<char> = exact_key(s).chars().collect();
    collapsed.dedup();

    let mut out = String::with_capacity(collapsed.len());
    for (i, &c) in collapsed.iter().enumerate() {
        if !is_word_char(c) {
            continue;
        }
        let ends_word = !matches!(collapsed.get(i + 1), Some(&next) if is_word_char(next));
        if c == 's' && ends_word {
            continue;
        }
        out.push(c);
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_key() {
        assert_eq!(exact_key("  Kilometre "), "kilometre");
        assert_eq!(exact_key("kWh"), "kwh");
    }

    #[test]
    fn test_rough_key_example() {
        assert_eq!(rough_key("KILO-watts per   hours"), "kilowatperhour");
    }

    #[test]
    fn test_rough_key_invariants() {
        let reference = rough_key("Kilowatt-Hours");
        assert_eq!(rough_key("kilowattt hour"), reference);
        assert_eq!(rough_key("KILOWATT HOUR"), reference);
        assert_eq!(rough_key("kilowatt hours"), reference);
    }

    #[test]
    fn test_rough_key_plural_only_at_word_end() {
        assert_eq!(rough_key("metres"), rough_key("metre"));
        assert_eq!(rough_key("seconds"), "second");
        // an inner "s" survives
        assert_eq!(rough_key("mass"), "ma");
        assert_eq!(rough_key("usd"), "usd");
    }

    #[test]
    fn test_rough_key_drops_non_ascii() {
        assert_eq!(rough_key("µm"), "m");
        assert_eq!(rough_key("m²"), "m");
    }
}
