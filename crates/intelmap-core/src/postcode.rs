//! UK postcode normalisation.
//!
//! Postcodes are written every which way in free text (`sw1a 2aa`,
//! `SW1A2AA`, `SW1A  2AA`). The normalised form is the identity key used for
//! deduplication and as the lookup key for geocoding: uppercase with all
//! whitespace removed.

/// Normalise a postcode: uppercase, all whitespace stripped.
pub fn normalize_postcode(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_values() {
        assert_eq!(normalize_postcode("SW1A 2AA"), "SW1A2AA");
        assert_eq!(normalize_postcode("sw1a 2aa"), "SW1A2AA");
        assert_eq!(normalize_postcode("BS1  5AH"), "BS15AH");
        assert_eq!(normalize_postcode("M1 1AE"), "M11AE");
        assert_eq!(normalize_postcode(" E1\t6AN "), "E16AN");
    }

    #[test]
    fn variants_collapse_to_one_key() {
        let keys: Vec<String> = ["SW1A 2AA", "sw1a2aa", "Sw1A  2aA"]
            .iter()
            .map(|s| normalize_postcode(s))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn normalised_has_no_whitespace_and_is_uppercase() {
        for input in ["ec1a 1bb", "W1A 0AX", "  cr2 6xh  "] {
            let n = normalize_postcode(input);
            assert!(!n.chars().any(char::is_whitespace));
            assert_eq!(n, n.to_uppercase());
        }
    }

    #[test]
    fn empty_string() {
        assert_eq!(normalize_postcode(""), "");
    }
}
