//! Postcode-anchored address recognition.
//!
//! The postcode is found first; the address text is then recovered by
//! walking back to the nearest ` at `, ` to a ` or ` to an ` marker.
//!
//! | Text before postcode                      | Address text                 | Context  |
//! |-------------------------------------------|------------------------------|----------|
//! | `seen at 10 Downing Street SW1A 2AA`      | `10 Downing Street SW1A 2AA` | other    |
//! | `lives at 4 Elm Road, , Bristol BS1 5AH`  | `4 Elm Road, Bristol BS1 5AH`| home     |
//! | `resident of BS1 5AH`                     | `BS1 5AH`                    | home     |
//! | `lives at ... burglary at 2 Low St M1 1AE`| `2 Low St M1 1AE`            | offence  |
//! | `moved to an flat in E1 6AN`              | `flat in E1 6AN`             | other    |
//!
//! Context is decided on all text preceding the postcode. The offence check
//! runs after the home check and wins when both match.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{AddressContext, AddressMention};
use crate::postcode::normalize_postcode;

static RE_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2})\b").unwrap()
});
static RE_LEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(at|to an?)\s+").unwrap());
static RE_DOUBLE_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*,").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_HOME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)lives?\s+at|resid").unwrap());
static RE_OFFENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)offence|burgl|robbery|theft|assault|crime").unwrap()
});

const ADDRESS_MARKERS: &[&str] = &[" at ", " to a ", " to an "];

pub fn addresses(text: &str) -> Vec<AddressMention> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for m in RE_POSTCODE.find_iter(text) {
        let normalised = normalize_postcode(m.as_str());
        if !seen.insert(normalised.clone()) {
            continue;
        }
        let before = &text[..m.start()];
        out.push(AddressMention {
            full: address_text(before, m.as_str()),
            postcode: m.as_str().to_string(),
            normalised,
            context: classify_context(before),
        });
    }
    out
}

fn address_text(before: &str, postcode: &str) -> String {
    let marker = ADDRESS_MARKERS
        .iter()
        .filter_map(|marker| before.rfind(marker))
        .max();

    let full = match marker {
        Some(idx) => {
            let after = RE_LEADING_MARKER.replace(&before[idx..], "");
            let joined = format!("{} {postcode}", after.trim());
            let joined = RE_DOUBLE_COMMA.replace_all(&joined, ",");
            RE_WHITESPACE.replace_all(&joined, " ").trim().to_string()
        }
        None => postcode.to_string(),
    };
    full.trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

fn classify_context(before: &str) -> AddressContext {
    let mut context = AddressContext::Other;
    if RE_HOME.is_match(before) {
        context = AddressContext::Home;
    }
    if RE_OFFENCE.is_match(before) {
        context = AddressContext::Offence;
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_after_at_marker() {
        let found = addresses("John SMITH was seen at 10 Downing Street SW1A 2AA (Primary Source).");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full, "10 Downing Street SW1A 2AA");
        assert_eq!(found[0].postcode, "SW1A 2AA");
        assert_eq!(found[0].normalised, "SW1A2AA");
        assert_eq!(found[0].context, AddressContext::Other);
    }

    #[test]
    fn duplicate_commas_and_whitespace_collapsed() {
        let found = addresses("He lives at 4 Elm Road, ,   Bristol  BS1 5AH");
        assert_eq!(found[0].full, "4 Elm Road, Bristol BS1 5AH");
        assert_eq!(found[0].context, AddressContext::Home);
    }

    #[test]
    fn postcode_alone_without_marker() {
        let found = addresses("Resident of BS1 5AH since 2019");
        assert_eq!(found[0].full, "BS1 5AH");
        assert_eq!(found[0].context, AddressContext::Home);
    }

    #[test]
    fn nearest_marker_wins() {
        let found = addresses("He moved to a flat at 2 High Street M1 1AE");
        assert_eq!(found[0].full, "2 High Street M1 1AE");
        let found = addresses("He moved to an annex behind 9 Low Road M1 1AE");
        assert_eq!(found[0].full, "annex behind 9 Low Road M1 1AE");
    }

    #[test]
    fn offence_overrides_home() {
        let found = addresses(
            "Bob KAY lives at 1 Oak Way LS1 1AA and committed a burglary at 5 Elm Court LS2 2BB",
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].context, AddressContext::Home);
        assert_eq!(found[1].context, AddressContext::Offence);
        assert_eq!(found[1].full, "5 Elm Court LS2 2BB");
    }

    #[test]
    fn offence_stems() {
        for word in ["offences", "Burglary", "robbery", "THEFT", "assaulted", "crime scene"] {
            let found = addresses(&format!("Linked {word} at 3 Pit Lane S1 2AB"));
            assert_eq!(found[0].context, AddressContext::Offence, "{word}");
        }
    }

    #[test]
    fn case_insensitive_postcodes_dedupe_on_normalised_key() {
        let found = addresses("Stayed at sw1a 2aa then again at SW1A2AA");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].postcode, "sw1a 2aa");
        assert_eq!(found[0].normalised, "SW1A2AA");
    }

    #[test]
    fn vrm_and_phone_are_not_postcodes() {
        assert!(addresses("VRM AB12 CDE, phone 07700 900123, flight BA123 (LHR)").is_empty());
    }

    #[test]
    fn no_postcode_no_address() {
        assert!(addresses("Lives at an unknown address in Leeds").is_empty());
    }
}
