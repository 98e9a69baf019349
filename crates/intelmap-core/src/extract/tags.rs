//! Entry metadata: reliability grading, source tag, offence type.
//!
//! | Text                                   | Result                           |
//! |----------------------------------------|----------------------------------|
//! | `(2AC)`                                | grading 2 / A / C                |
//! | `(1B)`                                 | grading 1 / B, no handling       |
//! | `(2AD)`, `(AB1)`, `2AC`                | no grading                       |
//! | `(experian)`                           | source `experian` (as written)   |
//! | `(PND) ... (OSINT)`                    | source `PND` (first wins)        |
//! | `offences to a burglary at ...`        | offence type `burglary`          |

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Grading;

static RE_GRADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d)([A-C])([A-C]?)\)").unwrap());
static RE_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\(({})\)", SOURCE_VOCABULARY.join("|"))).unwrap()
});
static RE_OFFENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)offences?\s+to\s+(?:an?\s+)?(\w[\w\s]*?)\s+at\b").unwrap()
});

/// Intelligence sources recognised in parenthesised tags.
pub const SOURCE_VOCABULARY: &[&str] = &[
    "Primary Source",
    "Experian",
    "PNC",
    "PND",
    "NBTC",
    "ELMER",
    "DAML",
    "SAR",
    "GB Connexus",
    "OSINT",
    "Companies House",
    "Land Registry",
];

pub fn grading(text: &str) -> Option<Grading> {
    let caps = RE_GRADING.captures(text)?;
    let mut source = caps[1].chars();
    let mut intel = caps[2].chars();
    Some(Grading {
        source_reliability: source.next()?,
        intel_reliability: intel.next()?,
        handling: caps[3].chars().next(),
    })
}

pub fn source(text: &str) -> Option<String> {
    RE_SOURCE.captures(text).map(|c| c[1].to_string())
}

pub fn offence_type(text: &str) -> Option<String> {
    RE_OFFENCE
        .captures(text)
        .map(|c| c[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_character_grading() {
        let g = grading("Seen at home (Primary Source) (2AC).").unwrap();
        assert_eq!(g.source_reliability, '2');
        assert_eq!(g.intel_reliability, 'A');
        assert_eq!(g.handling, Some('C'));
    }

    #[test]
    fn two_character_grading() {
        let g = grading("(1B)").unwrap();
        assert_eq!(g.code(), "1B");
        assert_eq!(g.handling, None);
    }

    #[test]
    fn malformed_codes_ignored() {
        assert!(grading("(2AD)").is_none());
        assert!(grading("(AB1)").is_none());
        assert!(grading("graded 2AC").is_none());
        assert!(grading("(2ac)").is_none());
    }

    #[test]
    fn first_grading_wins() {
        assert_eq!(grading("(3CB) then (1AA)").unwrap().code(), "3CB");
    }

    #[test]
    fn source_case_insensitive_kept_as_written() {
        assert_eq!(source("Credit file (experian)").as_deref(), Some("experian"));
        assert_eq!(source("(GB Connexus)").as_deref(), Some("GB Connexus"));
    }

    #[test]
    fn first_source_wins() {
        assert_eq!(source("(PND) and later (OSINT)").as_deref(), Some("PND"));
    }

    #[test]
    fn unknown_source_ignored() {
        assert!(source("(Informant) (Police)").is_none());
        assert!(source("PNC record").is_none());
    }

    #[test]
    fn offence_type_with_article() {
        assert_eq!(
            offence_type("Admitted offences to a burglary at 5 Elm Court").as_deref(),
            Some("burglary")
        );
        assert_eq!(
            offence_type("Linked offence to an aggravated assault at the pub").as_deref(),
            Some("aggravated assault")
        );
    }

    #[test]
    fn offence_type_without_article() {
        assert_eq!(
            offence_type("offences to arson at a warehouse").as_deref(),
            Some("arson")
        );
    }

    #[test]
    fn offence_type_needs_location() {
        assert!(offence_type("offences to a burglary in Leeds").is_none());
    }
}
