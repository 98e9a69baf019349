//! Report, entry, and extracted-entity types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Shift by a fixed number of degrees on both axes.
    pub fn offset(self, delta: f64) -> Self {
        Self {
            lat: self.lat + delta,
            lng: self.lng + delta,
        }
    }
}

/// The three header lines of an intel report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    /// e.g. `IR7734`
    pub report_id: String,
    /// e.g. `OP NIGHTJAR`
    pub operation_name: String,
    pub date: String,
}

impl ReportHeader {
    /// `"<report id> <operation name>"`, used as the intel reference on every node.
    pub fn reference(&self) -> String {
        format!("{} {}", self.report_id, self.operation_name)
    }
}

/// A segmented intel report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub header: ReportHeader,
    /// Numbered entries in source order. Never contains index 0.
    pub entries: Vec<Entry>,
    /// Empty when the report has no provenance line.
    pub provenance: String,
}

/// One numbered statement in a report, with everything extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub index: u64,
    pub text: String,
    #[serde(flatten)]
    pub extracted: Extraction,
}

/// Everything the recognizers pulled out of a single entry's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub source: Option<String>,
    pub grading: Option<Grading>,
    pub offence_type: Option<String>,
    pub persons: Vec<PersonMention>,
    pub addresses: Vec<AddressMention>,
    pub phones: Vec<String>,
    pub vehicles: Vec<Vehicle>,
    pub pnc_ids: Vec<String>,
    pub flights: Vec<Flight>,
    pub passports: Vec<Passport>,
}

/// A `Firstname SURNAME` mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonMention {
    pub first_name: String,
    pub surname: String,
    pub full_name: String,
    pub dob: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressContext {
    Home,
    Offence,
    Other,
}

/// A postcode-anchored address mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMention {
    pub full: String,
    /// As written in the source text.
    pub postcode: String,
    /// Uppercase, whitespace stripped. The identity key.
    pub normalised: String,
    pub context: AddressContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Uppercase VRM with whitespace stripped.
    pub vrm: String,
    pub since: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub code: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub number: String,
    pub nationality: Option<String>,
    pub expiry: Option<String>,
}

/// A 2-3 character reliability code such as `2AC`.
///
/// Characters are kept as written; decoding against the fixed tables happens
/// in [`Grading::source_meaning`] and friends. A character outside a table
/// decodes to an empty string rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grading {
    pub source_reliability: char,
    pub intel_reliability: char,
    pub handling: Option<char>,
}

impl Grading {
    pub fn code(&self) -> String {
        let mut code = String::with_capacity(3);
        code.push(self.source_reliability);
        code.push(self.intel_reliability);
        if let Some(h) = self.handling {
            code.push(h);
        }
        code
    }

    pub fn source_meaning(&self) -> &'static str {
        match self.source_reliability {
            '1' => "Known to be reliable",
            '2' => "Usually reliable",
            '3' => "Not usually reliable",
            '4' => "Unreliable",
            '5' => "Untested source",
            _ => "",
        }
    }

    pub fn intel_meaning(&self) -> &'static str {
        match self.intel_reliability {
            'A' => "Known directly",
            'B' => "Known indirectly",
            'C' => "Not known personally",
            'D' => "Not known",
            'E' => "Suspected to be true",
            _ => "",
        }
    }

    pub fn handling_meaning(&self) -> &'static str {
        match self.handling {
            Some('P') => "May be disseminated",
            Some('C') => "Disseminate with conditions",
            _ => "",
        }
    }

    /// Non-empty meanings joined with `" / "`.
    pub fn decode(&self) -> String {
        [
            self.source_meaning(),
            self.intel_meaning(),
            self.handling_meaning(),
        ]
        .into_iter()
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grading(s: char, i: char, h: Option<char>) -> Grading {
        Grading {
            source_reliability: s,
            intel_reliability: i,
            handling: h,
        }
    }

    #[test]
    fn code_includes_handling_when_present() {
        assert_eq!(grading('2', 'A', Some('C')).code(), "2AC");
        assert_eq!(grading('1', 'B', None).code(), "1B");
    }

    #[test]
    fn decode_joins_all_three_tables() {
        assert_eq!(
            grading('2', 'A', Some('C')).decode(),
            "Usually reliable / Known directly / Disseminate with conditions"
        );
    }

    #[test]
    fn decode_skips_unknown_characters() {
        assert_eq!(grading('9', 'C', None).decode(), "Not known personally");
        // `A`/`B` in the handling slot have no meaning.
        assert_eq!(
            grading('3', 'B', Some('A')).decode(),
            "Not usually reliable / Known indirectly"
        );
    }

    #[test]
    fn offset_moves_both_axes() {
        let p = LatLng::new(51.5, -0.1).offset(0.0012);
        assert!((p.lat - 51.5012).abs() < 1e-12);
        assert!((p.lng - -0.0988).abs() < 1e-12);
    }

    #[test]
    fn header_reference() {
        let header = ReportHeader {
            report_id: "IR77".into(),
            operation_name: "OP TESTCASE".into(),
            date: "01/01/2024".into(),
        };
        assert_eq!(header.reference(), "IR77 OP TESTCASE");
    }
}
