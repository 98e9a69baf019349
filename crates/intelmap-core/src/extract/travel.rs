//! Flight and passport recognition. At most one of each per entry.
//!
//! | Text                                              | Result                              |
//! |---------------------------------------------------|-------------------------------------|
//! | `flight code BA123 (LHR) to (JFK) on 05/06/2024`  | BA123, LHR → JFK, 05/06/2024        |
//! | `flight EZY8 (VRM) (LGW)`                         | EZY8, LGW → none (VRM excluded)     |
//! | `(LHR) to (JFK)` with no flight code              | no flight                           |
//! | `PPT 123456789 British, expires 01/02/2030`       | 123456789, British, 01/02/2030      |
//! | `PPT 55 Irish which expired on 03/04/2020`        | 55, Irish, no expiry (`expired`)   |

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Flight, Passport};

static RE_FLIGHT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)flight\s+(?:code\s+)?([A-Z]{2,3}\d{1,4})").unwrap()
});
static RE_IATA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([A-Z]{3})\)").unwrap());
static RE_FLIGHT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Oo]n\s+(\d{2}/\d{2}/\d{4})").unwrap());
static RE_PPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)PPT\s+(\d+)").unwrap());
static RE_NATIONALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PPT\s+\d+\s+([\w\s]+?)(?:,|which|\.|$)").unwrap()
});
static RE_EXPIRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)expires?\s+(?:on\s+)?(\d{2}/\d{2}/\d{4})").unwrap()
});

/// Three-letter parenthesised tags that are report markup, not airports.
const NON_IATA: &[&str] = &["NFD", "DOB", "VRM", "PPT", "PNC", "PND", "SAR", "NCA"];

pub fn flight(text: &str) -> Option<Flight> {
    let code = RE_FLIGHT_CODE.captures(text)?[1].to_string();
    let mut airports = RE_IATA
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|code| !NON_IATA.contains(code));
    let origin = airports.next().map(str::to_string);
    let destination = airports.next().map(str::to_string);
    let date = RE_FLIGHT_DATE.captures(text).map(|c| c[1].to_string());
    Some(Flight {
        code,
        origin,
        destination,
        date,
    })
}

pub fn passport(text: &str) -> Option<Passport> {
    let number = RE_PPT.captures(text)?[1].to_string();
    let nationality = RE_NATIONALITY
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|n| !n.is_empty());
    let expiry = RE_EXPIRY.captures(text).map(|c| c[1].to_string());
    Some(Passport {
        number,
        nationality,
        expiry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_flight() {
        let f = flight("Took flight code BA123 (LHR) to (JFK) on 05/06/2024").unwrap();
        assert_eq!(f.code, "BA123");
        assert_eq!(f.origin.as_deref(), Some("LHR"));
        assert_eq!(f.destination.as_deref(), Some("JFK"));
        assert_eq!(f.date.as_deref(), Some("05/06/2024"));
    }

    #[test]
    fn flight_without_code_keyword() {
        let f = flight("Booked on FLIGHT EZY8 (LGW)").unwrap();
        assert_eq!(f.code, "EZY8");
        assert_eq!(f.origin.as_deref(), Some("LGW"));
        assert_eq!(f.destination, None);
    }

    #[test]
    fn markup_tags_are_not_airports() {
        let f = flight("Subject (DOB) took flight EZY 2404 (VRM) (PNC) (MAN) to (AMS)");
        assert!(f.is_none());
        let f = flight("Subject (DOB) took flight EZY2404 (VRM) (PNC) (MAN) to (AMS)").unwrap();
        assert_eq!(f.origin.as_deref(), Some("MAN"));
        assert_eq!(f.destination.as_deref(), Some("AMS"));
    }

    #[test]
    fn airports_alone_are_not_a_flight() {
        assert!(flight("Travelled (LHR) to (JFK) on 05/06/2024").is_none());
    }

    #[test]
    fn only_first_flight_code_used() {
        let f = flight("flight BA1 (LHR) (CDG) then flight AF2 (CDG) (NCE)").unwrap();
        assert_eq!(f.code, "BA1");
        assert_eq!(f.origin.as_deref(), Some("LHR"));
        assert_eq!(f.destination.as_deref(), Some("CDG"));
    }

    #[test]
    fn passport_with_nationality_and_expiry() {
        let p = passport("Holds PPT 123456789 British, expires 01/02/2030").unwrap();
        assert_eq!(p.number, "123456789");
        assert_eq!(p.nationality.as_deref(), Some("British"));
        assert_eq!(p.expiry.as_deref(), Some("01/02/2030"));
    }

    #[test]
    fn passport_nationality_stops_at_which() {
        let p = passport("PPT 55 Irish which expired on 03/04/2020").unwrap();
        assert_eq!(p.nationality.as_deref(), Some("Irish"));
        assert_eq!(p.expiry, None);
        let p = passport("PPT 55 Irish which expires on 03/04/2020").unwrap();
        assert_eq!(p.expiry.as_deref(), Some("03/04/2020"));
    }

    #[test]
    fn passport_nationality_runs_to_end() {
        let p = passport("ppt 987 Republic of Ireland").unwrap();
        assert_eq!(p.nationality.as_deref(), Some("Republic of Ireland"));
    }

    #[test]
    fn passport_number_only() {
        let p = passport("PPT 42.").unwrap();
        assert_eq!(p.number, "42");
        assert_eq!(p.nationality, None);
        assert_eq!(p.expiry, None);
    }

    #[test]
    fn no_passport() {
        assert!(passport("No travel documents").is_none());
    }
}
