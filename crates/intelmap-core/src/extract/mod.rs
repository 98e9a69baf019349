//! Per-entry entity extraction.
//!
//! Each recognizer lives in its own module and scans the full entry text
//! independently. A recognizer that finds nothing yields an empty list or
//! `None`; extraction never fails.

mod addresses;
mod identifiers;
mod persons;
mod tags;
mod travel;

pub use addresses::addresses;
pub use identifiers::{phones, pnc_ids, vehicles};
pub use persons::persons;
pub use tags::{SOURCE_VOCABULARY, grading, offence_type, source};
pub use travel::{flight, passport};

use crate::model::Extraction;

/// Run every recognizer over one entry's text.
pub fn extract(text: &str) -> Extraction {
    Extraction {
        source: source(text),
        grading: grading(text),
        offence_type: offence_type(text),
        persons: persons(text),
        addresses: addresses(text),
        phones: phones(text),
        vehicles: vehicles(text),
        pnc_ids: pnc_ids(text),
        flights: flight(text).into_iter().collect(),
        passports: passport(text).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AddressContext;

    const ENTRY: &str = "John SMITH DOB 03/04/1981 lives at 22 Mill Lane, Leeds LS6 2AB. \
        He is keeper of VRM YK19 ABC since 2021 and uses 07700 900456. PNCID 19123456X. \
        (PNC) (1AP)";

    #[test]
    fn extract_is_deterministic() {
        assert_eq!(extract(ENTRY), extract(ENTRY));
    }

    #[test]
    fn extract_populates_every_field() {
        let e = extract(ENTRY);
        assert_eq!(e.persons.len(), 1);
        assert_eq!(e.persons[0].dob.as_deref(), Some("03/04/1981"));
        assert_eq!(e.addresses[0].normalised, "LS62AB");
        assert_eq!(e.addresses[0].context, AddressContext::Home);
        assert_eq!(e.phones, vec!["07700900456"]);
        assert_eq!(e.vehicles[0].vrm, "YK19ABC");
        assert_eq!(e.vehicles[0].since.as_deref(), Some("2021"));
        assert_eq!(e.pnc_ids, vec!["19123456X"]);
        assert_eq!(e.source.as_deref(), Some("PNC"));
        // The grading pattern only admits A-C in the handling slot.
        assert!(e.grading.is_none());
        assert!(e.flights.is_empty());
        assert!(e.passports.is_empty());
    }

    #[test]
    fn empty_text_extracts_nothing() {
        assert_eq!(extract(""), Extraction::default());
    }
}
