//! Folds per-entry extractions into report-wide unique records.
//!
//! Keys: person full name, address normalised postcode, vehicle VRM. First
//! seen wins for field values, except a person's date of birth, which is
//! backfilled from later entries when still unset. Flights and passports are
//! never deduplicated.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{AddressMention, Entry, Flight, Passport, Vehicle};

/// A person merged across entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub full_name: String,
    pub first_name: String,
    pub surname: String,
    pub dob: Option<String>,
    /// Source tag of every mentioning entry, in entry order. `None` for untagged entries.
    pub sources: Vec<Option<String>>,
}

/// Report-wide entity sets plus first-mention lookups.
///
/// The `*_entry` maps hold positions into the `entries` slice that was
/// aggregated, not entry numbers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedSet {
    pub persons: Vec<Person>,
    pub addresses: Vec<AddressMention>,
    pub vehicles: Vec<Vehicle>,
    pub flights: Vec<Flight>,
    pub passports: Vec<Passport>,
    pub phones: Vec<String>,
    pub pnc_ids: Vec<String>,
    #[serde(skip)]
    pub address_entry: HashMap<String, usize>,
    #[serde(skip)]
    pub vehicle_entry: HashMap<String, usize>,
    #[serde(skip)]
    pub flight_entry: HashMap<String, usize>,
}

impl AggregatedSet {
    /// The first person aggregated; every connection starts here.
    pub fn primary_person(&self) -> Option<&Person> {
        self.persons.first()
    }

    /// The first address recorded with home context.
    pub fn home_address(&self) -> Option<&AddressMention> {
        self.addresses
            .iter()
            .find(|a| a.context == crate::model::AddressContext::Home)
    }

    pub fn address(&self, normalised: &str) -> Option<&AddressMention> {
        self.addresses.iter().find(|a| a.normalised == normalised)
    }
}

/// Aggregate `entries` in order.
pub fn aggregate(entries: &[Entry]) -> AggregatedSet {
    let mut set = AggregatedSet::default();
    let mut person_pos: HashMap<String, usize> = HashMap::new();
    let mut phones_seen = HashSet::new();
    let mut pnc_seen = HashSet::new();

    for (pos, entry) in entries.iter().enumerate() {
        let data = &entry.extracted;

        for mention in &data.persons {
            let idx = *person_pos
                .entry(mention.full_name.clone())
                .or_insert_with(|| {
                    set.persons.push(Person {
                        full_name: mention.full_name.clone(),
                        first_name: mention.first_name.clone(),
                        surname: mention.surname.clone(),
                        dob: None,
                        sources: Vec::new(),
                    });
                    set.persons.len() - 1
                });
            let person = &mut set.persons[idx];
            person.sources.push(data.source.clone());
            if person.dob.is_none() {
                person.dob = mention.dob.clone();
            }
        }

        for address in &data.addresses {
            if !set.address_entry.contains_key(&address.normalised) {
                set.address_entry.insert(address.normalised.clone(), pos);
                set.addresses.push(address.clone());
            }
        }

        for vehicle in &data.vehicles {
            if !set.vehicle_entry.contains_key(&vehicle.vrm) {
                set.vehicle_entry.insert(vehicle.vrm.clone(), pos);
                set.vehicles.push(vehicle.clone());
            }
        }

        for flight in &data.flights {
            set.flight_entry.entry(flight.code.clone()).or_insert(pos);
            set.flights.push(flight.clone());
        }

        for phone in &data.phones {
            if phones_seen.insert(phone.clone()) {
                set.phones.push(phone.clone());
            }
        }
        for pnc in &data.pnc_ids {
            if pnc_seen.insert(pnc.clone()) {
                set.pnc_ids.push(pnc.clone());
            }
        }

        set.passports.extend(data.passports.iter().cloned());
    }

    set
}
