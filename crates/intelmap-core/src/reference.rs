//! Pre-loaded reference places keyed by short code (airports by IATA code).
//!
//! Built once by a loader, then only read. Share it behind an `Arc` when
//! several consumers need it.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::LatLng;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferencePlace {
    pub code: String,
    pub name: String,
    pub coordinates: LatLng,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    places: HashMap<String, ReferencePlace>,
}

impl ReferenceIndex {
    /// Build from places; codes are uppercased and later duplicates win.
    pub fn from_places(places: impl IntoIterator<Item = ReferencePlace>) -> Self {
        let places = places
            .into_iter()
            .map(|mut p| {
                p.code = p.code.to_ascii_uppercase();
                (p.code.clone(), p)
            })
            .collect();
        Self { places }
    }

    /// Case-insensitive lookup by code.
    pub fn get(&self, code: &str) -> Option<&ReferencePlace> {
        self.places.get(&code.to_ascii_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferencePlace> {
        self.places.values()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
