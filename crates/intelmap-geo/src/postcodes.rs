//! Offline postcode lookup loaded from a JSON file:
//! `{"BS15AH": {"lat": 51.4495, "lon": -2.5784}, ...}`.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use intelmap_core::postcode::normalize_postcode;
use intelmap_core::{CoordinateResolver, LatLng, ResolveError};
use serde::Deserialize;
use tracing::info;

use crate::error::GeoError;

#[derive(Deserialize)]
struct Point {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default)]
pub struct PostcodeLookup {
    points: HashMap<String, LatLng>,
}

impl PostcodeLookup {
    pub fn from_json(json: &str) -> Result<Self, GeoError> {
        let raw: HashMap<String, Point> = serde_json::from_str(json)?;
        let points = raw
            .into_iter()
            .map(|(pc, p)| (normalize_postcode(&pc), LatLng::new(p.lat, p.lon)))
            .collect();
        Ok(Self { points })
    }

    pub fn load(path: &Path) -> Result<Self, GeoError> {
        let lookup = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), postcodes = lookup.len(), "loaded postcode lookup");
        Ok(lookup)
    }

    pub fn get(&self, postcode: &str) -> Option<LatLng> {
        self.points.get(&normalize_postcode(postcode)).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[async_trait]
impl CoordinateResolver for PostcodeLookup {
    async fn resolve(&self, key: &str) -> Result<Option<LatLng>, ResolveError> {
        Ok(self.get(key))
    }
}
