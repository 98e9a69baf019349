//! Airport reference index from a GeoJSON FeatureCollection.
//!
//! Each feature needs an IATA code (`iata_code`, `iata` or `IATA` property)
//! and `[lng, lat]` point coordinates. Features missing either are skipped.
//! Names come from `name` or `NAME`, title-cased, falling back to the code.

use std::path::Path;

use intelmap_core::graph::title_case;
use intelmap_core::{LatLng, ReferenceIndex, ReferencePlace};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::GeoError;

const CODE_KEYS: &[&str] = &["iata_code", "iata", "IATA"];
const NAME_KEYS: &[&str] = &["name", "NAME"];

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Map<String, Value>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Value,
}

/// Parse a GeoJSON document into an index keyed by uppercase IATA code.
pub fn parse_airports(json: &str) -> Result<ReferenceIndex, GeoError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    let places = collection.features.into_iter().filter_map(|f| {
        let code = first_str(&f.properties, CODE_KEYS)?.to_ascii_uppercase();
        let coordinates = point(&f.geometry?.coordinates)?;
        let name = first_str(&f.properties, NAME_KEYS).unwrap_or(&code);
        Some(ReferencePlace {
            name: title_case(name),
            code,
            coordinates,
        })
    });
    Ok(ReferenceIndex::from_places(places))
}

/// Load the airport index from `path`. An unreadable or malformed file
/// yields an empty index and a warning; airports are then simply not placed.
pub fn load_airports(path: &Path) -> ReferenceIndex {
    let loaded = std::fs::read_to_string(path)
        .map_err(GeoError::from)
        .and_then(|json| parse_airports(&json));
    match loaded {
        Ok(index) => {
            info!(path = %path.display(), airports = index.len(), "loaded airport index");
            index
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not load airport index");
            ReferenceIndex::default()
        }
    }
}

fn first_str<'a>(props: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| props.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

fn point(coordinates: &Value) -> Option<LatLng> {
    let pair = coordinates.as_array()?;
    let lng = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GEOJSON: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature",
         "properties": {"iata_code": "lhr", "name": "LONDON HEATHROW AIRPORT"},
         "geometry": {"type": "Point", "coordinates": [-0.4543, 51.47]}},
        {"type": "Feature",
         "properties": {"IATA": "JFK", "NAME": "john f kennedy intl"},
         "geometry": {"type": "Point", "coordinates": [-73.7781, 40.6413]}},
        {"type": "Feature",
         "properties": {"iata": "XYZ"},
         "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
        {"type": "Feature",
         "properties": {"name": "No Code Field"},
         "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
        {"type": "Feature",
         "properties": {"iata_code": "NOG"},
         "geometry": null}
      ]
    }"#;

    #[test]
    fn parses_codes_names_and_lng_lat_order() {
        let index = parse_airports(GEOJSON).unwrap();
        assert_eq!(index.len(), 3);

        let lhr = index.get("LHR").unwrap();
        assert_eq!(lhr.name, "London Heathrow Airport");
        assert_eq!(lhr.coordinates, LatLng::new(51.47, -0.4543));

        assert_eq!(index.get("jfk").unwrap().name, "John F Kennedy Intl");
        assert_eq!(index.get("XYZ").unwrap().name, "Xyz");
        assert!(index.get("NOG").is_none());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GEOJSON.as_bytes()).unwrap();
        let index = load_airports(file.path());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn missing_or_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_airports(&dir.path().join("absent.geojson")).is_empty());

        let bad = dir.path().join("bad.geojson");
        std::fs::write(&bad, "not json").unwrap();
        assert!(load_airports(&bad).is_empty());
    }
}
