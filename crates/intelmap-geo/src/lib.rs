//! Coordinate resolvers and reference loaders: offline postcode lookup,
//! airport GeoJSON, place-name cache, and (feature `http`) network clients.

pub mod airports;
pub mod chain;
pub mod error;
pub mod postcodes;
pub mod stations;

#[cfg(feature = "http")]
pub mod http;

pub use airports::{load_airports, parse_airports};
pub use chain::ResolverChain;
pub use error::GeoError;
pub use postcodes::PostcodeLookup;
pub use stations::{StationCache, StationResolver};

#[cfg(feature = "http")]
pub use http::{PlaceSearchClient, PostcodesIo};
