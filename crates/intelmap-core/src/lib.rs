pub mod aggregate;
pub mod arc;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod graph;
pub mod icons;
pub mod model;
pub mod pipeline;
pub mod postcode;
pub mod reference;
pub mod segment;
pub mod summary;

pub use aggregate::{AggregatedSet, Person, aggregate};
pub use arc::great_circle_arc;
pub use classify::is_recognised_report;
pub use config::PipelineConfig;
pub use error::{ImportError, ResolveError};
pub use extract::extract;
pub use geocode::{CoordinateResolver, GeocodingOrchestrator};
pub use graph::{GraphBuilder, GraphOutput, GraphStats, MapSurface, SequentialSurface};
pub use icons::{IconCatalogue, StaticIconCatalogue};
pub use model::{LatLng, Report};
pub use pipeline::{ImportResult, Pipeline};
pub use postcode::normalize_postcode;
pub use reference::{ReferenceIndex, ReferencePlace};
pub use segment::segment;
pub use summary::{SummaryReport, summarize};
