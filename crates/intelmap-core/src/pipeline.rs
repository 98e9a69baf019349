//! The composed import: classify, segment, aggregate, geocode, build, summarise.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::classify::is_recognised_report;
use crate::config::PipelineConfig;
use crate::error::ImportError;
use crate::geocode::{CoordinateResolver, GeocodingOrchestrator};
use crate::graph::{Connection, FlightArc, GraphBuilder, GraphEntity, MapSurface};
use crate::icons::IconCatalogue;
use crate::model::{LatLng, Report};
use crate::reference::{ReferenceIndex, ReferencePlace};
use crate::segment::segment;
use crate::summary::{SummaryReport, summarize};

/// Everything one import produced.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub summary: SummaryReport,
    pub report: Report,
    pub entities: Vec<GraphEntity>,
    pub connections: Vec<Connection>,
    pub arcs: Vec<FlightArc>,
    /// South-west and north-east corners of all placed nodes.
    pub bounds: Option<(LatLng, LatLng)>,
}

/// Collaborators for an import run. The pipeline owns no caches of its own.
pub struct Pipeline<'a> {
    /// Postcode resolver.
    pub resolver: &'a dyn CoordinateResolver,
    pub airports: &'a ReferenceIndex,
    /// Consulted for IATA codes missing from `airports`.
    pub place_resolver: Option<&'a dyn CoordinateResolver>,
    pub icons: &'a dyn IconCatalogue,
    pub config: PipelineConfig,
}

impl Pipeline<'_> {
    /// Import one report. `source_hint` (usually a file name) is only logged.
    pub async fn run(
        &self,
        text: &str,
        source_hint: &str,
        surface: &mut dyn MapSurface,
    ) -> Result<ImportResult, ImportError> {
        if !is_recognised_report(text) {
            return Err(ImportError::NotRecognised);
        }

        let report = segment(text);
        info!(
            source = %source_hint,
            report = %report.header.report_id,
            entries = report.entries.len(),
            "parsed intel report"
        );
        if report.entries.is_empty() {
            return Err(ImportError::NoEntries {
                report_id: report.header.report_id.clone(),
            });
        }

        let aggregated = aggregate(&report.entries);
        debug!(
            persons = aggregated.persons.len(),
            addresses = aggregated.addresses.len(),
            vehicles = aggregated.vehicles.len(),
            flights = aggregated.flights.len(),
            "aggregated entities"
        );

        let coordinates = GeocodingOrchestrator::new(self.resolver)
            .with_batch_size(self.config.geocode_batch_size)
            .resolve_all(aggregated.addresses.iter().map(|a| a.normalised.clone()))
            .await;

        let codes: BTreeSet<&str> = aggregated
            .flights
            .iter()
            .flat_map(|f| [f.origin.as_deref(), f.destination.as_deref()])
            .flatten()
            .collect();
        let airports = self.airports_for(codes).await;

        let builder = GraphBuilder {
            report: &report,
            aggregated: &aggregated,
            coordinates: &coordinates,
            airports: &airports,
            icons: self.icons,
            config: &self.config,
        };
        let graph = builder.build(surface);
        let summary = summarize(&report, &graph.stats, &aggregated);
        let bounds = graph.bounds();

        Ok(ImportResult {
            summary,
            report,
            entities: graph.entities,
            connections: graph.connections,
            arcs: graph.arcs,
            bounds,
        })
    }

    /// Look codes up in the reference index, then send the rest to the
    /// place resolver if there is one.
    async fn airports_for(&self, codes: BTreeSet<&str>) -> HashMap<String, ReferencePlace> {
        let mut found = HashMap::new();
        let mut missing = Vec::new();
        for code in codes {
            match self.airports.get(code) {
                Some(place) => {
                    found.insert(code.to_string(), place.clone());
                }
                None => missing.push(code.to_string()),
            }
        }

        if let Some(resolver) = self.place_resolver.filter(|_| !missing.is_empty()) {
            debug!(codes = ?missing, "airports missing from index");
            let resolved = GeocodingOrchestrator::new(resolver)
                .with_batch_size(self.config.geocode_batch_size)
                .resolve_all(missing)
                .await;
            for (code, coordinates) in resolved {
                found.insert(
                    code.clone(),
                    ReferencePlace {
                        name: code.clone(),
                        code,
                        coordinates,
                    },
                );
            }
        }
        found
    }
}
