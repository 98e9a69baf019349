//! Import pipeline wiring: resolvers from CLI flags, one report through the core pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use intelmap_core::{
    CoordinateResolver, IconCatalogue, ImportResult, Pipeline, PipelineConfig, ReferenceIndex,
    SequentialSurface, StaticIconCatalogue,
};
use intelmap_geo::{
    PlaceSearchClient, PostcodeLookup, PostcodesIo, ResolverChain, StationCache, StationResolver,
    load_airports,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::GeoArgs;

#[derive(Debug)]
pub struct ImportStats {
    pub elapsed_secs: f64,
}

/// Resolvers and reference data built from [`GeoArgs`].
pub struct Resolvers {
    pub postcodes: ResolverChain,
    pub airports: ReferenceIndex,
    /// Station/place names, e.g. for `locate`.
    pub stations: Arc<StationResolver>,
    /// IATA codes missing from the airport index. Shares the station cache.
    pub airport_search: Arc<StationResolver>,
    pub icons: StaticIconCatalogue,
}

impl Resolvers {
    pub fn build(args: &GeoArgs) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(args.timeout_secs);

        let mut postcodes = ResolverChain::new();
        if let Some(path) = &args.postcodes {
            let lookup = PostcodeLookup::load(path)
                .with_context(|| format!("loading postcode lookup {}", path.display()))?;
            postcodes = postcodes.with(Arc::new(lookup));
        }
        if !args.offline {
            let api = PostcodesIo::new(&args.postcode_api, timeout)
                .context("building postcode API client")?;
            postcodes = postcodes.with(Arc::new(api));
        }

        let airports = match &args.airports {
            Some(path) => load_airports(path),
            None => ReferenceIndex::default(),
        };

        let cache = Arc::new(StationCache::seeded(&airports));
        let mut stations = StationResolver::new(cache.clone());
        let mut airport_search = StationResolver::new(cache).with_query_suffix("airport");
        if !args.offline {
            let search: Arc<dyn CoordinateResolver> = Arc::new(
                PlaceSearchClient::new(&args.place_search, timeout)
                    .context("building place search client")?,
            );
            stations = stations.with_search(search.clone());
            airport_search = airport_search.with_search(search);
        }

        let icons = match &args.icons {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading icon catalogue {}", path.display()))?;
                StaticIconCatalogue::from_json(&json).context("parsing icon catalogue")?
            }
            None => StaticIconCatalogue::builtin(),
        };

        info!(
            postcode_resolvers = postcodes.len(),
            airports = airports.len(),
            offline = args.offline,
            "resolvers ready"
        );
        Ok(Self {
            postcodes,
            airports,
            stations: Arc::new(stations),
            airport_search: Arc::new(airport_search),
            icons,
        })
    }
}

/// Read report text from `path`. A `.pdf` extension (any case) selects PDF
/// text extraction, with pages joined by newlines.
pub fn read_report(path: &Path) -> anyhow::Result<String> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow::anyhow!("extracting text from {}: {e}", path.display()))?;
    // pdf-extract separates pages with form feeds.
    let pages: Vec<&str> = text.split('\x0C').map(str::trim_end).collect();
    debug!(path = %path.display(), pages = pages.len(), "extracted pdf text");
    Ok(pages.join("\n"))
}

/// Read `path` and run it through the import pipeline.
pub async fn run_import(
    path: &Path,
    args: &GeoArgs,
) -> anyhow::Result<(ImportResult, ImportStats)> {
    let start = Instant::now();
    let text = read_report(path)?;
    let resolvers = Resolvers::build(args)?;

    let config = PipelineConfig {
        arc_segments: args.arc_segments,
        ..PipelineConfig::default()
    };
    let icons: &dyn IconCatalogue = &resolvers.icons;
    let airport_search: &dyn CoordinateResolver = resolvers.airport_search.as_ref();
    let pipeline = Pipeline {
        resolver: &resolvers.postcodes,
        airports: &resolvers.airports,
        place_resolver: Some(airport_search),
        icons,
        config,
    };

    let hint = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let result = pipeline
        .run(&text, &hint, &mut SequentialSurface::default())
        .await
        .with_context(|| format!("importing {}", path.display()))?;

    Ok((
        result,
        ImportStats {
            elapsed_secs: start.elapsed().as_secs_f64(),
        },
    ))
}

/// `--json` output document.
#[derive(Serialize)]
pub struct JsonImport<'a> {
    pub source: String,
    pub imported_at: String,
    #[serde(flatten)]
    pub result: &'a ImportResult,
}

impl<'a> JsonImport<'a> {
    pub fn new(path: &Path, result: &'a ImportResult) -> Self {
        Self {
            source: path.display().to_string(),
            imported_at: Utc::now().to_rfc3339(),
            result,
        }
    }
}
