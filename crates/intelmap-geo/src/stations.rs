//! Place-name resolution backed by a process-lifetime cache.
//!
//! The cache is keyed by the lowercased, trimmed name. It is seeded once
//! from a reference index and only ever grows: network hits are appended,
//! nothing is evicted.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use intelmap_core::{CoordinateResolver, LatLng, ReferenceIndex, ResolveError};
use tracing::{debug, warn};

pub const DEFAULT_QUERY_SUFFIX: &str = "railway station uk";

#[derive(Debug, Default)]
pub struct StationCache {
    entries: RwLock<HashMap<String, LatLng>>,
}

impl StationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with every place's name and code.
    pub fn seeded(index: &ReferenceIndex) -> Self {
        let mut entries = HashMap::with_capacity(index.len() * 2);
        for place in index.iter() {
            entries.insert(cache_key(&place.name), place.coordinates);
            entries.insert(cache_key(&place.code), place.coordinates);
        }
        entries.remove("");
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn get(&self, name: &str) -> Option<LatLng> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&cache_key(name)).copied()
    }

    pub fn insert(&self, name: &str, coordinates: LatLng) {
        let key = cache_key(name);
        if key.is_empty() {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, coordinates);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cache_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Resolves place names from the cache first, then an optional search backend.
///
/// The search backend is queried with `"<name> <suffix>"`. Its failures are
/// logged once and reported as no result.
pub struct StationResolver {
    cache: Arc<StationCache>,
    search: Option<Arc<dyn CoordinateResolver>>,
    suffix: String,
}

impl StationResolver {
    pub fn new(cache: Arc<StationCache>) -> Self {
        Self {
            cache,
            search: None,
            suffix: DEFAULT_QUERY_SUFFIX.to_string(),
        }
    }

    pub fn with_search(mut self, search: Arc<dyn CoordinateResolver>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn cache(&self) -> &StationCache {
        &self.cache
    }
}

#[async_trait]
impl CoordinateResolver for StationResolver {
    async fn resolve(&self, name: &str) -> Result<Option<LatLng>, ResolveError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(hit) = self.cache.get(name) {
            debug!(name = %name, "place cache hit");
            return Ok(Some(hit));
        }
        let Some(search) = &self.search else {
            return Ok(None);
        };

        let query = if self.suffix.is_empty() {
            name.to_string()
        } else {
            format!("{name} {}", self.suffix)
        };
        match search.resolve(&query).await {
            Ok(Some(coords)) => {
                self.cache.insert(name, coords);
                Ok(Some(coords))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(name = %name, error = %e, "place search failed");
                Ok(None)
            }
        }
    }
}
