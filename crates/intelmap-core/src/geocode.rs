//! Bounded-concurrency coordinate resolution.
//!
//! Keys are resolved in fixed-size batches. Lookups within a batch run
//! concurrently; batches run one after another, so at most `batch_size`
//! lookups are ever in flight. A failed or empty lookup is recorded as
//! absence and logged, never returned as an error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::model::LatLng;

pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Anything that can turn a lookup key (postcode, place name, IATA code)
/// into coordinates.
///
/// `Ok(None)` means the key is well-formed but unknown. Implementations
/// should bound their own latency; a timeout should surface as
/// [`ResolveError::Timeout`].
#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    async fn resolve(&self, key: &str) -> Result<Option<LatLng>, ResolveError>;
}

#[async_trait]
impl<T: CoordinateResolver + ?Sized> CoordinateResolver for Arc<T> {
    async fn resolve(&self, key: &str) -> Result<Option<LatLng>, ResolveError> {
        (**self).resolve(key).await
    }
}

/// Resolves sets of keys through a [`CoordinateResolver`] in sequential batches.
pub struct GeocodingOrchestrator<'a> {
    resolver: &'a dyn CoordinateResolver,
    batch_size: usize,
}

impl<'a> GeocodingOrchestrator<'a> {
    pub fn new(resolver: &'a dyn CoordinateResolver) -> Self {
        Self {
            resolver,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the batch size. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Resolve every distinct key. Keys that fail or resolve to nothing are
    /// absent from the result.
    pub async fn resolve_all<I, S>(&self, keys: I) -> HashMap<String, LatLng>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|k| seen.insert(k.clone()))
            .collect();

        let mut resolved = HashMap::with_capacity(keys.len());
        for (batch_no, batch) in keys.chunks(self.batch_size).enumerate() {
            debug!(batch = batch_no, size = batch.len(), "geocoding batch");
            let results = join_all(batch.iter().map(|key| async move {
                (key, self.resolver.resolve(key).await)
            }))
            .await;

            for (key, result) in results {
                match result {
                    Ok(Some(coords)) => {
                        resolved.insert(key.clone(), coords);
                    }
                    Ok(None) => debug!(key = %key, "no coordinates for key"),
                    Err(e) => warn!(key = %key, error = %e, "coordinate lookup failed"),
                }
            }
        }

        info!(
            requested = keys.len(),
            resolved = resolved.len(),
            "geocoding complete"
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fake resolver: known keys resolve, `ERR*` keys fail, everything
    /// else is unknown. Tracks peak concurrency and call order.
    #[derive(Default)]
    struct FakeResolver {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CoordinateResolver for FakeResolver {
        async fn resolve(&self, key: &str) -> Result<Option<LatLng>, ResolveError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(key.to_string());
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if key.starts_with("ERR") {
                Err(ResolveError::Http("connection reset".into()))
            } else if key.starts_with("KNOWN") {
                Ok(Some(LatLng::new(51.0, key.len() as f64)))
            } else {
                Ok(None)
            }
        }
    }

    #[tokio::test]
    async fn failures_and_misses_become_absence() {
        let fake = FakeResolver::default();
        let orchestrator = GeocodingOrchestrator::new(&fake);
        let resolved = orchestrator
            .resolve_all(["KNOWN1", "ERR1", "MISSING", "KNOWN22"])
            .await;
        assert_eq!(resolved.len(), 2);
        assert!(resolved.contains_key("KNOWN1"));
        assert!(resolved.contains_key("KNOWN22"));
        assert!(!resolved.contains_key("ERR1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_more_than_three_in_flight() {
        let fake = FakeResolver::default();
        let keys: Vec<String> = (0..10).map(|i| format!("KNOWN{i}")).collect();
        let resolved = GeocodingOrchestrator::new(&fake).resolve_all(keys).await;
        assert_eq!(resolved.len(), 10);
        assert!(fake.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn batches_run_in_order() {
        let fake = FakeResolver::default();
        let keys: Vec<String> = (0..7).map(|i| format!("KNOWN{i}")).collect();
        GeocodingOrchestrator::new(&fake).resolve_all(keys).await;
        let calls = fake.calls.lock().unwrap().clone();
        // Every key of batch n is started before any key of batch n+1.
        let batch_of = |k: &str| k.trim_start_matches("KNOWN").parse::<usize>().unwrap() / 3;
        assert!(calls.windows(2).all(|w| batch_of(&w[0]) <= batch_of(&w[1])));
    }

    #[tokio::test]
    async fn duplicate_keys_resolved_once() {
        let fake = FakeResolver::default();
        GeocodingOrchestrator::new(&fake)
            .resolve_all(["KNOWN1", "KNOWN1", "KNOWN1"])
            .await;
        assert_eq!(fake.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn custom_batch_size() {
        let fake = FakeResolver::default();
        let keys: Vec<String> = (0..6).map(|i| format!("KNOWN{i}")).collect();
        GeocodingOrchestrator::new(&fake)
            .with_batch_size(1)
            .resolve_all(keys)
            .await;
        assert_eq!(fake.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_input() {
        let fake = FakeResolver::default();
        let resolved = GeocodingOrchestrator::new(&fake)
            .resolve_all(Vec::<String>::new())
            .await;
        assert!(resolved.is_empty());
    }
}
