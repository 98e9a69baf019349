//! Ordered fallback across several resolvers.

use std::sync::Arc;

use async_trait::async_trait;
use intelmap_core::{CoordinateResolver, LatLng, ResolveError};
use tracing::warn;

/// Tries each resolver in turn; the first `Some` wins.
///
/// A failing link is logged and skipped. The chain only errors when every
/// link errored.
#[derive(Default, Clone)]
pub struct ResolverChain {
    links: Vec<Arc<dyn CoordinateResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: Arc<dyn CoordinateResolver>) -> Self {
        self.links.push(resolver);
        self
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl CoordinateResolver for ResolverChain {
    async fn resolve(&self, key: &str) -> Result<Option<LatLng>, ResolveError> {
        let mut last_err = None;
        let mut any_ok = false;
        for (i, link) in self.links.iter().enumerate() {
            match link.resolve(key).await {
                Ok(Some(coords)) => return Ok(Some(coords)),
                Ok(None) => any_ok = true,
                Err(e) => {
                    warn!(key = %key, link = i, error = %e, "resolver failed, trying next");
                    last_err = Some(e);
                }
            }
        }
        match last_err {
            Some(e) if !any_ok => Err(e),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<LatLng>);
    struct Failing;

    #[async_trait]
    impl CoordinateResolver for Fixed {
        async fn resolve(&self, _key: &str) -> Result<Option<LatLng>, ResolveError> {
            Ok(self.0)
        }
    }

    #[async_trait]
    impl CoordinateResolver for Failing {
        async fn resolve(&self, _key: &str) -> Result<Option<LatLng>, ResolveError> {
            Err(ResolveError::Timeout)
        }
    }

    const HERE: LatLng = LatLng { lat: 51.0, lng: -1.0 };

    #[tokio::test]
    async fn first_hit_wins() {
        let chain = ResolverChain::new()
            .with(Arc::new(Fixed(None)))
            .with(Arc::new(Fixed(Some(HERE))))
            .with(Arc::new(Failing));
        assert_eq!(chain.resolve("X").await.unwrap(), Some(HERE));
    }

    #[tokio::test]
    async fn failure_falls_through() {
        let chain = ResolverChain::new()
            .with(Arc::new(Failing))
            .with(Arc::new(Fixed(Some(HERE))));
        assert_eq!(chain.resolve("X").await.unwrap(), Some(HERE));
    }

    #[tokio::test]
    async fn miss_after_failure_is_none() {
        let chain = ResolverChain::new()
            .with(Arc::new(Failing))
            .with(Arc::new(Fixed(None)));
        assert_eq!(chain.resolve("X").await.unwrap(), None);
    }

    #[tokio::test]
    async fn all_failing_errors() {
        let chain = ResolverChain::new().with(Arc::new(Failing));
        assert!(matches!(chain.resolve("X").await, Err(ResolveError::Timeout)));
        assert_eq!(ResolverChain::new().resolve("X").await.unwrap(), None);
    }
}
