//! Registry Client
//!
//! Normalizes the raw index into [`ComponentDescriptor`]s and keeps the
//! result in an in-memory cache with a time-to-live.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::source::{HttpRegistrySource, RegistrySource};
use crate::config::RegistryConfig;
use crate::error::Result;
use crate::models::ComponentDescriptor;

/// A fetched component list and when it was fetched
#[derive(Debug, Clone)]
pub struct RegistryCache {
    /// Components in registry order
    pub data: Arc<Vec<ComponentDescriptor>>,
    /// When the fetch completed
    pub fetched_at: Instant,
}

impl RegistryCache {
    fn new(data: Vec<ComponentDescriptor>) -> Self {
        Self {
            data: Arc::new(data),
            fetched_at: Instant::now(),
        }
    }

    /// Whether this entry is younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Cached access to the component registry
pub struct RegistryClient {
    source: Arc<dyn RegistrySource>,
    ttl: Duration,
    cache: RwLock<Option<RegistryCache>>,
}

impl RegistryClient {
    /// Create a client over any source
    pub fn new(source: Arc<dyn RegistrySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Create an HTTP-backed client from configuration
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let source = HttpRegistrySource::new(config.url.clone(), config.request_timeout())?;
        Ok(Self::new(Arc::new(source), config.cache_ttl()))
    }

    /// Cache time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the component list.
    ///
    /// Served from cache while it is younger than the TTL unless
    /// `force_reload` is set. A failed fetch returns the error and leaves
    /// whatever was cached before untouched.
    pub async fn get_registry(&self, force_reload: bool) -> Result<Arc<Vec<ComponentDescriptor>>> {
        if !force_reload {
            if let Some(cache) = self.cache.read().await.as_ref() {
                if cache.is_fresh(self.ttl) {
                    trace!("Registry cache hit ({} components)", cache.data.len());
                    return Ok(Arc::clone(&cache.data));
                }
                debug!("Registry cache expired");
            }
        }

        debug!("Fetching component registry from {}", self.source.location());
        let raw = match self.source.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Registry fetch failed: {}", e);
                return Err(e);
            }
        };

        let components: Vec<ComponentDescriptor> =
            raw.into_iter().map(ComponentDescriptor::from).collect();
        let entry = RegistryCache::new(components);
        let data = Arc::clone(&entry.data);

        // Single assignment: concurrent fetches resolve last-write-wins
        *self.cache.write().await = Some(entry);

        info!("Loaded {} components from registry", data.len());
        Ok(data)
    }

    /// Current cache contents without fetching, fresh or not
    pub async fn cached(&self) -> Option<Arc<Vec<ComponentDescriptor>>> {
        self.cache
            .read()
            .await
            .as_ref()
            .map(|cache| Arc::clone(&cache.data))
    }

    /// Drop the cached list so the next call fetches
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("source", &self.source.location())
            .field("ttl", &self.ttl)
            .finish()
    }
}
