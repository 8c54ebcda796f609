use crate::adapter::{EnvNewsAdapter, SiteAdapter, SonyJpAdapter};
use crate::FeedError;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry mapping site slugs to their adapters
///
/// An unknown slug is a configuration error surfaced to the caller; there is
/// no fallback adapter.
pub struct AdapterRegistry {
    adapters: HashMap<&'static str, Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Creates a registry with all built-in site adapters
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EnvNewsAdapter));
        registry.register(Arc::new(SonyJpAdapter));
        registry
    }

    /// Registers an adapter under its slug, replacing any previous one
    pub fn register(&mut self, adapter: Arc<dyn SiteAdapter>) {
        self.adapters.insert(adapter.slug(), adapter);
    }

    /// Looks up an adapter by slug
    pub fn get(&self, slug: &str) -> crate::Result<Arc<dyn SiteAdapter>> {
        self.adapters
            .get(slug)
            .cloned()
            .ok_or_else(|| FeedError::UnknownSite(slug.to_string()))
    }

    /// Registered slugs, sorted for stable display
    pub fn slugs(&self) -> Vec<&'static str> {
        let mut slugs: Vec<_> = self.adapters.keys().copied().collect();
        slugs.sort_unstable();
        slugs
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
