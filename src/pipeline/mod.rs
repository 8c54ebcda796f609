//! Pipeline orchestration
//!
//! State-free composition of the other components: fetch the listing once,
//! extract candidates, resolve their links, fan out concurrent enrichment
//! through the fetch-cache, and assemble the feed.
//!
//! Error containment follows the taxonomy: configuration and listing-level
//! errors abort the run; a candidate with an unresolvable link is dropped;
//! a candidate whose detail fetch or extraction fails degrades to its
//! already-known fields. The assembled sequence always preserves listing
//! order, regardless of the order in which concurrent fetches complete.

use crate::adapter::{AdapterRegistry, SiteAdapter};
use crate::cache::FetchCache;
use crate::config::Config;
use crate::feed::{Candidate, Detail, Feed, FeedItem};
use crate::fetch::{build_http_client, fetch_text};
use crate::FeedError;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Orchestrates one or more feed assemblies over a shared client and cache
pub struct Pipeline {
    client: Client,
    cache: Arc<FetchCache<FeedItem>>,
    max_concurrent_fetches: usize,
}

impl Pipeline {
    /// Creates a pipeline with its own cache
    pub fn new(config: &Config) -> crate::Result<Self> {
        let cache = Arc::new(FetchCache::from_config(&config.cache));
        Self::with_cache(config, cache)
    }

    /// Creates a pipeline over an injected cache, so unrelated runs can
    /// share memoized detail fetches
    pub fn with_cache(config: &Config, cache: Arc<FetchCache<FeedItem>>) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent, &config.pipeline)?;
        Ok(Self {
            client,
            cache,
            max_concurrent_fetches: config.pipeline.max_concurrent_fetches as usize,
        })
    }

    /// The cache this pipeline memoizes detail enrichment through
    pub fn cache(&self) -> &Arc<FetchCache<FeedItem>> {
        &self.cache
    }

    /// Looks up a site in the registry and assembles its feed
    pub async fn run_site(
        &self,
        registry: &AdapterRegistry,
        slug: &str,
        category: Option<&str>,
    ) -> crate::Result<Feed> {
        let adapter = registry.get(slug)?;
        self.run(adapter.as_ref(), category).await
    }

    /// Assembles a feed for one adapter and category
    pub async fn run(
        &self,
        adapter: &dyn SiteAdapter,
        category: Option<&str>,
    ) -> crate::Result<Feed> {
        let category = match category {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => adapter
                .default_category()
                .ok_or_else(|| FeedError::UnknownCategory {
                    site: adapter.slug().to_string(),
                    category: String::new(),
                })?
                .to_string(),
        };

        let source = adapter.listing_source(&category)?;
        tracing::info!(
            site = adapter.slug(),
            category = %category,
            url = %source.url,
            "fetching listing"
        );

        // Listing failure is pipeline-fatal: nothing can be produced
        // without a listing.
        let listing = fetch_text(&self.client, &source.url)
            .await
            .map_err(|e| FeedError::ListingFetch {
                url: source.url.clone(),
                source: e,
            })?;

        let candidates = adapter.extract_listing(&listing.body, &category)?;
        tracing::debug!(count = candidates.len(), "extracted listing candidates");

        let mut resolved = Vec::with_capacity(candidates.len());
        let mut dropped = 0usize;
        for candidate in candidates {
            match adapter.resolve_link(&candidate.raw_link, &source.resolve) {
                Ok(link) => resolved.push((candidate, link)),
                Err(e) => {
                    dropped += 1;
                    tracing::warn!(
                        raw = %candidate.raw_link,
                        error = %e,
                        "dropping candidate with unresolvable link"
                    );
                }
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "candidates dropped during link resolution");
        }

        // Fan out enrichment, bounded by the configured width. join_all
        // yields results in input order, which reassembles the feed by
        // original index no matter when each fetch completes.
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let enrichments = resolved.into_iter().map(|(candidate, link)| {
            let semaphore = semaphore.clone();
            let category = category.as_str();
            async move {
                match candidate.detail {
                    Detail::Inline(mut item) => {
                        item.link = link;
                        item
                    }
                    Detail::Fetch => {
                        let _permit = semaphore.acquire_owned().await.ok();
                        self.enrich_one(adapter, &candidate, &link, category).await
                    }
                }
            }
        });
        let items = join_all(enrichments).await;

        Ok(Feed {
            title: source.feed_title,
            link: source.feed_link,
            description: source.feed_description,
            items,
        })
    }

    /// Fetches and enriches one candidate through the cache, degrading to a
    /// fallback item on any per-item failure
    async fn enrich_one(
        &self,
        adapter: &dyn SiteAdapter,
        candidate: &Candidate,
        link: &str,
        category: &str,
    ) -> FeedItem {
        let client = self.client.clone();
        let result = self
            .cache
            .get_or_compute(link, || async move {
                let page = fetch_text(&client, link).await?;
                Ok(adapter.enrich(candidate, link, &page.body, category))
            })
            .await;

        match result {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(link, error = %e, "detail enrichment failed, using fallback item");
                FeedItem::fallback(candidate.raw_title.trim(), link)
            }
        }
    }
}
