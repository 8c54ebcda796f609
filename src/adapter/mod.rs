//! Site adapters
//!
//! Each supported site implements [`SiteAdapter`] once: where its listing
//! lives, how candidates are extracted from it, how raw hrefs resolve, and
//! how detail content is normalized into feed items. The orchestrator is
//! adapter-agnostic; per-site rules never leak into shared pipeline logic.

mod envnews;
mod registry;
mod sonyjp;

pub use envnews::EnvNewsAdapter;
pub use registry::AdapterRegistry;
pub use sonyjp::SonyJpAdapter;

use crate::feed::{Candidate, FeedItem};
use crate::link::ResolveContext;
use crate::LinkError;

/// Where a category's listing lives and what the resulting feed is called
#[derive(Debug, Clone)]
pub struct ListingSource {
    /// The listing resource to fetch (HTML page or JSONP endpoint)
    pub url: String,
    /// Feed title
    pub feed_title: String,
    /// Public link presented on the feed
    pub feed_link: String,
    /// Optional feed description
    pub feed_description: Option<String>,
    /// Base URLs raw candidate links resolve against
    pub resolve: ResolveContext,
}

/// Per-site adapter rule set
///
/// `extract_listing` and `listing_source` may fail (configuration or listing
/// parse errors are fatal to the run). `enrich` is infallible by contract:
/// extraction problems degrade the single item to its already-known fields.
pub trait SiteAdapter: Send + Sync {
    /// Stable identifier used for registry lookup and route selection
    fn slug(&self) -> &'static str;

    /// Category assumed when the caller names none
    fn default_category(&self) -> Option<&'static str> {
        None
    }

    /// Resolves a category to its listing source.
    /// Unknown categories are a configuration error, never a silent default.
    fn listing_source(&self, category: &str) -> crate::Result<ListingSource>;

    /// Parses a listing resource into candidates in document order
    fn extract_listing(&self, body: &str, category: &str) -> crate::Result<Vec<Candidate>>;

    /// Resolves a raw candidate link to canonical absolute form.
    /// The default is the shared three-way classification.
    fn resolve_link(&self, raw: &str, ctx: &ResolveContext) -> Result<String, LinkError> {
        crate::link::resolve_link(raw, ctx)
    }

    /// Normalizes a fetched detail page into a feed item
    fn enrich(
        &self,
        candidate: &Candidate,
        link: &str,
        detail_body: &str,
        category: &str,
    ) -> FeedItem;
}
