//! Inkfeed: a site-to-feed normalization pipeline
//!
//! This crate ingests heterogeneous, site-specific web content (listing pages,
//! detail pages, JSONP endpoints) and normalizes it into a uniform feed-item
//! representation: extract candidates from a listing, resolve their links to
//! canonical absolute form, fan out concurrent detail fetches through a
//! single-flight cache, and assemble a feed that preserves listing order.

pub mod adapter;
pub mod cache;
pub mod config;
pub mod datetime;
pub mod feed;
pub mod fetch;
pub mod jsonp;
pub mod link;
pub mod pipeline;
pub mod render;

use thiserror::Error;

/// Main error type for Inkfeed operations
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("Unknown category '{category}' for site '{site}'")]
    UnknownCategory { site: String, category: String },

    #[error("Listing fetch failed for {url}: {source}")]
    ListingFetch { url: String, source: FetchError },

    #[error("Listing parse failed for {url}: {message}")]
    ListingParse { url: String, message: String },

    #[error("JSONP decode error: {0}")]
    Jsonp(#[from] JsonpError),

    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Link-resolution errors (per-candidate, never pipeline-fatal)
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("Empty link")]
    Empty,

    #[error("Malformed link '{raw}': {message}")]
    Malformed { raw: String, message: String },
}

/// HTTP fetch errors, classified for per-item handling
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Cache computation errors, cloneable so every waiter on a key receives
/// the same failure
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Computation failed for {key}: {message}")]
    Compute { key: String, message: String },

    #[error("Computation for {key} was abandoned")]
    Abandoned { key: String },
}

/// JSONP envelope decoding errors (pipeline-fatal: no partial listing)
#[derive(Debug, Error)]
pub enum JsonpError {
    #[error("Missing JSONP callback wrapper")]
    MissingWrapper,

    #[error("Invalid JSON inside JSONP wrapper: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("JSONP payload has no 'items' sequence")]
    MissingItems,
}

/// Result type alias for Inkfeed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for link resolution
pub type LinkResult<T> = std::result::Result<T, LinkError>;

// Re-export commonly used types
pub use adapter::{AdapterRegistry, SiteAdapter};
pub use cache::FetchCache;
pub use config::Config;
pub use feed::{Candidate, Detail, Feed, FeedItem};
pub use link::{classify_link, resolve_link, LinkKind, ResolveContext};
pub use pipeline::Pipeline;
