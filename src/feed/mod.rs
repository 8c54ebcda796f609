//! Feed data model
//!
//! The uniform representation every site adapter normalizes into, plus the
//! transient candidate shape produced by listing extraction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A normalized feed item
///
/// `link` is always canonical (absolute). `guid` is unique within one feed
/// assembly; when a source has no natural identifier it is derived
/// deterministically from stable fields via [`derived_guid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    pub description: String,
    pub guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FeedItem {
    /// A minimal item carrying only what the listing already knew.
    /// Used as the degraded form when detail enrichment fails.
    pub fn fallback(title: &str, link: &str) -> Self {
        Self {
            title: title.to_string(),
            link: link.to_string(),
            pub_date: None,
            description: String::new(),
            guid: link.to_string(),
            category: None,
        }
    }
}

/// How a candidate's detail content is obtained
#[derive(Debug, Clone)]
pub enum Detail {
    /// The detail page must be fetched and passed to the adapter's `enrich`
    Fetch,
    /// The item was fully assembled from the listing payload; no detail
    /// fetch is needed (its `link` is overwritten with the canonical form)
    Inline(FeedItem),
}

/// A listing-page-derived candidate, not yet enriched
///
/// `raw_link` may be relative, protocol-relative, or absolute. Titles are
/// trimmed by the extractor; an empty title is allowed to pass through for
/// the enricher to resolve.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub raw_title: String,
    pub raw_link: String,
    pub detail: Detail,
}

impl Candidate {
    /// Candidate whose detail page will be fetched and enriched
    pub fn fetched(raw_title: impl Into<String>, raw_link: impl Into<String>) -> Self {
        Self {
            raw_title: raw_title.into(),
            raw_link: raw_link.into(),
            detail: Detail::Fetch,
        }
    }

    /// Candidate fully assembled at listing time
    pub fn inline(raw_link: impl Into<String>, item: FeedItem) -> Self {
        Self {
            raw_title: item.title.clone(),
            raw_link: raw_link.into(),
            detail: Detail::Inline(item),
        }
    }
}

/// The assembled feed handed to serialization layers
#[derive(Debug, Clone, Serialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "item")]
    pub items: Vec<FeedItem>,
}

/// Derives a deterministic guid from stable fields
///
/// Identical inputs always produce the same guid, so repeated assemblies of
/// the same source content agree on item identity.
pub fn derived_guid(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_keeps_title_and_link() {
        let item = FeedItem::fallback("Title", "https://example.com/a");
        assert_eq!(item.title, "Title");
        assert_eq!(item.link, "https://example.com/a");
        assert_eq!(item.description, "");
        assert!(item.pub_date.is_none());
    }

    #[test]
    fn test_derived_guid_deterministic() {
        let a = derived_guid(&["Title", "2024-01-01"]);
        let b = derived_guid(&["Title", "2024-01-01"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_derived_guid_distinguishes_field_boundaries() {
        // "ab" + "c" must not collide with "a" + "bc"
        assert_ne!(derived_guid(&["ab", "c"]), derived_guid(&["a", "bc"]));
    }

    #[test]
    fn test_feed_serializes_items_under_item_key() {
        let feed = Feed {
            title: "t".to_string(),
            link: "https://example.com/".to_string(),
            description: None,
            items: vec![],
        };
        let json = serde_json::to_value(&feed).unwrap();
        assert!(json.get("item").is_some());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_item_omits_absent_pub_date() {
        let item = FeedItem::fallback("t", "https://example.com/a");
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("pubDate").is_none());
    }
}
