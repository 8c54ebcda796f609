//! Artist-site JSONP adapter (Sony Music Japan artist API)
//!
//! Listing data comes from a JSONP-wrapped API rather than HTML, and every
//! field the feed needs is already in the listing payload, so items are
//! assembled inline with no detail fetch. Two categories exist: `news`
//! (information entries with ids, titles, and dates) and `biography`
//! (milestone entries keyed by a date marker in their `url` field).

use crate::adapter::{ListingSource, SiteAdapter};
use crate::feed::{derived_guid, Candidate, FeedItem};
use crate::link::ResolveContext;
use crate::render::render_description;
use crate::{datetime, jsonp, FeedError};
use serde_json::Value;
use sha2::{Digest, Sha256};

const ARTIST: &str = "YOASOBI";
const SONY_BASE: &str = "https://www.sonymusic.co.jp";
const API_BASE: &str = "https://www.sonymusic.co.jp/json/v2/artist";
const OFFICIAL_BASE: &str = "https://www.yoasobi-music.jp";

/// The artist site publishes in Japan Standard Time
const UTC_OFFSET_HOURS: i32 = 9;

/// Entries without a category field count as achievements
const DEFAULT_ITEM_CATEGORY: &str = "Achievement";

/// Celebration emoji prefixed onto biography milestone titles. The pick is
/// keyed off the entry's date marker so repeated assemblies agree.
const CELEBRATION_EMOJIS: &[&str] = &[
    "㊗️", "🎉", "🎊", "🎈", "🎁", "🎂", "🎀", "🎗", "🎆", "🎇", "🎐", "🎑", "🎃",
];

/// Adapter for the artist's news and biography endpoints
pub struct SonyJpAdapter;

impl SonyJpAdapter {
    fn official_url(category: &str) -> String {
        format!("{}/{}", OFFICIAL_BASE, category)
    }
}

impl SiteAdapter for SonyJpAdapter {
    fn slug(&self) -> &'static str {
        "sonyjp"
    }

    fn listing_source(&self, category: &str) -> crate::Result<ListingSource> {
        let (endpoint, postfix) = match category {
            "news" => ("information", "start/0/count/-1"),
            "biography" => ("hottopic", "start/0/count/-1/callback/hotCallback"),
            _ => {
                return Err(FeedError::UnknownCategory {
                    site: self.slug().to_string(),
                    category: category.to_string(),
                })
            }
        };

        let official_url = Self::official_url(category);
        Ok(ListingSource {
            url: format!("{}/{}/{}/{}", API_BASE, ARTIST, endpoint, postfix),
            feed_title: format!("LATEST {}", category.to_uppercase()),
            feed_link: official_url.clone(),
            feed_description: Some(format!("{}'s latest {}", ARTIST, category)),
            resolve: ResolveContext {
                listing_url: official_url,
                site_base_url: format!("{}/", OFFICIAL_BASE),
            },
        })
    }

    fn extract_listing(&self, body: &str, category: &str) -> crate::Result<Vec<Candidate>> {
        // Validates the category before touching the payload.
        self.listing_source(category)?;

        let entries = jsonp::jsonp_items(body)?;
        let official_url = Self::official_url(category);

        let candidates = entries
            .iter()
            .map(|entry| {
                if category == "biography" {
                    biography_candidate(entry, &official_url)
                } else {
                    news_candidate(entry, &official_url)
                }
            })
            .collect();

        Ok(candidates)
    }

    fn enrich(
        &self,
        candidate: &Candidate,
        link: &str,
        _detail_body: &str,
        _category: &str,
    ) -> FeedItem {
        // Items are always assembled inline from the listing payload; there
        // are no detail pages to enrich from.
        FeedItem::fallback(&candidate.raw_title, link)
    }
}

fn news_candidate(entry: &Value, official_url: &str) -> Candidate {
    let title = string_field(entry, "title");
    let date = string_field(entry, "date");
    let article = string_field(entry, "article");
    let category = entry
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ITEM_CATEGORY)
        .to_string();

    let link = match id_field(entry) {
        Some(id) => format!("{}/{}", official_url, id),
        None => official_url.to_string(),
    };

    let guid = if title.is_empty() && date.is_empty() {
        derived_guid(&[&link, &article])
    } else {
        format!("news:{}{}", title, date)
    };

    let item = FeedItem {
        title,
        link: link.clone(),
        pub_date: datetime::parse_with_offset(&date, UTC_OFFSET_HOURS),
        description: render_description(None, Some(&category), &article),
        guid,
        category: Some(category),
    };

    Candidate::inline(link, item)
}

fn biography_candidate(entry: &Value, official_url: &str) -> Candidate {
    // Biography entries carry their date marker in the `url` field.
    let marker = string_field(entry, "url");
    let body = string_field(entry, "kiji");
    let category = entry
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ITEM_CATEGORY)
        .to_string();

    let image = entry
        .get("image_url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|path| format!("{}{}", SONY_BASE, path));

    let item = FeedItem {
        title: format!("{} {}", celebration_emoji(&marker), marker),
        link: official_url.to_string(),
        pub_date: datetime::parse_with_offset(&marker, UTC_OFFSET_HOURS),
        description: render_description(image.as_deref(), Some(&category), &body),
        guid: format!("bio:{}", marker),
        category: Some(category),
    };

    Candidate::inline(official_url.to_string(), item)
}

fn string_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Entry ids arrive as either strings or numbers depending on the endpoint
fn id_field(entry: &Value) -> Option<String> {
    match entry.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Deterministic pick from the emoji table, keyed by the entry marker
fn celebration_emoji(marker: &str) -> &'static str {
    let digest = Sha256::digest(marker.as_bytes());
    CELEBRATION_EMOJIS[digest[0] as usize % CELEBRATION_EMOJIS.len()]
}
