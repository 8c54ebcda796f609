//! Environment-ministry news portal adapter (www.mee.gov.cn)
//!
//! The listing page at `ywdt/` stacks six column blocks; a category selects
//! one by structural position. Candidate hrefs use the site's directory
//! conventions (`./...` relative to the listing, `../...` relative to the
//! site root). Detail pages carry their publish date in a `PubDate` meta
//! field in local time (UTC+8). The video column plays by different rules:
//! its real title lives in an `ArticleTitle` meta field, embedded players
//! must not autoplay, and `<source>` paths are relative to the detail page.

use crate::adapter::{ListingSource, SiteAdapter};
use crate::feed::{Candidate, FeedItem};
use crate::link::ResolveContext;
use crate::{datetime, FeedError};
use scraper::{Html, Selector};

const SITE_BASE: &str = "https://www.mee.gov.cn/";
const LISTING_URL: &str = "https://www.mee.gov.cn/ywdt/";
const SITE_TITLE: &str = "要闻动态 - 中华人民共和国生态环境部";
const CONTENT_SELECTOR: &str = ".neiright_JPZ_GK_CP";

/// The site publishes in China Standard Time; applied to every item.
const UTC_OFFSET_HOURS: i32 = 8;

/// Column whose items are videos rather than articles
const VIDEO_CATEGORY: &str = "spxw";

struct Column {
    key: &'static str,
    name: &'static str,
    /// 1-based structural position of the column block in the listing
    order: usize,
}

const COLUMNS: &[Column] = &[
    Column { key: "szyw", name: "时政要闻", order: 1 },
    Column { key: "hjywnews", name: "环境要闻", order: 2 },
    Column { key: "dfnews", name: "地方快讯", order: 3 },
    Column { key: "xwfb", name: "新闻发布", order: 4 },
    Column { key: "spxw", name: "视频新闻", order: 5 },
    Column { key: "gsgg", name: "公示公告", order: 6 },
];

/// Adapter for the ministry's news listing
pub struct EnvNewsAdapter;

impl EnvNewsAdapter {
    fn column(&self, category: &str) -> crate::Result<&'static Column> {
        COLUMNS
            .iter()
            .find(|c| c.key == category)
            .ok_or_else(|| FeedError::UnknownCategory {
                site: self.slug().to_string(),
                category: category.to_string(),
            })
    }
}

impl SiteAdapter for EnvNewsAdapter {
    fn slug(&self) -> &'static str {
        "envnews"
    }

    fn default_category(&self) -> Option<&'static str> {
        Some("szyw")
    }

    fn listing_source(&self, category: &str) -> crate::Result<ListingSource> {
        let column = self.column(category)?;
        Ok(ListingSource {
            url: LISTING_URL.to_string(),
            feed_title: format!("{} - {}", column.name, SITE_TITLE),
            feed_link: LISTING_URL.to_string(),
            feed_description: None,
            resolve: ResolveContext {
                listing_url: LISTING_URL.to_string(),
                site_base_url: SITE_BASE.to_string(),
            },
        })
    }

    fn extract_listing(&self, body: &str, category: &str) -> crate::Result<Vec<Candidate>> {
        let column = self.column(category)?;
        let document = Html::parse_document(body);

        let listing_error = |message: String| FeedError::ListingParse {
            url: LISTING_URL.to_string(),
            message,
        };

        let column_css = format!(".bd div:nth-child({})", column.order);
        let column_selector =
            Selector::parse(&column_css).map_err(|e| listing_error(e.to_string()))?;
        let item_selector = Selector::parse(".mobile_none li, .mobile_clear li")
            .map_err(|e| listing_error(e.to_string()))?;
        let title_selector =
            Selector::parse("a.cjcx_biaob").map_err(|e| listing_error(e.to_string()))?;
        let anchor_selector = Selector::parse("a").map_err(|e| listing_error(e.to_string()))?;

        let column_node = document.select(&column_selector).next().ok_or_else(|| {
            listing_error(format!("column '{}' not found in listing", column.key))
        })?;

        let mut candidates = Vec::new();
        for entry in column_node.select(&item_selector) {
            // Video entries have no text title here; the enricher fills it
            // in from the detail page.
            let title = entry
                .select(&title_selector)
                .next()
                .map(|a| a.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let Some(href) = entry
                .select(&anchor_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                tracing::debug!(category, "listing entry without href, skipping");
                continue;
            };

            candidates.push(Candidate::fetched(title, href));
        }

        Ok(candidates)
    }

    fn enrich(
        &self,
        candidate: &Candidate,
        link: &str,
        detail_body: &str,
        category: &str,
    ) -> FeedItem {
        let document = Html::parse_document(detail_body);

        let mut title = candidate.raw_title.clone();
        let pub_date = meta_content(&document, "PubDate")
            .and_then(|raw| datetime::parse_with_offset(&raw, UTC_OFFSET_HOURS));

        if category == VIDEO_CATEGORY {
            if let Some(video_title) = meta_content(&document, "ArticleTitle") {
                title = video_title;
            }
        }

        let mut description = Selector::parse(CONTENT_SELECTOR)
            .ok()
            .and_then(|sel| document.select(&sel).next())
            .map(|node| node.inner_html())
            .unwrap_or_default();

        if category == VIDEO_CATEGORY && !description.is_empty() {
            description = rewrite_video_markup(description, &document, link);
        }

        FeedItem {
            title,
            link: link.to_string(),
            pub_date,
            description,
            guid: link.to_string(),
            category: None,
        }
    }
}

/// Reads a named meta field's content attribute
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[name=\"{}\"]", name)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

/// Video-column post-processing over the extracted markup:
/// suppress autoplay and rewrite the relative `<source src>` path to an
/// absolute one derived from the detail page's canonical link (trailing
/// filename segment replaced by the media path).
fn rewrite_video_markup(mut description: String, document: &Html, link: &str) -> String {
    // The parser serializes the bare boolean attribute as autoplay="".
    description = description.replace(" autoplay=\"\"", "");

    let source_src = Selector::parse(&format!("{} source", CONTENT_SELECTOR))
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .and_then(|source| source.value().attr("src"))
        .map(str::to_string);

    if let (Some(src), Some(slash)) = (source_src, link.rfind('/')) {
        let absolute = format!("{}/{}", &link[..slash], src.trim_start_matches("./"));
        description = description.replace(
            &format!("src=\"{}\"", src),
            &format!("src=\"{}\"", absolute),
        );
    }

    description
}
