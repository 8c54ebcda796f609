//! Integration tests for the feed pipeline
//!
//! These tests use wiremock to stand in for origin sites and exercise the
//! full listing -> resolve -> cache -> enrich -> assemble cycle end-to-end.

use inkfeed::adapter::{ListingSource, SiteAdapter};
use inkfeed::cache::FetchCache;
use inkfeed::config::Config;
use inkfeed::feed::{Candidate, FeedItem};
use inkfeed::link::ResolveContext;
use inkfeed::pipeline::Pipeline;
use inkfeed::FeedError;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Minimal site adapter pointed at a mock server
struct TestSite {
    base: String,
}

impl TestSite {
    fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn listing_url(&self) -> String {
        format!("{}/list/", self.base)
    }
}

impl SiteAdapter for TestSite {
    fn slug(&self) -> &'static str {
        "testsite"
    }

    fn default_category(&self) -> Option<&'static str> {
        Some("main")
    }

    fn listing_source(&self, category: &str) -> inkfeed::Result<ListingSource> {
        if category != "main" && category != "inline" {
            return Err(FeedError::UnknownCategory {
                site: self.slug().to_string(),
                category: category.to_string(),
            });
        }
        Ok(ListingSource {
            url: self.listing_url(),
            feed_title: "Test Feed".to_string(),
            feed_link: self.listing_url(),
            feed_description: None,
            resolve: ResolveContext {
                listing_url: self.listing_url(),
                site_base_url: format!("{}/", self.base),
            },
        })
    }

    fn extract_listing(&self, body: &str, category: &str) -> inkfeed::Result<Vec<Candidate>> {
        let document = Html::parse_document(body);
        let selector = Selector::parse("li a").map_err(|e| FeedError::ListingParse {
            url: self.listing_url(),
            message: e.to_string(),
        })?;

        let candidates = document
            .select(&selector)
            .filter_map(|a| {
                let title = a.text().collect::<String>().trim().to_string();
                let href = a.value().attr("href")?.to_string();
                Some(if category == "inline" {
                    let mut item = FeedItem::fallback(&title, &href);
                    item.description = "inline body".to_string();
                    Candidate::inline(href, item)
                } else {
                    Candidate::fetched(title, href)
                })
            })
            .collect();

        Ok(candidates)
    }

    fn enrich(
        &self,
        candidate: &Candidate,
        link: &str,
        detail_body: &str,
        _category: &str,
    ) -> FeedItem {
        let mut item = FeedItem::fallback(candidate.raw_title.trim(), link);
        item.description = detail_body.trim().to_string();
        item
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.pipeline.max_concurrent_fetches = 4;
    config.pipeline.fetch_timeout_secs = 5;
    config
}

fn listing_body(hrefs: &[(&str, &str)]) -> String {
    let entries: String = hrefs
        .iter()
        .map(|(title, href)| format!("<li><a href=\"{}\">{}</a></li>", href, title))
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", entries)
}

async fn mount_listing(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, route: &str, body: &str, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_order_preserved_despite_completion_order() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    mount_listing(
        &server,
        listing_body(&[("A", "./a.html"), ("B", "./b.html"), ("C", "./c.html")]),
    )
    .await;

    // C completes first, then A, then B.
    mount_detail(&server, "/list/a.html", "body A", 80).await;
    mount_detail(&server, "/list/b.html", "body B", 120).await;
    mount_detail(&server, "/list/c.html", "body C", 10).await;

    let pipeline = Pipeline::new(&test_config()).expect("pipeline");
    let feed = pipeline.run(&site, Some("main")).await.expect("feed");

    let titles: Vec<_> = feed.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(feed.items[0].description, "body A");
    assert_eq!(feed.items[2].description, "body C");
}

#[tokio::test]
async fn test_partial_failure_degrades_single_item() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    mount_listing(
        &server,
        listing_body(&[("A", "./a.html"), ("B", "./b.html"), ("C", "./c.html")]),
    )
    .await;

    mount_detail(&server, "/list/a.html", "body A", 0).await;
    Mock::given(method("GET"))
        .and(path("/list/b.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_detail(&server, "/list/c.html", "body C", 0).await;

    let pipeline = Pipeline::new(&test_config()).expect("pipeline");
    let feed = pipeline.run(&site, Some("main")).await.expect("feed");

    assert_eq!(feed.items.len(), 3);
    assert_eq!(feed.items[0].description, "body A");

    // B keeps its known fields and degrades to an empty description.
    assert_eq!(feed.items[1].title, "B");
    assert!(feed.items[1].link.ends_with("/list/b.html"));
    assert_eq!(feed.items[1].description, "");

    assert_eq!(feed.items[2].description, "body C");
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(&test_config()).expect("pipeline");
    let result = pipeline.run(&site, Some("main")).await;

    assert!(matches!(result, Err(FeedError::ListingFetch { .. })));
}

#[tokio::test]
async fn test_unknown_category_is_config_error() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    let pipeline = Pipeline::new(&test_config()).expect("pipeline");
    let result = pipeline.run(&site, Some("nope")).await;

    assert!(matches!(result, Err(FeedError::UnknownCategory { .. })));
}

#[tokio::test]
async fn test_default_category_is_used_when_none_given() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    mount_listing(&server, listing_body(&[("A", "./a.html")])).await;
    mount_detail(&server, "/list/a.html", "body A", 0).await;

    let pipeline = Pipeline::new(&test_config()).expect("pipeline");
    let feed = pipeline.run(&site, None).await.expect("feed");

    assert_eq!(feed.items.len(), 1);
}

#[tokio::test]
async fn test_unresolvable_candidate_is_dropped() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    mount_listing(
        &server,
        listing_body(&[("A", "./a.html"), ("Bad", "not a url"), ("C", "./c.html")]),
    )
    .await;
    mount_detail(&server, "/list/a.html", "body A", 0).await;
    mount_detail(&server, "/list/c.html", "body C", 0).await;

    let pipeline = Pipeline::new(&test_config()).expect("pipeline");
    let feed = pipeline.run(&site, Some("main")).await.expect("feed");

    let titles: Vec<_> = feed.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C"]);
}

#[tokio::test]
async fn test_detail_fetched_once_across_runs_sharing_cache() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    mount_listing(&server, listing_body(&[("A", "./a.html")])).await;

    // The shared cache must keep the second run from refetching the detail.
    Mock::given(method("GET"))
        .and(path("/list/a.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body A"))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(FetchCache::new(Duration::from_secs(60), 16));
    let pipeline = Pipeline::with_cache(&test_config(), cache).expect("pipeline");

    let first = pipeline.run(&site, Some("main")).await.expect("feed");
    let second = pipeline.run(&site, Some("main")).await.expect("feed");

    assert_eq!(first.items, second.items);
    assert_eq!(second.items[0].description, "body A");

    // MockServer verifies the expect(1) count on drop.
}

#[tokio::test]
async fn test_inline_items_skip_detail_fetch() {
    let server = MockServer::start().await;
    let site = TestSite::new(&server.uri());

    mount_listing(&server, listing_body(&[("A", "./a.html")])).await;

    Mock::given(method("GET"))
        .and(path("/list/a.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(&test_config()).expect("pipeline");
    let feed = pipeline.run(&site, Some("inline")).await.expect("feed");

    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].description, "inline body");
    // The inline item's link is overwritten with the canonical form.
    assert_eq!(
        feed.items[0].link,
        format!("{}/list/a.html", server.uri().trim_end_matches('/'))
    );
}
