//! HTTP fetch utility
//!
//! Builds the shared HTTP client and fetches text resources (listing pages,
//! detail pages, JSONP endpoints). Failures are classified into
//! [`FetchError`] variants so callers can apply the error taxonomy: a failed
//! listing fetch is pipeline-fatal, a failed detail fetch degrades one item.

use crate::config::{PipelineConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched text resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is formatted as `Name/Version (+ContactURL)`, or just
/// `Name/Version` when no contact URL is configured.
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    pipeline: &PipelineConfig,
) -> Result<Client, reqwest::Error> {
    let user_agent = if user_agent.contact_url.is_empty() {
        format!("{}/{}", user_agent.agent_name, user_agent.agent_version)
    } else {
        format!(
            "{}/{} (+{})",
            user_agent.agent_name, user_agent.agent_version, user_agent.contact_url
        )
    };

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(pipeline.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body as text
///
/// Non-2xx statuses and transport failures are classified:
///
/// | Condition | Error |
/// |-----------|-------|
/// | Non-success status | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection / other transport failure | `FetchError::Network` |
pub async fn fetch_text(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    let final_url = response.url().as_str();
    if final_url != url {
        tracing::debug!(url, final_url, "request redirected");
    }

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(FetchedPage {
        status: status.as_u16(),
        body,
    })
}

fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PipelineConfig, UserAgentConfig};

    fn test_user_agent() -> UserAgentConfig {
        UserAgentConfig {
            agent_name: "TestFetcher".to_string(),
            agent_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&test_user_agent(), &PipelineConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_without_contact() {
        let mut ua = test_user_agent();
        ua.contact_url = String::new();
        let client = build_http_client(&ua, &PipelineConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_text_success() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let client = build_http_client(&test_user_agent(), &PipelineConfig::default()).unwrap();
        let page = fetch_text(&client, &format!("{}/page", server.uri()))
            .await
            .unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.body, "hello");
    }

    #[tokio::test]
    async fn test_fetch_text_follows_redirect() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/new", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let client = build_http_client(&test_user_agent(), &PipelineConfig::default()).unwrap();
        let page = fetch_text(&client, &format!("{}/old", server.uri()))
            .await
            .unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.body, "moved");
    }

    #[tokio::test]
    async fn test_fetch_text_non_success_status() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&test_user_agent(), &PipelineConfig::default()).unwrap();
        let result = fetch_text(&client, &format!("{}/missing", server.uri())).await;

        match result.unwrap_err() {
            crate::FetchError::Status { status, .. } => assert_eq!(status, 404),
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
