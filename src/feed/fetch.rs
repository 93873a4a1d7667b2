use std::time::Duration;

use reqwest::header::USER_AGENT;
use reqwest::Client;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch failures. The `Display` text is the diagnostic handed back to tool
/// callers, so its prefixes ("HTTP Error", "Timeout", "Error") are stable.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP Error fetching RSS: {0}")]
    Http(String),

    #[error("Timeout fetching RSS from {url}")]
    Timeout { url: String },

    #[error("Error fetching RSS: {0}")]
    Other(String),
}

impl FetchError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { url: url.to_string() }
        } else if err.is_status() {
            Self::Http(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Self {
        Self { client: Client::new(), timeout }
    }

    /// One GET, no retry. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        response.text().await.map_err(|e| FetchError::from_reqwest(url, e))
    }
}

impl Default for FeedClient {
    fn default() -> Self { Self::new(DEFAULT_TIMEOUT) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_user_agent_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .and(header("User-Agent", "hackernews-reader/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<rss/>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = FeedClient::default()
            .fetch(&format!("{}/rss", server.uri()), "hackernews-reader/1.0")
            .await
            .unwrap();
        assert_eq!(body, "<rss/>");
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = FeedClient::default()
            .fetch(&format!("{}/missing", server.uri()), "test-reader/1.0")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        let text = err.to_string();
        assert!(text.starts_with("HTTP Error fetching RSS: "), "{text}");
        assert!(text.contains("404"), "{text}");
    }

    #[tokio::test]
    async fn slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let url = format!("{}/slow", server.uri());
        let err = FeedClient::new(Duration::from_millis(50)).fetch(&url, "test-reader/1.0").await.unwrap_err();
        assert_eq!(err.to_string(), format!("Timeout fetching RSS from {url}"));
    }

    #[tokio::test]
    async fn unreachable_host_is_generic_error() {
        let err = FeedClient::default().fetch("http://127.0.0.1:1/rss", "test-reader/1.0").await.unwrap_err();
        assert!(err.to_string().starts_with("Error fetching RSS: "), "{err}");
    }
}
