use thiserror::Error;
use tracing::Instrument;

use crate::telemetry;
use crate::telemetry::ops::stories::Phase as StoriesPhase;

use super::fetch::{FeedClient, FetchError};
use super::format::{format_article, format_error};
use super::normalize::normalize;
use super::sources::Source;
use super::types::{ArticleRecord, FeedError};

pub const DEFAULT_COUNT: usize = 30;
pub const SEPARATOR: &str = "\n---\n";
pub const NO_STORIES: &str = "No stories found.";

/// Either side of a failed load: the fetch never produced a body, or the body
/// did not normalize.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Fetch `url` (or the source default) and normalize it with the source schema.
pub async fn load(client: &FeedClient, source: Source, url: &str) -> Result<Vec<ArticleRecord>, LoadError> {
    let log = telemetry::stories();
    let body = client
        .fetch(url, source.user_agent())
        .instrument(log.span_kv(&StoriesPhase::Fetch, [("url", url.to_string())]))
        .await
        .inspect_err(|err| log.warn_kv("fetch failed", [("source", source.to_string()), ("error", err.to_string())]))?;

    let _s = log.span(&StoriesPhase::Parse).entered();
    let records = normalize(&body, source.schema())
        .inspect_err(|err| log.warn_kv("parse failed", [("source", source.to_string()), ("error", err.error.clone())]))?;
    Ok(records)
}

/// Turn a load outcome into the text a tool caller receives.
pub fn render(source: Source, outcome: Result<Vec<ArticleRecord>, LoadError>, count: usize) -> String {
    let records = match outcome {
        Ok(records) => records,
        Err(LoadError::Fetch(err)) => return err.to_string(),
        Err(LoadError::Feed(err)) => return format_error(&err),
    };

    let log = telemetry::stories();
    let _s = log.span(&StoriesPhase::Render).entered();
    let take = if source.latest_only() { 1 } else { count };
    let formatted: Vec<String> = records
        .iter()
        .take(take)
        .map(|r| format_article(r, source.layout()))
        .collect();
    log.summary(source.slug(), records.len(), formatted.len());

    if formatted.is_empty() {
        return NO_STORIES.to_string();
    }
    formatted.join(SEPARATOR)
}

pub async fn stories(client: &FeedClient, source: Source, url: &str, count: usize) -> String {
    let log = telemetry::stories();
    let root = log.root_span_kv([("source", source.to_string()), ("count", count.to_string())]);
    let outcome = load(client, source, url).instrument(root.clone()).await;
    let _g = root.entered();
    render(source, outcome, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(i: usize) -> ArticleRecord {
        ArticleRecord { title: format!("S{i}"), link: format!("L{i}"), pub_date: "P".into(), ..Default::default() }
    }

    #[test]
    fn truncates_to_count_in_order() {
        let records: Vec<ArticleRecord> = (1..=10).map(record).collect();
        let out = render(Source::HackerNews, Ok(records), 3);
        let parts: Vec<&str> = out.split(SEPARATOR).collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "\nTitle: S1\nLink: L1\nPublished: P\n");
        assert_eq!(parts[2], "\nTitle: S3\nLink: L3\nPublished: P\n");
    }

    #[test]
    fn count_larger_than_feed_keeps_everything() {
        let out = render(Source::HackerNews, Ok((1..=2).map(record).collect()), 30);
        assert_eq!(out.matches("Title: ").count(), 2);
    }

    #[test]
    fn empty_feed_says_so() {
        assert_eq!(render(Source::Wired, Ok(Vec::new()), 30), NO_STORIES);
        assert_eq!(render(Source::Wired, Ok(vec![record(1)]), 0), NO_STORIES);
    }

    #[test]
    fn latest_only_ignores_count() {
        let out = render(Source::AiNews, Ok((1..=3).map(record).collect()), 30);
        assert!(!out.contains(SEPARATOR));
        assert!(out.contains("Title: S1"));
    }

    #[test]
    fn failures_render_as_their_diagnostics() {
        let fetch = render(Source::Wsj, Err(LoadError::Fetch(FetchError::Timeout { url: "http://x".into() })), 3);
        assert_eq!(fetch, "Timeout fetching RSS from http://x");
        let feed = render(Source::Wsj, Err(LoadError::Feed(FeedError::missing_channel())), 3);
        assert_eq!(feed, "ERROR: Invalid RSS format: No channel element found");
    }

    #[tokio::test]
    async fn end_to_end_against_mock_feed() {
        let server = MockServer::start().await;
        let body = r#"<rss xmlns:dc="http://purl.org/dc/elements/1.1/"><channel>
            <item><title>One</title><link>https://t/1</link><pubDate>Mon</pubDate><description>first</description><dc:creator>Ann</dc:creator><category>AI</category></item>
            <item><title>Two</title><link>https://t/2</link><pubDate>Tue</pubDate><description>second</description></item>
        </channel></rss>"#;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(header("User-Agent", "techcrunch-reader/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let out = stories(&FeedClient::default(), Source::TechCrunch, &format!("{}/feed", server.uri()), 30).await;
        assert_eq!(
            out,
            "\nTitle: One\nLink: https://t/1\nAuthor: Ann\nPublished: Mon\nCategories: AI\n\nfirst\n\n---\n\nTitle: Two\nLink: https://t/2\nPublished: Tue\n\nsecond\n"
        );
    }

    #[tokio::test]
    async fn malformed_body_becomes_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel>"))
            .mount(&server)
            .await;

        let out = stories(&FeedClient::default(), Source::Wired, &server.uri(), 5).await;
        assert!(out.starts_with("ERROR: Error parsing XML: "), "{out}");
    }
}
