use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::feed::Source;
use crate::state::AppState;

/// Count used by the test endpoints when the query omits one.
pub const TEST_COUNT: usize = 5;

#[derive(Debug, Serialize)]
pub struct ServerDescriptor {
    pub server: &'static str,
    pub tools: Vec<&'static str>,
    pub mcp_protocol: bool,
    pub mcp_endpoint: &'static str,
    pub test_endpoints: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TestQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub source: &'static str,
    pub count: usize,
    pub stories: String,
}

pub async fn info() -> Json<ServerDescriptor> {
    let test_endpoints = Source::ALL
        .into_iter()
        .map(|s| if s.latest_only() { format!("/test/{}", s.slug()) } else { format!("/test/{}?count=3", s.slug()) })
        .collect();
    Json(ServerDescriptor {
        server: "News MCP Server",
        tools: Source::ALL.into_iter().map(Source::slug).collect(),
        mcp_protocol: true,
        mcp_endpoint: "/mcp/",
        test_endpoints,
    })
}

pub async fn test_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(query): Query<TestQuery>,
) -> Response {
    let Ok(source) = source.parse::<Source>() else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": format!("unknown source: {}", source) }))).into_response();
    };
    let count = query.count.unwrap_or(TEST_COUNT);
    let stories = state.stories(source, None, count).await;
    Json(TestResponse { source: source.display_name(), count, stories }).into_response()
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::http::create_router;
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let res = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_describes_the_server() {
        let (status, body) = get_json(AppState::new(Config::default()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["server"], "News MCP Server");
        assert_eq!(body["mcp_protocol"], true);
        assert_eq!(body["mcp_endpoint"], "/mcp/");
        assert_eq!(body["tools"], serde_json::json!(["hackernews", "techcrunch", "wired", "ainews", "wsj"]));
        assert_eq!(body["test_endpoints"][3], "/test/ainews");
    }

    #[tokio::test]
    async fn unknown_source_is_404() {
        let (status, body) = get_json(AppState::new(Config::default()), "/test/bbc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown source: bbc");
    }

    #[tokio::test]
    async fn test_endpoint_wraps_pipeline_output() {
        let server = MockServer::start().await;
        let body = "<rss><channel>\
            <item><title>A</title><link>https://a</link><pubDate>Mon</pubDate></item>\
            <item><title>B</title><link>https://b</link><pubDate>Tue</pubDate></item>\
            </channel></rss>";
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200).set_body_string(body)).mount(&server).await;

        let feed = server.uri();
        let config = Config::from_lookup(move |key| (key == "NEWS_FEED_URL_HACKERNEWS").then(|| feed.clone()));
        let (status, body) = get_json(AppState::new(config), "/test/hackernews?count=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "Hacker News");
        assert_eq!(body["count"], 1);
        assert_eq!(body["stories"], "\nTitle: A\nLink: https://a\nPublished: Mon\n");
    }

    #[tokio::test]
    async fn default_count_is_echoed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel/></rss>"))
            .mount(&server)
            .await;

        let feed = server.uri();
        let config = Config::from_lookup(move |key| (key == "NEWS_FEED_URL_WIRED").then(|| feed.clone()));
        let (_, body) = get_json(AppState::new(config), "/test/wired").await;
        assert_eq!(body["source"], "Wired");
        assert_eq!(body["count"], 5);
        assert_eq!(body["stories"], "No stories found.");
    }
}
