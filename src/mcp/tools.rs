use rmcp::model::{CallToolRequestParam, CallToolResult, Content, JsonObject, Tool, ToolAnnotations};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::feed::{Source, DEFAULT_COUNT};
use crate::mcp::types::{AddParams, LatestParams, StoriesParams};
use crate::state::AppState;

const ADD_TOOL: &str = "add";

/// Tool name and description for each feed source.
const FEED_TOOLS: [(Source, &str, &str); 5] = [
    (Source::HackerNews, "get_hackernews_stories", "Get top stories from Hacker News."),
    (Source::TechCrunch, "get_techcrunch_stories", "Get top stories from TechCrunch."),
    (Source::Wired, "get_wired_stories", "Get AI stories from Wired."),
    (Source::Wsj, "get_wallstreetjournal_stories", "Get technology stories from the Wall Street Journal."),
    (Source::AiNews, "get_ainews_latest", "Get the latest story from AI News, including its AI Twitter recap."),
];

pub fn tool_catalog() -> Vec<Tool> {
    let mut tools: Vec<Tool> = FEED_TOOLS.iter().map(|&(source, name, about)| feed_tool(source, name, about)).collect();
    tools.push(add_tool());
    tools
}

fn feed_tool(source: Source, name: &'static str, about: &'static str) -> Tool {
    let tool = Tool::new(name, about, rmcp::object!({"type": "object"}));
    let tool = if source.latest_only() {
        tool.with_input_schema::<LatestParams>()
    } else {
        tool.with_input_schema::<StoriesParams>()
    };
    tool.annotate(ToolAnnotations::new().read_only(true).idempotent(true).open_world(true))
}

fn add_tool() -> Tool {
    Tool::new(ADD_TOOL, "Add two numbers", rmcp::object!({"type": "object"}))
        .with_input_schema::<AddParams>()
        .annotate(ToolAnnotations::new().read_only(true).idempotent(true).open_world(false))
}

pub async fn handle_call(
    state: &AppState,
    ct: &CancellationToken,
    request: CallToolRequestParam,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let CallToolRequestParam { name, arguments } = request;
    if name == ADD_TOOL {
        return add(arguments);
    }
    match FEED_TOOLS.iter().find(|(_, tool, _)| *tool == name) {
        Some(&(source, tool, _)) => feed_stories(state, ct, source, tool, arguments).await,
        None => Err(rmcp::ErrorData::invalid_params(format!("unknown tool: {}", name), None)),
    }
}

async fn feed_stories(
    state: &AppState,
    ct: &CancellationToken,
    source: Source,
    tool: &str,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let (feed_url, count) = if source.latest_only() {
        let params: LatestParams = parse_args(tool, arguments)?;
        (params.feed_url, None)
    } else {
        let params: StoriesParams = parse_args(tool, arguments)?;
        (params.feed_url, params.count)
    };

    if let Some(url) = feed_url.as_deref() {
        if Url::parse(url).is_err() {
            return Err(rmcp::ErrorData::invalid_params("invalid feed_url", Some(json!({ "feed_url": url }))));
        }
    }
    let count = count.map(|n| n as usize).unwrap_or(DEFAULT_COUNT);

    let text = tokio::select! {
        _ = ct.cancelled() => {
            return Err(rmcp::ErrorData::internal_error(format!("{} cancelled", tool), None));
        }
        text = state.stories(source, feed_url.as_deref(), count) => text,
    };
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn add(arguments: Option<JsonObject>) -> Result<CallToolResult, rmcp::ErrorData> {
    let AddParams { a, b } = parse_args(ADD_TOOL, arguments)?;
    let sum = a
        .checked_add(b)
        .ok_or_else(|| rmcp::ErrorData::invalid_params("sum overflows a 64-bit integer", Some(json!({ "a": a, "b": b }))))?;
    Ok(CallToolResult::success(vec![Content::text(sum.to_string())]))
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Option<JsonObject>) -> Result<T, rmcp::ErrorData> {
    let args_map = arguments.unwrap_or_else(Map::new);
    serde_json::from_value(Value::Object(args_map))
        .map_err(|err| rmcp::ErrorData::invalid_params(format!("invalid {} parameters: {}", tool, err), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use rmcp::model::ErrorCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn call(name: &str, args: Value) -> CallToolRequestParam {
        let arguments = match args {
            Value::Object(map) => Some(map),
            _ => None,
        };
        CallToolRequestParam { name: name.to_string().into(), arguments }
    }

    fn text_of(result: &CallToolResult) -> String {
        result.content[0].as_text().map(|t| t.text.clone()).unwrap_or_default()
    }

    #[test]
    fn catalog_lists_every_source_and_add() {
        let names: Vec<String> = tool_catalog().iter().map(|t| t.name.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "get_hackernews_stories",
                "get_techcrunch_stories",
                "get_wired_stories",
                "get_wallstreetjournal_stories",
                "get_ainews_latest",
                "add",
            ]
        );
    }

    #[test]
    fn latest_tool_takes_no_count() {
        let catalog = tool_catalog();
        let ainews = catalog.iter().find(|t| t.name == "get_ainews_latest").map(|t| Value::Object((*t.input_schema).clone()));
        let props = ainews.as_ref().and_then(|s| s.get("properties")).cloned().unwrap_or_default();
        assert!(props.get("feed_url").is_some());
        assert!(props.get("count").is_none());
    }

    #[tokio::test]
    async fn add_returns_sum_as_text() {
        let state = AppState::new(Config::default());
        let out = handle_call(&state, &CancellationToken::new(), call("add", json!({"a": 2, "b": 40}))).await.unwrap();
        assert_eq!(text_of(&out), "42");
    }

    #[tokio::test]
    async fn add_rejects_missing_operand() {
        let state = AppState::new(Config::default());
        let err = handle_call(&state, &CancellationToken::new(), call("add", json!({"a": 2}))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let state = AppState::new(Config::default());
        let err = handle_call(&state, &CancellationToken::new(), call("get_bbc_stories", json!({}))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("get_bbc_stories"));
    }

    #[tokio::test]
    async fn relative_feed_url_is_rejected() {
        let state = AppState::new(Config::default());
        let args = json!({"feed_url": "not a url", "count": 3});
        let err = handle_call(&state, &CancellationToken::new(), call("get_wired_stories", args)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn fetch_failure_is_a_soft_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

        let state = AppState::new(Config::default());
        let args = json!({"feed_url": server.uri()});
        let out = handle_call(&state, &CancellationToken::new(), call("get_hackernews_stories", args)).await.unwrap();
        assert_ne!(out.is_error, Some(true));
        assert!(text_of(&out).starts_with("HTTP Error fetching RSS: "), "{}", text_of(&out));
    }

    #[tokio::test]
    async fn count_truncates_feed() {
        let server = MockServer::start().await;
        let body = "<rss><channel>\
            <item><title>A</title><link>l</link></item>\
            <item><title>B</title><link>l</link></item>\
            <item><title>C</title><link>l</link></item>\
            </channel></rss>";
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200).set_body_string(body)).mount(&server).await;

        let state = AppState::new(Config::default());
        let args = json!({"feed_url": server.uri(), "count": 2});
        let out = handle_call(&state, &CancellationToken::new(), call("get_hackernews_stories", args)).await.unwrap();
        let text = text_of(&out);
        assert!(text.contains("Title: A") && text.contains("Title: B"));
        assert!(!text.contains("Title: C"));
    }

    #[tokio::test]
    async fn cancelled_call_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
            .mount(&server)
            .await;

        let state = AppState::new(Config::default());
        let ct = CancellationToken::new();
        ct.cancel();
        let err = handle_call(&state, &ct, call("get_techcrunch_stories", json!({"feed_url": server.uri()})))
            .await
            .unwrap_err();
        assert!(err.message.contains("cancelled"));
    }
}
