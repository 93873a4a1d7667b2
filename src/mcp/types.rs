use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StoriesParams {
    /// URL of the RSS feed to read; the source's default feed when omitted
    #[serde(default)]
    pub feed_url: Option<String>,
    /// Number of stories to return (default 30)
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LatestParams {
    /// URL of the RSS feed to read; the source's default feed when omitted
    #[serde(default)]
    pub feed_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddParams {
    pub a: i64,
    pub b: i64,
}
