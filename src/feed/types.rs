use serde::Serialize;
use thiserror::Error;

/// One normalized feed item. Fields a source does not declare stay at their
/// empty defaults; fields it does declare carry either the feed value or the
/// source's placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub description: String,
    pub author: String,
    pub subject: String,
    pub categories: Vec<String>,
    /// First `category` only (sources that keep a single category).
    pub category: String,
    pub guid: String,
    /// Raw `isPermaLink` attribute text, "false" when absent.
    pub guid_permalink: String,
    /// `guid_permalink` read as a flag.
    pub guid_is_permalink: bool,
    pub id: String,
    pub image_url: String,
    pub image_width: String,
    pub image_height: String,
    pub content: String,
    pub twitter_recap: Vec<TwitterRecapItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TwitterRecapItem {
    pub title: String,
    pub description: String,
    pub link: String,
}

/// A document-level failure. Takes the place of the whole record list.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{error}")]
pub struct FeedError {
    pub error: String,
}

impl FeedError {
    pub fn parse(diagnostic: impl std::fmt::Display) -> Self {
        Self { error: format!("Error parsing XML: {diagnostic}") }
    }

    pub fn missing_channel() -> Self {
        Self { error: "Invalid RSS format: No channel element found".to_string() }
    }
}
