use std::sync::Arc;

use crate::config::Config;
use crate::feed::{self, FeedClient, Source};

/// Shared by the MCP handler and the HTTP routes; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: FeedClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = FeedClient::new(config.fetch_timeout());
        Self { config: Arc::new(config), client }
    }

    /// Run the story pipeline for `source`, using `feed_url` when given.
    pub async fn stories(&self, source: Source, feed_url: Option<&str>, count: usize) -> String {
        let url = feed_url.unwrap_or_else(|| self.config.feed_url(source));
        feed::stories(&self.client, source, url, count).await
    }
}
