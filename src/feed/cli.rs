use std::time::Instant;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use url::Url;

use crate::config::{Config, Overrides};
use crate::state::AppState;
use crate::telemetry;
use crate::telemetry::emit::Meta;

use super::{load, Source, DEFAULT_COUNT};

/// `news stories <source>`
#[derive(Args, Debug)]
pub struct StoriesCmd {
    /// One of: hackernews, techcrunch, wired, ainews, wsj
    pub source: Source,
    /// Read this feed instead of the configured one
    #[arg(long)]
    pub feed_url: Option<String>,
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,
}

#[derive(Debug, Serialize)]
struct SourceInfo {
    slug: &'static str,
    name: &'static str,
    default_url: &'static str,
}

pub async fn run_stories(cmd: StoriesCmd, json: bool) -> Result<()> {
    if let Some(url) = cmd.feed_url.as_deref() {
        if let Err(err) = Url::parse(url) {
            bail!("invalid --feed-url {url}: {err}");
        }
    }
    let state = AppState::new(Config::from_env_and_args(&Overrides::default()));

    if !json {
        println!("{}", state.stories(cmd.source, cmd.feed_url.as_deref(), cmd.count).await);
        return Ok(());
    }

    let t0 = Instant::now();
    let url = cmd.feed_url.as_deref().unwrap_or_else(|| state.config.feed_url(cmd.source));
    let mut records = load(&state.client, cmd.source, url).await?;
    records.truncate(if cmd.source.latest_only() { 1 } else { cmd.count });
    let meta = Meta { duration_ms: Some(t0.elapsed().as_millis()), run_id: None };
    telemetry::emit::print_result("stories", &records, Some(meta))
}

pub fn run_sources(json: bool) -> Result<()> {
    let infos: Vec<SourceInfo> = Source::ALL
        .into_iter()
        .map(|s| SourceInfo { slug: s.slug(), name: s.display_name(), default_url: s.default_url() })
        .collect();
    if json {
        return telemetry::emit::print_result("sources", &infos, None);
    }
    for info in infos {
        println!("{:<11} {:<20} {}", info.slug, info.name, info.default_url);
    }
    Ok(())
}
