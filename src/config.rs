//! Runtime configuration: environment variables (optionally from `.env`)
//! overridden by command line flags.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::feed::Source;

pub const ENV_BIND_ADDR: &str = "NEWS_BIND_ADDR";
pub const ENV_STATIC_DIR: &str = "NEWS_STATIC_DIR";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "NEWS_FETCH_TIMEOUT_SECS";
pub const ENV_MAX_CONCURRENCY: &str = "MCP_MAX_CONCURRENCY";
/// Prefix for per-source URL overrides, e.g. `NEWS_FEED_URL_WSJ`.
pub const ENV_FEED_URL_PREFIX: &str = "NEWS_FEED_URL_";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    static_dir: PathBuf,
    fetch_timeout: Duration,
    max_concurrency: usize,
    feed_urls: HashMap<Source, String>,
}

/// Flag values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_addr: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub max_concurrency: Option<usize>,
}

impl Config {
    pub fn from_env_and_args(args: &Overrides) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok()).with_overrides(args)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let static_dir = lookup(ENV_STATIC_DIR).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let fetch_timeout = Duration::from_secs(parse_or(&lookup, ENV_FETCH_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS).max(1));
        let max_concurrency = parse_or(&lookup, ENV_MAX_CONCURRENCY, DEFAULT_MAX_CONCURRENCY).max(1);

        let feed_urls = Source::ALL
            .into_iter()
            .filter_map(|src| {
                let key = format!("{ENV_FEED_URL_PREFIX}{}", src.slug().to_ascii_uppercase());
                lookup(&key).filter(|v| !v.trim().is_empty()).map(|v| (src, v))
            })
            .collect();

        Self { bind_addr, static_dir, fetch_timeout, max_concurrency, feed_urls }
    }

    pub fn with_overrides(mut self, args: &Overrides) -> Self {
        if let Some(addr) = &args.bind_addr { self.bind_addr = addr.clone(); }
        if let Some(dir) = &args.static_dir { self.static_dir = dir.clone(); }
        if let Some(n) = args.max_concurrency { self.max_concurrency = n.max(1); }
        self
    }

    pub fn bind_addr(&self) -> &str { &self.bind_addr }
    pub fn static_dir(&self) -> &Path { &self.static_dir }
    pub fn fetch_timeout(&self) -> Duration { self.fetch_timeout }
    pub fn max_concurrency(&self) -> usize { self.max_concurrency }

    /// Configured URL for `source`, or its built-in default.
    pub fn feed_url(&self, source: Source) -> &str {
        self.feed_urls.get(&source).map(String::as_str).unwrap_or(source.default_url())
    }
}

impl Default for Config {
    fn default() -> Self { Self::from_lookup(|_| None) }
}

fn parse_or<T: std::str::FromStr + std::fmt::Display>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "ignoring unparseable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = Config::default();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.static_dir(), Path::new("static"));
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.max_concurrency(), 4);
        assert_eq!(cfg.feed_url(Source::HackerNews), "https://news.ycombinator.com/rss");
    }

    #[test]
    fn reads_environment_values() {
        let cfg = Config::from_lookup(env(&[
            (ENV_BIND_ADDR, "127.0.0.1:9000"),
            (ENV_FETCH_TIMEOUT_SECS, "3"),
            (ENV_MAX_CONCURRENCY, "0"),
            ("NEWS_FEED_URL_WSJ", "https://example.com/wsj.xml"),
        ]));
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.max_concurrency(), 1);
        assert_eq!(cfg.feed_url(Source::Wsj), "https://example.com/wsj.xml");
        assert_eq!(cfg.feed_url(Source::Wired), Source::Wired.default_url());
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let cfg = Config::from_lookup(env(&[(ENV_FETCH_TIMEOUT_SECS, "soon")]));
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn flags_win_over_environment() {
        let cfg = Config::from_lookup(env(&[(ENV_BIND_ADDR, "127.0.0.1:9000")])).with_overrides(&Overrides {
            bind_addr: Some("127.0.0.1:7000".into()),
            static_dir: None,
            max_concurrency: Some(8),
        });
        assert_eq!(cfg.bind_addr(), "127.0.0.1:7000");
        assert_eq!(cfg.max_concurrency(), 8);
    }
}
