//! Feed fetching, tolerant parsing and per-source rendering.

pub mod cli;
pub mod fetch;
pub mod format;
pub mod normalize;
pub mod recap;
pub mod schema;
pub mod service;
pub mod sources;
pub mod types;
pub mod xml;

pub use fetch::FeedClient;
pub use service::{load, stories, DEFAULT_COUNT};
pub use sources::Source;
