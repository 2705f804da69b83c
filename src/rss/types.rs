//! Type definitions for the RSS module.

use thiserror::Error;
use tokio::time::Duration;

/// One relayed feed entry: a title and the link it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub url: String,
}

/// Why a feed could not be turned into items.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, including failure to read the body
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP error: status {0}")]
    Status(u16),

    /// The body is not a readable RSS/XML document
    #[error("failed to parse feed: {0}")]
    Parse(String),
}

// Constants
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_ITEMS: usize = 10;
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
